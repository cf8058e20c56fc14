use super::{
    AudioOutput, MediaDuration, MetadataSource, NowPlaying, OutputSignal, PlaybackState,
    PlaybackStatus, PlayerError, PlayerEvent, SignalSender, SourceKind, SourceToken,
    Subscription, SubscriptionId,
    metadata::MetadataPoller,
    output::Inbound,
    state::clamp_volume,
    subscribers::Subscribers,
};
use anyhow::Result;
use crossbeam_channel::Receiver;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, trace, warn};

const DEFAULT_METADATA_INTERVAL: Duration = Duration::from_secs(30);

/// Single owner of the playback state.
///
/// All mutation happens on the thread that owns the controller: either in
/// one of the transition methods, or in `pump` when queued output signals
/// are applied. Observers get snapshots via `state()` and `subscribe()`.
pub struct PlaybackController {
    output: Box<dyn AudioOutput>,
    state: PlaybackState,
    token: SourceToken,
    failed: bool,

    signals: SignalSender,
    inbox: Receiver<Inbound>,
    subscribers: Subscribers,
    published: Option<PlaybackState>,

    metadata: Option<Arc<dyn MetadataSource>>,
    metadata_interval: Duration,
    poller: Option<MetadataPoller>,
}

impl PlaybackController {
    /// `make_output` receives the sender its signals must go through.
    pub fn new<O, F>(volume: f32, make_output: F) -> Result<Self>
    where
        O: AudioOutput + 'static,
        F: FnOnce(SignalSender) -> Result<O>,
    {
        let (tx, inbox) = crossbeam_channel::unbounded();
        let signals = SignalSender::new(tx);

        let mut output = make_output(signals.clone())?;
        let state = PlaybackState::idle(volume);
        output.set_volume(state.volume);

        Ok(PlaybackController {
            output: Box::new(output),
            state,
            token: SourceToken::default(),
            failed: false,

            signals,
            inbox,
            subscribers: Subscribers::default(),
            published: None,

            metadata: None,
            metadata_interval: DEFAULT_METADATA_INTERVAL,
            poller: None,
        })
    }

    /// Enables "now playing" polling while a live source is playing
    pub fn with_metadata(mut self, source: Arc<dyn MetadataSource>, interval: Duration) -> Self {
        self.metadata = Some(source);
        self.metadata_interval = interval;
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn subscribe(&mut self) -> Subscription {
        self.subscribers.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

// =================
//    TRANSITIONS
// =================
impl PlaybackController {
    /// Replaces the active source.
    ///
    /// Playback continues on the new source if the controller was playing,
    /// otherwise it stays paused. Unreachable urls are not detected here; they
    /// surface later as a `SourceFailed` event.
    pub fn switch_source(
        &mut self,
        url: &str,
        kind: SourceKind,
        now_playing: NowPlaying,
    ) -> Result<(), PlayerError> {
        if url.trim().is_empty() {
            return Err(PlayerError::EmptySource);
        }

        self.token = self.token.next();
        self.failed = false;
        info!(token = %self.token, url, ?kind, "switching source");

        self.output.stop();
        self.output.load(self.token, url);

        let state = &mut self.state;
        state.status = PlaybackStatus::Loading;
        state.source_url = Some(url.to_string());
        state.source_kind = kind;
        state.now_playing = now_playing;
        state.position = Duration::ZERO;
        state.is_buffering = true;
        state.duration = match kind {
            SourceKind::Live => MediaDuration::Unbounded,
            SourceKind::OnDemand => MediaDuration::Unknown,
        };

        if state.is_playing {
            self.output.play();
        }

        self.commit();
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state.is_playing {
            true => self.pause(),
            false => self.play(),
        }
    }

    /// Resumes playback. A source that failed to load is fetched again.
    pub fn play(&mut self) {
        if self.state.is_idle() || self.state.is_playing {
            return;
        }
        if self.failed {
            self.reload();
            return;
        }

        self.output.play();
        self.state.is_playing = true;
        self.state.status = PlaybackStatus::Playing;
        self.commit();
    }

    pub fn pause(&mut self) {
        if self.state.is_idle() || !self.state.is_playing {
            return;
        }

        self.output.pause();
        self.state.is_playing = false;
        self.state.status = PlaybackStatus::Paused;
        self.commit();
    }

    /// Repositions an on-demand source. Live sources ignore seeking.
    pub fn seek(&mut self, position_secs: f64) {
        if self.state.is_idle() {
            return;
        }
        if self.state.is_live() {
            debug!("seek ignored on live source");
            return;
        }

        let secs = match position_secs.is_nan() {
            true => 0.0,
            false => position_secs.max(0.0),
        };

        let target = match self.state.duration.finite() {
            Some(duration) if secs >= duration.as_secs_f64() => duration,
            _ => match Duration::try_from_secs_f64(secs) {
                Ok(d) => d,
                Err(_) => {
                    debug!(secs, "seek target out of range with unknown duration");
                    return;
                }
            },
        };

        if let Err(e) = self.output.seek(target) {
            warn!(error = %e, "output refused seek");
            return;
        }

        self.state.position = target;
        self.commit();
    }

    pub fn set_volume(&mut self, volume: f32) {
        let clamped = clamp_volume(volume);
        if clamped != volume {
            trace!(requested = volume, clamped, "volume clamped");
        }

        self.output.set_volume(clamped);
        self.state.volume = clamped;
        self.commit();
    }

    /// Unloads the source and returns to idle. Volume is kept.
    pub fn stop(&mut self) {
        if self.state.is_idle() {
            return;
        }

        self.token = self.token.next();
        self.failed = false;
        self.output.stop();
        self.state = PlaybackState::idle(self.state.volume);
        self.commit();
    }

    pub(crate) fn on_source_ended(&mut self) {
        let Some(url) = self.state.source_url.clone() else {
            return;
        };

        self.state.position = Duration::ZERO;

        // The token is unchanged on restart since the source is the same
        match self.state.source_kind {
            SourceKind::Live => {
                debug!(url, "live source ended, restarting");
                self.output.stop();
                self.output.load(self.token, &url);
                self.state.is_buffering = true;
                if self.state.is_playing {
                    self.output.play();
                }
            }
            SourceKind::OnDemand => {
                debug!(url, "on-demand source finished");
                self.output.pause();
                if let Err(e) = self.output.seek(Duration::ZERO) {
                    debug!(error = %e, "output unloaded at end, reloading");
                    self.output.stop();
                    self.output.load(self.token, &url);
                }
                self.state.is_playing = false;
                self.state.status = PlaybackStatus::Paused;
            }
        }
        self.commit();
    }

    /// Loads the current url again under a fresh token and plays it
    fn reload(&mut self) {
        let Some(url) = self.state.source_url.clone() else {
            return;
        };

        self.token = self.token.next();
        self.failed = false;
        info!(token = %self.token, url, "retrying failed source");

        self.output.stop();
        self.output.load(self.token, &url);
        self.output.play();

        let state = &mut self.state;
        state.status = PlaybackStatus::Loading;
        state.is_playing = true;
        state.is_buffering = true;
        state.position = Duration::ZERO;
        self.commit();
    }
}

// ===============
//    SIGNALS
// ===============
impl PlaybackController {
    /// Applies every queued output signal and metadata update.
    ///
    /// Messages tagged with a superseded source token are dropped. Returns
    /// how many messages were applied.
    pub fn pump(&mut self) -> usize {
        self.output.poll();

        let mut applied = 0;
        while let Ok(message) = self.inbox.try_recv() {
            match message {
                Inbound::Output(token, signal) => {
                    if token != self.token {
                        trace!(%token, active = %self.token, ?signal, "dropping stale signal");
                        continue;
                    }
                    self.apply_signal(signal);
                }
                Inbound::NowPlaying(token, now_playing) => {
                    if token != self.token || !self.state.is_live() {
                        trace!(%token, "dropping stale metadata");
                        continue;
                    }
                    self.state.now_playing = now_playing;
                }
            }
            applied += 1;
        }

        self.commit();
        applied
    }

    fn apply_signal(&mut self, signal: OutputSignal) {
        if self.state.is_idle() {
            return;
        }

        match signal {
            OutputSignal::MetadataLoaded { duration } => {
                if !self.state.is_live() {
                    self.state.duration = match duration {
                        Some(d) => MediaDuration::Finite(d),
                        None => MediaDuration::Unknown,
                    };
                    if let Some(d) = duration {
                        self.state.position = self.state.position.min(d);
                    }
                }
                self.mark_ready();
            }
            OutputSignal::CanPlay => self.mark_ready(),
            OutputSignal::Waiting => self.state.is_buffering = true,
            OutputSignal::TimeUpdate(position) => {
                self.state.position = match self.state.duration.finite() {
                    Some(duration) => position.min(duration),
                    None => position,
                };
            }
            OutputSignal::Ended => self.on_source_ended(),
            OutputSignal::Error(reason) => self.fail(reason),
        }
    }

    fn mark_ready(&mut self) {
        if self.state.is_buffering {
            self.subscribers.publish(PlayerEvent::SourceReady {
                kind: self.state.source_kind,
            });
        }

        self.state.is_buffering = false;
        if self.state.status == PlaybackStatus::Loading {
            self.state.status = match self.state.is_playing {
                true => PlaybackStatus::Playing,
                false => PlaybackStatus::Paused,
            };
        }
    }

    fn fail(&mut self, reason: String) {
        let url = self.state.source_url.clone().unwrap_or_default();
        warn!(url, reason, "playback failed");

        self.failed = true;
        self.output.pause();
        self.state.is_playing = false;
        self.state.is_buffering = false;
        self.state.status = PlaybackStatus::Paused;

        self.subscribers.publish(PlayerEvent::SourceFailed {
            kind: self.state.source_kind,
            error: PlayerError::SourceLoad { url, reason },
        });
    }

    /// Publishes the state if it changed and starts or cancels metadata
    /// polling to match it.
    fn commit(&mut self) {
        self.sync_poller();

        if self.published.as_ref() != Some(&self.state) {
            self.published = Some(self.state.clone());
            self.subscribers
                .publish(PlayerEvent::StateChanged(self.state.clone()));
        }
    }

    fn sync_poller(&mut self) {
        let wanted = self.state.status == PlaybackStatus::Playing && self.state.is_live();

        if !wanted {
            self.poller = None;
            return;
        }
        if self.poller.as_ref().is_some_and(|p| p.token() == self.token) {
            return;
        }

        self.poller = self.metadata.as_ref().map(|source| {
            MetadataPoller::spawn(
                Arc::clone(source),
                self.token,
                self.signals.clone(),
                self.metadata_interval,
            )
        });
    }

    #[cfg(test)]
    pub(crate) fn is_polling_metadata(&self) -> bool {
        self.poller.is_some()
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::fake_output::{OutputCall, fake_controller};

    fn track(title: &str) -> NowPlaying {
        NowPlaying::new(title, "Artist", "/art.jpg")
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn volume_is_clamped_for_any_input() {
        let (mut player, _out) = fake_controller(0.8);
        for v in [-3.0, -0.2, 0.0, 0.25, 0.5, 1.0, 1.5, 42.0] {
            player.set_volume(v);
            assert_eq!(player.state().volume, v.clamp(0.0, 1.0));
        }
    }

    #[test]
    fn volume_applies_while_idle_and_reaches_output() {
        let (mut player, out) = fake_controller(0.8);
        player.set_volume(0.3);

        assert!(player.state().is_idle());
        assert_eq!(player.state().volume, 0.3);
        assert_eq!(out.log.calls().last(), Some(&OutputCall::Volume(0.3)));
    }

    #[test]
    fn live_volume_scenario() {
        let (mut player, _out) = fake_controller(0.8);
        player
            .switch_source("https://radio/stream", SourceKind::Live, track("Live"))
            .unwrap();
        player.play();

        player.set_volume(1.5);
        assert_eq!(player.state().volume, 1.0);
        player.set_volume(-0.2);
        assert_eq!(player.state().volume, 0.0);
    }

    #[test]
    fn empty_url_is_rejected_without_touching_state() {
        let (mut player, out) = fake_controller(0.8);
        let before = player.state().clone();

        assert_eq!(
            player.switch_source("  ", SourceKind::OnDemand, track("A")),
            Err(PlayerError::EmptySource)
        );
        assert_eq!(player.state(), &before);
        assert!(!out.log.calls().iter().any(|c| matches!(c, OutputCall::Load(..))));
    }

    #[test]
    fn toggle_is_ignored_while_idle() {
        let (mut player, out) = fake_controller(0.8);
        out.log.clear();

        player.toggle_play_pause();
        assert!(!player.state().is_playing);
        assert!(player.state().is_idle());
        assert!(out.log.calls().is_empty());
    }

    #[test]
    fn on_demand_scenario_plays_and_clamps_seek() {
        let (mut player, out) = fake_controller(0.8);

        player
            .switch_source("https://x/track.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        assert_eq!(player.state().status, PlaybackStatus::Loading);
        assert!(!player.state().is_playing);

        player.toggle_play_pause();
        assert_eq!(player.state().status, PlaybackStatus::Playing);
        assert!(player.state().is_playing);
        assert_eq!(
            player.state().source_url.as_deref(),
            Some("https://x/track.mp3")
        );

        out.emit(OutputSignal::MetadataLoaded {
            duration: Some(secs(120)),
        });
        player.pump();
        assert_eq!(player.state().duration, MediaDuration::Finite(secs(120)));

        player.seek(9999.0);
        assert_eq!(player.state().position, secs(120));
        assert_eq!(out.log.calls().last(), Some(&OutputCall::Seek(secs(120))));

        player.seek(-5.0);
        assert_eq!(player.state().position, Duration::ZERO);
    }

    #[test]
    fn seek_with_unknown_duration_only_clamps_below() {
        let (mut player, _out) = fake_controller(0.8);
        player
            .switch_source("/music/a.flac", SourceKind::OnDemand, track("A"))
            .unwrap();

        player.seek(42.5);
        assert_eq!(player.state().position, Duration::from_secs_f64(42.5));

        player.seek(f64::NAN);
        assert_eq!(player.state().position, Duration::ZERO);
    }

    #[test]
    fn live_sources_are_unbounded_and_ignore_seek() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("https://radio/stream", SourceKind::Live, track("Live"))
            .unwrap();
        player.play();
        out.emit(OutputSignal::MetadataLoaded {
            duration: Some(secs(10)),
        });
        out.emit(OutputSignal::TimeUpdate(secs(7)));
        player.pump();

        assert_eq!(player.state().duration, MediaDuration::Unbounded);
        assert!(!player.state().can_seek());

        let before = player.state().clone();
        out.log.clear();
        player.seek(3.0);

        assert_eq!(player.state(), &before);
        assert!(out.log.calls().is_empty());
    }

    #[test]
    fn switching_while_paused_stays_paused() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        out.log.clear();

        player
            .switch_source("/b.mp3", SourceKind::OnDemand, track("B"))
            .unwrap();
        out.emit(OutputSignal::CanPlay);
        player.pump();

        assert_eq!(player.state().status, PlaybackStatus::Paused);
        assert!(!out.log.calls().contains(&OutputCall::Play));
    }

    #[test]
    fn switching_while_playing_replaces_then_plays() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        player.play();
        out.emit(OutputSignal::TimeUpdate(secs(50)));
        player.pump();
        out.log.clear();

        player
            .switch_source("/b.mp3", SourceKind::OnDemand, track("B"))
            .unwrap();

        let token = out.last_token();
        assert_eq!(
            out.log.calls(),
            vec![
                OutputCall::Stop,
                OutputCall::Load(token, "/b.mp3".to_string()),
                OutputCall::Play,
            ]
        );
        assert_eq!(player.state().position, Duration::ZERO);
        assert_eq!(player.state().now_playing.title, "B");
        assert_eq!(player.state().status, PlaybackStatus::Loading);

        out.emit(OutputSignal::MetadataLoaded {
            duration: Some(secs(200)),
        });
        player.pump();
        assert_eq!(player.state().status, PlaybackStatus::Playing);
        assert!(!player.state().is_buffering);
    }

    #[test]
    fn stale_completions_are_ignored() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("/slow.mp3", SourceKind::OnDemand, track("Slow"))
            .unwrap();
        let stale = out.last_token();

        player
            .switch_source("/fast.mp3", SourceKind::OnDemand, track("Fast"))
            .unwrap();
        let before = player.state().clone();

        out.emit_for(
            stale,
            OutputSignal::MetadataLoaded {
                duration: Some(secs(999)),
            },
        );
        out.emit_for(stale, OutputSignal::Error("timeout".into()));
        out.emit_for(stale, OutputSignal::Ended);
        assert_eq!(player.pump(), 0);
        assert_eq!(player.state(), &before);

        out.emit(OutputSignal::MetadataLoaded {
            duration: Some(secs(60)),
        });
        assert_eq!(player.pump(), 1);
        assert_eq!(player.state().duration, MediaDuration::Finite(secs(60)));
    }

    #[test]
    fn on_demand_end_stops_at_zero() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        player.play();
        out.emit(OutputSignal::MetadataLoaded {
            duration: Some(secs(90)),
        });
        out.emit(OutputSignal::TimeUpdate(secs(90)));
        player.pump();
        out.log.clear();

        out.emit(OutputSignal::Ended);
        player.pump();

        let state = player.state();
        assert!(!state.is_playing);
        assert_eq!(state.position, Duration::ZERO);
        assert_eq!(state.status, PlaybackStatus::Paused);
        assert_eq!(state.source_url.as_deref(), Some("/a.mp3"));
        assert_eq!(
            out.log.calls(),
            vec![OutputCall::Pause, OutputCall::Seek(Duration::ZERO)]
        );
    }

    #[test]
    fn on_demand_end_reloads_when_output_let_go_of_the_source() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("https://x/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        player.play();
        let token = out.last_token();
        out.log.clear();
        out.unload();

        out.emit(OutputSignal::Ended);
        player.pump();

        assert_eq!(
            out.log.calls(),
            vec![
                OutputCall::Pause,
                OutputCall::Stop,
                OutputCall::Load(token, "https://x/a.mp3".to_string()),
            ]
        );
        assert!(!player.state().is_playing);
        assert_eq!(player.state().status, PlaybackStatus::Paused);
    }

    #[test]
    fn late_duration_clamps_an_earlier_seek() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        player.seek(300.0);
        assert_eq!(player.state().position, secs(300));

        out.emit(OutputSignal::MetadataLoaded {
            duration: Some(secs(120)),
        });
        player.pump();

        assert_eq!(player.state().duration, MediaDuration::Finite(secs(120)));
        assert_eq!(player.state().position, secs(120));
    }

    #[test]
    fn live_end_restarts_and_keeps_playing() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("https://radio/stream", SourceKind::Live, track("Live"))
            .unwrap();
        player.play();
        out.emit(OutputSignal::CanPlay);
        out.emit(OutputSignal::TimeUpdate(secs(3600)));
        player.pump();
        out.log.clear();

        out.emit(OutputSignal::Ended);
        player.pump();

        let state = player.state();
        assert!(state.is_playing);
        assert_eq!(state.position, Duration::ZERO);
        assert_eq!(state.status, PlaybackStatus::Playing);
        assert!(out.log.calls().contains(&OutputCall::Play));
    }

    #[test]
    fn output_error_pauses_and_reports_failure() {
        let (mut player, out) = fake_controller(0.8);
        let sub = player.subscribe();

        player
            .switch_source("https://down/stream", SourceKind::Live, track("Live"))
            .unwrap();
        player.play();
        out.emit(OutputSignal::Error("connection refused".into()));
        player.pump();

        assert!(!player.state().is_playing);
        assert_eq!(player.state().status, PlaybackStatus::Paused);

        let failure = sub.events.try_iter().find_map(|e| match e {
            PlayerEvent::SourceFailed { kind, error } => Some((kind, error)),
            _ => None,
        });
        assert_eq!(
            failure,
            Some((
                SourceKind::Live,
                PlayerError::SourceLoad {
                    url: "https://down/stream".into(),
                    reason: "connection refused".into(),
                }
            ))
        );
    }

    #[test]
    fn play_after_failure_fetches_the_source_again() {
        let (mut player, out) = fake_controller(0.8);
        let sub = player.subscribe();
        player
            .switch_source("https://down/stream", SourceKind::Live, track("Live"))
            .unwrap();
        player.play();
        let failed = out.last_token();
        out.emit(OutputSignal::Error("connection refused".into()));
        player.pump();
        out.log.clear();

        player.toggle_play_pause();

        let token = out.last_token();
        assert_ne!(token, failed);
        assert_eq!(
            out.log.calls(),
            vec![
                OutputCall::Stop,
                OutputCall::Load(token, "https://down/stream".to_string()),
                OutputCall::Play,
            ]
        );
        let state = player.state();
        assert!(state.is_playing);
        assert!(state.is_buffering);
        assert_eq!(state.status, PlaybackStatus::Loading);

        // the earlier load can no longer fail the retry
        out.emit_for(failed, OutputSignal::Error("late".into()));
        out.emit(OutputSignal::CanPlay);
        player.pump();
        assert_eq!(player.state().status, PlaybackStatus::Playing);
        assert!(!player.state().is_buffering);

        let ready = sub
            .events
            .try_iter()
            .filter(|e| matches!(e, PlayerEvent::SourceReady { .. }))
            .count();
        assert_eq!(ready, 1);
    }

    #[test]
    fn resuming_a_healthy_pause_does_not_reload() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        player.play();
        out.emit(OutputSignal::CanPlay);
        player.pump();
        player.pause();
        out.log.clear();

        player.play();
        assert_eq!(out.log.calls(), vec![OutputCall::Play]);
        assert_eq!(player.state().status, PlaybackStatus::Playing);
    }

    #[test]
    fn waiting_flags_buffering_until_ready() {
        let (mut player, out) = fake_controller(0.8);
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        player.play();
        out.emit(OutputSignal::CanPlay);
        player.pump();
        assert!(!player.state().is_buffering);

        out.emit(OutputSignal::Waiting);
        player.pump();
        assert!(player.state().is_buffering);
        assert!(player.state().is_playing);

        out.emit(OutputSignal::CanPlay);
        player.pump();
        assert!(!player.state().is_buffering);
    }

    #[test]
    fn subscribers_see_changes_once_and_can_leave() {
        let (mut player, _out) = fake_controller(0.8);
        let sub = player.subscribe();

        player.set_volume(0.5);
        player.set_volume(0.5);
        let changes: Vec<_> = sub.events.try_iter().collect();
        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], PlayerEvent::StateChanged(s) if s.volume == 0.5));

        assert!(player.unsubscribe(sub.id));
        assert!(!player.unsubscribe(sub.id));
        player.set_volume(0.1);
        assert!(sub.events.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let (mut player, _out) = fake_controller(0.8);
        let keep = player.subscribe();
        drop(player.subscribe());

        player.set_volume(0.4);
        assert_eq!(player.subscriber_count(), 1);
        assert!(keep.events.try_recv().is_ok());
    }

    #[test]
    fn stop_returns_to_idle_and_invalidates_signals() {
        let (mut player, out) = fake_controller(0.6);
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        player.play();
        let token = out.last_token();

        player.stop();
        out.emit_for(token, OutputSignal::CanPlay);
        assert_eq!(player.pump(), 0);

        let state = player.state();
        assert!(state.is_idle());
        assert!(state.source_url.is_none());
        assert_eq!(state.volume, 0.6);
    }

    struct Fixed(NowPlaying);

    impl MetadataSource for Fixed {
        fn fetch(&self) -> Result<NowPlaying> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn metadata_polls_only_while_playing_live() {
        let (player, out) = fake_controller(0.8);
        let mut player = player.with_metadata(
            Arc::new(Fixed(track("On Air Now"))),
            Duration::from_secs(3600),
        );

        player
            .switch_source("https://radio/stream", SourceKind::Live, track("Live"))
            .unwrap();
        assert!(!player.is_polling_metadata());

        player.play();
        assert!(player.is_polling_metadata());

        // first fetch happens immediately on the poller thread
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while player.state().now_playing.title != "On Air Now" {
            assert!(std::time::Instant::now() < deadline, "metadata never arrived");
            std::thread::sleep(Duration::from_millis(5));
            player.pump();
        }

        player.pause();
        assert!(!player.is_polling_metadata());

        player.play();
        player
            .switch_source("/a.mp3", SourceKind::OnDemand, track("A"))
            .unwrap();
        assert!(!player.is_polling_metadata());

        // a late result from the live poller must not overwrite on-demand metadata
        out.signals().now_playing(out.last_token(), track("Late"));
        player.pump();
        assert_eq!(player.state().now_playing.title, "A");
    }
}
