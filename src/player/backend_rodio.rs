use super::{AudioOutput, OutputSignal, SignalSender, SourceToken, tapped_source::TappedSource};
use anyhow::{Context, Result, ensure};
use crossbeam_channel::{Receiver, TryRecvError};
use lofty::{prelude::AudioFile, probe::Probe};
use reqwest::header::CONTENT_TYPE;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source, decoder::builder::SeekMode};
use std::{
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const STALL_AFTER: Duration = Duration::from_millis(1500);

type BoxedSource = Box<dyn Source + Send>;

struct LoadedSource {
    source: BoxedSource,
    duration: Option<Duration>,
    download: Option<Download>,
}

/// Body of a fully downloaded remote source, kept for reloading the same url
#[derive(Clone)]
struct Download {
    url: String,
    bytes: Arc<[u8]>,
    hint: Option<String>,
}

/// `AudioOutput` over the default audio device.
///
/// Local paths and `file://` urls are decoded directly. Remote urls are
/// fetched on a loader thread: responses with a known length are buffered
/// and seekable, open-ended responses (radio streams) are decoded as they
/// arrive and cannot seek. The last download is kept so an on-demand file
/// that played to the end can be loaded again without refetching it.
///
/// A playing source whose position stops advancing reports `Waiting`, and
/// `CanPlay` once it moves again.
pub struct RodioOutput {
    sink: Sink,
    _stream: OutputStream,
    signals: SignalSender,
    http: reqwest::blocking::Client,

    pending: Option<(SourceToken, Receiver<Result<LoadedSource>>)>,
    current: Option<SourceToken>,
    ended: Arc<AtomicBool>,
    wants_play: bool,
    last_position: Duration,
    stall: StallWatch,
    download: Option<Download>,
}

impl RodioOutput {
    pub fn new(signals: SignalSender) -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.pause();

        let http = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            sink,
            _stream: stream,
            signals,
            http,

            pending: None,
            current: None,
            ended: Arc::new(AtomicBool::new(false)),
            wants_play: false,
            last_position: Duration::ZERO,
            stall: StallWatch::new(Instant::now()),
            download: None,
        })
    }

    fn finish_load(&mut self, token: SourceToken, result: Result<LoadedSource>) {
        let mut loaded = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                self.signals
                    .send(token, OutputSignal::Error(format!("{e:#}")));
                return;
            }
        };

        self.ended.store(false, Ordering::SeqCst);
        let tapped = TappedSource::new(loaded.source, Arc::clone(&self.ended));

        self.sink.clear();
        self.sink.append(tapped);
        match self.wants_play {
            true => self.sink.play(),
            false => self.sink.pause(),
        }

        self.current = Some(token);
        self.last_position = Duration::ZERO;
        self.stall.reset(Instant::now());
        if let Some(download) = loaded.download.take() {
            self.download = Some(download);
        }
        debug!(%token, duration = ?loaded.duration, "source ready");

        self.signals.send(
            token,
            OutputSignal::MetadataLoaded {
                duration: loaded.duration,
            },
        );
        self.signals.send(token, OutputSignal::CanPlay);
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, token: SourceToken, url: &str) {
        self.current = None;
        self.ended.store(false, Ordering::SeqCst);

        let (tx, rx) = crossbeam_channel::bounded(1);
        let http = self.http.clone();
        let cached = self.download.as_ref().filter(|d| d.url == url).cloned();
        let url = url.to_string();

        thread::spawn(move || {
            // Fails quietly once a newer load replaced the receiver
            let _ = tx.send(open_source(&http, &url, cached));
        });

        self.pending = Some((token, rx));
    }

    fn play(&mut self) {
        self.wants_play = true;
        self.sink.play();
    }

    fn pause(&mut self) {
        self.wants_play = false;
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.pending = None;
        self.current = None;
        self.wants_play = false;
        self.sink.clear();
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        ensure!(self.current.is_some(), "no source loaded");

        self.sink.try_seek(position)?;
        self.last_position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn poll(&mut self) {
        let polled = self
            .pending
            .as_ref()
            .map(|(token, rx)| (*token, rx.try_recv()));

        match polled {
            Some((token, Ok(result))) => {
                self.pending = None;
                self.finish_load(token, result);
            }
            Some((token, Err(TryRecvError::Disconnected))) => {
                self.pending = None;
                warn!(%token, "loader thread exited without a result");
                self.signals.send(
                    token,
                    OutputSignal::Error("loader exited unexpectedly".to_string()),
                );
            }
            _ => (),
        }

        let Some(token) = self.current else {
            return;
        };

        // Checking `current` ensures the end signal is sent once
        if self.ended.load(Ordering::SeqCst) && self.sink.empty() {
            self.current = None;
            self.signals.send(token, OutputSignal::Ended);
            return;
        }

        let position = self.sink.get_pos();
        let progressed = position != self.last_position;
        if let Some(signal) = self.stall.observe(progressed, self.wants_play, Instant::now()) {
            debug!(%token, ?signal, "playback progress changed");
            self.signals.send(token, signal);
        }

        if progressed {
            self.last_position = position;
            self.signals.send(token, OutputSignal::TimeUpdate(position));
        }
    }
}

/// Turns a playing source's position progress into buffering signals
#[derive(Debug)]
struct StallWatch {
    last_progress: Instant,
    waiting: bool,
}

impl StallWatch {
    fn new(now: Instant) -> Self {
        StallWatch {
            last_progress: now,
            waiting: false,
        }
    }

    fn reset(&mut self, now: Instant) {
        self.last_progress = now;
        self.waiting = false;
    }

    fn observe(&mut self, progressed: bool, playing: bool, now: Instant) -> Option<OutputSignal> {
        if !playing {
            self.last_progress = now;
            return None;
        }
        if progressed {
            self.last_progress = now;
            return std::mem::take(&mut self.waiting).then_some(OutputSignal::CanPlay);
        }

        let stalled = now.saturating_duration_since(self.last_progress) >= STALL_AFTER;
        match stalled && !self.waiting {
            true => {
                self.waiting = true;
                Some(OutputSignal::Waiting)
            }
            false => None,
        }
    }
}

fn open_source(
    http: &reqwest::blocking::Client,
    url: &str,
    cached: Option<Download>,
) -> Result<LoadedSource> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return match cached {
            Some(download) => {
                debug!(url, "reusing downloaded source");
                decode_download(download)
            }
            None => open_remote(http, url),
        };
    }

    let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
    let decoder = decode_file(&path)?;
    let duration = probe_duration(&path).or_else(|| decoder.total_duration());

    Ok(LoadedSource {
        source: Box::new(decoder),
        duration,
        download: None,
    })
}

fn open_remote(http: &reqwest::blocking::Client, url: &str) -> Result<LoadedSource> {
    let response = http
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("connecting to {url}"))?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(';').next().unwrap_or(s).trim().to_string());
    let hint = content_type.or_else(|| url_extension(url).map(|ext| extension_hint(&ext).to_string()));

    match response.content_length() {
        Some(_) => {
            let bytes = response.bytes().context("downloading source")?;
            decode_download(Download {
                url: url.to_string(),
                bytes: Arc::from(bytes.as_ref()),
                hint,
            })
        }
        None => {
            let mut builder = Decoder::builder()
                .with_data(ForwardOnly::new(response))
                .with_seekable(false);
            if let Some(hint) = &hint {
                builder = builder.with_hint(hint);
            }

            Ok(LoadedSource {
                source: Box::new(builder.build()?),
                duration: None,
                download: None,
            })
        }
    }
}

fn decode_download(download: Download) -> Result<LoadedSource> {
    let mut builder = Decoder::builder()
        .with_data(Cursor::new(Arc::clone(&download.bytes)))
        .with_byte_len(download.bytes.len() as u64)
        .with_seek_mode(SeekMode::Fastest)
        .with_seekable(true);
    if let Some(hint) = &download.hint {
        builder = builder.with_hint(hint);
    }

    let decoder = builder.build()?;
    let duration = decoder.total_duration();
    Ok(LoadedSource {
        source: Box::new(decoder),
        duration,
        download: Some(download),
    })
}

fn decode_file(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let len = file.metadata()?.len();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_byte_len(len)
        .with_seek_mode(SeekMode::Fastest)
        .with_seekable(true);

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        builder = builder.with_hint(extension_hint(ext));
    }

    Ok(builder.build()?)
}

fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = Probe::open(path).ok()?.guess_file_type().ok()?.read().ok()?;
    let duration = tagged.properties().duration();

    (!duration.is_zero()).then_some(duration)
}

fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let (_, ext) = path.rsplit_once('/')?.1.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn extension_hint(ext: &str) -> &str {
    match ext {
        "adif" | "adts" => "aac",
        "caf" => "audio/x-caf",
        "m4a" | "m4b" | "m4p" | "m4r" | "mp4" => "audio/mp4",
        "bit" | "mpga" => "mp3",
        "mka" | "mkv" => "audio/matroska",
        "oga" | "ogm" | "ogv" | "ogx" | "spx" => "audio/ogg",
        "wave" => "wav",
        _ => ext,
    }
}

/// Reader for open-ended streams.
///
/// The decoder requires `Seek`; only no-op seeks are honoured.
struct ForwardOnly<R> {
    inner: Mutex<R>,
    position: u64,
}

impl<R> ForwardOnly<R> {
    fn new(inner: R) -> Self {
        ForwardOnly {
            inner: Mutex::new(inner),
            position: 0,
        }
    }
}

impl<R: Read> Read for ForwardOnly<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let reader = self
            .inner
            .get_mut()
            .map_err(|_| io::Error::other("stream reader poisoned"))?;

        let n = reader.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<R> Seek for ForwardOnly<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Current(0) => Ok(self.position),
            SeekFrom::Start(p) if p == self.position => Ok(p),
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "live streams cannot seek",
            )),
        }
    }
}
