//! Scripted output used by the controller and station tests.

use super::{AudioOutput, OutputSignal, PlaybackController, SignalSender, SourceToken};
use anyhow::Result;
use anyhow::bail;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum OutputCall {
    Load(SourceToken, String),
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(f32),
}

#[derive(Clone, Default)]
pub(crate) struct OutputLog(Rc<RefCell<Vec<OutputCall>>>);

impl OutputLog {
    pub(crate) fn calls(&self) -> Vec<OutputCall> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear()
    }

    fn push(&self, call: OutputCall) {
        self.0.borrow_mut().push(call)
    }
}

pub(crate) struct FakeOutput {
    log: OutputLog,
    unloaded: Rc<Cell<bool>>,
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, token: SourceToken, url: &str) {
        self.log.push(OutputCall::Load(token, url.to_string()))
    }

    fn play(&mut self) {
        self.log.push(OutputCall::Play)
    }

    fn pause(&mut self) {
        self.log.push(OutputCall::Pause)
    }

    fn stop(&mut self) {
        self.log.push(OutputCall::Stop)
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        if self.unloaded.get() {
            bail!("no source loaded");
        }
        self.log.push(OutputCall::Seek(position));
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.push(OutputCall::Volume(volume))
    }
}

/// Test-side view of a `FakeOutput`: inspect calls, inject signals
pub(crate) struct FakeHandle {
    pub(crate) log: OutputLog,
    signals: SignalSender,
    unloaded: Rc<Cell<bool>>,
}

impl FakeHandle {
    /// Token of the most recent `load` the controller issued
    pub(crate) fn last_token(&self) -> SourceToken {
        self.log
            .calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                OutputCall::Load(token, _) => Some(*token),
                _ => None,
            })
            .expect("no source was loaded")
    }

    pub(crate) fn emit(&self, signal: OutputSignal) {
        self.signals.send(self.last_token(), signal)
    }

    pub(crate) fn emit_for(&self, token: SourceToken, signal: OutputSignal) {
        self.signals.send(token, signal)
    }

    /// Makes later seeks fail, like an output that dropped its source
    pub(crate) fn unload(&self) {
        self.unloaded.set(true)
    }

    pub(crate) fn signals(&self) -> SignalSender {
        self.signals.clone()
    }
}

pub(crate) fn fake_controller(volume: f32) -> (PlaybackController, FakeHandle) {
    let log = OutputLog::default();
    let unloaded = Rc::new(Cell::new(false));
    let mut captured = None;

    let controller = PlaybackController::new(volume, |signals| {
        captured = Some(signals);
        Ok(FakeOutput {
            log: log.clone(),
            unloaded: Rc::clone(&unloaded),
        })
    })
    .unwrap();

    let handle = FakeHandle {
        log,
        signals: captured.unwrap(),
        unloaded,
    };
    (controller, handle)
}
