//! Interactive dispatch loop.
//!
//! The loop is strictly sequential: a command is fully executed, including
//! any hold wait, before the next line is read.

use std::time::Duration;

use shared::{ControllerFrame, FrameBuilder, MomentaryInput};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::watch,
};
use tracing::{debug, info, warn};

use crate::{
    command::Command,
    dispatcher::Dispatcher,
    error::{CommandError, DispatchError, StartupError},
};

pub const DEFAULT_HOLD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    Quit,
    EndOfInput,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    AwaitingCommand,
    HelpRequested,
    InvalidCommand(CommandError),
    Dispatched(ControllerFrame),
    DispatchFailed {
        frame: ControllerFrame,
        error: DispatchError,
    },
    InputFailed(String),
    Terminating(TerminationCause),
}

/// Receives everything the operator should see.
pub trait Reporter {
    fn report(&mut self, event: SessionEvent);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub commands: usize,
    pub frames_sent: usize,
    pub failures: usize,
    pub cause: Option<TerminationCause>,
}

/// Fires an [`Interrupt`].
#[derive(Debug)]
pub struct InterruptHandle {
    tx: watch::Sender<bool>,
}

impl InterruptHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Operator interrupt, observed while waiting for input and during holds.
/// Once triggered it stays triggered.
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

impl Interrupt {
    pub fn channel() -> (InterruptHandle, Interrupt) {
        let (tx, rx) = watch::channel(false);
        (InterruptHandle { tx }, Interrupt { rx })
    }

    pub fn never() -> Self {
        let (_handle, interrupt) = Self::channel();
        interrupt
    }

    pub async fn triggered(&mut self) {
        if self.rx.wait_for(|fired| *fired).await.is_err() {
            // handle dropped without firing
            std::future::pending::<()>().await;
        }
    }
}

pub struct Session<R: Reporter> {
    dispatcher: Dispatcher,
    hold: Duration,
    reporter: R,
    interrupt: Interrupt,
    state: LoopState,
    summary: SessionSummary,
}

impl<R: Reporter> Session<R> {
    /// Probes the device and, only if it answers, returns a running session.
    /// An interrupt abandons the probe.
    pub async fn connect(
        dispatcher: Dispatcher,
        hold: Duration,
        reporter: R,
        mut interrupt: Interrupt,
    ) -> Result<Self, StartupError> {
        info!(endpoint = %dispatcher.target(), "probing controller device");
        tokio::select! {
            biased;
            _ = interrupt.triggered() => return Err(StartupError::Interrupted),
            probed = dispatcher.probe() => probed?,
        }
        info!(endpoint = %dispatcher.target(), "controller device reachable");
        Ok(Self::new(dispatcher, hold, reporter, interrupt))
    }

    pub fn new(dispatcher: Dispatcher, hold: Duration, reporter: R, interrupt: Interrupt) -> Self {
        Self {
            dispatcher,
            hold,
            reporter,
            interrupt,
            state: LoopState::Running,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Reads one command per line until quit, end of input, or interrupt.
    pub async fn run<I>(&mut self, input: I) -> SessionSummary
    where
        I: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while self.state == LoopState::Running {
            self.reporter.report(SessionEvent::AwaitingCommand);

            let next = tokio::select! {
                biased;
                _ = self.interrupt.triggered() => None,
                line = lines.next_line() => Some(line),
            };

            match next {
                None => self.terminate(TerminationCause::Interrupted).await,
                Some(Ok(Some(line))) => self.handle_line(&line).await,
                Some(Ok(None)) => self.terminate(TerminationCause::EndOfInput).await,
                Some(Err(error)) => {
                    warn!(%error, "failed to read command input");
                    self.reporter
                        .report(SessionEvent::InputFailed(error.to_string()));
                    self.terminate(TerminationCause::EndOfInput).await;
                }
            }
        }
        self.summary.clone()
    }

    pub async fn handle_line(&mut self, line: &str) {
        match Command::parse(line) {
            Ok(command) => self.execute(command).await,
            Err(error) => {
                debug!(%error, "rejected command");
                self.reporter.report(SessionEvent::InvalidCommand(error));
            }
        }
    }

    pub async fn execute(&mut self, command: Command) {
        if self.state == LoopState::Terminated {
            return;
        }
        info!(%command, "executing command");
        self.summary.commands += 1;

        match command {
            Command::Tap(input) => self.tap(input).await,
            Command::Tilt { stick, direction } => {
                let frame = FrameBuilder::new()
                    .stick(stick, direction.deflection())
                    .build();
                self.send(frame).await;
            }
            Command::Reset => self.send(ControllerFrame::rest()).await,
            Command::Help => self.reporter.report(SessionEvent::HelpRequested),
            Command::Quit => self.terminate(TerminationCause::Quit).await,
        }
    }

    async fn tap(&mut self, input: MomentaryInput) {
        let (guard, pressed) = self.dispatcher.press(input).await;
        self.record(guard.press_frame(), pressed);

        let interrupted = tokio::select! {
            _ = tokio::time::sleep(self.hold) => false,
            _ = self.interrupt.triggered() => true,
        };
        if interrupted {
            info!(%input, "hold interrupted; releasing early");
        }

        let release_frame = guard.release_frame();
        let released = guard.release().await;
        self.record(release_frame, released);

        if interrupted {
            self.terminate(TerminationCause::Interrupted).await;
        }
    }

    async fn send(&mut self, frame: ControllerFrame) {
        let result = self.dispatcher.dispatch(&frame).await;
        self.record(frame, result);
    }

    fn record(&mut self, frame: ControllerFrame, result: Result<(), DispatchError>) {
        match result {
            Ok(()) => {
                self.summary.frames_sent += 1;
                self.reporter.report(SessionEvent::Dispatched(frame));
            }
            Err(error) => {
                self.summary.failures += 1;
                self.reporter
                    .report(SessionEvent::DispatchFailed { frame, error });
            }
        }
    }

    async fn terminate(&mut self, cause: TerminationCause) {
        if self.state == LoopState::Terminated {
            return;
        }
        info!(?cause, "terminating session");
        self.reporter.report(SessionEvent::Terminating(cause));
        self.send(ControllerFrame::rest()).await;
        self.state = LoopState::Terminated;
        self.summary.cause = Some(cause);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
