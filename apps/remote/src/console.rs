//! Operator-facing terminal output.

use std::io::{self, Write};

use client_core::{
    help_text, ConnectivityError, DispatchError, Endpoint, Reporter, SessionEvent,
    TerminationCause,
};
use shared::ControllerFrame;
use tracing::warn;

pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_event(&mut self, event: SessionEvent) -> io::Result<()> {
        match event {
            SessionEvent::AwaitingCommand => {
                write!(self.out, "command > ")?;
                self.out.flush()
            }
            SessionEvent::HelpRequested => write!(self.out, "{}", help_text()),
            SessionEvent::InvalidCommand(error) => writeln!(self.out, "{error}"),
            SessionEvent::Dispatched(frame) => {
                writeln!(self.out, "✓ sent: {}", render_frame(&frame))
            }
            SessionEvent::DispatchFailed { error, .. } => match error {
                DispatchError::RemoteRejected { status, body } => {
                    writeln!(self.out, "✗ rejected: {status} - {body}")
                }
                DispatchError::TransportFailure(detail) => {
                    writeln!(self.out, "✗ connection error: {detail}")
                }
            },
            SessionEvent::InputFailed(detail) => writeln!(self.out, "✗ input error: {detail}"),
            SessionEvent::Terminating(TerminationCause::Interrupted) => {
                writeln!(self.out, "\ninterrupted; resetting controller")
            }
            SessionEvent::Terminating(_) => writeln!(self.out, "resetting controller"),
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: SessionEvent) {
        if let Err(error) = self.write_event(event) {
            warn!(%error, "failed to write operator output");
        }
    }
}

fn render_frame(frame: &ControllerFrame) -> String {
    frame.to_json().unwrap_or_else(|_| format!("{frame:?}"))
}

pub fn print_banner(out: &mut impl Write, endpoint: &Endpoint) -> io::Result<()> {
    writeln!(out, "switch-remote")?;
    writeln!(out, "target: {endpoint}")?;
    writeln!(out)?;
    writeln!(out, "checking connection...")
}

pub fn print_connected(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "connected")?;
    writeln!(out)?;
    write!(out, "{}", help_text())?;
    writeln!(out)
}

pub fn print_probe_failure(out: &mut impl Write, error: &ConnectivityError) -> io::Result<()> {
    writeln!(out, "{error}")?;
    for (index, hint) in error.hints().iter().enumerate() {
        writeln!(out, "{}. {hint}", index + 1)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
