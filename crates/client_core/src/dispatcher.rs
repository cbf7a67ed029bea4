use std::sync::Arc;

use shared::{ControllerFrame, FrameBuilder, MomentaryInput};
use tracing::{debug, error, warn};

use crate::{
    error::{ConnectivityError, DispatchError},
    transport::FrameTransport,
};

/// Sends frames one at a time through a [`FrameTransport`]. Each call is a
/// single attempt.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn FrameTransport>,
}

impl Dispatcher {
    pub fn new(transport: impl FrameTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn target(&self) -> String {
        self.transport.target()
    }

    pub async fn dispatch(&self, frame: &ControllerFrame) -> Result<(), DispatchError> {
        debug!(endpoint = %self.transport.target(), ?frame, "dispatching frame");
        let result = self.transport.send_frame(frame).await;
        if let Err(error) = &result {
            debug!(endpoint = %self.transport.target(), %error, "frame dispatch failed");
        }
        result
    }

    /// Sends a rest frame to confirm the device is reachable.
    pub async fn probe(&self) -> Result<(), ConnectivityError> {
        self.dispatch(&ControllerFrame::rest())
            .await
            .map_err(|source| ConnectivityError {
                endpoint: self.target(),
                source,
            })
    }

    /// Dispatches the press frame for `input`. The returned guard owns the
    /// matching release, which is still owed when the press itself failed.
    pub async fn press(&self, input: MomentaryInput) -> (PressGuard, Result<(), DispatchError>) {
        let guard = PressGuard {
            dispatcher: self.clone(),
            input,
            released: false,
        };
        let result = self.dispatch(&guard.press_frame()).await;
        (guard, result)
    }
}

/// Pending release of a pressed momentary input.
///
/// Call [`PressGuard::release`] to send the release frame. If the guard is
/// dropped first, the release is spawned onto the current runtime instead.
#[must_use = "a pressed input must be released"]
pub struct PressGuard {
    dispatcher: Dispatcher,
    input: MomentaryInput,
    released: bool,
}

impl PressGuard {
    pub fn input(&self) -> MomentaryInput {
        self.input
    }

    pub fn press_frame(&self) -> ControllerFrame {
        FrameBuilder::new().momentary(self.input, true).build()
    }

    pub fn release_frame(&self) -> ControllerFrame {
        FrameBuilder::new().momentary(self.input, false).build()
    }

    pub async fn release(mut self) -> Result<(), DispatchError> {
        self.released = true;
        let frame = self.release_frame();
        self.dispatcher.dispatch(&frame).await
    }
}

impl Drop for PressGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!(input = %self.input, "pressed input dropped before release; releasing in background");

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!(input = %self.input, "no runtime available; device may still hold the input");
            return;
        };
        let dispatcher = self.dispatcher.clone();
        let frame = self.release_frame();
        let input = self.input;
        runtime.spawn(async move {
            if let Err(error) = dispatcher.dispatch(&frame).await {
                error!(%input, %error, "background release failed; send reset to recover");
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
