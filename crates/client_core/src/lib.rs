//! Client side of the controller remote: turns operator commands into frames
//! and posts them to the device.

pub mod command;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod session;
pub mod transport;

pub use command::{help_text, shadowed_bindings, Command};
pub use dispatcher::{Dispatcher, PressGuard};
pub use endpoint::{Endpoint, DEFAULT_CONTROLLER_PATH};
pub use error::{CommandError, ConnectivityError, DispatchError, EndpointError, StartupError};
pub use session::{
    Interrupt, InterruptHandle, LoopState, Reporter, Session, SessionEvent, SessionSummary,
    TerminationCause, DEFAULT_HOLD,
};
pub use transport::{FrameTransport, HttpTransport, DEFAULT_REQUEST_TIMEOUT};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
