//! Controller frame model and wire format shared by the remote client and the
//! device simulator.

pub mod domain;
pub mod error;
pub mod protocol;

pub use domain::{
    Button, Direction, MomentaryInput, ShoulderButton, Stick, StickPosition, SystemButton,
};
pub use error::FrameError;
pub use protocol::{ButtonsState, ControllerFrame, FrameBuilder, ShoulderState, SystemState};
