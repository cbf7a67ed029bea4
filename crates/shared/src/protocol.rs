//! Wire representation of a controller frame and the builder that produces it.
//!
//! A frame is a complete snapshot: every category is always serialized, and
//! anything the caller did not set is at rest. Frames never inherit from the
//! previously sent frame.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Button, MomentaryInput, ShoulderButton, Stick, StickPosition, SystemButton},
    error::FrameError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonsState {
    #[serde(rename = "A")]
    pub a: bool,
    #[serde(rename = "B")]
    pub b: bool,
    #[serde(rename = "X")]
    pub x: bool,
    #[serde(rename = "Y")]
    pub y: bool,
}

impl ButtonsState {
    pub fn get(&self, button: Button) -> bool {
        match button {
            Button::A => self.a,
            Button::B => self.b,
            Button::X => self.x,
            Button::Y => self.y,
        }
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        match button {
            Button::A => self.a = pressed,
            Button::B => self.b = pressed,
            Button::X => self.x = pressed,
            Button::Y => self.y = pressed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShoulderState {
    #[serde(rename = "L")]
    pub l: bool,
    #[serde(rename = "R")]
    pub r: bool,
    #[serde(rename = "ZL")]
    pub zl: bool,
    #[serde(rename = "ZR")]
    pub zr: bool,
}

impl ShoulderState {
    pub fn get(&self, button: ShoulderButton) -> bool {
        match button {
            ShoulderButton::L => self.l,
            ShoulderButton::R => self.r,
            ShoulderButton::ZL => self.zl,
            ShoulderButton::ZR => self.zr,
        }
    }

    pub fn set(&mut self, button: ShoulderButton, pressed: bool) {
        match button {
            ShoulderButton::L => self.l = pressed,
            ShoulderButton::R => self.r = pressed,
            ShoulderButton::ZL => self.zl = pressed,
            ShoulderButton::ZR => self.zr = pressed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemState {
    pub plus: bool,
    pub minus: bool,
    pub home: bool,
}

impl SystemState {
    pub fn get(&self, button: SystemButton) -> bool {
        match button {
            SystemButton::Plus => self.plus,
            SystemButton::Minus => self.minus,
            SystemButton::Home => self.home,
        }
    }

    pub fn set(&mut self, button: SystemButton, pressed: bool) {
        match button {
            SystemButton::Plus => self.plus = pressed,
            SystemButton::Minus => self.minus = pressed,
            SystemButton::Home => self.home = pressed,
        }
    }
}

/// Request body for `POST /controller`. Field order matches the documented
/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerFrame {
    pub buttons: ButtonsState,
    #[serde(rename = "lstick")]
    pub left_stick: StickPosition,
    #[serde(rename = "rstick")]
    pub right_stick: StickPosition,
    pub shoulder: ShoulderState,
    pub system: SystemState,
}

impl ControllerFrame {
    /// Every button released and both sticks centered.
    pub fn rest() -> Self {
        Self::default()
    }

    pub fn is_rest(&self) -> bool {
        *self == Self::rest()
    }

    pub fn stick(&self, stick: Stick) -> StickPosition {
        match stick {
            Stick::Left => self.left_stick,
            Stick::Right => self.right_stick,
        }
    }

    pub fn is_pressed(&self, input: MomentaryInput) -> bool {
        match input {
            MomentaryInput::Button(button) => self.buttons.get(button),
            MomentaryInput::Shoulder(button) => self.shoulder.get(button),
            MomentaryInput::System(button) => self.system.get(button),
        }
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        for position in [self.left_stick, self.right_stick] {
            StickPosition::try_new(position.x, position.y)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, FrameError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Overlays a partial description of controller state onto the rest frame.
///
/// ```
/// use shared::{Button, ControllerFrame, FrameBuilder};
///
/// let frame = FrameBuilder::new().button(Button::A, true).build();
/// assert!(frame.buttons.a);
/// assert_eq!(frame.shoulder, ControllerFrame::rest().shoulder);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    frame: ControllerFrame,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(mut self, button: Button, pressed: bool) -> Self {
        self.frame.buttons.set(button, pressed);
        self
    }

    pub fn shoulder(mut self, button: ShoulderButton, pressed: bool) -> Self {
        self.frame.shoulder.set(button, pressed);
        self
    }

    pub fn system(mut self, button: SystemButton, pressed: bool) -> Self {
        self.frame.system.set(button, pressed);
        self
    }

    pub fn momentary(self, input: MomentaryInput, pressed: bool) -> Self {
        match input {
            MomentaryInput::Button(button) => self.button(button, pressed),
            MomentaryInput::Shoulder(button) => self.shoulder(button, pressed),
            MomentaryInput::System(button) => self.system(button, pressed),
        }
    }

    pub fn stick(mut self, stick: Stick, position: StickPosition) -> Self {
        match stick {
            Stick::Left => self.frame.left_stick = position,
            Stick::Right => self.frame.right_stick = position,
        }
        self
    }

    pub fn left_stick(self, position: StickPosition) -> Self {
        self.stick(Stick::Left, position)
    }

    pub fn right_stick(self, position: StickPosition) -> Self {
        self.stick(Stick::Right, position)
    }

    pub fn buttons(mut self, buttons: ButtonsState) -> Self {
        self.frame.buttons = buttons;
        self
    }

    pub fn shoulders(mut self, shoulder: ShoulderState) -> Self {
        self.frame.shoulder = shoulder;
        self
    }

    pub fn system_buttons(mut self, system: SystemState) -> Self {
        self.frame.system = system;
        self
    }

    pub fn build(self) -> ControllerFrame {
        self.frame
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
