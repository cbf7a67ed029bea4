use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

pub const STICK_MIN: i32 = -100;
pub const STICK_MAX: i32 = 100;

/// Face buttons. Serialized under `buttons` with their upper-case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::A, Button::B, Button::X, Button::Y];

    pub fn wire_name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShoulderButton {
    L,
    R,
    ZL,
    ZR,
}

impl ShoulderButton {
    pub const ALL: [ShoulderButton; 4] = [
        ShoulderButton::L,
        ShoulderButton::R,
        ShoulderButton::ZL,
        ShoulderButton::ZR,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            ShoulderButton::L => "L",
            ShoulderButton::R => "R",
            ShoulderButton::ZL => "ZL",
            ShoulderButton::ZR => "ZR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemButton {
    Plus,
    Minus,
    Home,
}

impl SystemButton {
    pub const ALL: [SystemButton; 3] = [SystemButton::Plus, SystemButton::Minus, SystemButton::Home];

    pub fn wire_name(self) -> &'static str {
        match self {
            SystemButton::Plus => "plus",
            SystemButton::Minus => "minus",
            SystemButton::Home => "home",
        }
    }
}

/// Any input that is tapped: pressed, held, then released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MomentaryInput {
    Button(Button),
    Shoulder(ShoulderButton),
    System(SystemButton),
}

impl MomentaryInput {
    pub fn wire_name(self) -> &'static str {
        match self {
            MomentaryInput::Button(button) => button.wire_name(),
            MomentaryInput::Shoulder(button) => button.wire_name(),
            MomentaryInput::System(button) => button.wire_name(),
        }
    }
}

impl fmt::Display for MomentaryInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub fn wire_name(self) -> &'static str {
        match self {
            Stick::Left => "lstick",
            Stick::Right => "rstick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Full deflection along one axis. Up is positive y.
    pub fn deflection(self) -> StickPosition {
        match self {
            Direction::Up => StickPosition { x: 0, y: STICK_MAX },
            Direction::Left => StickPosition { x: STICK_MIN, y: 0 },
            Direction::Down => StickPosition { x: 0, y: STICK_MIN },
            Direction::Right => StickPosition { x: STICK_MAX, y: 0 },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Analog deflection on both axes. The valid range is [-100, 100]; nothing in
/// the frame model clamps, so callers either use [`StickPosition::try_new`] or
/// construct in-range values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StickPosition {
    pub x: i32,
    pub y: i32,
}

impl StickPosition {
    pub const CENTER: StickPosition = StickPosition { x: 0, y: 0 };

    pub fn try_new(x: i32, y: i32) -> Result<Self, FrameError> {
        let position = Self { x, y };
        if position.is_in_range() {
            Ok(position)
        } else {
            Err(FrameError::StickOutOfRange { x, y })
        }
    }

    pub fn clamped(x: i32, y: i32) -> Self {
        Self {
            x: x.clamp(STICK_MIN, STICK_MAX),
            y: y.clamp(STICK_MIN, STICK_MAX),
        }
    }

    pub fn is_in_range(&self) -> bool {
        (STICK_MIN..=STICK_MAX).contains(&self.x) && (STICK_MIN..=STICK_MAX).contains(&self.y)
    }

    pub fn is_centered(&self) -> bool {
        *self == Self::CENTER
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
