//! Operator command grammar.
//!
//! Tokens are matched exactly after trimming, except `quit` which is
//! case-insensitive. When two bindings share a token the earlier one wins;
//! see [`shadowed_bindings`].

use std::{fmt, str::FromStr};

use shared::{Button, Direction, MomentaryInput, ShoulderButton, Stick, SystemButton};

use crate::error::CommandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Press, hold, release.
    Tap(MomentaryInput),
    /// Single frame with one stick fully deflected; not released.
    Tilt { stick: Stick, direction: Direction },
    Reset,
    Help,
    Quit,
}

const fn tilt(stick: Stick, direction: Direction) -> Command {
    Command::Tilt { stick, direction }
}

/// Token table in precedence order.
const BINDINGS: &[(&str, Command)] = &[
    ("A", Command::Tap(MomentaryInput::Button(Button::A))),
    ("B", Command::Tap(MomentaryInput::Button(Button::B))),
    ("X", Command::Tap(MomentaryInput::Button(Button::X))),
    ("Y", Command::Tap(MomentaryInput::Button(Button::Y))),
    ("l", Command::Tap(MomentaryInput::Shoulder(ShoulderButton::L))),
    ("r", Command::Tap(MomentaryInput::Shoulder(ShoulderButton::R))),
    ("zl", Command::Tap(MomentaryInput::Shoulder(ShoulderButton::ZL))),
    ("zr", Command::Tap(MomentaryInput::Shoulder(ShoulderButton::ZR))),
    ("+", Command::Tap(MomentaryInput::System(SystemButton::Plus))),
    ("-", Command::Tap(MomentaryInput::System(SystemButton::Minus))),
    ("h", Command::Tap(MomentaryInput::System(SystemButton::Home))),
    ("w", tilt(Stick::Left, Direction::Up)),
    ("a", tilt(Stick::Left, Direction::Left)),
    ("s", tilt(Stick::Left, Direction::Down)),
    ("d", tilt(Stick::Left, Direction::Right)),
    ("i", tilt(Stick::Right, Direction::Up)),
    ("j", tilt(Stick::Right, Direction::Left)),
    ("k", tilt(Stick::Right, Direction::Down)),
    ("l", tilt(Stick::Right, Direction::Right)),
    ("reset", Command::Reset),
    ("help", Command::Help),
    ("?", Command::Help),
];

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let token = line.trim();
        if token.eq_ignore_ascii_case("quit") {
            return Ok(Command::Quit);
        }

        BINDINGS
            .iter()
            .find(|(bound, _)| *bound == token)
            .map(|(_, command)| *command)
            .ok_or_else(|| CommandError::InvalidCommand(token.to_string()))
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Tap(input) => write!(f, "tap {input}"),
            Command::Tilt { stick, direction } => {
                let side = match stick {
                    Stick::Left => "left",
                    Stick::Right => "right",
                };
                write!(f, "{side} stick {direction}")
            }
            Command::Reset => f.write_str("reset"),
            Command::Help => f.write_str("help"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

/// Bindings that can never be reached because an earlier binding claims the
/// same token.
pub fn shadowed_bindings() -> Vec<(&'static str, Command)> {
    BINDINGS
        .iter()
        .enumerate()
        .filter(|(index, (token, _))| {
            BINDINGS[..*index]
                .iter()
                .any(|(earlier, _)| earlier == token)
        })
        .map(|(_, binding)| *binding)
        .collect()
}

pub fn help_text() -> String {
    let mut text = String::from(
        "commands:\n\
         \x20 A, B, X, Y    tap a main button (upper-case only)\n\
         \x20 l, r, zl, zr  tap a shoulder button\n\
         \x20 +, -, h       tap plus, minus, home\n\
         \x20 w, a, s, d    left stick up, left, down, right\n\
         \x20 i, j, k, l    right stick up, left, down, right\n\
         \x20 reset         release everything and center both sticks\n\
         \x20 help, ?       show this list\n\
         \x20 quit          reset and exit\n",
    );
    for (token, command) in shadowed_bindings() {
        let winner = Command::parse(token).map(|c| c.to_string()).unwrap_or_default();
        text.push_str(&format!(
            "note: '{token}' is bound to both {winner} and {command}; {winner} takes precedence\n"
        ));
    }
    text
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
