//! Simulated receiver state, updated from posted controller frames.

use serde::Serialize;
use serde_json::{Map, Value};
use shared::{Button, ControllerFrame, ShoulderButton, Stick, StickPosition, SystemButton};

/// A stick axis beyond this magnitude counts as active input.
pub const ACTIVE_STICK_THRESHOLD: i32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    #[serde(flatten)]
    pub frame: ControllerFrame,
    pub last_active_input: Option<String>,
    pub updates: u64,
}

impl DeviceState {
    /// Applies a posted document. Categories that are absent or not objects keep
    /// their previous values; absent or mistyped keys inside a present category
    /// fall back to released / centered. Returns the most recent active input
    /// named by this document, if any.
    pub fn apply(&mut self, doc: &Value) -> Option<&'static str> {
        let mut latest = None;

        if let Some(buttons) = category(doc, "buttons") {
            for button in Button::ALL {
                let pressed = flag(buttons, button.wire_name());
                self.frame.buttons.set(button, pressed);
                if pressed {
                    latest = Some(button.wire_name());
                }
            }
        }

        for (stick, label) in [(Stick::Left, "STICK_L"), (Stick::Right, "STICK_R")] {
            let Some(axes) = category(doc, stick.wire_name()) else {
                continue;
            };
            let position = StickPosition::clamped(axis(axes, "x"), axis(axes, "y"));
            match stick {
                Stick::Left => self.frame.left_stick = position,
                Stick::Right => self.frame.right_stick = position,
            }
            if position.x.abs() > ACTIVE_STICK_THRESHOLD || position.y.abs() > ACTIVE_STICK_THRESHOLD
            {
                latest = Some(label);
            }
        }

        if let Some(shoulder) = category(doc, "shoulder") {
            for button in ShoulderButton::ALL {
                let pressed = flag(shoulder, button.wire_name());
                self.frame.shoulder.set(button, pressed);
                if pressed {
                    latest = Some(button.wire_name());
                }
            }
        }

        if let Some(system) = category(doc, "system") {
            for button in SystemButton::ALL {
                let pressed = flag(system, button.wire_name());
                self.frame.system.set(button, pressed);
                if pressed {
                    latest = Some(system_label(button));
                }
            }
        }

        self.updates += 1;
        if let Some(input) = latest {
            self.last_active_input = Some(input.to_string());
        }
        latest
    }
}

fn category<'a>(doc: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    doc.get(key).and_then(Value::as_object)
}

fn flag(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Missing, non-integer, or out-of-`i32` values read as 0.
fn axis(object: &Map<String, Value>, key: &str) -> i32 {
    object
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|raw| i32::try_from(raw).ok())
        .unwrap_or(0)
}

fn system_label(button: SystemButton) -> &'static str {
    match button {
        SystemButton::Plus => "+",
        SystemButton::Minus => "-",
        SystemButton::Home => "HOME",
    }
}

#[cfg(test)]
#[path = "tests/device_tests.rs"]
mod tests;
