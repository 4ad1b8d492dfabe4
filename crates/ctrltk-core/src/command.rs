use serde::{Deserialize, Serialize};

/// Pointer motion semantics carried by a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveMode {
    /// Deltas since the last reported pointer position on the client.
    Relative,
    /// Pre-mapped host-pixel coordinates.
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// X11 pointer button number understood by the injection collaborator.
    pub fn ordinal(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Scroll wheel button number. 4/5 is the X11 driver convention; changing
    /// it inverts scroll direction on the host.
    pub fn ordinal(self) -> u8 {
        match self {
            ScrollDirection::Up => 4,
            ScrollDirection::Down => 5,
        }
    }
}

/// One validated host command. Built by the normalizer from a single request
/// body, dispatched to the injection collaborator exactly once, then dropped;
/// commands are never queued or batched.
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    KeyPress {
        key: String,
        ctrl: bool,
        alt: bool,
        sup: bool,
    },
    MouseMove {
        x: f64,
        y: f64,
        mode: MoveMode,
    },
    MouseClick {
        button: MouseButton,
    },
    MouseScroll {
        direction: ScrollDirection,
    },
}

/// Compose the injection key sequence for a key press: enabled modifiers in
/// the fixed order ctrl, alt, super, then the base key. The order is part of
/// the downstream injection syntax and must be preserved exactly.
pub fn key_sequence(ctrl: bool, alt: bool, sup: bool, key: &str) -> String {
    let mut parts = Vec::with_capacity(4);
    if ctrl {
        parts.push("ctrl");
    }
    if alt {
        parts.push("alt");
    }
    if sup {
        parts.push("super");
    }
    parts.push(key);
    parts.join("+")
}
