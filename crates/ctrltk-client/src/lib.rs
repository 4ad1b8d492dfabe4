//! Client-side protocol logic for ctrltk viewers. Keeps the web and CLI
//! frontends in agreement about coordinate mapping, pointer modes, keyboard
//! event normalization, and the frame poll loop without copying the math
//! across implementations.

use ctrltk_core::{
    KeyboardRequest, Modifiers, MouseMoveRequest, MoveMode, Resolution, ScrollDirection,
};
use serde::{Deserialize, Serialize};

/// Pointer semantics selected for a viewing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerMode {
    Relative,
    Absolute,
}

/// One pointer event as the frontend reports it.
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    /// Motion delta since the last report (relative sessions).
    Delta { dx: f64, dy: f64 },
    /// Position in viewport pixels (absolute sessions).
    Position { cx: f64, cy: f64 },
}

/// Client-held view of the scaled display.
///
/// The image fills the viewport width preserving aspect ratio, so the height
/// it occupies is derived from the host resolution. The host resolution is
/// re-read from the sidecar header on every frame; it is assumed stable per
/// host but never trusted to be.
#[derive(Debug, Clone, Copy)]
pub struct ViewportState {
    displayed_width: f64,
    host: Resolution,
}

impl ViewportState {
    pub fn new(displayed_width: f64, host: Resolution) -> Self {
        Self {
            displayed_width,
            host,
        }
    }

    /// Fold a fresh frame's resolution descriptor into the mapping state.
    pub fn observe_frame(&mut self, host: Resolution) {
        self.host = host;
    }

    /// The viewport was resized; the image re-fills the new width.
    pub fn resize(&mut self, displayed_width: f64) {
        self.displayed_width = displayed_width;
    }

    pub fn host(&self) -> Resolution {
        self.host
    }

    /// Height the scaled image occupies on screen.
    pub fn displayed_height(&self) -> f64 {
        self.displayed_width * f64::from(self.host.height) / f64::from(self.host.width)
    }

    /// Map a pointer position in viewport pixels to an absolute host pixel.
    /// Returns `None` while the viewport has no usable extent.
    pub fn map_pointer(&self, cx: f64, cy: f64) -> Option<(f64, f64)> {
        if !(self.displayed_width > 0.0) {
            return None;
        }
        let displayed_height = self.displayed_height();
        if !(displayed_height > 0.0) {
            return None;
        }
        let x = cx * f64::from(self.host.width) / self.displayed_width;
        let y = cy * f64::from(self.host.height) / displayed_height;
        Some((x, y))
    }

    /// Absolute move request for a pointer position, pre-mapped to host
    /// pixels so the server forwards the numbers verbatim.
    pub fn absolute_move(&self, cx: f64, cy: f64) -> Option<MouseMoveRequest> {
        let (x, y) = self.map_pointer(cx, cy)?;
        Some(MouseMoveRequest {
            x,
            y,
            mode: MoveMode::Absolute,
        })
    }
}

/// Per-session pointer state: the mode switch plus the move lock a
/// double-click toggles (the crosshair overlay in relative sessions).
#[derive(Debug, Clone)]
pub struct PointerSession {
    mode: PointerMode,
    move_locked: bool,
}

impl PointerSession {
    pub fn new(mode: PointerMode) -> Self {
        Self {
            mode,
            move_locked: false,
        }
    }

    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    pub fn move_locked(&self) -> bool {
        self.move_locked
    }

    /// Double-click handler. Returns the new lock state so the frontend can
    /// show or hide the overlay.
    pub fn toggle_move_lock(&mut self) -> bool {
        self.move_locked = !self.move_locked;
        self.move_locked
    }

    /// Translate one pointer event into the move request to send, if any.
    /// Locked sessions and events that do not match the session mode produce
    /// nothing.
    pub fn motion(&self, viewport: &ViewportState, event: PointerEvent) -> Option<MouseMoveRequest> {
        if self.move_locked {
            return None;
        }
        match (self.mode, event) {
            (PointerMode::Relative, PointerEvent::Delta { dx, dy }) => Some(MouseMoveRequest {
                x: dx,
                y: dy,
                mode: MoveMode::Relative,
            }),
            (PointerMode::Absolute, PointerEvent::Position { cx, cy }) => {
                viewport.absolute_move(cx, cy)
            }
            _ => None,
        }
    }
}

/// Filter applied to a key event before it reaches the wire: bare modifier
/// presses travel as part of the next real key, and `Enter` is spelled
/// `Return` in the injection syntax.
pub fn normalize_key(key: &str) -> Option<&str> {
    match key {
        "Control" | "Alt" | "Shift" => None,
        "Enter" => Some("Return"),
        other => Some(other),
    }
}

/// Wheel delta to scroll direction, exactly as the stock viewer sends it.
pub fn wheel_direction(delta_y: f64) -> ScrollDirection {
    if delta_y < 0.0 {
        ScrollDirection::Down
    } else {
        ScrollDirection::Up
    }
}

/// Build the keyboard payload for one key event, honoring both the held
/// modifiers reported by the event and the viewer's latched on-screen
/// modifier buttons.
pub fn keyboard_request(key: &str, held: Modifiers, latched: Modifiers) -> Option<KeyboardRequest> {
    let key = normalize_key(key)?;
    Some(KeyboardRequest {
        key: key.to_owned(),
        modifiers: Modifiers {
            ctrl: held.ctrl || latched.ctrl,
            alt: held.alt || latched.alt,
            sup: held.sup || latched.sup,
        },
    })
}

/// What the viewer does after handling one poll response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Ask for the next frame. "Frame displayed" is the only completion
    /// signal, which throttles the pull loop to render speed.
    RequestNext,
}

/// Book-keeping for the continuous pull loop. A failed frame is skipped and
/// counted, never fatal to the loop.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    frames: u64,
    failures: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// A frame arrived and was displayed; fold its resolution descriptor into
    /// the viewport before the next request goes out.
    pub fn frame_displayed(
        &mut self,
        viewport: &mut ViewportState,
        resolution: Resolution,
    ) -> LoopAction {
        self.frames += 1;
        viewport.observe_frame(resolution);
        LoopAction::RequestNext
    }

    /// The poll failed (transport error or a capture failure on the host).
    pub fn frame_failed(&mut self) -> LoopAction {
        self.failures += 1;
        LoopAction::RequestNext
    }
}
