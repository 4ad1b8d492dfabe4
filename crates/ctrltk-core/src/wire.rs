//! Request and response bodies as they travel over HTTP, plus the command
//! normalizer that collapses each validated body into exactly one
//! [`InputCommand`]. Wire fields carry no serde defaults: a missing or
//! mistyped field fails deserialization instead of producing a partial
//! command.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::{InputCommand, MouseButton, MoveMode, ScrollDirection};
use crate::tier::Identity;

/// Shape violation caught while normalizing a payload the deserializer
/// already accepted. Surfaces as a bare client error; the field name only
/// feeds logs.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid field {field}")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Modifier flags accompanying a keyboard event. All three are required on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    #[serde(rename = "super")]
    pub sup: bool,
}

/// Body of `POST /api/keyboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardRequest {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyboardRequest {
    pub fn normalize(&self) -> Result<InputCommand, ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError { field: "key" });
        }
        Ok(InputCommand::KeyPress {
            key: self.key.clone(),
            ctrl: self.modifiers.ctrl,
            alt: self.modifiers.alt,
            sup: self.modifiers.sup,
        })
    }
}

/// Body of `POST /api/mouse/move`. Relative values are client-side deltas;
/// absolute values are host pixels already mapped by the client. The
/// normalizer never rescales, it forwards the numbers verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouseMoveRequest {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub mode: MoveMode,
}

impl MouseMoveRequest {
    pub fn normalize(&self) -> Result<InputCommand, ValidationError> {
        if !self.x.is_finite() {
            return Err(ValidationError { field: "x" });
        }
        if !self.y.is_finite() {
            return Err(ValidationError { field: "y" });
        }
        Ok(InputCommand::MouseMove {
            x: self.x,
            y: self.y,
            mode: self.mode,
        })
    }
}

/// Body of `POST /api/mouse/click`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouseClickRequest {
    pub button: MouseButton,
}

impl MouseClickRequest {
    pub fn normalize(&self) -> Result<InputCommand, ValidationError> {
        Ok(InputCommand::MouseClick {
            button: self.button,
        })
    }
}

/// Body of `POST /api/mouse/scroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouseScrollRequest {
    pub direction: ScrollDirection,
}

impl MouseScrollRequest {
    pub fn normalize(&self) -> Result<InputCommand, ValidationError> {
        Ok(InputCommand::MouseScroll {
            direction: self.direction,
        })
    }
}

/// Image encodings the capture collaborator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Png,
}

impl ImageFormat {
    /// Query-parameter form; omitted or unrecognized values fall back to jpg.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("png") => ImageFormat::Png,
            _ => ImageFormat::Jpg,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// Body of `GET /api/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub version: String,
    pub user: Identity,
}
