//! Shared protocol vocabulary for ctrltk: permission tiers and identities,
//! the credential store, canonical input commands with their wire request
//! shapes, and the screen resolution descriptor. Both the server and the
//! client crates speak through these types so the protocol contract lives in
//! exactly one place.

pub mod command;
pub mod resolution;
pub mod tier;
pub mod wire;

pub use command::{key_sequence, InputCommand, MouseButton, MoveMode, ScrollDirection};
pub use resolution::{Frame, Resolution, ResolutionParseError, RESOLUTION_HEADER};
pub use tier::{CredentialError, CredentialStore, Identity, Tier};
pub use wire::{
    ImageFormat, InfoResponse, KeyboardRequest, Modifiers, MouseClickRequest, MouseMoveRequest,
    MouseScrollRequest, ValidationError,
};
