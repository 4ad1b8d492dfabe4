use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response header carrying the host's true screen resolution alongside the
/// image bytes. Clients re-read it on every frame.
pub const RESOLUTION_HEADER: &str = "x-screen-resolution";

/// Host screen geometry in pixels. This is the screen's true resolution, not
/// the encoded image's pixel size; the two are expected to match today, but
/// coordinate mapping is defined against the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Raised when a resolution descriptor does not parse as `WxH` with two
/// positive dimensions.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed resolution descriptor")]
pub struct ResolutionParseError;

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s.split_once('x').ok_or(ResolutionParseError)?;
        let width: u32 = width.parse().map_err(|_| ResolutionParseError)?;
        let height: u32 = height.parse().map_err(|_| ResolutionParseError)?;
        if width == 0 || height == 0 {
            return Err(ResolutionParseError);
        }
        Ok(Resolution { width, height })
    }
}

/// One captured screenshot plus the host resolution it was taken at.
/// Produced fresh for every image request; never cached server-side.
#[derive(Debug, Clone)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub resolution: Resolution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_round_trips() {
        let resolution = Resolution::new(1920, 1080);
        assert_eq!(resolution.to_string(), "1920x1080");
        assert_eq!("1920x1080".parse::<Resolution>().unwrap(), resolution);
    }

    #[test]
    fn malformed_descriptors_are_rejected() {
        assert!("1920".parse::<Resolution>().is_err());
        assert!("x1080".parse::<Resolution>().is_err());
        assert!("1920x".parse::<Resolution>().is_err());
        assert!("1920xabc".parse::<Resolution>().is_err());
        assert!("0x1080".parse::<Resolution>().is_err());
        assert!("1920x0".parse::<Resolution>().is_err());
        assert!("-1x1080".parse::<Resolution>().is_err());
    }
}
