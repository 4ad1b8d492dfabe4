use axum::async_trait;
use ctrltk_core::{key_sequence, InputCommand, MoveMode};
use thiserror::Error;
use tokio::process::Command;

/// Failure raised while replaying a command on the host. Surfaces as a plain
/// 500; no retry is performed.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("failed to spawn xdotool: {0}")]
    Spawn(std::io::Error),
    #[error("xdotool exited with {0}")]
    Tool(std::process::ExitStatus),
}

/// Single-method seam over the host's input mechanism.
#[async_trait]
pub trait InputInjector: Send + Sync {
    /// Replay one command on the host. Commands arrive one per request and
    /// are never queued.
    async fn inject(&self, command: InputCommand) -> Result<(), InjectError>;
}

/// Production injector driving `xdotool`.
#[derive(Debug, Default)]
pub struct XdotoolInjector;

/// Argument vector for one command. Split out so the translation is testable
/// without a display server. Button ordinals and the modifier order in key
/// sequences follow the X11 conventions xdotool expects.
fn xdotool_args(command: &InputCommand) -> Vec<String> {
    match command {
        InputCommand::KeyPress {
            key,
            ctrl,
            alt,
            sup,
        } => vec!["key".into(), key_sequence(*ctrl, *alt, *sup, key)],
        InputCommand::MouseMove {
            x,
            y,
            mode: MoveMode::Relative,
        } => vec![
            "mousemove_relative".into(),
            "--".into(),
            pixel(*x),
            pixel(*y),
        ],
        InputCommand::MouseMove {
            x,
            y,
            mode: MoveMode::Absolute,
        } => vec!["mousemove".into(), pixel(*x), pixel(*y)],
        InputCommand::MouseClick { button } => {
            vec!["click".into(), button.ordinal().to_string()]
        }
        InputCommand::MouseScroll { direction } => {
            vec!["click".into(), direction.ordinal().to_string()]
        }
    }
}

fn pixel(value: f64) -> String {
    (value.round() as i64).to_string()
}

#[async_trait]
impl InputInjector for XdotoolInjector {
    async fn inject(&self, command: InputCommand) -> Result<(), InjectError> {
        let args = xdotool_args(&command);
        let status = Command::new("xdotool")
            .args(&args)
            .status()
            .await
            .map_err(InjectError::Spawn)?;
        if !status.success() {
            return Err(InjectError::Tool(status));
        }
        Ok(())
    }
}
