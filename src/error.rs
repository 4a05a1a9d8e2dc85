//! Error type shared by the generator, its host and the preview tooling.

use thiserror::Error;

use crate::host::RoomHandle;

/// Everything that can stop a generation run or one of its helpers.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A configuration value is missing or inconsistent.
    #[error("configuration fault: {0}")]
    ConfigurationFault(String),

    /// The host has no room template, so no room can be created.
    #[error("no room template installed, cannot spawn rooms")]
    MissingRoomTemplate,

    /// A handle that was destroyed (or never existed) was used.
    #[error("room {0:?} is not alive")]
    StaleRoom(RoomHandle),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to write preview image: {0}")]
    Image(#[from] image::ImageError),
}

impl GenerationError {
    /// Faults that come from how the generator was set up rather than from I/O.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationFault(_) | Self::MissingRoomTemplate | Self::StaleRoom(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
