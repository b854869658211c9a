use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error(transparent)]
    InvalidRange(#[from] CoreError),

    #[error("Invalid stay settings: {0}")]
    InvalidSettings(String),
}
