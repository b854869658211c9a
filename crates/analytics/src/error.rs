use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid reporting window: {0}")]
    InvalidWindow(#[from] CoreError),

    #[error("Missing input collection '{0}': refusing to compute partial metrics")]
    MissingData(&'static str),
}
