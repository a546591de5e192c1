// Snapshot fetch errors. These end a tick early; they never reach the rate engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to collector failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("collector returned status {status}")]
    Status { status: u16 },

    #[error("collector reported success=false")]
    Unsuccessful,

    #[error("local sampling failed: {reason}")]
    Sampling { reason: String },
}
