use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Screen is not paired: screenId/screenToken missing from settings")]
    NotPaired,

    #[error("Playlist fetch returned HTTP {status}")]
    FetchFailed { status: u16 },

    #[error("Bridge error: {0}")]
    Transport(#[from] BridgeError),

    #[error("Failed to stage content file {filename}")]
    StagingFailed { filename: String },

    #[error("Staging abandoned after {attempts} attempts")]
    StagingExhausted { attempts: u32 },

    #[error("Failed to persist playlist: {0}")]
    Persist(String),

    #[error("Sync service is already running")]
    AlreadyRunning,
}

pub type Result<T> = std::result::Result<T, SyncError>;
