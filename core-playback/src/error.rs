use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Renderer error: {0}")]
    Renderer(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
