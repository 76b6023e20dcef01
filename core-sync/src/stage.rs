//! Content staging seam.
//!
//! Before a candidate playlist replaces the accepted one, its media must be
//! available locally. The [`ContentStager`] trait is where hosts plug in
//! their download/cache pipeline; the sync service only cares whether
//! staging succeeded for the whole candidate.

use crate::Result;
use async_trait::async_trait;
use core_playlist::Playlist;

/// Makes a candidate playlist's media available for playback.
///
/// Implementations should stage every referenced file and return
/// [`SyncError::StagingFailed`](crate::SyncError::StagingFailed) naming the
/// first file that could not be staged. Staging must be idempotent: the
/// sync service retries the same candidate after a failure.
#[async_trait]
pub trait ContentStager: Send + Sync {
    async fn stage(&self, playlist: &Playlist) -> Result<()>;
}

/// Stager for hosts that render directly from URLs and need no local copy.
///
/// Accepts every candidate without touching its media.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStager;

#[async_trait]
impl ContentStager for NoopStager {
    async fn stage(&self, _playlist: &Playlist) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_stager_accepts_everything() {
        let stager = NoopStager;
        let playlist = Playlist::default();
        assert!(stager.stage(&playlist).await.is_ok());
    }
}
