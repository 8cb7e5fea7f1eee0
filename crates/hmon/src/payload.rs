//! Request payload lookup.

use std::path::Path;

use async_trait::async_trait;

use crate::error::CheckError;

/// Source of POST bodies referenced by
/// [`MonitorSpec::payload_ref`](crate::monitor::MonitorSpec::payload_ref)
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Read the bytes for `payload_ref`, resolved against `base_dir`
    async fn read(&self, base_dir: &Path, payload_ref: &str) -> Result<Vec<u8>, CheckError>;
}

/// Reads payloads from files relative to the base directory
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPayloadStore;

#[async_trait]
impl PayloadStore for FsPayloadStore {
    async fn read(&self, base_dir: &Path, payload_ref: &str) -> Result<Vec<u8>, CheckError> {
        let path = base_dir.join(payload_ref);
        tokio::fs::read(&path).await.map_err(|source| CheckError::PayloadRead { path, source })
    }
}
