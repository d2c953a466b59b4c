//! History storage backends.
//!
//! Both backends realize the same [`HistoryStorePort`] contract; the
//! settings snapshot picks which one a deployment uses.

mod encrypted;
mod format;
mod plain;

pub use encrypted::EncryptedFileStore;
pub use plain::PlainFileStore;

pub(crate) use plain::atomic_write;

use ck_core::ports::HistoryStorePort;
use ck_core::StorageKind;
use std::path::Path;
use std::sync::Arc;

/// Open the configured backend rooted at `dir`. The encrypted backend
/// requires a passphrase.
pub fn open_store(
    kind: StorageKind,
    dir: &Path,
    passphrase: Option<&str>,
) -> anyhow::Result<Arc<dyn HistoryStorePort>> {
    match kind {
        StorageKind::PlainFile => Ok(Arc::new(PlainFileStore::new(dir))),
        StorageKind::EncryptedFile => {
            let passphrase = passphrase
                .ok_or_else(|| anyhow::anyhow!("encrypted storage requires a passphrase"))?;
            Ok(Arc::new(EncryptedFileStore::new(dir, passphrase)))
        }
    }
}
