//! Selection provider port - abstracts the OS selection buffers.

use crate::item::MimeType;
use crate::sync::Endpoint;
use anyhow::Result;

/// Platform-agnostic access to the two OS selection buffers.
///
/// The provider additionally delivers "selection changed" notifications per
/// endpoint through the host event loop; those arrive as application events
/// and are not part of this trait.
pub trait SelectionProviderPort: Send + Sync {
    /// Content types currently advertised by the endpoint's owner. Empty
    /// when the endpoint has no owner.
    fn list_mimes(&self, endpoint: Endpoint) -> Result<Vec<MimeType>>;

    /// Fetch the endpoint content under one dedicated MIME. `None` when the
    /// owner no longer serves that type.
    fn read(&self, endpoint: Endpoint, mime: &MimeType) -> Result<Option<Vec<u8>>>;

    /// Claim the endpoint and offer `bytes` under `mime`. Fails when no
    /// window can own the selection on the current backend.
    fn write(&self, endpoint: Endpoint, mime: &MimeType, bytes: &[u8]) -> Result<()>;
}
