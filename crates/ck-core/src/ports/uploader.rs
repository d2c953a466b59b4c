//! Upload port.
//!
//! "Upload a history entry" is delegated entirely to an external network
//! collaborator; the core only resolves an identifier to an item and hands
//! it off here.

use crate::item::Item;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UploaderPort: Send + Sync {
    async fn upload(&self, item: &Item) -> Result<()>;
}
