//! Ports: the interfaces the outside world implements for the core.

mod clock;
mod selection;
mod store;
mod uploader;

pub use clock::ClockPort;
pub use selection::SelectionProviderPort;
pub use store::{HistoryStorePort, LoadedHistory};
pub use uploader::UploaderPort;
