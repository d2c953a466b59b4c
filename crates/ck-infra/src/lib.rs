//! # ck-infra
//!
//! Infrastructure adapters for clipkeep: history storage backends,
//! debounced persistence, image capture decoding, settings repository,
//! clock, and logging bootstrap.

pub mod image;
pub mod logging;
pub mod persist;
pub mod settings;
pub mod storage;
pub mod time;

pub use persist::DebouncedPersister;
pub use settings::FileSettingsRepository;
pub use storage::{open_store, EncryptedFileStore, PlainFileStore};
pub use time::SystemClock;
