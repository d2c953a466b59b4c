//! Builder for assembling the service from a storage location and the
//! host-supplied collaborators.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use ck_core::ports::{ClockPort, SelectionProviderPort, UploaderPort};
use ck_core::Settings;
use ck_infra::{open_store, FileSettingsRepository, SystemClock};

use crate::manager::ClipboardsManager;
use crate::service::{Service, ServiceHandle};

const SETTINGS_FILE: &str = "settings.json";
const HISTORIES_DIR: &str = "histories";

pub struct ServiceBuilder {
    data_dir: PathBuf,
    provider: Option<Arc<dyn SelectionProviderPort>>,
    uploader: Option<Arc<dyn UploaderPort>>,
    clock: Option<Arc<dyn ClockPort>>,
    passphrase: Option<String>,
    settings: Option<Settings>,
}

impl ServiceBuilder {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            provider: None,
            uploader: None,
            clock: None,
            passphrase: None,
            settings: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn SelectionProviderPort>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn UploaderPort>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockPort>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Passphrase for the encrypted storage backend, when configured.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Override the settings snapshot instead of loading it from the data
    /// directory.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> anyhow::Result<(Service, ServiceHandle)> {
        let provider = self
            .provider
            .ok_or_else(|| anyhow::anyhow!("SelectionProviderPort is required"))?;

        let settings = match self.settings {
            Some(settings) => settings,
            None => FileSettingsRepository::new(self.data_dir.join(SETTINGS_FILE))
                .load()
                .context("load settings failed")?,
        };

        let store = open_store(
            settings.storage,
            &self.data_dir.join(HISTORIES_DIR),
            self.passphrase.as_deref(),
        )?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let manager = ClipboardsManager::new(settings, provider, store, clock, self.uploader)?;
        Ok(Service::new(manager))
    }
}
