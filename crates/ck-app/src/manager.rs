//! Clipboards manager: reconciles the two OS selection buffers with the
//! active history.
//!
//! All methods run on the single service thread; they are invoked one
//! event at a time by the service loop. Selection reads happen inline, so
//! an epoch mismatch on a superseded notification is the only staleness
//! that can occur, and the tracker discards it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ck_core::ports::{ClockPort, HistoryStorePort, SelectionProviderPort, UploaderPort};
use ck_core::{
    AddOutcome, CoreError, Endpoint, EndpointTracker, History, HistoryName, Item, ItemId,
    MimeType, ObservedDisposition, Settings,
};
use ck_infra::DebouncedPersister;
use tracing::{debug, info, warn};

use crate::bus::{ItemSummary, Signal};

/// Read preference when an owner advertises several content types. Special
/// atoms are fetched under their own type so structure is never lost to
/// plain-text coercion; images rank above text, plain text is the fallback.
fn mime_priority(image_support: bool) -> Vec<MimeType> {
    let mut order = vec![
        MimeType::copied_files(),
        MimeType::uri_list(),
        MimeType::text_html(),
        MimeType::application_xml(),
    ];
    if image_support {
        order.push(MimeType::image_png());
    }
    order.push(MimeType::text_plain());
    order
}

pub struct ClipboardsManager {
    settings: Settings,
    history: History,
    store: Arc<dyn HistoryStorePort>,
    persister: DebouncedPersister,
    provider: Arc<dyn SelectionProviderPort>,
    clock: Arc<dyn ClockPort>,
    uploader: Option<Arc<dyn UploaderPort>>,
    clipboard: EndpointTracker,
    primary: EndpointTracker,
    pending_signals: Vec<Signal>,
}

impl ClipboardsManager {
    pub fn new(
        settings: Settings,
        provider: Arc<dyn SelectionProviderPort>,
        store: Arc<dyn HistoryStorePort>,
        clock: Arc<dyn ClockPort>,
        uploader: Option<Arc<dyn UploaderPort>>,
    ) -> anyhow::Result<Self> {
        let name = HistoryName::new(settings.history_name.clone());
        let loaded = store
            .load(&name, settings.max_size)
            .with_context(|| format!("load history {name} failed"))?;
        if loaded.skipped > 0 {
            warn!(history = %name, skipped = loaded.skipped, "history loaded with unreadable entries");
        }
        info!(history = %name, entries = loaded.history.len(), "history loaded");

        let persister = DebouncedPersister::new(
            Arc::clone(&store),
            Duration::from_millis(settings.save_delay_ms),
        );
        Ok(Self {
            settings,
            history: loaded.history,
            store,
            persister,
            provider,
            clock,
            uploader,
            clipboard: EndpointTracker::new(),
            primary: EndpointTracker::new(),
            pending_signals: Vec::new(),
        })
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Signals accumulated by the mutations since the last drain. The
    /// service loop drains after each processed event.
    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.pending_signals)
    }

    fn tracker(&mut self, endpoint: Endpoint) -> &mut EndpointTracker {
        match endpoint {
            Endpoint::Clipboard => &mut self.clipboard,
            Endpoint::Primary => &mut self.primary,
        }
    }

    // ----- selection-change path ------------------------------------------

    /// React to an OS "selection changed" notification for `endpoint`.
    pub fn handle_selection_changed(&mut self, endpoint: Endpoint) {
        if !self.settings.track_changes {
            return;
        }
        let epoch = self.tracker(endpoint).note_change();

        let item = match self.read_selection(endpoint) {
            Some(item) => item,
            // no owner, unsupported type, or invalid content: drop silently
            None => return,
        };

        let disposition = self.tracker(endpoint).on_observed(epoch, &item.dedup_key());
        match disposition {
            ObservedDisposition::Echo => {
                debug!(%endpoint, "own-write echo suppressed");
            }
            ObservedDisposition::Stale => {
                debug!(%endpoint, "superseded selection read discarded");
            }
            ObservedDisposition::External => self.record_external(endpoint, item),
        }
    }

    fn record_external(&mut self, endpoint: Endpoint, item: Item) {
        let (id, outcome) = self.history.add(item);
        self.persister.schedule(self.history.clone());
        self.push_outcome_signal(&id, &outcome);
        debug!(%endpoint, %id, ?outcome, "selection recorded");

        if let Some(mirror) = self.mirror_target(endpoint) {
            if let Err(err) = self.write_endpoint(mirror, &id) {
                // no focused window to own the selection, carry on
                warn!(endpoint = %mirror, %err, "mirroring selection failed");
            }
        }
    }

    fn mirror_target(&self, source: Endpoint) -> Option<Endpoint> {
        match source {
            Endpoint::Clipboard if self.settings.sync_clipboard_to_primary => {
                Some(Endpoint::Primary)
            }
            Endpoint::Primary if self.settings.sync_primary_to_clipboard => {
                Some(Endpoint::Clipboard)
            }
            _ => None,
        }
    }

    /// Fetch the endpoint content under the best advertised type and build
    /// an item from it. `None` drops the notification.
    fn read_selection(&self, endpoint: Endpoint) -> Option<Item> {
        let offered = match self.provider.list_mimes(endpoint) {
            Ok(mimes) => mimes,
            Err(err) => {
                debug!(%endpoint, %err, "selection unreadable");
                return None;
            }
        };
        if offered.is_empty() {
            return None;
        }

        for mime in mime_priority(self.settings.image_support) {
            let candidate = if mime.is_image() {
                offered.iter().find(|m| m.is_image()).cloned()
            } else {
                offered.iter().find(|m| **m == mime).cloned()
            };
            let Some(mime) = candidate else { continue };

            let bytes = match self.provider.read(endpoint, &mime) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(err) => {
                    debug!(%endpoint, %mime, %err, "selection read failed");
                    return None;
                }
            };
            match self.build_item(&mime, bytes) {
                Ok(item) => return Some(item),
                Err(err) => {
                    debug!(%endpoint, %mime, %err, "selection content rejected");
                    return None;
                }
            }
        }
        None
    }

    fn build_item(&self, mime: &MimeType, bytes: Vec<u8>) -> Result<Item, CoreError> {
        if mime.is_image() {
            return ck_infra::image::capture_image(bytes, self.clock.now_ms());
        }
        let text = String::from_utf8(bytes)
            .map_err(|_| CoreError::InvalidContent("selection is not valid UTF-8".into()))?;
        if mime.is_file_list() {
            Item::uris(&text)
        } else if *mime == MimeType::text_plain() {
            Item::text(text)
        } else {
            Item::special_text(text, mime.clone())
        }
    }

    // ----- history-to-selection path --------------------------------------

    /// Push the referenced history item onto `endpoint` ("paste history
    /// entry"). Promotes the entry; an unreachable endpoint is reported as
    /// a recoverable failure and leaves the history untouched otherwise.
    pub fn push_item(&mut self, endpoint: Endpoint, id: &ItemId) -> Result<(), CoreError> {
        let item = self.history.select(id)?;
        self.persister.schedule(self.history.clone());
        self.pending_signals.push(Signal::ItemChanged { id: id.clone() });
        self.write_item(endpoint, id, &item)
    }

    fn write_endpoint(&mut self, endpoint: Endpoint, id: &ItemId) -> Result<(), CoreError> {
        let item = self.history.get(id)?.clone();
        self.write_item(endpoint, id, &item)
    }

    fn write_item(
        &mut self,
        endpoint: Endpoint,
        id: &ItemId,
        item: &Item,
    ) -> Result<(), CoreError> {
        let (mime, bytes) = wire_representation(item);
        self.provider
            .write(endpoint, &mime, &bytes)
            .map_err(|e| CoreError::SelectionUnavailable(e.to_string()))?;
        self.tracker(endpoint).mark_own_set(id.clone(), echo_key(item));
        debug!(%endpoint, %id, %mime, "selection set from history");
        Ok(())
    }

    /// Re-offer one endpoint's current content on the other ("sync
    /// clipboard to primary" and its inverse, from the keybinder).
    pub fn sync_endpoints(&mut self, from: Endpoint, to: Endpoint) {
        let Some(item) = self.read_selection(from) else {
            debug!(%from, "nothing to sync");
            return;
        };
        let (id, outcome) = self.history.add(item);
        self.persister.schedule(self.history.clone());
        self.push_outcome_signal(&id, &outcome);
        if let Err(err) = self.write_endpoint(to, &id) {
            warn!(endpoint = %to, %err, "endpoint sync failed");
        }
    }

    // ----- history operations ---------------------------------------------

    pub fn add_text(&mut self, value: String) -> Result<ItemId, CoreError> {
        let item = Item::text(value)?;
        Ok(self.record_item(item))
    }

    pub fn add_password(&mut self, name: String, secret: String) -> Result<ItemId, CoreError> {
        let item = Item::password(name, secret)?;
        Ok(self.record_item(item))
    }

    fn record_item(&mut self, item: Item) -> ItemId {
        let (id, outcome) = self.history.add(item);
        self.persister.schedule(self.history.clone());
        self.push_outcome_signal(&id, &outcome);
        id
    }

    pub fn delete(&mut self, id: &ItemId) -> Result<(), CoreError> {
        self.history.delete(id)?;
        self.persister.schedule(self.history.clone());
        self.push_history_updated();
        Ok(())
    }

    pub fn search(&self, query: &str) -> Vec<ItemSummary> {
        self.history.search(query).map(summarize).collect()
    }

    pub fn summaries(&self) -> Vec<ItemSummary> {
        self.history.entries().map(summarize).collect()
    }

    /// Most recent entry's identifier, if any. Keybinder triggers operate
    /// on it.
    pub fn most_recent_id(&self) -> Option<ItemId> {
        self.history.most_recent().map(|e| e.id.clone())
    }

    // ----- named-history management ---------------------------------------

    /// Make `name` the active history: persist the one being left, load the
    /// target from storage on first use. A history that never existed (or
    /// cannot be read back) starts empty; switching always succeeds.
    pub fn switch_history(&mut self, name: &str) {
        let target = HistoryName::new(name);
        if &target == self.history.name() {
            return;
        }
        if let Err(err) = self.persister.flush(&self.history) {
            warn!(history = %self.history.name(), %err, "persisting departing history failed");
        }
        self.history = match self.store.load(&target, self.settings.max_size) {
            Ok(loaded) => {
                if loaded.skipped > 0 {
                    warn!(history = %target, skipped = loaded.skipped, "history loaded with unreadable entries");
                }
                loaded.history
            }
            Err(err) => {
                warn!(history = %target, %err, "loading history failed, starting empty");
                History::new(target.clone(), self.settings.max_size)
            }
        };
        info!(history = %target, entries = self.history.len(), "switched active history");
        self.push_history_updated();
    }

    pub fn get_history(&self, name: Option<&str>) -> Result<Vec<ItemSummary>, CoreError> {
        match name {
            None => Ok(self.summaries()),
            Some(n) if HistoryName::new(n) == *self.history.name() => Ok(self.summaries()),
            Some(n) => {
                let target = HistoryName::new(n);
                let loaded = self
                    .store
                    .load(&target, self.settings.max_size)
                    .map_err(|_| CoreError::HistoryNotFound(target))?;
                Ok(loaded.history.entries().map(summarize).collect())
            }
        }
    }

    /// Empty the named history. The active history is cleared and flushed;
    /// an inactive one has its durable copy removed. Storage trouble is
    /// logged, not surfaced; the retry happens on the next cycle.
    pub fn empty_history(&mut self, name: &str) {
        let target = HistoryName::new(name);
        if &target == self.history.name() {
            self.history.clear();
            if let Err(err) = self.persister.flush(&self.history) {
                warn!(history = %target, %err, "persisting emptied history failed");
            }
            self.push_history_updated();
            return;
        }
        if let Err(err) = self.store.remove(&target) {
            warn!(history = %target, %err, "removing history store failed");
        }
    }

    // ----- upload ----------------------------------------------------------

    /// Resolve the identifier and hand the item to the upload collaborator.
    pub async fn upload(&self, id: &ItemId) -> anyhow::Result<()> {
        let item = self.history.get(id).map(Item::clone).map_err(anyhow::Error::from)?;
        let uploader = self
            .uploader
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no upload collaborator configured"))?;
        uploader.upload(&item).await
    }

    /// Final persist on shutdown.
    pub fn flush(&mut self) {
        if let Err(err) = self.persister.flush(&self.history) {
            warn!(history = %self.history.name(), %err, "final persist failed");
        }
    }

    fn push_outcome_signal(&mut self, id: &ItemId, outcome: &AddOutcome) {
        match outcome {
            AddOutcome::Inserted => self.push_history_updated(),
            AddOutcome::Merged => self
                .pending_signals
                .push(Signal::ItemChanged { id: id.clone() }),
        }
    }

    fn push_history_updated(&mut self) {
        self.pending_signals.push(Signal::HistoryUpdated {
            name: self.history.name().to_string(),
            len: self.history.len(),
        });
    }
}

fn summarize(entry: &ck_core::Entry) -> ItemSummary {
    ItemSummary {
        id: entry.id.clone(),
        kind: entry.item.kind(),
        display: entry.item.display_value(),
    }
}

/// The typed representation written to a selection endpoint. Special text
/// keeps its dedicated MIME; URI lists go back out as `text/uri-list`;
/// passwords paste their secret as plain text.
fn wire_representation(item: &Item) -> (MimeType, Vec<u8>) {
    match item {
        Item::Text { text, mime } => (mime.clone(), text.as_bytes().to_vec()),
        Item::Uris { uris } => (MimeType::uri_list(), uris.join("\r\n").into_bytes()),
        Item::Password { secret, .. } => (MimeType::text_plain(), secret.as_bytes().to_vec()),
        Item::Image { bytes, .. } => (MimeType::image_png(), bytes.clone()),
    }
}

/// Dedup key the OS echo of our own write will present: the echo reflects
/// the wire representation, not the source variant.
fn echo_key(item: &Item) -> String {
    match item {
        Item::Password { secret, .. } => secret.clone(),
        other => other.dedup_key(),
    }
}
