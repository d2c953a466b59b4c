//! Hand-rolled fakes for the ports, shared by the application-layer tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use ck_core::ports::{
    ClockPort, HistoryStorePort, LoadedHistory, SelectionProviderPort, UploaderPort,
};
use ck_core::{Endpoint, Entry, History, HistoryName, Item, MimeType, Settings};

use crate::manager::ClipboardsManager;

/// In-memory stand-in for the OS selection buffers. Writing an endpoint
/// replaces its offer, the way claiming a real selection does.
#[derive(Default)]
pub struct FakeSelection {
    offers: Mutex<HashMap<Endpoint, Vec<(MimeType, Vec<u8>)>>>,
    pub writes: Mutex<Vec<(Endpoint, MimeType, Vec<u8>)>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FakeSelection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn offer(&self, endpoint: Endpoint, representations: Vec<(MimeType, Vec<u8>)>) {
        self.offers.lock().unwrap().insert(endpoint, representations);
    }

    pub fn offer_text(&self, endpoint: Endpoint, text: &str) {
        self.offer(
            endpoint,
            vec![(MimeType::text_plain(), text.as_bytes().to_vec())],
        );
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn written_mimes(&self, endpoint: Endpoint) -> Vec<MimeType> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _, _)| *e == endpoint)
            .map(|(_, m, _)| m.clone())
            .collect()
    }
}

impl SelectionProviderPort for FakeSelection {
    fn list_mimes(&self, endpoint: Endpoint) -> Result<Vec<MimeType>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("selection has no owner");
        }
        Ok(self
            .offers
            .lock()
            .unwrap()
            .get(&endpoint)
            .map(|reps| reps.iter().map(|(m, _)| m.clone()).collect())
            .unwrap_or_default())
    }

    fn read(&self, endpoint: Endpoint, mime: &MimeType) -> Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("selection has no owner");
        }
        Ok(self
            .offers
            .lock()
            .unwrap()
            .get(&endpoint)
            .and_then(|reps| reps.iter().find(|(m, _)| m == mime))
            .map(|(_, bytes)| bytes.clone()))
    }

    fn write(&self, endpoint: Endpoint, mime: &MimeType, bytes: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("no focused window to own the selection");
        }
        self.writes
            .lock()
            .unwrap()
            .push((endpoint, mime.clone(), bytes.to_vec()));
        self.offer(endpoint, vec![(mime.clone(), bytes.to_vec())]);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub saved: Mutex<HashMap<String, Vec<Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saved_len(&self, name: &str) -> Option<usize> {
        self.saved.lock().unwrap().get(name).map(Vec::len)
    }
}

impl HistoryStorePort for MemoryStore {
    fn save(&self, snapshot: &History) -> Result<()> {
        self.saved.lock().unwrap().insert(
            snapshot.name().to_string(),
            snapshot.entries().cloned().collect(),
        );
        Ok(())
    }

    fn load(&self, name: &HistoryName, max_size: usize) -> Result<LoadedHistory> {
        let entries = self
            .saved
            .lock()
            .unwrap()
            .get(name.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(LoadedHistory {
            history: History::from_entries(name.clone(), max_size, entries),
            skipped: 0,
        })
    }

    fn remove(&self, name: &HistoryName) -> Result<()> {
        self.saved.lock().unwrap().remove(name.as_str());
        Ok(())
    }
}

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingUploader {
    pub uploaded: Mutex<Vec<Item>>,
}

impl RecordingUploader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl UploaderPort for RecordingUploader {
    async fn upload(&self, item: &Item) -> Result<()> {
        self.uploaded.lock().unwrap().push(item.clone());
        Ok(())
    }
}

pub struct Fixture {
    pub provider: Arc<FakeSelection>,
    pub store: Arc<MemoryStore>,
    pub uploader: Arc<RecordingUploader>,
    pub manager: ClipboardsManager,
}

pub fn fixture(settings: Settings) -> Fixture {
    let provider = FakeSelection::new();
    let store = MemoryStore::new();
    let uploader = RecordingUploader::new();
    let manager = ClipboardsManager::new(
        settings,
        provider.clone(),
        store.clone(),
        Arc::new(FixedClock(1_700_000_000_000)),
        Some(uploader.clone()),
    )
    .unwrap();
    Fixture {
        provider,
        store,
        uploader,
        manager,
    }
}

pub fn png_bytes(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([shade, 0, 0, 255]));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}
