//! Encrypted-file history store.
//!
//! Same envelope shape as the plain backend, but every entry is sealed
//! independently with XChaCha20-Poly1305 under a key derived from the
//! passphrase with Argon2id. Per-entry sealing is what keeps single-entry
//! corruption skippable: one damaged ciphertext fails authentication on its
//! own and the rest of the history still loads.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use argon2::Argon2;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{KeyInit, XChaCha20Poly1305, XNonce};
use ck_core::ports::{HistoryStorePort, LoadedHistory};
use ck_core::{Entry, History, HistoryName};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::format::file_stem;
use super::plain::atomic_write;

const FORMAT_VERSION: u32 = 1;
const NONCE_LEN: usize = 24;
const SALT_LEN: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KdfParams {
    mem_kib: u32,
    iters: u32,
    parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_kib: 64 * 1024,
            iters: 3,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SealedEntry {
    nonce: String,
    ciphertext: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct EncryptedEnvelope {
    version: u32,
    name: String,
    kdf: KdfParams,
    salt: String,
    entries: Vec<SealedEntry>,
}

pub struct EncryptedFileStore {
    dir: PathBuf,
    passphrase: String,
}

impl EncryptedFileStore {
    pub fn new(dir: impl Into<PathBuf>, passphrase: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            passphrase: passphrase.into(),
        }
    }

    fn path_for(&self, name: &HistoryName) -> PathBuf {
        self.dir.join(format!("{}.json.sealed", file_stem(name)))
    }

    fn derive_key(&self, salt: &[u8], kdf: &KdfParams) -> Result<[u8; 32]> {
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2::Params::new(kdf.mem_kib, kdf.iters, kdf.parallelism, Some(32))
                .map_err(|e| anyhow!("invalid kdf params: {e}"))?,
        );
        let mut okm = [0u8; 32];
        argon2
            .hash_password_into(self.passphrase.as_bytes(), salt, &mut okm)
            .map_err(|e| anyhow!("key derivation failed: {e}"))?;
        Ok(okm)
    }
}

impl HistoryStorePort for EncryptedFileStore {
    fn save(&self, snapshot: &History) -> Result<()> {
        let kdf = KdfParams::default();
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);
        let key = self.derive_key(&salt, &kdf)?;
        let cipher = XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|_| anyhow!("invalid sealing key length"))?;

        let mut entries = Vec::with_capacity(snapshot.len());
        for entry in snapshot.entries() {
            let plaintext = serde_json::to_vec(entry).context("serialize entry failed")?;
            let mut nonce = [0u8; NONCE_LEN];
            rand::rng().fill_bytes(&mut nonce);
            let ciphertext = cipher
                .encrypt(XNonce::from_slice(&nonce), plaintext.as_ref())
                .map_err(|_| anyhow!("seal entry failed"))?;
            entries.push(SealedEntry {
                nonce: hex::encode(nonce),
                ciphertext: hex::encode(ciphertext),
            });
        }

        let envelope = EncryptedEnvelope {
            version: FORMAT_VERSION,
            name: snapshot.name().to_string(),
            kdf,
            salt: hex::encode(salt),
            entries,
        };
        let content =
            serde_json::to_string(&envelope).context("serialize sealed history failed")?;
        atomic_write(&self.path_for(snapshot.name()), content.as_bytes())?;
        debug!(history = %snapshot.name(), entries = snapshot.len(), "sealed history saved");
        Ok(())
    }

    fn load(&self, name: &HistoryName, max_size: usize) -> Result<LoadedHistory> {
        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadedHistory {
                    history: History::new(name.clone(), max_size),
                    skipped: 0,
                });
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read sealed history failed: {}", path.display()))
            }
        };

        let envelope: EncryptedEnvelope = serde_json::from_str(&content)
            .with_context(|| format!("parse sealed envelope failed: {}", path.display()))?;
        let salt = hex::decode(&envelope.salt).context("malformed salt")?;
        let key = self.derive_key(&salt, &envelope.kdf)?;
        let cipher = XChaCha20Poly1305::new_from_slice(&key)
            .map_err(|_| anyhow!("invalid sealing key length"))?;

        let mut skipped = 0usize;
        let mut entries = Vec::with_capacity(envelope.entries.len());
        for (index, sealed) in envelope.entries.into_iter().enumerate() {
            match unseal_entry(&cipher, &sealed) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    skipped += 1;
                    warn!(history = %name, index, %err, "skipping unreadable sealed entry");
                }
            }
        }
        Ok(LoadedHistory {
            history: History::from_entries(name.clone(), max_size, entries),
            skipped,
        })
    }

    fn remove(&self, name: &HistoryName) -> Result<()> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("remove sealed history failed: {}", path.display())),
        }
    }
}

fn unseal_entry(cipher: &XChaCha20Poly1305, sealed: &SealedEntry) -> Result<Entry> {
    let nonce = hex::decode(&sealed.nonce).context("malformed nonce")?;
    if nonce.len() != NONCE_LEN {
        return Err(anyhow!("nonce length {} != {}", nonce.len(), NONCE_LEN));
    }
    let ciphertext = hex::decode(&sealed.ciphertext).context("malformed ciphertext")?;
    let plaintext = cipher
        .decrypt(XNonce::from_slice(&nonce), ciphertext.as_ref())
        .map_err(|_| anyhow!("entry failed authentication"))?;
    serde_json::from_slice(&plaintext).context("entry deserialization failed")
}
