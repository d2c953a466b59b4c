//! Bounded, ordered, deduplicated history of clipboard items.
//!
//! Entries sit most-recently-used first. `add` is the hot path (invoked on
//! every clipboard change): the frontmost-match case is O(1), the full
//! dedup scan is O(n) against a small bounded `max_size`.

use crate::error::CoreError;
use crate::ids::{HistoryName, ItemId};
use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: ItemId,
    pub item: Item,
}

/// Outcome of [`History::add`], reported outward so the bus can emit the
/// right notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was inserted (possibly evicting the LRU entry).
    Inserted,
    /// An equal or growing-related entry absorbed the item, keeping its
    /// identifier.
    Merged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    name: HistoryName,
    entries: VecDeque<Entry>,
    max_size: usize,
}

impl History {
    pub fn new(name: HistoryName, max_size: usize) -> Self {
        Self {
            name,
            // a history that evicts its own insertions is useless
            max_size: max_size.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &HistoryName {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries most-recent-first.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn most_recent(&self) -> Option<&Entry> {
        self.entries.front()
    }

    /// Rebuild from a stored entry sequence, oldest-last order preserved.
    /// Entries beyond `max_size` are dropped from the tail.
    pub fn from_entries(
        name: HistoryName,
        max_size: usize,
        entries: impl IntoIterator<Item = Entry>,
    ) -> Self {
        let mut history = Self::new(name, max_size);
        history.entries = entries.into_iter().collect();
        history.entries.truncate(history.max_size);
        history
    }

    /// Insert an item, deduplicating against existing entries.
    ///
    /// An equal entry (or, for images, an entry this item grows out of) is
    /// merged: it takes the new item's content, keeps its identifier and
    /// moves to the most-recent position. Otherwise a fresh entry is
    /// inserted at the front and the least-recently-used entry is evicted
    /// if the bound is exceeded. The front-to-back scan makes the tie-break
    /// prefer the most recently inserted matching entry.
    pub fn add(&mut self, item: Item) -> (ItemId, AddOutcome) {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.item.same_content(&item) || e.item.is_growing(&item))
        {
            if pos == 0 {
                let entry = &mut self.entries[0];
                entry.item = item;
                return (entry.id.clone(), AddOutcome::Merged);
            }
            let mut entry = self
                .entries
                .remove(pos)
                .expect("position came from the same deque");
            entry.item = item;
            let id = entry.id.clone();
            self.entries.push_front(entry);
            return (id, AddOutcome::Merged);
        }

        let id = ItemId::new();
        self.entries.push_front(Entry {
            id: id.clone(),
            item,
        });
        while self.entries.len() > self.max_size {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(history = %self.name, evicted = %evicted.id, "evicted least-recently-used entry");
            }
        }
        (id, AddOutcome::Inserted)
    }

    /// Promote the referenced entry to most-recent and return its item.
    pub fn select(&mut self, id: &ItemId) -> Result<Item, CoreError> {
        let pos = self.position(id)?;
        if pos != 0 {
            let entry = self
                .entries
                .remove(pos)
                .expect("position came from the same deque");
            self.entries.push_front(entry);
        }
        Ok(self.entries[0].item.clone())
    }

    pub fn delete(&mut self, id: &ItemId) -> Result<(), CoreError> {
        let pos = self.position(id)?;
        self.entries.remove(pos);
        Ok(())
    }

    pub fn get(&self, id: &ItemId) -> Result<&Item, CoreError> {
        self.entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| &e.item)
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }

    /// Lazy, restartable, most-recent-first search. Does not touch recency
    /// order. Password secrets are excluded by the item matcher.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Entry> + 'a {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(move |e| e.item.matches(&needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn rename(&mut self, new_name: HistoryName) {
        self.name = new_name;
    }

    /// Apply a new bound, evicting from the LRU end if needed.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(1);
        self.entries.truncate(self.max_size);
    }

    fn position(&self, id: &ItemId) -> Result<usize, CoreError> {
        self.entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }
}
