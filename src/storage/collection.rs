//! Generic JSON collection for budgets, savings goals and clients

use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::Identified;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionData<T> {
    items: Vec<T>,
}

impl<T> Default for CollectionData<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// An insertion-ordered list of entities persisted as one JSON file
pub struct Collection<T> {
    path: PathBuf,
    items: RwLock<Vec<T>>,
}

impl<T> Collection<T>
where
    T: Identified + Clone + Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Replace the in-memory contents with the file on disk
    pub fn load(&self) -> LedgerLensResult<()> {
        let data: CollectionData<T> = read_json(&self.path)?;
        let mut items = self.items.write().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *items = data.items;
        Ok(())
    }

    /// Write `next` to disk, then make it the in-memory contents
    fn commit(&self, items: &mut Vec<T>, next: Vec<T>) -> LedgerLensResult<()> {
        let data = CollectionData { items: next };
        write_json_atomic(&self.path, &data)?;
        *items = data.items;
        Ok(())
    }

    fn write_items(&self) -> LedgerLensResult<RwLockWriteGuard<'_, Vec<T>>> {
        self.items.write().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire write lock: {}", e))
        })
    }

    pub fn all(&self) -> LedgerLensResult<Vec<T>> {
        let items = self.items.read().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(items.clone())
    }

    /// Find by short ID or name
    pub fn find(&self, reference: &str) -> LedgerLensResult<Option<T>> {
        let items = self.items.read().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(items.iter().find(|item| item.matches_ref(reference)).cloned())
    }

    /// Add an item and persist
    pub fn add(&self, item: T) -> LedgerLensResult<T::Id> {
        let id = item.id();
        let mut items = self.write_items()?;
        let mut next = items.clone();
        next.push(item);
        self.commit(&mut items, next)?;
        tracing::info!(%id, path = %self.path.display(), "added item");
        Ok(id)
    }

    /// Replace the item with the same ID and persist; `false` if absent
    pub fn replace(&self, item: T) -> LedgerLensResult<bool> {
        let mut items = self.write_items()?;
        let Some(index) = items.iter().position(|existing| existing.id() == item.id()) else {
            return Ok(false);
        };
        let mut next = items.clone();
        next[index] = item;
        self.commit(&mut items, next)?;
        Ok(true)
    }

    /// Remove the item named by `reference` and persist
    pub fn remove(&self, reference: &str) -> LedgerLensResult<Option<T>> {
        let mut items = self.write_items()?;
        let Some(index) = items.iter().position(|item| item.matches_ref(reference)) else {
            return Ok(None);
        };
        let mut next = items.clone();
        let removed = next.remove(index);
        self.commit(&mut items, next)?;
        Ok(Some(removed))
    }

    pub fn len(&self) -> LedgerLensResult<usize> {
        let items = self.items.read().map_err(|e| {
            LedgerLensError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(items.len())
    }

    pub fn is_empty(&self) -> LedgerLensResult<bool> {
        Ok(self.len()? == 0)
    }
}
