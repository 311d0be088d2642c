//! Whole-array record collections
//!
//! Each collection reads the complete array stored under its key, applies a
//! change, and writes the complete array back. Writers inside one process
//! are serialized by the collection's mutex; separate processes sharing a
//! store are last-writer-wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::SharedStore;
use crate::{Error, Result};

/// A record persisted inside a collection array
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Store key holding the array of all records of this type
    const STORE_KEY: &'static str;

    /// Unique identifier within the collection
    fn id(&self) -> &str;
}

/// Read-modify-write access to all records of one type
pub struct RecordCollection<T> {
    store: SharedStore,
    write_lock: Arc<Mutex<()>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RecordCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            write_lock: self.write_lock.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> RecordCollection<T> {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
            _marker: PhantomData,
        }
    }

    async fn load(&self) -> Result<Vec<T>> {
        match self.store.get(T::STORE_KEY).await? {
            None => Ok(Vec::new()),
            Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value)?),
            Some(other) => Err(Error::Storage(format!(
                "Key '{}' holds {} instead of an array",
                T::STORE_KEY,
                json_kind(&other)
            ))),
        }
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        let value = serde_json::to_value(records)?;
        self.store.set(T::STORE_KEY, &value).await?;
        debug!("Saved {} records under '{}'", records.len(), T::STORE_KEY);
        Ok(())
    }

    /// All records in insertion order
    pub async fn list(&self) -> Result<Vec<T>> {
        self.load().await
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    /// First record matching `predicate`
    pub async fn find<F>(&self, predicate: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.load().await?.into_iter().find(|r| predicate(r)))
    }

    /// Append a record; fails with `Conflict` if its id is already present
    pub async fn insert(&self, record: T) -> Result<T> {
        self.insert_with(|_| Ok(record)).await
    }

    /// Build a record from the current contents and append it
    ///
    /// `build` runs while the write lock is held, so uniqueness checks made
    /// against `existing` cannot race with other writers in this process.
    pub async fn insert_with<F>(&self, build: F) -> Result<T>
    where
        F: FnOnce(&[T]) -> Result<T>,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let record = build(&records)?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(Error::Conflict(format!(
                "Record '{}' already exists in '{}'",
                record.id(),
                T::STORE_KEY
            )));
        }

        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    /// Mutate the record with `id` in place and persist the array
    pub async fn update<F>(&self, id: &str, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::NotFound(format!("{} record '{}'", T::STORE_KEY, id)))?;

        mutate(record)?;
        let updated = record.clone();

        self.save(&records).await?;
        Ok(updated)
    }

    /// Delete the record with `id`, returning it
    pub async fn remove(&self, id: &str) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::NotFound(format!("{} record '{}'", T::STORE_KEY, id)))?;

        let removed = records.remove(index);
        self.save(&records).await?;
        Ok(removed)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
