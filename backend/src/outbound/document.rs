//! In-process document store.
//!
//! Collections are vectors of JSON objects behind a single `RwLock`, so
//! writes are serialised and reads observe insertion order. Guards are never
//! held across an `.await`: every method takes the lock, works, and drops it
//! before returning.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{
    Collection, Document, DocumentStore, DocumentStoreError, Filter, ID_FIELD,
};

type Collections = HashMap<Collection, Vec<Document>>;

/// Volatile [`DocumentStore`] for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, DocumentStoreError> {
        self.collections
            .read()
            .map_err(|_| DocumentStoreError::connection("document store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, DocumentStoreError> {
        self.collections
            .write()
            .map_err(|_| DocumentStoreError::connection("document store lock poisoned"))
    }
}

fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let guard = self.read()?;
        Ok(guard
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let guard = self.read()?;
        Ok(guard.get(&collection).and_then(|documents| {
            documents
                .iter()
                .find(|document| filter.matches(document))
                .cloned()
        }))
    }

    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<String, DocumentStoreError> {
        let id = document_id(&document)
            .ok_or_else(|| DocumentStoreError::missing_id(collection.as_str()))?
            .to_owned();

        let mut guard = self.write()?;
        let documents = guard.entry(collection).or_default();
        if documents
            .iter()
            .any(|existing| document_id(existing) == Some(id.as_str()))
        {
            return Err(DocumentStoreError::query(format!(
                "duplicate id {id} in {}",
                collection.as_str()
            )));
        }
        documents.push(document);
        debug!(collection = collection.as_str(), id = %id, "document inserted");
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> Result<u64, DocumentStoreError> {
        let mut guard = self.write()?;
        let Some(documents) = guard.get_mut(&collection) else {
            return Ok(0);
        };

        let mut matched = 0;
        for document in documents.iter_mut().filter(|document| filter.matches(document)) {
            for (field, value) in &patch {
                if field != ID_FIELD {
                    document.insert(field.clone(), value.clone());
                }
            }
            matched += 1;
        }
        Ok(matched)
    }

    async fn delete(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, DocumentStoreError> {
        let mut guard = self.write()?;
        let Some(documents) = guard.get_mut(&collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|document| !filter.matches(document));
        Ok(u64::try_from(before - documents.len()).unwrap_or(u64::MAX))
    }
}
