// Persistence contract for documents.
//
// `save` is a compare-and-swap on `version`: the stored copy must carry the
// same version the caller loaded, otherwise the write is refused with
// `VersionConflict`. That makes read-modify-write atomic per document.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::invoices::models::InvoiceDocument;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Store a new document; fails if the id is taken
    async fn insert(&self, document: &InvoiceDocument) -> Result<InvoiceDocument>;

    /// Load a document by id
    async fn load(&self, id: &str) -> Result<InvoiceDocument>;

    /// Replace a document if nobody saved it since it was loaded
    async fn save(&self, document: &InvoiceDocument) -> Result<InvoiceDocument>;

    /// Documents ordered by creation time
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<InvoiceDocument>>;

    /// Every document, ordered by creation time, read at one point in time
    async fn snapshot(&self) -> Result<Vec<InvoiceDocument>>;

    /// Delete a document
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Process-local repository
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    documents: RwLock<HashMap<String, InvoiceDocument>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn ordered(documents: &HashMap<String, InvoiceDocument>) -> Vec<&InvoiceDocument> {
        let mut ordered: Vec<&InvoiceDocument> = documents.values().collect();
        ordered.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.number.cmp(&b.number))
                .then_with(|| a.id.cmp(&b.id))
        });
        ordered
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn insert(&self, document: &InvoiceDocument) -> Result<InvoiceDocument> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&document.id) {
            return Err(AppError::validation(format!(
                "Document with id '{}' already exists",
                document.id
            )));
        }

        let mut stored = document.clone();
        stored.version = 1;
        documents.insert(stored.id.clone(), stored.clone());

        Ok(stored)
    }

    async fn load(&self, id: &str) -> Result<InvoiceDocument> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Document {}", id)))
    }

    async fn save(&self, document: &InvoiceDocument) -> Result<InvoiceDocument> {
        let mut documents = self.documents.write().await;
        let current = documents
            .get(&document.id)
            .ok_or_else(|| AppError::not_found(format!("Document {}", document.id)))?;

        if current.version != document.version {
            return Err(AppError::version_conflict(format!(
                "Document {} is at version {}, write was based on version {}",
                document.id, current.version, document.version
            )));
        }

        let mut stored = document.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        documents.insert(stored.id.clone(), stored.clone());

        Ok(stored)
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<InvoiceDocument>> {
        let documents = self.documents.read().await;

        Ok(Self::ordered(&documents)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn snapshot(&self) -> Result<Vec<InvoiceDocument>> {
        let documents = self.documents.read().await;
        Ok(Self::ordered(&documents).into_iter().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Document {}", id)))
    }
}
