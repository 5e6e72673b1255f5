//! Document manifest for the final onboarding step.
//!
//! Each document type owns exactly one key, so concurrent uploads for
//! different types never touch the same entry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::api::{DocumentType, DocumentTypeId, UploadedFileId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentManifest {
    /// Successfully uploaded files, by document type.
    pub documents: BTreeMap<DocumentTypeId, UploadedFileId>,
    /// Types with an upload in flight.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub uploading: BTreeSet<DocumentTypeId>,
}

impl DocumentManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an upload as started. Returns false if one is already running
    /// for that type.
    pub fn begin(&mut self, document_type_id: DocumentTypeId) -> bool {
        self.uploading.insert(document_type_id)
    }

    /// Record a finished upload, replacing any earlier file for the type.
    pub fn record(&mut self, document_type_id: DocumentTypeId, file: UploadedFileId) {
        self.uploading.remove(&document_type_id);
        self.documents.insert(document_type_id, file);
    }

    /// A failed upload removes that type's entry and nothing else.
    pub fn fail(&mut self, document_type_id: DocumentTypeId) {
        self.uploading.remove(&document_type_id);
        self.documents.remove(&document_type_id);
    }

    pub fn get(&self, document_type_id: DocumentTypeId) -> Option<&UploadedFileId> {
        self.documents.get(&document_type_id)
    }

    pub fn is_uploading(&self, document_type_id: DocumentTypeId) -> bool {
        self.uploading.contains(&document_type_id)
    }

    /// Names of mandatory catalog types with no uploaded file, in catalog order.
    pub fn missing_mandatory(&self, catalog: &[DocumentType]) -> Vec<String> {
        catalog
            .iter()
            .filter(|t| t.mandatory && !self.documents.contains_key(&t.id))
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
