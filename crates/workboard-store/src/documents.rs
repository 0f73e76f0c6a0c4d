//! Documents
//!
//! Only document metadata is kept: name, size, version and who uploaded it.
//! The category is inferred from the file extension unless the uploader
//! picks one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use workboard_events::DocumentEvent;
use workboard_org::{ProjectCapability, ProjectId, User, UserId};
use workboard_rbac::Permission;

use crate::error::{StoreError, StoreResult};
use crate::state::{require_member, AppState};

/// Document category, used for filtering and icons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Design,
    Document,
    Image,
    Spreadsheet,
    Code,
    Other,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Design => "design",
            DocumentCategory::Document => "document",
            DocumentCategory::Image => "image",
            DocumentCategory::Spreadsheet => "spreadsheet",
            DocumentCategory::Code => "code",
            DocumentCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "design" => Some(DocumentCategory::Design),
            "document" => Some(DocumentCategory::Document),
            "image" => Some(DocumentCategory::Image),
            "spreadsheet" => Some(DocumentCategory::Spreadsheet),
            "code" => Some(DocumentCategory::Code),
            "other" => Some(DocumentCategory::Other),
            _ => None,
        }
    }

    /// Category for a lowercase file extension.
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "fig" | "sketch" | "psd" | "ai" | "xd" => DocumentCategory::Design,
            "pdf" | "doc" | "docx" | "txt" | "md" | "rtf" | "odt" => DocumentCategory::Document,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => DocumentCategory::Image,
            "xls" | "xlsx" | "csv" | "ods" => DocumentCategory::Spreadsheet,
            "sql" | "js" | "ts" | "rs" | "py" | "json" | "html" | "css" | "zip" => {
                DocumentCategory::Code
            }
            _ => DocumentCategory::Other,
        }
    }

    /// Category inferred from a file name.
    pub fn from_file_name(name: &str) -> Self {
        file_extension(name)
            .map(|ext| Self::from_extension(&ext))
            .unwrap_or(DocumentCategory::Other)
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase extension of a file name, if it has one.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Human-readable size: `"45 KB"`, `"2.4 MB"`.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b < KB => format!("{b} B"),
        b if b < MB => format!("{} KB", (b + KB / 2) / KB),
        b if b < GB => format!("{:.1} MB", b as f64 / MB as f64),
        b => format!("{:.1} GB", b as f64 / GB as f64),
    }
}

/// Stored document metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub project_id: ProjectId,
    pub name: String,
    /// Lowercase extension, empty when the name has none
    pub file_type: String,
    pub size_bytes: u64,
    pub category: DocumentCategory,
    pub version: String,
    pub uploaded_by: UserId,
    pub uploaded_by_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    pub fn size_label(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Input for [`AppState::upload_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub name: String,
    pub size_bytes: u64,
    pub version: Option<String>,
    pub category: Option<DocumentCategory>,
}

impl DocumentUpload {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            version: None,
            category: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_category(mut self, category: DocumentCategory) -> Self {
        self.category = Some(category);
        self
    }
}

impl AppState {
    /// Upload document metadata. Requires `uploadDocument`.
    pub async fn upload_document(
        &self,
        actor: &User,
        project_id: &ProjectId,
        upload: DocumentUpload,
    ) -> StoreResult<Document> {
        if upload.name.trim().is_empty() {
            return Err(StoreError::Validation("document name must not be empty".into()));
        }

        let document = {
            let mut data = self.data.write().await;
            data.project(project_id)?
                .ensure(&actor.id, ProjectCapability::UploadDocument)?;

            let document = Document {
                id: Uuid::now_v7(),
                project_id: project_id.clone(),
                file_type: file_extension(&upload.name).unwrap_or_default(),
                category: upload
                    .category
                    .unwrap_or_else(|| DocumentCategory::from_file_name(&upload.name)),
                name: upload.name,
                size_bytes: upload.size_bytes,
                version: upload.version.unwrap_or_else(|| "v1.0".to_string()),
                uploaded_by: actor.id.clone(),
                uploaded_by_name: actor.name.clone(),
                uploaded_at: Utc::now(),
            };
            data.documents.push(document.clone());
            document
        };

        info!(document_id = %document.id, name = %document.name, "document uploaded");
        self.announce(
            actor,
            DocumentEvent::Uploaded {
                document_id: document.id,
                project_id: project_id.clone(),
                name: document.name.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(document)
    }

    /// Delete a document. Team members only: the uploader, or anyone with
    /// `deleteDocument`.
    pub async fn delete_document(&self, actor: &User, id: Uuid) -> StoreResult<Document> {
        let document = {
            let mut data = self.data.write().await;
            let index = data
                .documents
                .iter()
                .position(|d| d.id == id)
                .ok_or_else(|| StoreError::not_found("document", id))?;
            let document = &data.documents[index];
            let project = data.project(&document.project_id)?;
            require_member(actor, project)?;
            if document.uploaded_by != actor.id {
                project.ensure(&actor.id, ProjectCapability::DeleteDocument)?;
            }
            data.documents.remove(index)
        };

        info!(document_id = %id, "document deleted");
        self.announce(
            actor,
            DocumentEvent::Deleted {
                document_id: id,
                project_id: document.project_id.clone(),
            }
            .to_event(),
        )
        .await;
        Ok(document)
    }

    /// Documents the actor sees, newest upload first.
    ///
    /// `view_all_documents` sees everything; everyone else sees their own
    /// projects' documents.
    pub async fn documents(&self, actor: &User) -> Vec<Document> {
        let data = self.data.read().await;
        let visible = data.visible_project_ids(actor, Permission::ViewAllDocuments);
        let mut documents: Vec<Document> = data
            .documents
            .iter()
            .filter(|d| visible.contains(&d.project_id))
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        documents
    }

    /// Visible documents whose name or project name contains `query`,
    /// ignoring case. An empty query matches everything.
    pub async fn search_documents(&self, actor: &User, query: &str) -> Vec<Document> {
        let query = query.trim().to_lowercase();
        let documents = self.documents(actor).await;
        if query.is_empty() {
            return documents;
        }

        let data = self.data.read().await;
        documents
            .into_iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&query)
                    || data
                        .project(&d.project_id)
                        .is_ok_and(|p| p.name.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Visible documents of one category.
    pub async fn documents_by_category(&self, actor: &User, category: DocumentCategory) -> Vec<Document> {
        self.documents(actor)
            .await
            .into_iter()
            .filter(|d| d.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{admin, manager, member, outsider, seeded};
    use workboard_org::ProjectError;

    #[test]
    fn test_category_inference() {
        assert_eq!(DocumentCategory::from_file_name("Mockup Homepage.png"), DocumentCategory::Image);
        assert_eq!(DocumentCategory::from_file_name("Budget Q1 2026.XLSX"), DocumentCategory::Spreadsheet);
        assert_eq!(DocumentCategory::from_file_name("Database Schema.sql"), DocumentCategory::Code);
        assert_eq!(DocumentCategory::from_file_name("API Documentation.docx"), DocumentCategory::Document);
        assert_eq!(DocumentCategory::from_file_name("README"), DocumentCategory::Other);
        assert_eq!(file_extension(".gitignore"), None);
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(45 * 1024), "45 KB");
        assert_eq!(format_size(850 * 1024), "850 KB");
        assert_eq!(format_size(2_516_582), "2.4 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[tokio::test]
    async fn test_upload_and_search() {
        let (state, project_id) = seeded().await;

        let doc = state
            .upload_document(&member(), &project_id, DocumentUpload::new("Design System.pdf", 2_516_582))
            .await
            .unwrap();
        assert_eq!(doc.file_type, "pdf");
        assert_eq!(doc.category, DocumentCategory::Document);
        assert_eq!(doc.version, "v1.0");
        assert_eq!(doc.size_label(), "2.4 MB");

        state
            .upload_document(
                &admin(),
                &project_id,
                DocumentUpload::new("Component Library.zip", 12_897_485)
                    .with_version("v1.2")
                    .with_category(DocumentCategory::Code),
            )
            .await
            .unwrap();

        assert_eq!(state.search_documents(&member(), "design SYSTEM").await.len(), 1);
        // Matches on the project name too
        assert_eq!(state.search_documents(&member(), "redesign").await.len(), 2);
        assert_eq!(state.search_documents(&member(), "").await.len(), 2);
        assert!(state.search_documents(&outsider(), "").await.is_empty());
        assert_eq!(
            state.documents_by_category(&manager(), DocumentCategory::Code).await.len(),
            1
        );
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let (state, project_id) = seeded().await;
        let admins = state
            .upload_document(&admin(), &project_id, DocumentUpload::new("Brand Guidelines.pdf", 5_452_595))
            .await
            .unwrap();
        let own = state
            .upload_document(&member(), &project_id, DocumentUpload::new("Notes.md", 2_048))
            .await
            .unwrap();

        assert!(state.delete_document(&member(), admins.id).await.unwrap_err().is_forbidden());
        state.delete_document(&member(), own.id).await.unwrap();
        state.delete_document(&manager(), admins.id).await.unwrap();
        assert!(state.documents(&manager()).await.is_empty());
    }

    #[tokio::test]
    async fn test_removed_uploader_cannot_delete() {
        let (state, project_id) = seeded().await;
        let doc = state
            .upload_document(&member(), &project_id, DocumentUpload::new("Notes.md", 2_048))
            .await
            .unwrap();
        state
            .remove_team_member(&manager(), &project_id, &member().id)
            .await
            .unwrap();

        let err = state.delete_document(&member(), doc.id).await.unwrap_err();
        assert_eq!(err, StoreError::Project(ProjectError::NotAMember(member().id)));
        assert_eq!(state.documents(&manager()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_outsider_cannot_upload() {
        let (state, project_id) = seeded().await;
        let err = state
            .upload_document(&outsider(), &project_id, DocumentUpload::new("x.pdf", 1))
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
    }
}
