//! Catalog resolver: maps the Drive folder hierarchy to the domain model.
//!
//! Layout: root folder -> one subfolder per patient -> one subfolder per
//! class -> video files. Names are matched exactly (case-sensitive, no
//! normalization).
//!
//! Failure policy: any listing failure is logged and collapsed to an empty
//! result. Callers see emptiness, never an error, so a flaky Drive
//! connection degrades the UI instead of breaking it.

use std::sync::Arc;

use crate::client::{DriveClient, DriveFile};

/// The fixed class labels, in the order the frontend expects them.
/// Folders with any other name are ignored.
pub const LUS_CLASSES: [&str; 3] = ["H-LUS", "C-LUS", "I-LUS"];

/// File-name suffix identifying video sequences (matched case-insensitively).
pub const VIDEO_EXTENSION: &str = ".mp4";

/// One video sequence discovered under a patient/class folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveVideo {
    pub patient_id: String,
    pub class_id: String,
    pub file_id: String,
    pub file_name: String,
}

/// Resolves patients, classes, and videos against the configured root folder.
pub struct Catalog {
    client: Arc<DriveClient>,
    root_folder_id: String,
}

impl Catalog {
    pub fn new(client: Arc<DriveClient>, root_folder_id: impl Into<String>) -> Self {
        Self {
            client,
            root_folder_id: root_folder_id.into(),
        }
    }

    /// Each direct subfolder of the root folder is a patient; the folder name
    /// is the patient id. Sorted lexicographically.
    pub async fn list_patients(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .child_folders_or_empty(&self.root_folder_id)
            .await
            .into_iter()
            .map(|f| f.name)
            .collect();
        names.sort();
        names
    }

    /// The known class folders under a patient, in the fixed class order.
    ///
    /// Empty when the patient cannot be resolved; the caller treats that as
    /// not-found.
    pub async fn list_classes(&self, patient_id: &str) -> Vec<String> {
        let Some(patient) = self
            .find_child_folder(&self.root_folder_id, patient_id)
            .await
        else {
            return Vec::new();
        };

        let names: Vec<String> = self
            .child_folders_or_empty(&patient.id)
            .await
            .into_iter()
            .map(|f| f.name)
            .collect();

        LUS_CLASSES
            .iter()
            .filter(|c| names.iter().any(|n| n == *c))
            .map(|c| (*c).to_string())
            .collect()
    }

    /// All video files under a patient's class folder, sorted by file name so
    /// sequences play back in order.
    ///
    /// Empty when either folder cannot be resolved -- indistinguishable from
    /// a class with no videos, by contract.
    pub async fn list_videos(&self, patient_id: &str, class_id: &str) -> Vec<DriveVideo> {
        let Some(patient) = self
            .find_child_folder(&self.root_folder_id, patient_id)
            .await
        else {
            return Vec::new();
        };

        let Some(class) = self.find_child_folder(&patient.id, class_id).await else {
            return Vec::new();
        };

        let files = match self.client.list_child_files(&class.id).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Drive file listing failed for folder {}: {e}", class.id);
                return Vec::new();
            }
        };

        let mut videos: Vec<DriveVideo> = files
            .into_iter()
            .filter(|f| f.name.to_lowercase().ends_with(VIDEO_EXTENSION))
            .map(|f| DriveVideo {
                patient_id: patient_id.to_string(),
                class_id: class_id.to_string(),
                file_id: f.id,
                file_name: f.name,
            })
            .collect();

        videos.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        videos
    }

    /// Find a child folder by exact name.
    async fn find_child_folder(&self, parent_id: &str, name: &str) -> Option<DriveFile> {
        self.child_folders_or_empty(parent_id)
            .await
            .into_iter()
            .find(|f| f.name == name)
    }

    async fn child_folders_or_empty(&self, parent_id: &str) -> Vec<DriveFile> {
        match self.client.list_child_folders(parent_id).await {
            Ok(folders) => folders,
            Err(e) => {
                tracing::warn!("Drive folder listing failed for folder {parent_id}: {e}");
                Vec::new()
            }
        }
    }
}
