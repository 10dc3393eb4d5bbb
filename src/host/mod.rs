//! Host capabilities the panel depends on
//!
//! Everything that touches the filesystem or the desktop goes through [`Host`],
//! so the panel logic can be driven by an in-memory fake in tests.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

mod local;
pub use local::LocalHost;

#[cfg(test)]
pub mod fake;

/// Outcome of a copy request
///
/// A failed copy is a normal value, not an error: `success == false` with a
/// human readable `message`. `file_path` is only set on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl CopyResult {
    pub fn copied(destination: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "File copied successfully".to_string(),
            file_path: Some(destination.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file_path: None,
        }
    }

    /// Destination path, only when the copy succeeded
    pub fn destination(&self) -> Option<&str> {
        if self.success {
            self.file_path.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Images directory does not exist: {}", .0.display())]
    MissingImagesDir(PathBuf),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract filename from {0:?}")]
    NoFileName(String),

    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },

    #[error("Host task failed: {0}")]
    Task(String),
}

impl HostError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        HostError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Operations provided by the machine the panel runs on
pub trait Host: Send + Sync {
    /// Backend paths of every project image
    fn list_project_images(&self) -> Result<Vec<String>, HostError>;

    /// Copy `source` to `destination`, creating the destination directory
    fn copy_file(&self, source: &str, destination: &str) -> Result<CopyResult, HostError>;

    /// Directory that copies for the printer should land in
    fn destination_dir(&self) -> Result<String, HostError>;

    fn delete_file(&self, path: &str) -> Result<(), HostError>;

    /// URI the GUI image loader can display
    fn display_uri(&self, path: &str) -> String;

    /// Hand the file to the desktop's default application
    fn open_file(&self, path: &str) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_only_on_success() {
        assert_eq!(CopyResult::copied("D:/a.jpg").destination(), Some("D:/a.jpg"));

        let odd = CopyResult {
            success: false,
            message: "Failed to copy file".to_string(),
            file_path: Some("D:/a.jpg".to_string()),
        };
        assert_eq!(odd.destination(), None);
    }

    #[test]
    fn test_copy_result_wire_shape() {
        let json = serde_json::to_value(CopyResult::failed("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "message": "nope" }));
    }
}
