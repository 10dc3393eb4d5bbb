//! Filesystem-backed host

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{CopyResult, Host, HostError};
use crate::constants::images::{DISPLAY_SCHEME, EXTENSIONS};

/// Host operating on two local directories: the project images and the
/// output directory copies are written to
#[derive(Debug, Clone)]
pub struct LocalHost {
    images_dir: PathBuf,
    output_dir: PathBuf,
}

impl LocalHost {
    pub fn new(images_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Copy every regular file of `resource_dir` into the images directory
    /// Returns the number of files copied
    pub fn seed_from(&self, resource_dir: &Path) -> Result<usize, HostError> {
        ensure_dir(&self.images_dir)?;

        let entries = fs::read_dir(resource_dir).map_err(|e| {
            HostError::io(format!("Failed to read resource dir {}", resource_dir.display()), e)
        })?;

        let mut copied = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| HostError::io("Failed to read resource entry", e))?
                .path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let target = self.images_dir.join(file_name);
            fs::copy(&path, &target)
                .map_err(|e| HostError::io(format!("Failed to copy file {}", path.display()), e))?;
            copied += 1;
        }

        info!(count = copied, from = %resource_dir.display(), to = %self.images_dir.display(), "Seeded project images");
        Ok(copied)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), HostError> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| HostError::io(format!("Failed to create directory {}", dir.display()), e))?;
    }
    Ok(())
}

fn is_listed_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| EXTENSIONS.contains(&ext.as_str()))
}

impl Host for LocalHost {
    fn list_project_images(&self) -> Result<Vec<String>, HostError> {
        ensure_dir(&self.images_dir)?;
        if !self.images_dir.is_dir() {
            return Err(HostError::MissingImagesDir(self.images_dir.clone()));
        }

        let entries = fs::read_dir(&self.images_dir).map_err(|e| {
            HostError::io(format!("Failed to read {}", self.images_dir.display()), e)
        })?;

        let mut images = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| HostError::io("Failed to read directory entry", e))?
                .path();
            if path.is_file() && is_listed_image(&path) {
                images.push(path.to_string_lossy().to_string());
            }
        }
        images.sort();

        debug!(count = images.len(), dir = %self.images_dir.display(), "Listed project images");
        Ok(images)
    }

    fn copy_file(&self, source: &str, destination: &str) -> Result<CopyResult, HostError> {
        let source_path = Path::new(source);
        let destination_path = Path::new(destination);

        if !source_path.exists() {
            return Ok(CopyResult::failed(format!(
                "Source file does not exist: {}",
                source_path.display()
            )));
        }

        if let Some(parent) = destination_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
            && let Err(e) = fs::create_dir_all(parent)
        {
            return Ok(CopyResult::failed(format!("Failed to create directory: {e}")));
        }

        match fs::copy(source_path, destination_path) {
            Ok(bytes) => {
                info!(source = %source, destination = %destination, bytes, "Copied file");
                Ok(CopyResult::copied(destination))
            }
            Err(e) => {
                warn!(source = %source, destination = %destination, error = %e, "Copy failed");
                Ok(CopyResult::failed(format!("Failed to copy file: {e}")))
            }
        }
    }

    fn destination_dir(&self) -> Result<String, HostError> {
        ensure_dir(&self.output_dir)?;
        Ok(self.output_dir.to_string_lossy().to_string())
    }

    fn delete_file(&self, path: &str) -> Result<(), HostError> {
        fs::remove_file(path).map_err(|e| HostError::io(format!("Failed to delete {path}"), e))?;
        info!(path = %path, "Deleted file");
        Ok(())
    }

    fn display_uri(&self, path: &str) -> String {
        format!("{DISPLAY_SCHEME}{path}")
    }

    fn open_file(&self, path: &str) -> Result<(), HostError> {
        open::that(path).map_err(|e| HostError::Open {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
