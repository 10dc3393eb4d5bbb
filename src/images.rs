//! Project image listing and printer-side copies

use tracing::{debug, info};

use crate::host::{CopyResult, Host, HostError};

/// One gallery entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Path as the host knows it
    pub backend_path: String,
    /// URI the GUI can load
    pub display_path: String,
}

impl ImageRef {
    pub fn file_name(&self) -> &str {
        file_name(&self.backend_path).unwrap_or(&self.backend_path)
    }
}

/// Last segment of a `/` or `\` separated path, if non-empty
pub fn file_name(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\']).next().filter(|name| !name.is_empty())
}

/// List every project image with its display URI
/// Fails as a whole if the host cannot enumerate
pub fn list_images(host: &dyn Host) -> Result<Vec<ImageRef>, HostError> {
    let images: Vec<ImageRef> = host
        .list_project_images()?
        .into_iter()
        .map(|backend_path| {
            let display_path = host.display_uri(&backend_path);
            debug!(backend = %backend_path, display = %display_path, "Mapped image");
            ImageRef {
                backend_path,
                display_path,
            }
        })
        .collect();

    info!(count = images.len(), "Loaded project images");
    Ok(images)
}

/// Copy `source` into the host's destination directory under its own filename
///
/// `fallback_dir` is used when the host cannot report a destination.
pub fn copy_with_original_filename(
    host: &dyn Host,
    source: &str,
    fallback_dir: &str,
) -> Result<CopyResult, HostError> {
    let name = file_name(source).ok_or_else(|| HostError::NoFileName(source.to_string()))?;

    let dir = host.destination_dir().unwrap_or_else(|e| {
        debug!(error = %e, fallback = %fallback_dir, "Destination dir unavailable, using fallback");
        fallback_dir.to_string()
    });
    let destination = format!("{}/{}", dir.trim_end_matches(['/', '\\']), name);

    info!(source = %source, destination = %destination, "Copying file");
    host.copy_file(source, &destination)
}

pub fn delete_image(host: &dyn Host, backend_path: &str) -> Result<(), HostError> {
    host.delete_file(backend_path)
}
