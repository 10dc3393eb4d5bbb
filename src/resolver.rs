//! Printer-accessible path policy
//!
//! The print service only reads from one drive. Paths already on that drive
//! are passed through with backslashes; anything else is copied there first.
//! Resolution never fails: when the copy cannot be confirmed the caller gets a
//! synthesized `<drive>\<filename>` marked as unverified, so a request can
//! still be attempted.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::settings::PrinterSettings;
use crate::constants::printer::FALLBACK_FILENAME;
use crate::host::Host;
use crate::images::{copy_with_original_filename, file_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Already on the printer drive; only slashes were normalized
    AlreadyAccessible,
    /// Copied; the host confirmed the destination
    Copied,
    /// Best-effort guess, not verified to exist
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: String,
    pub resolution: Resolution,
}

impl ResolvedPath {
    pub fn is_verified(&self) -> bool {
        !matches!(self.resolution, Resolution::Fallback { .. })
    }
}

/// Drive the print service reads from, e.g. `D:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterDrive(String);

impl PrinterDrive {
    pub fn new(drive: impl Into<String>) -> Self {
        Self(drive.into())
    }

    /// `D:\x` and `d:/x` both match drive `D:`
    pub fn contains(&self, path: &str) -> bool {
        let drive = self.0.as_bytes();
        let path = path.as_bytes();
        path.len() > drive.len()
            && path[..drive.len()].eq_ignore_ascii_case(drive)
            && matches!(path[drive.len()], b'/' | b'\\')
    }

    fn join(&self, file_name: &str) -> String {
        format!("{}\\{}", self.0, file_name)
    }
}

#[derive(Clone)]
pub struct PathResolver {
    host: Arc<dyn Host>,
    drive: PrinterDrive,
    fallback_dir: String,
}

impl PathResolver {
    pub fn new(host: Arc<dyn Host>, printer: &PrinterSettings) -> Self {
        Self {
            host,
            drive: PrinterDrive::new(printer.drive.clone()),
            fallback_dir: printer.fallback_dir.clone(),
        }
    }

    pub fn resolve(&self, path: &str) -> ResolvedPath {
        if self.drive.contains(path) {
            return ResolvedPath {
                path: path.replace('/', "\\"),
                resolution: Resolution::AlreadyAccessible,
            };
        }

        let reason = match copy_with_original_filename(self.host.as_ref(), path, &self.fallback_dir) {
            Ok(result) => match result.destination() {
                Some(destination) => {
                    debug!(source = %path, destination = %destination, "Resolved printer path via copy");
                    return ResolvedPath {
                        path: destination.to_string(),
                        resolution: Resolution::Copied,
                    };
                }
                None => result.message,
            },
            Err(e) => e.to_string(),
        };

        self.fallback(path, reason)
    }

    /// Synthesized path used when nothing better is known
    pub fn fallback(&self, path: &str, reason: impl Into<String>) -> ResolvedPath {
        let reason = reason.into();
        let guessed = self.drive.join(file_name(path).unwrap_or(FALLBACK_FILENAME));
        warn!(source = %path, guessed = %guessed, reason = %reason, "Could not copy to printer drive, using unverified path");
        ResolvedPath {
            path: guessed,
            resolution: Resolution::Fallback { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{CopyBehavior, FakeHost};

    fn resolver(host: FakeHost) -> (Arc<FakeHost>, PathResolver) {
        let host = Arc::new(host);
        let resolver = PathResolver::new(host.clone(), &PrinterSettings::default());
        (host, resolver)
    }

    #[test]
    fn test_drive_match_is_case_and_slash_insensitive() {
        let drive = PrinterDrive::new("D:");
        assert!(drive.contains(r"D:\prints\a.jpg"));
        assert!(drive.contains("D:/prints/a.jpg"));
        assert!(drive.contains("d:/a.jpg"));
        assert!(!drive.contains("D:a.jpg"));
        assert!(!drive.contains("D:"));
        assert!(!drive.contains(r"C:\D:\a.jpg"));
        assert!(!drive.contains("images/a.jpg"));
    }

    #[test]
    fn test_printer_paths_pass_through_without_copy() {
        let (host, resolver) = resolver(FakeHost::new());

        for path in ["D:/prints/a.jpg", r"D:\prints\a.jpg", "d:/mixed\\a.jpg"] {
            let resolved = resolver.resolve(path);
            assert_eq!(resolved.resolution, Resolution::AlreadyAccessible);
            assert_eq!(resolved.path, path.replace('/', "\\"));
            assert!(resolved.is_verified());
        }
        assert!(host.copies().is_empty());
    }

    #[test]
    fn test_other_paths_are_copied() {
        let (host, resolver) = resolver(FakeHost::new());
        let resolved = resolver.resolve("images/a.jpg");

        assert_eq!(resolved.path, "D:/copyfolder/a.jpg");
        assert_eq!(resolved.resolution, Resolution::Copied);
        assert_eq!(host.copies().len(), 1);
    }

    #[test]
    fn test_reported_failure_falls_back() {
        let (_, resolver) =
            resolver(FakeHost::new().with_copy(CopyBehavior::Fail("disk full".to_string())));
        let resolved = resolver.resolve(r"C:\pics\a.jpg");

        assert_eq!(resolved.path, r"D:\a.jpg");
        assert_eq!(
            resolved.resolution,
            Resolution::Fallback {
                reason: "disk full".to_string()
            }
        );
        assert!(!resolved.is_verified());
    }

    #[test]
    fn test_copy_error_falls_back() {
        let (_, resolver) = resolver(FakeHost::new().with_copy(CopyBehavior::Error));
        let resolved = resolver.resolve("/home/me/b.png");

        assert_eq!(resolved.path, r"D:\b.png");
        assert!(!resolved.is_verified());
    }

    #[test]
    fn test_missing_filename_falls_back_to_default_name() {
        let (host, resolver) = resolver(FakeHost::new());
        let resolved = resolver.resolve("images/");

        assert_eq!(resolved.path, r"D:\image.jpg");
        assert!(!resolved.is_verified());
        assert!(host.copies().is_empty());
    }

    #[test]
    fn test_configured_drive() {
        let host = Arc::new(FakeHost::new().with_copy(CopyBehavior::Error));
        let printer = PrinterSettings {
            drive: "E:".to_string(),
            ..PrinterSettings::default()
        };
        let resolver = PathResolver::new(host.clone(), &printer);

        assert_eq!(resolver.resolve("e:/x.jpg").path, r"e:\x.jpg");
        assert_eq!(resolver.resolve("D:/x.jpg").path, r"E:\x.jpg");
        assert_eq!(host.copies().len(), 1);
    }
}
