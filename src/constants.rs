//! Application-wide constants
//!
//! Single source of truth for magic numbers and string literals shared by the
//! panel, the resolver and the refine client.

/// Configuration file location
pub mod config {
    /// Directory under the platform config/data dirs
    pub const APP_DIR: &str = "refine-print-panel";

    /// Settings file name
    pub const FILENAME: &str = "config.toml";

    /// Sub-directory of the data dir holding project images
    pub const IMAGES_SUBDIR: &str = "Images";

    /// Sub-directory of the data dir receiving copied images
    pub const OUTPUT_SUBDIR: &str = "Output";
}

/// Refine service defaults
pub mod service {
    /// Endpoint used when neither config nor form supplies one
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:9090/api/refine/";

    /// Request timeout in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    /// `result` value the service reports for an accepted print job
    pub const PRINT_SUCCESS: &str = "00";

    /// `task` field of every print job
    pub const PRINT_TASK: &str = "print";
}

/// Printer drive conventions
pub mod printer {
    /// Drive the print service reads from
    pub const DEFAULT_DRIVE: &str = "D:";

    /// Destination directory used when the host cannot report one
    pub const FALLBACK_DIR: &str = "D:/";

    /// Filename used when none can be extracted from a source path
    pub const FALLBACK_FILENAME: &str = "image.jpg";

    /// Format of generated task ids (local time)
    pub const TASKID_FORMAT: &str = "%Y%m%d%H%M%S";
}

/// Image discovery
pub mod images {
    /// Extensions (lowercase) listed in the gallery
    pub const EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

    /// URI scheme understood by the egui file loader
    pub const DISPLAY_SCHEME: &str = "file://";
}

/// Default rows of the API test form
pub mod api_defaults {
    pub const TASKID: &str = "20200923103915";

    /// Placeholder `file` value until the first image list arrives
    pub const IMAGE_PATH: &str = "images/image1.jpg";

    pub const WIDTH: &str = "100";
    pub const HEIGHT: &str = "100";
    pub const LEFT: &str = "10";
    pub const TOP: &str = "10";
}

/// Notification timing
pub mod notify {
    /// Success and info messages hide after this many milliseconds
    pub const AUTO_HIDE_MS: u64 = 5_000;
}
