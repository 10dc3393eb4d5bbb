//! In-memory host for tests

use std::sync::Mutex;

use super::{CopyResult, Host, HostError};

/// How the fake answers `copy_file`
#[derive(Debug, Clone)]
pub enum CopyBehavior {
    /// Report success with the requested destination
    Succeed,
    /// Report `success: false` with this message
    Fail(String),
    /// Return an error
    Error,
}

#[derive(Debug)]
pub struct FakeHost {
    pub images: Result<Vec<String>, String>,
    pub destination: Option<String>,
    pub copy: CopyBehavior,
    pub open_fails: bool,
    pub copies: Mutex<Vec<(String, String)>>,
    pub deleted: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            images: Ok(Vec::new()),
            destination: Some("D:/copyfolder".to_string()),
            copy: CopyBehavior::Succeed,
            open_fails: false,
            copies: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn with_images(mut self, images: &[&str]) -> Self {
        self.images = Ok(images.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_copy(mut self, copy: CopyBehavior) -> Self {
        self.copy = copy;
        self
    }

    pub fn copies(&self) -> Vec<(String, String)> {
        self.copies.lock().unwrap().clone()
    }
}

impl Host for FakeHost {
    fn list_project_images(&self) -> Result<Vec<String>, HostError> {
        self.images.clone().map_err(HostError::Task)
    }

    fn copy_file(&self, source: &str, destination: &str) -> Result<CopyResult, HostError> {
        self.copies
            .lock()
            .unwrap()
            .push((source.to_string(), destination.to_string()));
        match &self.copy {
            CopyBehavior::Succeed => Ok(CopyResult::copied(destination)),
            CopyBehavior::Fail(message) => Ok(CopyResult::failed(message.clone())),
            CopyBehavior::Error => Err(HostError::Task("copy exploded".to_string())),
        }
    }

    fn destination_dir(&self) -> Result<String, HostError> {
        self.destination
            .clone()
            .ok_or_else(|| HostError::Task("no destination".to_string()))
    }

    fn delete_file(&self, path: &str) -> Result<(), HostError> {
        self.deleted.lock().unwrap().push(path.to_string());
        Ok(())
    }

    fn display_uri(&self, path: &str) -> String {
        format!("asset://localhost/{path}")
    }

    fn open_file(&self, path: &str) -> Result<(), HostError> {
        if self.open_fails {
            return Err(HostError::Open {
                path: path.to_string(),
                message: "no handler".to_string(),
            });
        }
        self.opened.lock().unwrap().push(path.to_string());
        Ok(())
    }
}
