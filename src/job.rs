//! Print job requests built from the Test Print form

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::config::settings::PrintDefaults;
use crate::constants::{printer::TASKID_FORMAT, service::PRINT_TASK};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintJobRequest {
    pub task: String,
    pub taskid: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Please select an image first")]
    NoFileSelected,
}

/// Text inputs of the Test Print tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintForm {
    pub file_path: String,
    pub taskid: String,
    pub width: String,
    pub height: String,
    pub left: String,
    pub top: String,
    pub endpoint: String,
}

impl PrintForm {
    pub fn new(defaults: &PrintDefaults, endpoint: impl Into<String>) -> Self {
        Self {
            file_path: String::new(),
            taskid: String::new(),
            width: defaults.width.clone(),
            height: defaults.height.clone(),
            left: defaults.left.clone(),
            top: defaults.top.clone(),
            endpoint: endpoint.into(),
        }
    }

    /// Snapshot the form as a request
    /// A blank task id becomes the timestamp `now` formatted as `YYYYMMDDhhmmss`
    pub fn to_request(&self, now: NaiveDateTime) -> Result<PrintJobRequest, JobError> {
        let file = self.file_path.trim();
        if file.is_empty() {
            return Err(JobError::NoFileSelected);
        }

        let taskid = match self.taskid.trim() {
            "" => task_id_at(now),
            given => given.to_string(),
        };

        Ok(PrintJobRequest {
            task: PRINT_TASK.to_string(),
            taskid,
            file: file.to_string(),
            width: non_blank(&self.width),
            height: non_blank(&self.height),
            left: non_blank(&self.left),
            top: non_blank(&self.top),
        })
    }
}

pub fn task_id_at(now: NaiveDateTime) -> String {
    now.format(TASKID_FORMAT).to_string()
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
