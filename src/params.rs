//! Editable name/value rows of the API test form

use indexmap::IndexMap;

use crate::constants::{api_defaults, service::PRINT_TASK};

/// Flat JSON body, in row order
pub type ParamMap = IndexMap<String, String>;

/// Stable identity of a row, independent of its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRow {
    id: RowId,
    pub name: String,
    pub value: String,
}

impl ParamRow {
    pub fn id(&self) -> RowId {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParamForm {
    rows: Vec<ParamRow>,
    next_id: u64,
}

impl ParamForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows the API test tab starts with
    pub fn with_defaults() -> Self {
        let mut form = Self::new();
        form.add("task", PRINT_TASK);
        form.add("taskid", api_defaults::TASKID);
        form.add("file", api_defaults::IMAGE_PATH);
        form.add("width", api_defaults::WIDTH);
        form.add("height", api_defaults::HEIGHT);
        form.add("left", api_defaults::LEFT);
        form.add("top", api_defaults::TOP);
        form
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(ParamRow {
            id,
            name: name.into(),
            value: value.into(),
        });
        id
    }

    /// Returns false when no row has this id
    pub fn remove(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn rows(&self) -> &[ParamRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [ParamRow] {
        &mut self.rows
    }

    /// Build the request body
    ///
    /// Keys are trimmed and rows with a blank key are skipped. Values are kept
    /// verbatim. A repeated key takes the value of its last row.
    pub fn collect(&self) -> ParamMap {
        let mut params = ParamMap::new();
        for row in &self.rows {
            let name = row.name.trim();
            if !name.is_empty() {
                params.insert(name.to_string(), row.value.clone());
            }
        }
        params
    }

    /// Swap the placeholder `file` value for a real image path
    /// Rows the user already edited are left alone
    pub fn replace_placeholder_file(&mut self, image_path: &str) -> bool {
        let mut replaced = false;
        for row in &mut self.rows {
            if row.name.trim() == "file" && row.value == api_defaults::IMAGE_PATH {
                row.value = image_path.to_string();
                replaced = true;
            }
        }
        replaced
    }
}
