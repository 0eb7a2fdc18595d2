use serde::{Deserialize, Serialize};

/// One user-selected output column: a display label plus the dot-separated
/// path it projects. The label becomes the column name and need not equal
/// the last path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathDescriptor {
    /// Column name in the projected table.
    #[serde(rename = "text")]
    pub label: String,
    /// Dot-separated location in the record tree, marker prefix allowed.
    pub path: String,
}

impl PathDescriptor {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        PathDescriptor {
            label: label.into(),
            path: path.into(),
        }
    }

    /// A descriptor whose label is the last path segment.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let label = path.rsplit('.').next().unwrap_or(&path).to_string();
        PathDescriptor { label, path }
    }
}
