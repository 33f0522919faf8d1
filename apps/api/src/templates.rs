//! Static template table: id → DOCX file under the configured templates directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::AppError;

/// One of the three fixed resume layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Basic,
    Link,
    Image,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Basic, TemplateId::Link, TemplateId::Image];

    /// Wire id as sent by the form.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Basic => "1",
            TemplateId::Link => "2",
            TemplateId::Image => "3",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateId::Basic => "BasicTemplate.docx",
            TemplateId::Link => "LinkTemplate.docx",
            TemplateId::Image => "ImageTemplate.docx",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }

    /// Only the JSON strings "1", "2" and "3" are accepted. Numbers, null and
    /// absent values are all unknown templates.
    pub fn from_json(value: &Value) -> Result<Self, AppError> {
        value.as_str().and_then(Self::parse).ok_or_else(|| {
            AppError::NotFound(format!(
                "Template not found! Invalid Template: {}",
                display_raw(value)
            ))
        })
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "undefined".to_string(),
        other => other.to_string(),
    }
}

/// Resolves template ids to files on disk.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
}

impl TemplateCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the template path, or `NotFound` when the file is missing.
    pub async fn resolve(&self, id: TemplateId) -> Result<PathBuf, AppError> {
        let path = self.dir.join(id.file_name());
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => {
                tracing::warn!(template = %id, path = %path.display(), "Template file missing");
                Err(AppError::NotFound(format!(
                    "Invalid Template ID: {id}, Template Not Found!"
                )))
            }
        }
    }

    /// Templates whose files are absent. Logged at startup.
    pub fn missing(&self) -> Vec<TemplateId> {
        TemplateId::ALL
            .into_iter()
            .filter(|id| !self.dir.join(id.file_name()).is_file())
            .collect()
    }
}
