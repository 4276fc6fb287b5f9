use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteArchiveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Missing required column '{0}' in workbook")]
    MissingColumn(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiteArchiveError {
    /// Configuration problems abort a run before any step touches the tree.
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            SiteArchiveError::Config(_) | SiteArchiveError::MissingColumn(_) | SiteArchiveError::Workbook(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SiteArchiveError>;
