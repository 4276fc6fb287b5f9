use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{SiteArchiveError, Result};

const CONFIG_DIR: &str = "sitearchive";
const CONFIG_FILE: &str = "config.yaml";

/// Tunable lookup tables. Every field falls back to the built-in archive vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Raw folder name → canonical folder name, applied before anything else.
    #[serde(default = "default_folder_renames")]
    pub folder_renames: Vec<FolderRename>,

    /// Required document suffixes per identifier folder, tested in order.
    #[serde(default = "default_expected_suffixes")]
    pub expected_suffixes: Vec<String>,

    /// Directory audited against the workbook's `ID Monumento` column.
    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRename {
    pub from: String,
    pub to: String,
}

impl FolderRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}

fn default_folder_renames() -> Vec<FolderRename> {
    [
        ("Excavacion", "Excavación"),
        ("Prospeccion", "Prospección"),
        ("RegistroUnico", "Registros únicos"),
        ("Dibujos", "Dibujos arquitectónicos"),
        ("FichaDeExcavacion", "Ficha de excavación"),
        ("Introduccion", "Introducción"),
        ("RegistroDeCapas", "Registro de capas"),
        ("RegistroDeFotogrametria", "Registro de fotogrametría"),
        ("RegistroDeMaterialesArqueologicos", "Registro de materiales arqueológicos"),
        ("RegistrosArqueologicos", "Registros arqueológicos"),
    ]
    .into_iter()
    .map(|(from, to)| FolderRename::new(from, to))
    .collect()
}

fn default_expected_suffixes() -> Vec<String> {
    [
        "Introducción.pdf",
        "Ficha de excavación.pdf",
        "Dibujos arquitectónicos.pdf",
        "Registro de capas.pdf",
        "Registro de fotogrametría.pdf",
        "Registro de materiales arqueológicos.pdf",
        "Registros arqueológicos.pdf",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_audit_dir() -> String {
    "Prospección".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            folder_renames: default_folder_renames(),
            expected_suffixes: default_expected_suffixes(),
            audit_dir: default_audit_dir(),
        }
    }
}

impl ArchiveConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ArchiveConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SiteArchiveError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Explicit path first, then the per-user config file if present, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::user_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Using config from {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn rename_for(&self, folder_name: &str) -> Option<&str> {
        self.folder_renames
            .iter()
            .find(|r| r.from == folder_name)
            .map(|r| r.to.as_str())
    }

    fn validate(&self) -> Result<()> {
        if self.expected_suffixes.iter().any(|s| s.is_empty()) {
            return Err(SiteArchiveError::Config("expected_suffixes must not contain empty entries".into()));
        }
        if self.audit_dir.trim().is_empty() {
            return Err(SiteArchiveError::Config("audit_dir must not be empty".into()));
        }
        if let Some(bad) = self.folder_renames.iter().find(|r| r.from.is_empty() || r.to.is_empty()) {
            return Err(SiteArchiveError::Config(
                format!("folder rename '{}' → '{}' has an empty side", bad.from, bad.to)
            ));
        }
        Ok(())
    }
}
