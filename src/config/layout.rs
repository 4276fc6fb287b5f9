use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::error::{SiteArchiveError, Result};

pub const EXCAVATION_DIR: &str = "Excavación";
pub const EXCAVATION_BY_ID_DIR: &str = "Excavación por ID Monumento";
pub const UNIQUE_RECORDS_DIR: &str = "Registros únicos";
pub const GENERAL_INTRO_DIR: &str = "Introducción general";
pub const GENERAL_INTRO_FILE: &str = "IntroduccionGeneral.pdf";

/// Where a group's folder lives, keyed by the workbook's `Tipo de intervención`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    Excavation,
    UniqueRecord,
}

impl InterventionType {
    /// Closed mapping; anything else is left to the caller to report.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Excavación" => Some(InterventionType::Excavation),
            "Registro único" => Some(InterventionType::UniqueRecord),
            _ => None,
        }
    }

    pub fn root_dir_name(&self) -> &'static str {
        match self {
            InterventionType::Excavation => EXCAVATION_BY_ID_DIR,
            InterventionType::UniqueRecord => UNIQUE_RECORDS_DIR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionType::Excavation => "excavation",
            InterventionType::UniqueRecord => "unique_record",
        }
    }
}

/// Every fixed location of one site, derived from its root folder.
///
/// The root's final component doubles as the site name used to filter
/// workbook rows, so the root must be named exactly like `Nombre Sitio`.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    root: PathBuf,
    site_name: String,
}

impl SiteLayout {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(SiteArchiveError::Config(format!(
                "site root {} does not exist or is not a directory",
                root.display()
            )));
        }

        let site_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SiteArchiveError::Config(format!(
                "cannot derive a site name from {}",
                root.display()
            )))?;

        Ok(Self { root, site_name })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn excavation_dir(&self) -> PathBuf {
        self.root.join(EXCAVATION_DIR)
    }

    pub fn excavation_by_id_dir(&self) -> PathBuf {
        self.root.join(EXCAVATION_BY_ID_DIR)
    }

    pub fn unique_records_dir(&self) -> PathBuf {
        self.root.join(UNIQUE_RECORDS_DIR)
    }

    pub fn general_intro_dir(&self) -> PathBuf {
        self.root.join(GENERAL_INTRO_DIR)
    }

    pub fn general_intro_file(&self) -> PathBuf {
        self.root.join(GENERAL_INTRO_FILE)
    }

    pub fn audit_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn group_root(&self, intervention: InterventionType) -> PathBuf {
        self.root.join(intervention.root_dir_name())
    }

    /// Both directories that receive identifier-named folders, in routing order.
    pub fn routing_roots(&self) -> [PathBuf; 2] {
        [self.excavation_by_id_dir(), self.unique_records_dir()]
    }
}
