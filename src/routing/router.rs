use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use tabled::Tabled;
use tracing::{error, info, warn};
use crate::error::Result;
use crate::files;
use super::identifiers::IdentifierExtractor;

/// Identifier tokens named by a destination folder: comma-separated, trimmed, non-empty.
pub fn folder_tokens(folder_name: &str) -> Vec<String> {
    folder_name
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Identifier → destination folder, rebuilt from whatever folders exist on disk.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl ReverseIndex {
    /// Folders are visited in name order; a token claimed twice maps to the later folder.
    pub fn build(root: &Path) -> Result<Self> {
        let mut index = Self::default();
        for dir in files::subdirectories(root)? {
            index.insert_folder(&files::file_name(&dir), dir.clone());
        }
        Ok(index)
    }

    pub fn insert_folder(&mut self, folder_name: &str, path: PathBuf) {
        for token in folder_tokens(folder_name) {
            self.entries.insert(token, path.clone());
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Path> {
        self.entries.get(identifier).map(|p| p.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Copied,
    AlreadyPresent,
    NoFolder,
    CopyFailed { error: String },
}

impl DeliveryStatus {
    pub fn delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Copied | DeliveryStatus::AlreadyPresent)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    pub identifier: String,
    pub destination: Option<PathBuf>,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// Delivered to at least one folder and the loose original deleted.
    Removed,
    /// Delivered, but deleting the loose original failed.
    RemovalFailed { error: String },
    /// Identifiers found but nothing delivered, or some copy failed.
    Retained,
    /// No identifier in the name.
    Unrouted,
}

impl SourceOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOutcome::Removed => "removed",
            SourceOutcome::RemovalFailed { .. } => "removal_failed",
            SourceOutcome::Retained => "retained",
            SourceOutcome::Unrouted => "unrouted",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SourceOutcome::Removed => "✓",
            SourceOutcome::RemovalFailed { .. } => "✗",
            SourceOutcome::Retained => "⚠",
            SourceOutcome::Unrouted => "⚠",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutedFile {
    pub file_name: String,
    pub source: PathBuf,
    pub identifiers: Vec<String>,
    pub deliveries: Vec<Delivery>,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl RoutedFile {
    pub fn copied_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.status == DeliveryStatus::Copied).count()
    }

    pub fn unmapped_identifiers(&self) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::NoFolder)
            .map(|d| d.identifier.as_str())
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct RoutingReport {
    pub root: PathBuf,
    pub mapped_identifiers: usize,
    pub files: Vec<RoutedFile>,
}

impl RoutingReport {
    pub fn copied_count(&self) -> usize {
        self.files.iter().map(|f| f.copied_count()).sum()
    }

    pub fn removed_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome == SourceOutcome::Removed).count()
    }

    pub fn unrouted(&self) -> Vec<&RoutedFile> {
        self.files.iter().filter(|f| f.outcome == SourceOutcome::Unrouted).collect()
    }

    /// Per-item warnings: unrouted files, unmapped identifiers, failed copies or deletions.
    pub fn warning_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| {
                let from_outcome = usize::from(matches!(
                    f.outcome,
                    SourceOutcome::Unrouted | SourceOutcome::RemovalFailed { .. }
                ));
                let from_deliveries = f
                    .deliveries
                    .iter()
                    .filter(|d| matches!(d.status, DeliveryStatus::NoFolder | DeliveryStatus::CopyFailed { .. }))
                    .count();
                from_outcome + from_deliveries
            })
            .sum()
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct RoutingTableRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Identifiers")]
    pub identifiers: String,
    #[tabled(rename = "Delivered")]
    pub delivered: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl From<&RoutedFile> for RoutingTableRow {
    fn from(file: &RoutedFile) -> Self {
        let identifiers = if file.identifiers.is_empty() {
            "-".to_string()
        } else {
            file.identifiers.join(", ")
        };

        let delivered: Vec<String> = file
            .deliveries
            .iter()
            .map(|d| match &d.status {
                DeliveryStatus::Copied => format!("{} ✓", d.identifier),
                DeliveryStatus::AlreadyPresent => format!("{} ○", d.identifier),
                DeliveryStatus::NoFolder => format!("{} (no folder)", d.identifier),
                DeliveryStatus::CopyFailed { .. } => format!("{} ✗", d.identifier),
            })
            .collect();

        RoutingTableRow {
            file: file.file_name.clone(),
            identifiers,
            delivered: if delivered.is_empty() { "-".to_string() } else { delivered.join(", ") },
            source: format!("{} {}", file.outcome.symbol(), file.outcome.as_str()),
        }
    }
}

/// Distributes loose PDFs of a routing root into the identifier folders beside them.
pub struct DocumentRouter {
    extractor: IdentifierExtractor,
}

impl DocumentRouter {
    pub fn new() -> Self {
        Self {
            extractor: IdentifierExtractor::new(),
        }
    }

    pub fn route(&self, root: &Path) -> Result<RoutingReport> {
        info!("Routing loose documents in {}", root.display());

        let index = ReverseIndex::build(root)?;
        info!("Mapped {} identifiers to folders", index.len());

        let files = files::loose_pdfs(root)?
            .iter()
            .map(|pdf| self.route_file(pdf, &index))
            .collect();

        Ok(RoutingReport {
            root: root.to_path_buf(),
            mapped_identifiers: index.len(),
            files,
        })
    }

    fn route_file(&self, pdf: &Path, index: &ReverseIndex) -> RoutedFile {
        let file_name = files::file_name(pdf);
        let identifiers = self.extractor.extract(&files::file_stem(pdf));

        if identifiers.is_empty() {
            warn!("No identifiers in '{}', leaving it in place", file_name);
            return RoutedFile {
                file_name,
                source: pdf.to_path_buf(),
                identifiers,
                deliveries: Vec::new(),
                outcome: SourceOutcome::Unrouted,
            };
        }

        let deliveries: Vec<Delivery> = identifiers
            .iter()
            .map(|id| Self::deliver(pdf, &file_name, id, index))
            .collect();

        let any_delivered = deliveries.iter().any(|d| d.status.delivered());
        let any_failed = deliveries
            .iter()
            .any(|d| matches!(d.status, DeliveryStatus::CopyFailed { .. }));

        let outcome = if any_delivered && !any_failed {
            match fs::remove_file(pdf) {
                Ok(()) => {
                    info!("Removed original: {}", pdf.display());
                    SourceOutcome::Removed
                }
                Err(e) => {
                    error!("Could not remove {}: {}", pdf.display(), e);
                    SourceOutcome::RemovalFailed { error: e.to_string() }
                }
            }
        } else {
            SourceOutcome::Retained
        };

        RoutedFile {
            file_name,
            source: pdf.to_path_buf(),
            identifiers,
            deliveries,
            outcome,
        }
    }

    fn deliver(pdf: &Path, file_name: &str, identifier: &str, index: &ReverseIndex) -> Delivery {
        let folder = match index.get(identifier) {
            Some(folder) => folder,
            None => {
                warn!("No folder for ID '{}' (file {})", identifier, file_name);
                return Delivery {
                    identifier: identifier.to_string(),
                    destination: None,
                    status: DeliveryStatus::NoFolder,
                };
            }
        };

        let target = folder.join(file_name);
        let status = if target.exists() {
            warn!("Already present in {}: {}", folder.display(), file_name);
            DeliveryStatus::AlreadyPresent
        } else {
            match fs::copy(pdf, &target) {
                Ok(_) => {
                    info!("Copied {} → {}", file_name, folder.display());
                    DeliveryStatus::Copied
                }
                Err(e) => {
                    error!("Copy of {} into {} failed: {}", file_name, folder.display(), e);
                    DeliveryStatus::CopyFailed { error: e.to_string() }
                }
            }
        };

        Delivery {
            identifier: identifier.to_string(),
            destination: Some(folder.to_path_buf()),
            status,
        }
    }
}

impl Default for DocumentRouter {
    fn default() -> Self {
        Self::new()
    }
}
