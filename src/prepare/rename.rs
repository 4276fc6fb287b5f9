use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use crate::config::{ArchiveConfig, SiteLayout};
use crate::error::Result;
use crate::files;
use super::action::{ActionStatus, FileAction, PassReport};

/// Renames raw export folder names to the archive vocabulary, deepest folders first.
pub struct FolderRenamer<'a> {
    config: &'a ArchiveConfig,
}

impl<'a> FolderRenamer<'a> {
    pub fn new(config: &'a ArchiveConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, root: &Path) -> Result<PassReport> {
        let mut report = PassReport::new("rename-folders");

        // Collected up front so renames never race the directory iterator.
        let dirs: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.into_path())
            .collect();

        for dir in dirs {
            let name = files::file_name(&dir);
            let Some(new_name) = self.config.rename_for(&name) else {
                continue;
            };
            let Some(parent) = dir.parent() else {
                continue;
            };
            let target = parent.join(new_name);

            if target.exists() {
                warn!("Cannot rename {} because {} already exists", dir.display(), target.display());
                report.push(FileAction::new(&dir, &target, ActionStatus::TargetExists));
                continue;
            }

            fs::rename(&dir, &target)?;
            info!("Renamed {} → {}", dir.display(), target.display());
            report.push(FileAction::new(&dir, &target, ActionStatus::Applied));
        }

        Ok(report)
    }
}

/// Appends `_<parent folder>` to every PDF under the raw excavation and registry trees,
/// so files keep their document category once they are moved out of their folder.
pub struct PdfSuffixRenamer;

impl PdfSuffixRenamer {
    pub fn run(layout: &SiteLayout) -> Result<PassReport> {
        let mut report = PassReport::new("rename-pdfs");

        for root in [layout.excavation_dir(), layout.unique_records_dir()] {
            if !root.is_dir() {
                report.missing_root(&root);
                continue;
            }
            info!("Renaming PDFs under {}", root.display());
            Self::rename_under(&root, &mut report)?;
        }

        Ok(report)
    }

    fn rename_under(root: &Path, report: &mut PassReport) -> Result<()> {
        let pdfs: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && files::is_pdf(e.path()))
            .map(|e| e.into_path())
            .collect();

        for pdf in pdfs {
            let Some(parent) = pdf.parent() else {
                continue;
            };
            let target = match suffixed_name(&pdf) {
                Some(name) => parent.join(name),
                None => {
                    debug!("Already suffixed: {}", pdf.display());
                    report.push(FileAction::new(&pdf, &pdf, ActionStatus::AlreadyApplied));
                    continue;
                }
            };

            if target.exists() {
                warn!("Cannot rename {} because {} already exists", pdf.display(), target.display());
                report.push(FileAction::new(&pdf, &target, ActionStatus::TargetExists));
                continue;
            }

            fs::rename(&pdf, &target)?;
            info!("Renamed {} → {}", files::file_name(&pdf), files::file_name(&target));
            report.push(FileAction::new(&pdf, &target, ActionStatus::Applied));
        }

        Ok(())
    }
}

/// `<stem>_<parent>.<ext>`, or `None` when the stem already carries the parent's name.
pub fn suffixed_name(pdf: &Path) -> Option<String> {
    let folder = pdf.parent().map(files::file_name)?;
    let stem = files::file_stem(pdf);
    let suffix = format!("_{}", folder);

    if folder.is_empty() || stem.ends_with(&suffix) {
        return None;
    }

    let ext = pdf
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pdf".to_string());

    Some(format!("{}{}.{}", stem, suffix, ext))
}
