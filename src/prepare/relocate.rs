use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;
use crate::config::SiteLayout;
use crate::error::Result;
use crate::files;
use super::action::{ActionStatus, FileAction, PassReport};

/// Flattens raw trees into their routing roots so the router finds every PDF loose.
pub struct Relocator;

impl Relocator {
    pub fn run(layout: &SiteLayout) -> Result<PassReport> {
        let mut report = PassReport::new("relocate");

        let grouped_root = layout.excavation_by_id_dir();
        fs::create_dir_all(&grouped_root)?;

        let excavation = layout.excavation_dir();
        if excavation.is_dir() {
            info!("Moving PDFs from {} to {}", excavation.display(), grouped_root.display());
            let pdfs = Self::pdfs_below(&excavation, 1);
            Self::move_all(pdfs, &grouped_root, &mut report)?;
        } else {
            report.missing_root(&excavation);
        }

        let registry = layout.unique_records_dir();
        if registry.is_dir() {
            info!("Lifting PDFs out of subfolders of {}", registry.display());
            let pdfs = Self::pdfs_below(&registry, 2);
            Self::move_all(pdfs, &registry, &mut report)?;
        } else {
            report.missing_root(&registry);
        }

        Ok(report)
    }

    fn pdfs_below(root: &Path, min_depth: usize) -> Vec<PathBuf> {
        WalkDir::new(root)
            .min_depth(min_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && files::is_pdf(e.path()))
            .map(|e| e.into_path())
            .collect()
    }

    fn move_all(pdfs: Vec<PathBuf>, dest: &Path, report: &mut PassReport) -> Result<()> {
        for pdf in pdfs {
            let target = dest.join(files::file_name(&pdf));

            if target.exists() {
                warn!("Already exists in {}: {}, skipping", dest.display(), files::file_name(&pdf));
                report.push(FileAction::new(&pdf, &target, ActionStatus::TargetExists));
                continue;
            }

            files::move_file(&pdf, &target)?;
            info!("Moved {} → {}", files::file_name(&pdf), dest.display());
            report.push(FileAction::new(&pdf, &target, ActionStatus::Applied));
        }
        Ok(())
    }
}
