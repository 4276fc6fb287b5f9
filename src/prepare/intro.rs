use std::fs;
use tracing::{info, warn};
use crate::config::SiteLayout;
use crate::error::Result;
use crate::files;
use super::action::{ActionStatus, FileAction, PassReport};

/// Files the site-wide introduction into its own folder.
pub struct IntroductionFiler;

impl IntroductionFiler {
    pub fn run(layout: &SiteLayout) -> Result<PassReport> {
        let mut report = PassReport::new("file-intro");

        let source = layout.general_intro_file();
        let dest_dir = layout.general_intro_dir();
        let target = dest_dir.join(files::file_name(&source));

        if !source.is_file() {
            warn!("{} not found in {}", files::file_name(&source), layout.root().display());
            report.push(FileAction::new(&source, &target, ActionStatus::SourceMissing));
            return Ok(report);
        }

        fs::create_dir_all(&dest_dir)?;

        if target.exists() {
            warn!("{} already exists in {}", files::file_name(&target), dest_dir.display());
            report.push(FileAction::new(&source, &target, ActionStatus::TargetExists));
            return Ok(report);
        }

        files::move_file(&source, &target)?;
        info!("Moved {} to {}", files::file_name(&source), dest_dir.display());
        report.push(FileAction::new(&source, &target, ActionStatus::Applied));

        Ok(report)
    }
}
