use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};
use crate::config::{ArchiveConfig, SiteLayout};
use crate::error::Result;
use crate::files;
use crate::index::GROUP_TOKEN_PREFIX;
use crate::records::RecordSet;
use super::report::{
    ComplianceReport, DuplicateSuffix, FolderAudit, GroupedRootAudit, RegistryAudit, RegistryFolder,
    RootLevelAudit,
};

/// Sorts file names into expected suffixes. Suffixes are tried in list order and
/// the first hit wins, so one file never counts toward two suffixes.
pub fn classify_by_suffix(folder: &str, file_names: &[String], suffixes: &[String]) -> FolderAudit {
    let mut found: Vec<Vec<String>> = vec![Vec::new(); suffixes.len()];
    let mut extra = Vec::new();

    for name in file_names {
        match suffixes.iter().position(|suffix| name.ends_with(suffix.as_str())) {
            Some(idx) => found[idx].push(name.clone()),
            None => extra.push(name.clone()),
        }
    }

    let missing = suffixes
        .iter()
        .zip(&found)
        .filter(|(_, files)| files.is_empty())
        .map(|(suffix, _)| suffix.clone())
        .collect();

    let duplicates = suffixes
        .iter()
        .zip(found)
        .filter(|(_, files)| files.len() > 1)
        .map(|(suffix, files)| DuplicateSuffix { suffix: suffix.clone(), files })
        .collect();

    FolderAudit {
        folder: folder.to_string(),
        missing,
        duplicates,
        extra,
    }
}

fn pdf_names(dir: &Path) -> Result<Vec<String>> {
    Ok(files::loose_pdfs(dir)?.iter().map(|p| files::file_name(p)).collect())
}

/// Read-only audits of a site's tree against its workbook rows.
pub struct ComplianceVerifier<'a> {
    layout: &'a SiteLayout,
    config: &'a ArchiveConfig,
}

impl<'a> ComplianceVerifier<'a> {
    pub fn new(layout: &'a SiteLayout, config: &'a ArchiveConfig) -> Self {
        Self { layout, config }
    }

    pub fn verify(&self, records: &RecordSet) -> Result<ComplianceReport> {
        Ok(ComplianceReport {
            root_level: self.audit_root_level(records)?,
            grouped: self.audit_grouped_root()?,
            registry: self.audit_registry()?,
        })
    }

    /// Every `<ID Monumento>.pdf` must sit directly in the audit directory, and nothing else.
    pub fn audit_root_level(&self, records: &RecordSet) -> Result<RootLevelAudit> {
        let dir = self.layout.audit_dir(&self.config.audit_dir);

        if !dir.is_dir() {
            warn!("Audit directory {} does not exist", dir.display());
            return Ok(RootLevelAudit { dir, present: false, missing: vec![], extra: vec![] });
        }

        let expected: BTreeSet<String> = records.expected_pdf_names().into_iter().collect();
        let actual: BTreeSet<String> = pdf_names(&dir)?.into_iter().collect();

        let missing: Vec<String> = expected.difference(&actual).cloned().collect();
        let extra: Vec<String> = actual.difference(&expected).cloned().collect();

        if missing.is_empty() && extra.is_empty() {
            info!("All expected files are present in {}", dir.display());
        } else {
            warn!("{}: {} missing, {} extra", dir.display(), missing.len(), extra.len());
        }

        Ok(RootLevelAudit { dir, present: true, missing, extra })
    }

    pub fn audit_grouped_root(&self) -> Result<GroupedRootAudit> {
        let root = self.layout.excavation_by_id_dir();

        if !root.is_dir() {
            warn!("Grouped root {} does not exist", root.display());
            return Ok(GroupedRootAudit { root, present: false, misplaced: vec![], folders: vec![] });
        }

        let misplaced = pdf_names(&root)?;
        if !misplaced.is_empty() {
            warn!("{} files outside identifier folders in {}", misplaced.len(), root.display());
        }

        let mut folders = Vec::new();
        for dir in files::subdirectories(&root)? {
            let name = files::file_name(&dir);
            let audit = classify_by_suffix(&name, &pdf_names(&dir)?, &self.config.expected_suffixes);
            if audit.is_complete() {
                info!("Folder '{}' is complete", name);
            } else {
                warn!(
                    "Folder '{}': {} missing, {} duplicated, {} extra",
                    name,
                    audit.missing.len(),
                    audit.duplicates.len(),
                    audit.extra.len()
                );
            }
            folders.push(audit);
        }

        Ok(GroupedRootAudit { root, present: true, misplaced, folders })
    }

    pub fn audit_registry(&self) -> Result<RegistryAudit> {
        let root = self.layout.unique_records_dir();

        if !root.is_dir() {
            warn!("Registry root {} does not exist", root.display());
            return Ok(RegistryAudit { root, present: false, misplaced: vec![], folders: vec![] });
        }

        let misplaced = pdf_names(&root)?;
        if !misplaced.is_empty() {
            warn!("{} files outside subfolders in {}", misplaced.len(), root.display());
        }

        let mut folders = Vec::new();
        for dir in files::subdirectories(&root)? {
            let name = files::file_name(&dir);
            if !name.starts_with(GROUP_TOKEN_PREFIX) {
                continue;
            }
            let pdf_count = files::loose_pdfs(&dir)?.len();
            if pdf_count == 0 {
                warn!("Registry folder '{}' holds no PDF", name);
            }
            folders.push(RegistryFolder { folder: name, pdf_count });
        }

        Ok(RegistryAudit { root, present: true, misplaced, folders })
    }
}
