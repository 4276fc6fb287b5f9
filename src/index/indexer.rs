use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, info, warn};
use crate::config::{InterventionType, SiteLayout};
use crate::error::Result;
use crate::records::{RecordSet, SiteRecord};
use super::group::IdentifierGroup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NoIdentifiers,
    AlreadyHandled { overlap: Vec<String> },
    DuplicateCombo,
    UnknownInterventionType { label: String },
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoIdentifiers => "no_identifiers",
            SkipReason::AlreadyHandled { .. } => "already_handled",
            SkipReason::DuplicateCombo => "duplicate_combo",
            SkipReason::UnknownInterventionType { .. } => "unknown_intervention_type",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SkipReason::NoIdentifiers => "no identifiers to group".to_string(),
            SkipReason::AlreadyHandled { overlap } => format!("already grouped: {}", overlap.join(", ")),
            SkipReason::DuplicateCombo => "identical group already planned".to_string(),
            SkipReason::UnknownInterventionType { label } => format!("unknown intervention type '{}'", label),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub base_id: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedFolder {
    pub base_id: String,
    pub group: IdentifierGroup,
    pub intervention: InterventionType,
}

impl PlannedFolder {
    pub fn folder_name(&self) -> String {
        self.group.folder_name()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexPlan {
    pub folders: Vec<PlannedFolder>,
    pub skipped: Vec<SkippedRecord>,
}

/// Accumulator for one indexing pass.
///
/// Records must be fed in workbook order: the first row to claim an identifier
/// owns it, and any later row touching a claimed identifier is dropped whole.
#[derive(Debug, Default)]
pub struct IndexRun {
    handled: HashSet<String>,
    created_combos: HashSet<Vec<String>>,
    plan: IndexPlan,
}

impl IndexRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, record: &SiteRecord) {
        let base_id = record.base_id.trim().to_string();

        let group = match IdentifierGroup::from_record(record) {
            Some(group) => group,
            None => return self.skip(base_id, SkipReason::NoIdentifiers),
        };

        let overlap: Vec<String> = group
            .ids()
            .filter(|id| self.handled.contains(*id))
            .map(String::from)
            .collect();
        if !overlap.is_empty() {
            return self.skip(base_id, SkipReason::AlreadyHandled { overlap });
        }

        self.handled.extend(group.ids().map(String::from));

        // Guard only: a repeated combo always overlaps `handled` above and is skipped there.
        if !self.created_combos.insert(group.combo_key()) {
            return self.skip(base_id, SkipReason::DuplicateCombo);
        }

        let label = record.intervention_type.trim();
        let intervention = match InterventionType::from_label(label) {
            Some(intervention) => intervention,
            None => {
                warn!("Unknown intervention type '{}' for ID {}, skipping", label, base_id);
                return self.skip(base_id, SkipReason::UnknownInterventionType { label: label.to_string() });
            }
        };

        self.plan.folders.push(PlannedFolder { base_id, group, intervention });
    }

    pub fn is_handled(&self, id: &str) -> bool {
        self.handled.contains(id)
    }

    pub fn finish(self) -> IndexPlan {
        self.plan
    }

    fn skip(&mut self, base_id: String, reason: SkipReason) {
        debug!("Skipping record {}: {}", base_id, reason.describe());
        self.plan.skipped.push(SkippedRecord { base_id, reason });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderStatus {
    Created,
    Existing,
}

impl FolderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderStatus::Created => "created",
            FolderStatus::Existing => "existing",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FolderStatus::Created => "✓",
            FolderStatus::Existing => "○",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderEntry {
    pub folder_name: String,
    pub identifiers: Vec<String>,
    pub intervention: InterventionType,
    pub path: PathBuf,
    pub status: FolderStatus,
}

#[derive(Debug, Default, Serialize)]
pub struct IndexReport {
    pub folders: Vec<FolderEntry>,
    pub skipped: Vec<SkippedRecord>,
}

impl IndexReport {
    pub fn created_count(&self) -> usize {
        self.folders.iter().filter(|f| f.status == FolderStatus::Created).count()
    }

    pub fn existing_count(&self) -> usize {
        self.folders.iter().filter(|f| f.status == FolderStatus::Existing).count()
    }

    pub fn warnings(&self) -> Vec<&SkippedRecord> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::UnknownInterventionType { .. }))
            .collect()
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct FolderTableRow {
    #[tabled(rename = "Folder")]
    pub folder: String,
    #[tabled(rename = "Root")]
    pub root: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&FolderEntry> for FolderTableRow {
    fn from(entry: &FolderEntry) -> Self {
        FolderTableRow {
            folder: entry.folder_name.clone(),
            root: entry.intervention.root_dir_name().to_string(),
            status: format!("{} {}", entry.status.symbol(), entry.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct SkippedTableRow {
    #[tabled(rename = "ID Monumento")]
    pub base_id: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl From<&SkippedRecord> for SkippedTableRow {
    fn from(skipped: &SkippedRecord) -> Self {
        SkippedTableRow {
            base_id: if skipped.base_id.is_empty() { "-".to_string() } else { skipped.base_id.clone() },
            reason: skipped.reason.describe(),
        }
    }
}

/// Derives identifier groups from a site's rows and creates one folder per group.
pub struct RecordIndexer<'a> {
    layout: &'a SiteLayout,
}

impl<'a> RecordIndexer<'a> {
    pub fn new(layout: &'a SiteLayout) -> Self {
        Self { layout }
    }

    /// Pure derivation; touches nothing on disk.
    pub fn plan(records: &RecordSet) -> IndexPlan {
        records
            .iter()
            .fold(IndexRun::new(), |mut run, record| {
                run.absorb(record);
                run
            })
            .finish()
    }

    pub fn index(&self, records: &RecordSet) -> Result<IndexReport> {
        let plan = Self::plan(records);
        self.materialize(plan)
    }

    pub fn materialize(&self, plan: IndexPlan) -> Result<IndexReport> {
        let mut report = IndexReport {
            folders: Vec::with_capacity(plan.folders.len()),
            skipped: plan.skipped,
        };

        for planned in plan.folders {
            let folder_name = planned.folder_name();
            let path = self.layout.group_root(planned.intervention).join(&folder_name);

            let status = if path.is_dir() {
                debug!("Folder already present: {}", path.display());
                FolderStatus::Existing
            } else {
                fs::create_dir_all(&path)?;
                info!("Created folder: {}", path.display());
                FolderStatus::Created
            };

            report.folders.push(FolderEntry {
                folder_name,
                identifiers: planned.group.combo_key(),
                intervention: planned.intervention,
                path,
                status,
            });
        }

        Ok(report)
    }
}
