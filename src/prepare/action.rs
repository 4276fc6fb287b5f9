use std::path::{Path, PathBuf};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Applied,
    TargetExists,
    AlreadyApplied,
    SourceMissing,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Applied => "applied",
            ActionStatus::TargetExists => "target_exists",
            ActionStatus::AlreadyApplied => "already_applied",
            ActionStatus::SourceMissing => "source_missing",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ActionStatus::Applied => "✓",
            ActionStatus::AlreadyApplied => "○",
            ActionStatus::TargetExists => "⚠",
            ActionStatus::SourceMissing => "✗",
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ActionStatus::TargetExists | ActionStatus::SourceMissing)
    }
}

/// One rename or move attempted by a preparation pass.
#[derive(Debug, Clone, Serialize)]
pub struct FileAction {
    pub from: PathBuf,
    pub to: PathBuf,
    pub status: ActionStatus,
}

impl FileAction {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>, status: ActionStatus) -> Self {
        Self { from: from.into(), to: to.into(), status }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub pass: &'static str,
    pub actions: Vec<FileAction>,
    pub missing_roots: Vec<PathBuf>,
}

impl PassReport {
    pub fn new(pass: &'static str) -> Self {
        Self { pass, actions: Vec::new(), missing_roots: Vec::new() }
    }

    pub fn push(&mut self, action: FileAction) {
        self.actions.push(action);
    }

    pub fn missing_root(&mut self, root: &Path) {
        tracing::warn!("{}: {} does not exist", self.pass, root.display());
        self.missing_roots.push(root.to_path_buf());
    }

    pub fn count(&self, status: ActionStatus) -> usize {
        self.actions.iter().filter(|a| a.status == status).count()
    }

    pub fn applied_count(&self) -> usize {
        self.count(ActionStatus::Applied)
    }

    pub fn warning_count(&self) -> usize {
        self.actions.iter().filter(|a| a.status.is_warning()).count() + self.missing_roots.len()
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct ActionTableRow {
    #[tabled(rename = "From")]
    pub from: String,
    #[tabled(rename = "To")]
    pub to: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl ActionTableRow {
    pub fn relative_to(action: &FileAction, base: &Path) -> Self {
        let show = |p: &Path| {
            p.strip_prefix(base)
                .map(|r| r.display().to_string())
                .unwrap_or_else(|_| p.display().to_string())
        };

        ActionTableRow {
            from: show(&action.from),
            to: show(&action.to),
            status: format!("{} {}", action.status.symbol(), action.status.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = PassReport::new("relocate");
        report.push(FileAction::new("a", "b", ActionStatus::Applied));
        report.push(FileAction::new("c", "d", ActionStatus::TargetExists));
        report.missing_root(Path::new("/missing"));

        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn test_table_row_is_relative() {
        let action = FileAction::new("/site/Excavación/a.pdf", "/site/Excavación por ID Monumento/a.pdf", ActionStatus::Applied);
        let row = ActionTableRow::relative_to(&action, Path::new("/site"));
        assert_eq!(row.from, "Excavación/a.pdf");
        assert_eq!(row.to, "Excavación por ID Monumento/a.pdf");
        assert_eq!(row.status, "✓ applied");
    }
}
