use std::path::PathBuf;
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Clone, Serialize)]
pub struct RootLevelAudit {
    pub dir: PathBuf,
    pub present: bool,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

impl RootLevelAudit {
    pub fn is_clean(&self) -> bool {
        self.present && self.missing.is_empty() && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSuffix {
    pub suffix: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderAudit {
    pub folder: String,
    pub missing: Vec<String>,
    pub duplicates: Vec<DuplicateSuffix>,
    pub extra: Vec<String>,
}

impl FolderAudit {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty() && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupedRootAudit {
    pub root: PathBuf,
    pub present: bool,
    pub misplaced: Vec<String>,
    pub folders: Vec<FolderAudit>,
}

impl GroupedRootAudit {
    pub fn is_clean(&self) -> bool {
        self.present && self.misplaced.is_empty() && self.folders.iter().all(|f| f.is_complete())
    }

    pub fn incomplete_folders(&self) -> Vec<&FolderAudit> {
        self.folders.iter().filter(|f| !f.is_complete()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryFolder {
    pub folder: String,
    pub pdf_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryAudit {
    pub root: PathBuf,
    pub present: bool,
    pub misplaced: Vec<String>,
    pub folders: Vec<RegistryFolder>,
}

impl RegistryAudit {
    pub fn empty_folders(&self) -> Vec<&RegistryFolder> {
        self.folders.iter().filter(|f| f.pdf_count == 0).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.present && self.misplaced.is_empty() && self.empty_folders().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingDirectory,
    Missing,
    Extra,
    Duplicate,
    Misplaced,
    EmptyFolder,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingDirectory => "missing_directory",
            IssueKind::Missing => "missing",
            IssueKind::Extra => "extra",
            IssueKind::Duplicate => "duplicate",
            IssueKind::Misplaced => "misplaced",
            IssueKind::EmptyFolder => "empty_folder",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            IssueKind::MissingDirectory | IssueKind::Missing | IssueKind::EmptyFolder => "✗",
            IssueKind::Duplicate => "⚠",
            IssueKind::Extra | IssueKind::Misplaced => "🚨",
        }
    }
}

/// One flattened finding, for tabular output.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceIssue {
    pub scope: String,
    pub kind: IssueKind,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub root_level: RootLevelAudit,
    pub grouped: GroupedRootAudit,
    pub registry: RegistryAudit,
}

impl ComplianceReport {
    pub fn is_clean(&self) -> bool {
        self.root_level.is_clean() && self.grouped.is_clean() && self.registry.is_clean()
    }

    pub fn issues(&self) -> Vec<ComplianceIssue> {
        let mut issues = Vec::new();
        let mut push = |scope: &str, kind: IssueKind, detail: String| {
            issues.push(ComplianceIssue { scope: scope.to_string(), kind, detail });
        };

        let root_scope = dir_label(&self.root_level.dir);
        if !self.root_level.present {
            push(&root_scope, IssueKind::MissingDirectory, self.root_level.dir.display().to_string());
        }
        for name in &self.root_level.missing {
            push(&root_scope, IssueKind::Missing, name.clone());
        }
        for name in &self.root_level.extra {
            push(&root_scope, IssueKind::Extra, name.clone());
        }

        let grouped_scope = dir_label(&self.grouped.root);
        if !self.grouped.present {
            push(&grouped_scope, IssueKind::MissingDirectory, self.grouped.root.display().to_string());
        }
        for name in &self.grouped.misplaced {
            push(&grouped_scope, IssueKind::Misplaced, name.clone());
        }
        for folder in &self.grouped.folders {
            let scope = format!("{}/{}", grouped_scope, folder.folder);
            for suffix in &folder.missing {
                push(&scope, IssueKind::Missing, suffix.clone());
            }
            for dup in &folder.duplicates {
                push(&scope, IssueKind::Duplicate, format!("{}: {}", dup.suffix, dup.files.join(", ")));
            }
            for name in &folder.extra {
                push(&scope, IssueKind::Extra, name.clone());
            }
        }

        let registry_scope = dir_label(&self.registry.root);
        if !self.registry.present {
            push(&registry_scope, IssueKind::MissingDirectory, self.registry.root.display().to_string());
        }
        for name in &self.registry.misplaced {
            push(&registry_scope, IssueKind::Misplaced, name.clone());
        }
        for folder in self.registry.empty_folders() {
            push(&registry_scope, IssueKind::EmptyFolder, folder.folder.clone());
        }

        issues
    }
}

fn dir_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, Tabled)]
pub struct ComplianceTableRow {
    #[tabled(rename = "Scope")]
    pub scope: String,
    #[tabled(rename = "Issue")]
    pub issue: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl From<&ComplianceIssue> for ComplianceTableRow {
    fn from(issue: &ComplianceIssue) -> Self {
        ComplianceTableRow {
            scope: issue.scope.clone(),
            issue: format!("{} {}", issue.kind.symbol(), issue.kind.as_str()),
            detail: issue.detail.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_report() -> ComplianceReport {
        ComplianceReport {
            root_level: RootLevelAudit {
                dir: PathBuf::from("/s/Prospección"),
                present: true,
                missing: vec![],
                extra: vec![],
            },
            grouped: GroupedRootAudit {
                root: PathBuf::from("/s/Excavación por ID Monumento"),
                present: true,
                misplaced: vec![],
                folders: vec![],
            },
            registry: RegistryAudit {
                root: PathBuf::from("/s/Registros únicos"),
                present: true,
                misplaced: vec![],
                folders: vec![RegistryFolder { folder: "T02_001".into(), pdf_count: 2 }],
            },
        }
    }

    #[test]
    fn test_clean_report_has_no_issues() {
        let report = clean_report();
        assert!(report.is_clean());
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_issues_are_scoped() {
        let mut report = clean_report();
        report.root_level.missing.push("T01_001.pdf".into());
        report.grouped.folders.push(FolderAudit {
            folder: "T01_001".into(),
            missing: vec!["Introducción.pdf".into()],
            duplicates: vec![DuplicateSuffix {
                suffix: "Registro de capas.pdf".into(),
                files: vec!["a_Registro de capas.pdf".into(), "b_Registro de capas.pdf".into()],
            }],
            extra: vec![],
        });
        report.registry.folders.push(RegistryFolder { folder: "T02_002".into(), pdf_count: 0 });

        let issues = report.issues();
        assert!(!report.is_clean());
        assert_eq!(issues.len(), 4);
        assert_eq!(issues[0].scope, "Prospección");
        assert_eq!(issues[1].scope, "Excavación por ID Monumento/T01_001");
        assert_eq!(issues[2].kind, IssueKind::Duplicate);
        assert_eq!(issues[2].detail, "Registro de capas.pdf: a_Registro de capas.pdf, b_Registro de capas.pdf");
        assert_eq!(issues[3].kind, IssueKind::EmptyFolder);
        assert_eq!(issues[3].detail, "T02_002");
    }

    #[test]
    fn test_missing_directory_is_issue() {
        let mut report = clean_report();
        report.registry.present = false;
        report.registry.folders.clear();
        let issues = report.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingDirectory);
    }
}
