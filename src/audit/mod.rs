mod report;
mod verifier;

pub use report::{
    ComplianceReport, ComplianceIssue, ComplianceTableRow, IssueKind, RootLevelAudit, GroupedRootAudit,
    FolderAudit, DuplicateSuffix, RegistryAudit, RegistryFolder,
};
pub use verifier::{ComplianceVerifier, classify_by_suffix};
