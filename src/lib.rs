pub mod error;
pub mod config;
pub mod files;
pub mod records;
pub mod index;
pub mod routing;
pub mod audit;
pub mod prepare;
pub mod scan;
pub mod pipeline;

pub use error::{SiteArchiveError, Result};
pub use config::{ArchiveConfig, FolderRename, InterventionType, SiteLayout};
pub use records::{RecordLoader, RecordSet, SiteRecord};
pub use index::{IdentifierGroup, IndexPlan, IndexReport, IndexRun, RecordIndexer, SkipReason, excludes_base};
pub use routing::{DocumentRouter, IdentifierExtractor, ReverseIndex, RoutingReport, SourceOutcome, DeliveryStatus};
pub use audit::{ComplianceVerifier, ComplianceReport, ComplianceIssue, IssueKind, classify_by_suffix};
pub use prepare::{FolderRenamer, PdfSuffixRenamer, Relocator, IntroductionFiler, PassReport, ActionStatus};
pub use scan::{EmptyPdfScanner, EmptyScanReport, PdfCondition};
pub use pipeline::{Pipeline, PipelineReport, RecordSource, Step};
