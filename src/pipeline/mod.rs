use std::path::PathBuf;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use crate::audit::{ComplianceReport, ComplianceVerifier};
use crate::config::{ArchiveConfig, SiteLayout};
use crate::error::{Result, SiteArchiveError};
use crate::index::{IndexReport, RecordIndexer};
use crate::prepare::{FolderRenamer, IntroductionFiler, PassReport, PdfSuffixRenamer, Relocator};
use crate::records::{RecordLoader, RecordSet};
use crate::routing::{DocumentRouter, RoutingReport};
use crate::scan::{EmptyPdfScanner, EmptyScanReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    RenameFolders,
    RenamePdfs,
    Relocate,
    Index,
    Route,
    Verify,
    FileIntro,
    ScanEmpty,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::RenameFolders,
        Step::RenamePdfs,
        Step::Relocate,
        Step::Index,
        Step::Route,
        Step::Verify,
        Step::FileIntro,
        Step::ScanEmpty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::RenameFolders => "rename-folders",
            Step::RenamePdfs => "rename-pdfs",
            Step::Relocate => "relocate",
            Step::Index => "index",
            Step::Route => "route",
            Step::Verify => "verify",
            Step::FileIntro => "file-intro",
            Step::ScanEmpty => "scan-empty",
        }
    }
}

/// Where the site's rows come from.
#[derive(Debug, Clone)]
pub enum RecordSource {
    Workbook(PathBuf),
    Records(RecordSet),
}

#[derive(Debug, Default, Serialize)]
pub struct PipelineReport {
    pub site_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<Step>,
    pub folder_renames: Option<PassReport>,
    pub pdf_renames: Option<PassReport>,
    pub relocation: Option<PassReport>,
    pub index: Option<IndexReport>,
    pub routing: Vec<RoutingReport>,
    pub compliance: Option<ComplianceReport>,
    pub introduction: Option<PassReport>,
    pub empty_scan: Option<EmptyScanReport>,
}

impl PipelineReport {
    pub fn warning_count(&self) -> usize {
        let passes = [&self.folder_renames, &self.pdf_renames, &self.relocation, &self.introduction]
            .into_iter()
            .flatten()
            .map(|p| p.warning_count())
            .sum::<usize>();

        passes
            + self.index.as_ref().map_or(0, |r| r.warnings().len())
            + self.routing.iter().map(|r| r.warning_count()).sum::<usize>()
            + self.compliance.as_ref().map_or(0, |r| r.issues().len())
            + self.empty_scan.as_ref().map_or(0, |r| r.flagged.len())
    }

    pub fn duration_secs(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }
}

pub struct Pipeline {
    layout: SiteLayout,
    config: ArchiveConfig,
    source: Option<RecordSource>,
    router: DocumentRouter,
}

impl Pipeline {
    pub fn new(layout: SiteLayout, config: ArchiveConfig) -> Self {
        Self {
            layout,
            config,
            source: None,
            router: DocumentRouter::new(),
        }
    }

    pub fn with_workbook(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(RecordSource::Workbook(path.into()));
        self
    }

    pub fn with_records(mut self, records: RecordSet) -> Self {
        self.source = Some(RecordSource::Records(records));
        self
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Rows for this site only, in workbook order.
    pub fn load_records(&self) -> Result<RecordSet> {
        let all = match &self.source {
            Some(RecordSource::Workbook(path)) => RecordLoader::load_workbook(path)?,
            Some(RecordSource::Records(records)) => records.clone(),
            None => return Err(SiteArchiveError::Config("workbook not set".to_string())),
        };

        let records = all.for_site(self.layout.site_name());
        if records.is_empty() {
            warn!("No rows for site '{}'", self.layout.site_name());
        } else {
            info!("{} rows for site '{}'", records.len(), self.layout.site_name());
        }
        Ok(records)
    }

    pub fn rename_folders(&self) -> Result<PassReport> {
        FolderRenamer::new(&self.config).run(self.layout.root())
    }

    pub fn rename_pdfs(&self) -> Result<PassReport> {
        PdfSuffixRenamer::run(&self.layout)
    }

    pub fn relocate(&self) -> Result<PassReport> {
        Relocator::run(&self.layout)
    }

    pub fn index(&self, records: &RecordSet) -> Result<IndexReport> {
        RecordIndexer::new(&self.layout).index(records)
    }

    /// Routes both routing roots. A root that does not exist is skipped.
    pub fn route(&self) -> Result<Vec<RoutingReport>> {
        let mut reports = Vec::new();
        for root in self.layout.routing_roots() {
            if !root.is_dir() {
                warn!("Routing root {} does not exist, skipping", root.display());
                continue;
            }
            reports.push(self.router.route(&root)?);
        }
        Ok(reports)
    }

    pub fn verify(&self, records: &RecordSet) -> Result<ComplianceReport> {
        ComplianceVerifier::new(&self.layout, &self.config).verify(records)
    }

    pub fn file_intro(&self) -> Result<PassReport> {
        IntroductionFiler::run(&self.layout)
    }

    pub fn scan_empty(&self) -> EmptyScanReport {
        EmptyPdfScanner::scan(self.layout.root())
    }

    pub fn run_all(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport {
            site_name: self.layout.site_name().to_string(),
            started_at: Some(Utc::now()),
            ..Default::default()
        };
        // Workbook problems surface before any step renames or moves a file.
        let records = self.load_records()?;

        for step in Step::ALL {
            info!("── {} ──", step.as_str());

            match step {
                Step::RenameFolders => report.folder_renames = Some(self.rename_folders()?),
                Step::RenamePdfs => report.pdf_renames = Some(self.rename_pdfs()?),
                Step::Relocate => report.relocation = Some(self.relocate()?),
                Step::Index => report.index = Some(self.index(&records)?),
                Step::Route => report.routing = self.route()?,
                Step::Verify => report.compliance = Some(self.verify(&records)?),
                Step::FileIntro => report.introduction = Some(self.file_intro()?),
                Step::ScanEmpty => report.empty_scan = Some(self.scan_empty()),
            }

            report.steps.push(step);
        }

        report.finished_at = Some(Utc::now());
        info!(
            "Finished {} steps for '{}' with {} warnings",
            report.steps.len(),
            report.site_name,
            report.warning_count()
        );

        Ok(report)
    }
}
