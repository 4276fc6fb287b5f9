use serde::{Deserialize, Serialize};

/// One workbook row. Absent cells are empty strings, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub base_id: String,
    pub superior_ids: String,
    pub associated_ids: String,
    pub intervention_type: String,
    pub site_name: String,
}

impl SiteRecord {
    pub fn new(base_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            ..Default::default()
        }
    }

    pub fn with_superior(mut self, superior_ids: impl Into<String>) -> Self {
        self.superior_ids = superior_ids.into();
        self
    }

    pub fn with_associated(mut self, associated_ids: impl Into<String>) -> Self {
        self.associated_ids = associated_ids.into();
        self
    }

    pub fn with_intervention(mut self, intervention_type: impl Into<String>) -> Self {
        self.intervention_type = intervention_type.into();
        self
    }

    pub fn with_site(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }
}

/// Workbook rows in their original order. Order matters: indexing is first-row-wins.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<SiteRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<SiteRecord>) -> Self {
        Self { records }
    }

    /// Rows whose `Nombre Sitio` equals `site_name` exactly, order preserved.
    pub fn for_site(&self, site_name: &str) -> RecordSet {
        RecordSet {
            records: self
                .records
                .iter()
                .filter(|r| r.site_name == site_name)
                .cloned()
                .collect(),
        }
    }

    /// Expected top-level document names: one `<ID Monumento>.pdf` per non-empty id.
    pub fn expected_pdf_names(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.base_id.is_empty())
            .map(|r| format!("{}.pdf", r.base_id))
            .collect()
    }

    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<SiteRecord>> for RecordSet {
    fn from(records: Vec<SiteRecord>) -> Self {
        Self::new(records)
    }
}
