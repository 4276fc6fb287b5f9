use std::path::Path;
use calamine::{open_workbook_auto, Reader};
use crate::error::{SiteArchiveError, Result};
use super::record::{RecordSet, SiteRecord};

pub const COL_SITE_NAME: &str = "Nombre Sitio";
pub const COL_BASE_ID: &str = "ID Monumento";
pub const COL_SUPERIOR_IDS: &str = "Monumentos superiores";
pub const COL_ASSOCIATED_IDS: &str = "Monumentos Asociados por cercanía";
pub const COL_INTERVENTION_TYPE: &str = "Tipo de intervención";

struct ColumnIndex {
    site_name: usize,
    base_id: usize,
    superior_ids: Option<usize>,
    associated_ids: Option<usize>,
    intervention_type: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| SiteArchiveError::MissingColumn(name.to_string()));

        Ok(Self {
            site_name: require(COL_SITE_NAME)?,
            base_id: require(COL_BASE_ID)?,
            superior_ids: find(COL_SUPERIOR_IDS),
            associated_ids: find(COL_ASSOCIATED_IDS),
            intervention_type: find(COL_INTERVENTION_TYPE),
        })
    }

    fn record(&self, row: &[String]) -> SiteRecord {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
        };

        SiteRecord {
            base_id: cell(Some(self.base_id)),
            superior_ids: cell(self.superior_ids),
            associated_ids: cell(self.associated_ids),
            intervention_type: cell(self.intervention_type),
            site_name: cell(Some(self.site_name)),
        }
    }
}

/// Reads site records from the first worksheet of a workbook, every cell as text.
pub struct RecordLoader;

impl RecordLoader {
    pub fn load_workbook(path: impl AsRef<Path>) -> Result<RecordSet> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SiteArchiveError::Config(format!("workbook {} not found", path.display())));
        }

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| SiteArchiveError::Workbook(format!("failed to open {}: {}", path.display(), e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SiteArchiveError::Workbook(format!("{} has no worksheets", path.display())))?
            .map_err(|e| SiteArchiveError::Workbook(e.to_string()))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

        let records = Self::from_rows(rows)?;
        tracing::debug!("Loaded {} rows from {}", records.len(), path.display());
        Ok(records)
    }

    /// First row is the header. Blank rows are dropped; short rows pad with empty cells.
    pub fn from_rows<I>(rows: I) -> Result<RecordSet>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut rows = rows.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| SiteArchiveError::Workbook("worksheet is empty".into()))?;
        let columns = ColumnIndex::from_header(&header)?;

        let records = rows
            .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
            .map(|row| columns.record(&row))
            .collect::<Vec<_>>();

        Ok(RecordSet::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&[
            COL_SITE_NAME,
            COL_BASE_ID,
            COL_SUPERIOR_IDS,
            COL_ASSOCIATED_IDS,
            COL_INTERVENTION_TYPE,
        ])
    }

    #[test]
    fn test_from_rows_maps_columns() {
        let rows = vec![
            header(),
            row(&["Chaktemal", "T01_002", "A5", "T01_001", "Excavación"]),
        ];
        let records = RecordLoader::from_rows(rows).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records.records()[0];
        assert_eq!(r.site_name, "Chaktemal");
        assert_eq!(r.base_id, "T01_002");
        assert_eq!(r.superior_ids, "A5");
        assert_eq!(r.associated_ids, "T01_001");
        assert_eq!(r.intervention_type, "Excavación");
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let rows = vec![
            row(&[COL_INTERVENTION_TYPE, COL_BASE_ID, COL_SITE_NAME]),
            row(&["Registro único", "T02_010", "Chaktemal"]),
        ];
        let records = RecordLoader::from_rows(rows).unwrap();
        let r = &records.records()[0];
        assert_eq!(r.base_id, "T02_010");
        assert_eq!(r.intervention_type, "Registro único");
        assert_eq!(r.superior_ids, "");
        assert_eq!(r.associated_ids, "");
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let rows = vec![header(), row(&["Chaktemal", "T01_001"])];
        let records = RecordLoader::from_rows(rows).unwrap();
        assert_eq!(records.records()[0].intervention_type, "");
    }

    #[test]
    fn test_blank_rows_dropped() {
        let rows = vec![header(), row(&["", "", "", "", ""]), row(&["Chaktemal", "T01_001"])];
        assert_eq!(RecordLoader::from_rows(rows).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_required_column() {
        let rows = vec![row(&[COL_SITE_NAME, COL_SUPERIOR_IDS])];
        let err = RecordLoader::from_rows(rows).unwrap_err();
        assert!(matches!(err, SiteArchiveError::MissingColumn(ref c) if c == COL_BASE_ID));
    }

    #[test]
    fn test_empty_sheet() {
        let err = RecordLoader::from_rows(Vec::<Vec<String>>::new()).unwrap_err();
        assert!(matches!(err, SiteArchiveError::Workbook(_)));
    }

    #[test]
    fn test_missing_workbook_is_config_error() {
        let err = RecordLoader::load_workbook("/nonexistent/base.xlsx").unwrap_err();
        assert!(matches!(err, SiteArchiveError::Config(_)));
    }
}
