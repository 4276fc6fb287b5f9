use std::fs;
use std::path::{Path, PathBuf};
use lopdf::Document;
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};
use walkdir::WalkDir;
use crate::files;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum PdfCondition {
    ZeroBytes,
    NoPages,
    Unreadable { error: String },
    HasPages { pages: usize },
}

impl PdfCondition {
    pub fn is_empty(&self) -> bool {
        matches!(self, PdfCondition::ZeroBytes | PdfCondition::NoPages)
    }
}

/// Zero bytes or zero pages. A file lopdf cannot parse is unreadable, not empty.
pub fn inspect_pdf(path: &Path) -> PdfCondition {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => return PdfCondition::ZeroBytes,
        Ok(_) => {}
        Err(e) => return PdfCondition::Unreadable { error: e.to_string() },
    }

    match Document::load(path) {
        Ok(doc) => {
            let pages = doc.get_pages().len();
            if pages == 0 {
                PdfCondition::NoPages
            } else {
                PdfCondition::HasPages { pages }
            }
        }
        Err(e) => PdfCondition::Unreadable { error: e.to_string() },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlaggedPdf {
    pub path: PathBuf,
    #[serde(flatten)]
    pub condition: PdfCondition,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmptyScanReport {
    pub root: PathBuf,
    pub scanned: usize,
    pub flagged: Vec<FlaggedPdf>,
}

impl EmptyScanReport {
    pub fn empty(&self) -> Vec<&FlaggedPdf> {
        self.flagged.iter().filter(|f| f.condition.is_empty()).collect()
    }

    pub fn unreadable(&self) -> Vec<&FlaggedPdf> {
        self.flagged.iter().filter(|f| !f.condition.is_empty()).collect()
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct FlaggedPdfTableRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Condition")]
    pub condition: String,
}

impl FlaggedPdfTableRow {
    pub fn relative_to(flagged: &FlaggedPdf, base: &Path) -> Self {
        let file = flagged
            .path
            .strip_prefix(base)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| flagged.path.display().to_string());

        let condition = match &flagged.condition {
            PdfCondition::ZeroBytes => "✗ zero bytes".to_string(),
            PdfCondition::NoPages => "✗ no pages".to_string(),
            PdfCondition::Unreadable { error } => format!("⚠ unreadable: {}", error),
            PdfCondition::HasPages { pages } => format!("✓ {} pages", pages),
        };

        FlaggedPdfTableRow { file, condition }
    }
}

/// Walks a whole site tree looking for PDFs with nothing in them. Reports only.
pub struct EmptyPdfScanner;

impl EmptyPdfScanner {
    pub fn scan(root: &Path) -> EmptyScanReport {
        info!("Scanning {} for empty PDFs", root.display());

        let mut scanned = 0;
        let mut flagged = Vec::new();

        let pdfs = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && files::is_pdf(e.path()));

        for entry in pdfs {
            scanned += 1;
            let condition = inspect_pdf(entry.path());
            match &condition {
                PdfCondition::HasPages { .. } => continue,
                PdfCondition::Unreadable { error } => {
                    warn!("Could not read {}: {}", entry.path().display(), error);
                }
                _ => warn!("Empty PDF: {}", entry.path().display()),
            }
            flagged.push(FlaggedPdf { path: entry.into_path(), condition });
        }

        info!("Scanned {} PDFs, {} flagged", scanned, flagged.len());

        EmptyScanReport {
            root: root.to_path_buf(),
            scanned,
            flagged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Dictionary, Object};
    use tempfile::TempDir;

    fn write_pdf(path: &Path, num_pages: usize) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let page_ids: Vec<_> = (0..num_pages)
            .map(|_| {
                let page = Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Page".to_vec())),
                    ("Parent", Object::Reference(pages_id)),
                    (
                        "MediaBox",
                        Object::Array(vec![
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Integer(612),
                            Object::Integer(792),
                        ]),
                    ),
                ]);
                doc.add_object(page)
            })
            .collect();

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect())),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        doc.save(path).unwrap();
    }

    #[test]
    fn test_zero_byte_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vacio.pdf");
        fs::write(&path, b"").unwrap();
        assert_eq!(inspect_pdf(&path), PdfCondition::ZeroBytes);
    }

    #[test]
    fn test_page_count() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("informe.pdf");
        write_pdf(&path, 2);
        assert_eq!(inspect_pdf(&path), PdfCondition::HasPages { pages: 2 });
    }

    #[test]
    fn test_zero_pages_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sin_paginas.pdf");
        write_pdf(&path, 0);
        assert_eq!(inspect_pdf(&path), PdfCondition::NoPages);
    }

    #[test]
    fn test_garbage_is_unreadable_not_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("roto.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();
        let condition = inspect_pdf(&path);
        assert!(matches!(condition, PdfCondition::Unreadable { .. }));
        assert!(!condition.is_empty());
    }

    #[test]
    fn test_scan_walks_subfolders() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("Excavación por ID Monumento").join("T01_001");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("T01_001_Introducción.pdf"), b"").unwrap();
        write_pdf(&nested.join("T01_001_Registro de capas.pdf"), 1);
        fs::write(tmp.path().join("notas.txt"), b"").unwrap();

        let report = EmptyPdfScanner::scan(tmp.path());
        assert_eq!(report.scanned, 2);
        assert_eq!(report.empty().len(), 1);
        assert!(report.unreadable().is_empty());
        assert!(report.empty()[0].path.ends_with("T01_001_Introducción.pdf"));
    }
}
