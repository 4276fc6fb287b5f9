mod empty;

pub use empty::{EmptyPdfScanner, EmptyScanReport, FlaggedPdf, FlaggedPdfTableRow, PdfCondition, inspect_pdf};
