mod action;
mod rename;
mod relocate;
mod intro;

pub use action::{ActionStatus, FileAction, PassReport, ActionTableRow};
pub use rename::{FolderRenamer, PdfSuffixRenamer, suffixed_name};
pub use relocate::Relocator;
pub use intro::IntroductionFiler;
