mod archive;
mod layout;

pub use archive::{ArchiveConfig, FolderRename};
pub use layout::{
    InterventionType, SiteLayout,
    EXCAVATION_DIR, EXCAVATION_BY_ID_DIR, UNIQUE_RECORDS_DIR, GENERAL_INTRO_DIR, GENERAL_INTRO_FILE,
};
