mod group;
mod indexer;

pub use group::{IdentifierGroup, excludes_base, related_ids, FOLDER_NAME_SEPARATOR, GROUP_TOKEN_PREFIX};
pub use indexer::{
    RecordIndexer, IndexRun, IndexPlan, PlannedFolder, SkipReason, SkippedRecord,
    IndexReport, FolderEntry, FolderStatus, FolderTableRow, SkippedTableRow,
};
