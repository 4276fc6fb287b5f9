mod record;
mod loader;

pub use record::{SiteRecord, RecordSet};
pub use loader::{
    RecordLoader,
    COL_SITE_NAME, COL_BASE_ID, COL_SUPERIOR_IDS, COL_ASSOCIATED_IDS, COL_INTERVENTION_TYPE,
};
