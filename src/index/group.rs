use std::collections::BTreeSet;
use serde::Serialize;
use crate::records::SiteRecord;

pub const FOLDER_NAME_SEPARATOR: &str = ", ";

/// Marker carried by the related-id columns that drops the row's own id from its group.
const EXCLUDE_BASE_PREFIX: char = 'A';

/// Prefix of identifiers that are pulled from the related-id columns.
pub const GROUP_TOKEN_PREFIX: char = 'T';

/// Whether either related column starts with the exclusion marker.
///
/// Kept as a literal predicate over the trimmed cells; the related columns are
/// treated as single tokens and never split.
pub fn excludes_base(record: &SiteRecord) -> bool {
    record.superior_ids.trim().starts_with(EXCLUDE_BASE_PREFIX)
        || record.associated_ids.trim().starts_with(EXCLUDE_BASE_PREFIX)
}

/// Related ids worth grouping with: each column contributes at most one token.
pub fn related_ids(record: &SiteRecord) -> Vec<String> {
    [&record.superior_ids, &record.associated_ids]
        .into_iter()
        .map(|value| value.trim())
        .filter(|value| value.starts_with(GROUP_TOKEN_PREFIX))
        .map(String::from)
        .collect()
}

/// Identifiers that must share one destination folder. Iteration is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IdentifierGroup {
    ids: BTreeSet<String>,
}

impl IdentifierGroup {
    /// `None` when the row contributes nothing: base excluded and no related ids,
    /// or only an empty base id.
    pub fn from_record(record: &SiteRecord) -> Option<Self> {
        let include_base = !excludes_base(record);
        let others = related_ids(record);

        if !include_base && others.is_empty() {
            return None;
        }

        let mut ids: BTreeSet<String> = others.into_iter().collect();
        let base = record.base_id.trim();
        if include_base && !base.is_empty() {
            ids.insert(base.to_string());
        }

        if ids.is_empty() {
            None
        } else {
            Some(Self { ids })
        }
    }

    pub fn from_ids(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|s| s.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn combo_key(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn folder_name(&self) -> String {
        self.combo_key().join(FOLDER_NAME_SEPARATOR)
    }
}
