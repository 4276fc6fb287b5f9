use sitearchive::config::{EXCAVATION_BY_ID_DIR, UNIQUE_RECORDS_DIR};
use sitearchive::index::{FolderStatus, SkipReason};
use sitearchive::{RecordIndexer, RecordSet, SiteLayout, SiteRecord};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn site_root(tmp: &TempDir) -> SiteLayout {
    let root = tmp.path().join("Sitio Norte");
    fs::create_dir_all(&root).unwrap();
    SiteLayout::new(root).unwrap()
}

fn excavation(id: &str) -> SiteRecord {
    SiteRecord::new(id).with_intervention("Excavación").with_site("Sitio Norte")
}

fn folder_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn mixed_records() -> RecordSet {
    RecordSet::new(vec![
        excavation("T01_001"),
        excavation("T01_002").with_superior("A5").with_associated("T01_001"),
        excavation("T01_003").with_associated("T01_004"),
        excavation("T01_004").with_superior("T01_003"),
        excavation("T01_005").with_superior("T01_006"),
        excavation("T01_006"),
        SiteRecord::new("T02_001").with_intervention("Registro único"),
        SiteRecord::new("T02_002").with_intervention(" Registro único "),
        SiteRecord::new("T03_001").with_intervention("Prospección"),
        excavation("T04_001").with_associated("A1"),
        excavation(""),
    ])
}

#[test]
fn test_single_record_creates_folder() {
    let tmp = TempDir::new().unwrap();
    let layout = site_root(&tmp);

    let report = RecordIndexer::new(&layout)
        .index(&RecordSet::new(vec![excavation("T01_001")]))
        .unwrap();

    assert_eq!(report.created_count(), 1);
    assert!(layout.root().join(EXCAVATION_BY_ID_DIR).join("T01_001").is_dir());
}

#[test]
fn test_excluded_base_overlapping_earlier_row_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let layout = site_root(&tmp);

    let records = RecordSet::new(vec![
        excavation("T01_001"),
        excavation("T01_002").with_superior("A5").with_associated("T01_001"),
    ]);
    let report = RecordIndexer::new(&layout).index(&records).unwrap();

    assert_eq!(report.folders.len(), 1);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::AlreadyHandled { overlap: vec!["T01_001".to_string()] }
    );
    assert_eq!(folder_names(&layout.excavation_by_id_dir()), vec!["T01_001"]);
}

#[test]
fn test_unique_records_go_to_registry_root() {
    let tmp = TempDir::new().unwrap();
    let layout = site_root(&tmp);

    RecordIndexer::new(&layout).index(&mixed_records()).unwrap();

    assert_eq!(
        folder_names(&layout.root().join(UNIQUE_RECORDS_DIR)),
        vec!["T02_001", "T02_002"]
    );
}

#[test]
fn test_no_identifier_is_grouped_twice() {
    let plan = RecordIndexer::plan(&mixed_records());

    let mut seen = HashSet::new();
    for folder in &plan.folders {
        for id in folder.group.ids() {
            assert!(seen.insert(id.to_string()), "{} appears in two groups", id);
        }
    }

    let combos: HashSet<Vec<String>> = plan.folders.iter().map(|f| f.group.combo_key()).collect();
    assert_eq!(combos.len(), plan.folders.len());
}

#[test]
fn test_first_row_wins_for_mutual_references() {
    let plan = RecordIndexer::plan(&mixed_records());
    let names: Vec<String> = plan.folders.iter().map(|f| f.folder_name()).collect();

    assert!(names.contains(&"T01_003, T01_004".to_string()));
    assert!(names.contains(&"T01_005, T01_006".to_string()));
    assert!(!names.contains(&"T01_006".to_string()));
}

#[test]
fn test_unknown_intervention_still_claims_its_identifiers() {
    let records = RecordSet::new(vec![
        SiteRecord::new("T03_001").with_intervention("Prospección"),
        excavation("T03_001"),
    ]);
    let plan = RecordIndexer::plan(&records);

    assert!(plan.folders.is_empty());
    assert_eq!(plan.skipped[0].reason.as_str(), "unknown_intervention_type");
    assert_eq!(plan.skipped[1].reason.as_str(), "already_handled");
}

#[test]
fn test_rerun_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let layout = site_root(&tmp);
    let indexer = RecordIndexer::new(&layout);

    let first = indexer.index(&mixed_records()).unwrap();
    let before = folder_names(&layout.excavation_by_id_dir());

    let second = indexer.index(&mixed_records()).unwrap();
    let after = folder_names(&layout.excavation_by_id_dir());

    assert_eq!(before, after);
    assert_eq!(second.created_count(), 0);
    assert_eq!(second.existing_count(), first.created_count());
    assert!(second.folders.iter().all(|f| f.status == FolderStatus::Existing));
}
