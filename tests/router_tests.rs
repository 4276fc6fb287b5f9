use sitearchive::routing::{DeliveryStatus, SourceOutcome};
use sitearchive::DocumentRouter;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn routing_root(tmp: &TempDir, folders: &[&str]) -> PathBuf {
    let root = tmp.path().join("Excavación por ID Monumento");
    for folder in folders {
        fs::create_dir_all(root.join(folder)).unwrap();
    }
    fs::create_dir_all(&root).unwrap();
    root
}

fn touch(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[test]
fn test_single_identifier_copied_once_and_removed() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001"]);
    touch(&root.join("T01_001_Introducción.pdf"), "intro");

    let report = DocumentRouter::new().route(&root).unwrap();

    assert_eq!(report.copied_count(), 1);
    assert_eq!(report.removed_count(), 1);
    assert!(!root.join("T01_001_Introducción.pdf").exists());
    assert_eq!(
        fs::read_to_string(root.join("T01_001").join("T01_001_Introducción.pdf")).unwrap(),
        "intro"
    );
}

#[test]
fn test_two_identifiers_fan_out_to_both_folders() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001", "T01_003"]);
    touch(&root.join("Informe_T01_001_T01_003.pdf"), "shared");

    let report = DocumentRouter::new().route(&root).unwrap();

    assert_eq!(report.files[0].identifiers, vec!["T01_001", "T01_003"]);
    assert_eq!(report.copied_count(), 2);
    assert!(root.join("T01_001").join("Informe_T01_001_T01_003.pdf").is_file());
    assert!(root.join("T01_003").join("Informe_T01_001_T01_003.pdf").is_file());
    assert!(!root.join("Informe_T01_001_T01_003.pdf").exists());
}

#[test]
fn test_partial_mapping_still_removes_original() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001"]);
    touch(&root.join("Report_T01_001_T01_003.pdf"), "partial");

    let report = DocumentRouter::new().route(&root).unwrap();
    let file = &report.files[0];

    assert_eq!(file.copied_count(), 1);
    assert_eq!(file.unmapped_identifiers(), vec!["T01_003"]);
    assert_eq!(file.outcome, SourceOutcome::Removed);
    assert_eq!(report.warning_count(), 1);
    assert!(root.join("T01_001").join("Report_T01_001_T01_003.pdf").is_file());
    assert!(!root.join("Report_T01_001_T01_003.pdf").exists());
}

#[test]
fn test_file_without_identifier_is_left_alone() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001"]);
    touch(&root.join("Plano general.pdf"), "plan");

    let report = DocumentRouter::new().route(&root).unwrap();

    assert_eq!(report.unrouted().len(), 1);
    assert_eq!(report.copied_count(), 0);
    assert!(root.join("Plano general.pdf").is_file());
    assert!(fs::read_dir(root.join("T01_001")).unwrap().next().is_none());
}

#[test]
fn test_no_destination_keeps_original() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001"]);
    touch(&root.join("T09_009_Registro de capas.pdf"), "orphan");

    let report = DocumentRouter::new().route(&root).unwrap();

    assert_eq!(report.files[0].outcome, SourceOutcome::Retained);
    assert!(root.join("T09_009_Registro de capas.pdf").is_file());
}

#[test]
fn test_existing_copy_is_not_overwritten() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001"]);
    touch(&root.join("T01_001").join("T01_001_Introducción.pdf"), "first");
    touch(&root.join("T01_001_Introducción.pdf"), "second");

    let report = DocumentRouter::new().route(&root).unwrap();

    assert_eq!(report.files[0].deliveries[0].status, DeliveryStatus::AlreadyPresent);
    assert_eq!(report.files[0].outcome, SourceOutcome::Removed);
    assert_eq!(
        fs::read_to_string(root.join("T01_001").join("T01_001_Introducción.pdf")).unwrap(),
        "first"
    );
}

#[test]
fn test_grouped_folder_receives_each_member_identifier() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_003, T01_004"]);
    touch(&root.join("T01_004_Ficha de excavación.pdf"), "ficha");

    let report = DocumentRouter::new().route(&root).unwrap();

    assert_eq!(report.mapped_identifiers, 2);
    assert!(root.join("T01_003, T01_004").join("T01_004_Ficha de excavación.pdf").is_file());
}

#[test]
fn test_uppercase_extension_is_routed() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001"]);
    touch(&root.join("T01_001_Dibujos arquitectónicos.PDF"), "dibujo");

    let report = DocumentRouter::new().route(&root).unwrap();

    assert_eq!(report.copied_count(), 1);
    assert!(root.join("T01_001").join("T01_001_Dibujos arquitectónicos.PDF").is_file());
}

#[test]
fn test_routing_twice_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let root = routing_root(&tmp, &["T01_001"]);
    touch(&root.join("T01_001_Introducción.pdf"), "intro");

    let router = DocumentRouter::new();
    router.route(&root).unwrap();
    let second = router.route(&root).unwrap();

    assert!(second.files.is_empty());
    assert!(root.join("T01_001").join("T01_001_Introducción.pdf").is_file());
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(DocumentRouter::new().route(&tmp.path().join("nope")).is_err());
}
