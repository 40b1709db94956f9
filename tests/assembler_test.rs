//! Merging intermediates into the export

mod common;

use common::{file_names, page_labels, sample_pdf};
use kodegen_tools_html2pdf::{ExportError, merge};
use tempfile::TempDir;

fn order(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

#[tokio::test]
async fn test_merge_follows_order_not_file_names() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("0.pdf"), sample_pdf(&["e1", "e2"])).unwrap();
    std::fs::write(dir.path().join("1.pdf"), sample_pdf(&["a1"])).unwrap();
    std::fs::write(dir.path().join("10.pdf"), sample_pdf(&["k1"])).unwrap();
    std::fs::write(dir.path().join("2.pdf"), sample_pdf(&["b1", "b2", "b3"])).unwrap();

    let report = merge(
        &order(&["0.pdf", "1.pdf", "2.pdf", "10.pdf"]),
        dir.path(),
        "Export.pdf",
    )
    .await
    .unwrap();

    assert_eq!(report.export_path, dir.path().join("Export.pdf"));
    assert_eq!(report.page_count, 7);
    assert!(report.missing.is_empty());
    assert_eq!(
        page_labels(&report.export_path),
        vec!["e1", "e2", "a1", "b1", "b2", "b3", "k1"]
    );
}

#[tokio::test]
async fn test_missing_intermediates_are_skipped() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("0.pdf"), sample_pdf(&["e"])).unwrap();
    std::fs::write(dir.path().join("2.pdf"), sample_pdf(&["b"])).unwrap();

    let report = merge(&order(&["0.pdf", "1.pdf", "2.pdf"]), dir.path(), "Export.pdf")
        .await
        .unwrap();

    assert_eq!(report.merged, order(&["0.pdf", "2.pdf"]));
    assert_eq!(report.missing, order(&["1.pdf"]));
    assert_eq!(page_labels(&report.export_path), vec!["e", "b"]);
}

#[tokio::test]
async fn test_intermediates_are_removed_after_merge() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("0.pdf"), sample_pdf(&["e"])).unwrap();
    std::fs::write(dir.path().join("1.pdf"), sample_pdf(&["a"])).unwrap();
    std::fs::write(dir.path().join("keep.txt"), b"notes").unwrap();

    merge(&order(&["0.pdf", "1.pdf"]), dir.path(), "Export.pdf")
        .await
        .unwrap();

    assert_eq!(file_names(dir.path()), vec!["Export.pdf", "keep.txt"]);
}

#[tokio::test]
async fn test_previous_export_is_overwritten() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Export.pdf"), sample_pdf(&["old1", "old2"])).unwrap();
    std::fs::write(dir.path().join("0.pdf"), sample_pdf(&["new"])).unwrap();

    merge(&order(&["0.pdf"]), dir.path(), "Export.pdf")
        .await
        .unwrap();

    assert_eq!(page_labels(&dir.path().join("Export.pdf")), vec!["new"]);
}

#[tokio::test]
async fn test_zero_pages_writes_an_empty_export() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Export.pdf"), sample_pdf(&["old"])).unwrap();

    let report = merge(&order(&["0.pdf", "1.pdf"]), dir.path(), "Export.pdf")
        .await
        .unwrap();

    assert_eq!(report.page_count, 0);
    assert!(report.merged.is_empty());
    assert_eq!(report.missing, order(&["0.pdf", "1.pdf"]));
    assert!(page_labels(&report.export_path).is_empty());
    assert_eq!(file_names(dir.path()), vec!["Export.pdf"]);
}

#[tokio::test]
async fn test_unparseable_intermediate_fails_but_still_cleans_up() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("0.pdf"), sample_pdf(&["e"])).unwrap();
    std::fs::write(dir.path().join("1.pdf"), b"not a pdf").unwrap();

    let err = merge(&order(&["0.pdf", "1.pdf"]), dir.path(), "Export.pdf")
        .await
        .unwrap_err();

    match &err {
        ExportError::Assembly { path, .. } => assert_eq!(path, &dir.path().join("Export.pdf")),
        other => panic!("expected Assembly, got {other:?}"),
    }
    assert!(err.to_string().contains("1.pdf"));
    assert!(file_names(dir.path()).is_empty());
}
