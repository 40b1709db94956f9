//! End-to-end exports through the orchestrator with a scripted renderer

mod common;

use common::{Event, FakeRenderer, file_names, page, page_labels, sample_pdf};
use kodegen_tools_html2pdf::{
    CapPolicy, ExportConfig, ExportError, FailurePolicy, NoOpProgress, export_with,
};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn config(dir: &Path) -> ExportConfig {
    ExportConfig::builder()
        .working_dir(dir)
        .entry_url(page("e.html"))
        .build()
        .unwrap()
}

fn scenario() -> FakeRenderer {
    FakeRenderer::new()
        .document("e.html", &["a.html", "b.html"])
        .document("a.html", &["b.html", "e.html"])
        .document("b.html", &[])
}

#[tokio::test]
async fn test_export_merges_in_discovery_order() {
    let dir = TempDir::new().unwrap();
    let renderer = scenario();
    let events = renderer.events();

    let outcome = export_with(&config(dir.path()), renderer, &NoOpProgress)
        .await
        .unwrap();

    assert_eq!(outcome.export_path, dir.path().join("Export.pdf"));
    assert_eq!(outcome.documents, 3);
    assert_eq!(outcome.page_count, 3);
    assert_eq!(outcome.truncated, 0);
    assert!(outcome.failed.is_empty());
    assert!(outcome.missing.is_empty());

    // Captured B, A, E but merged E, A, B
    assert_eq!(
        page_labels(&outcome.export_path),
        vec!["e.html", "a.html", "b.html"]
    );
    assert_eq!(file_names(dir.path()), vec!["Export.pdf"]);
    assert_eq!(events.lock().unwrap().last(), Some(&Event::Shutdown));
}

#[tokio::test]
async fn test_repeated_runs_are_idempotent() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("0.pdf"), sample_pdf(&["stale0"])).unwrap();
    std::fs::write(dir.path().join("7.pdf"), sample_pdf(&["stale7"])).unwrap();
    std::fs::write(dir.path().join("Export.pdf"), sample_pdf(&["old"])).unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

    for _ in 0..2 {
        let outcome = export_with(&config(dir.path()), scenario(), &NoOpProgress)
            .await
            .unwrap();
        assert_eq!(
            page_labels(&outcome.export_path),
            vec!["e.html", "a.html", "b.html"]
        );
        assert_eq!(file_names(dir.path()), vec!["Export.pdf", "notes.txt"]);
    }
}

#[tokio::test]
async fn test_failure_leaves_no_intermediates_and_releases_renderer() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Export.pdf"), sample_pdf(&["old"])).unwrap();
    let renderer = FakeRenderer::new()
        .document("e.html", &["a.html", "missing.html"])
        .document("a.html", &[]);
    let events = renderer.events();

    let err = export_with(&config(dir.path()), renderer, &NoOpProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Navigation { .. }));
    assert!(err.to_string().contains("missing.html"));
    assert!(file_names(dir.path()).is_empty());
    assert_eq!(events.lock().unwrap().last(), Some(&Event::Shutdown));
}

#[tokio::test]
async fn test_cap_fail_cleans_up_captured_children() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::builder()
        .working_dir(dir.path())
        .entry_url(page("e.html"))
        .max_pages(2)
        .cap_policy(CapPolicy::Fail)
        .build()
        .unwrap();

    let err = export_with(&config, scenario(), &NoOpProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::CapacityExceeded { cap: 2, .. }));
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_cap_warn_reports_truncation() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::builder()
        .working_dir(dir.path())
        .entry_url(page("e.html"))
        .max_pages(2)
        .build()
        .unwrap();

    let outcome = export_with(&config, scenario(), &NoOpProgress)
        .await
        .unwrap();

    assert_eq!(outcome.truncated, 1);
    assert_eq!(page_labels(&outcome.export_path), vec!["e.html", "a.html"]);
}

#[tokio::test]
async fn test_skipped_branches_show_up_as_missing() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::builder()
        .working_dir(dir.path())
        .entry_url(page("e.html"))
        .failure_policy(FailurePolicy::SkipBranch)
        .build()
        .unwrap();
    let renderer = FakeRenderer::new()
        .document("e.html", &["a.html", "broken.html", "b.html"])
        .document("a.html", &[])
        .document("b.html", &[]);

    let outcome = export_with(&config, renderer, &NoOpProgress)
        .await
        .unwrap();

    assert_eq!(outcome.documents, 3);
    assert_eq!(outcome.failed, vec![page("broken.html")]);
    assert_eq!(outcome.missing, vec!["2.pdf".to_string()]);
    assert_eq!(
        page_labels(&outcome.export_path),
        vec!["e.html", "a.html", "b.html"]
    );
}

#[tokio::test]
async fn test_unreachable_root_under_skip_branch_yields_empty_export() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::builder()
        .working_dir(dir.path())
        .entry_url(page("e.html"))
        .failure_policy(FailurePolicy::SkipBranch)
        .build()
        .unwrap();
    let renderer = scenario().failing_open("e.html");

    let outcome = export_with(&config, renderer, &NoOpProgress)
        .await
        .unwrap();

    assert_eq!(outcome.documents, 0);
    assert_eq!(outcome.page_count, 0);
    assert_eq!(outcome.failed, vec![page("e.html")]);
    assert_eq!(outcome.missing, vec!["0.pdf".to_string()]);
    assert!(page_labels(&outcome.export_path).is_empty());
    assert_eq!(file_names(dir.path()), vec!["Export.pdf"]);
}

#[tokio::test]
async fn test_run_timeout_aborts_the_export() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::builder()
        .working_dir(dir.path())
        .entry_url(page("e.html"))
        .run_timeout_secs(Some(1))
        .build()
        .unwrap();
    let renderer = scenario().slow_capture(Duration::from_secs(5));
    let events = renderer.events();

    let err = export_with(&config, renderer, &NoOpProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Timeout { secs: 1 }));
    let log = events.lock().unwrap();
    assert!(!log.iter().any(|e| matches!(e, Event::Capture(_))));
    assert_eq!(log.last(), Some(&Event::Shutdown));
    drop(log);
    assert!(file_names(dir.path()).is_empty());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_run_timeout_does_not_cut_the_merge_short() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::builder()
        .working_dir(dir.path())
        .entry_url(page("e.html"))
        .run_timeout_secs(Some(1))
        .build()
        .unwrap();
    // Traversal ends shortly before the deadline, the merge runs past it
    let renderer = scenario()
        .slow_capture(Duration::from_millis(200))
        .pages_per_document(3000);

    let outcome = export_with(&config, renderer, &NoOpProgress)
        .await
        .unwrap();

    assert_eq!(outcome.documents, 3);
    assert_eq!(outcome.page_count, 9000);
    let labels = page_labels(&outcome.export_path);
    assert_eq!(labels.len(), 9000);
    assert_eq!(labels[0], "e.html#0");
    assert_eq!(labels[3000], "a.html#0");
    assert_eq!(labels[8999], "b.html#2999");
    assert_eq!(file_names(dir.path()), vec!["Export.pdf"]);
}

#[tokio::test]
async fn test_custom_export_name() {
    let dir = TempDir::new().unwrap();
    let config = ExportConfig::builder()
        .working_dir(dir.path())
        .entry_url(page("e.html"))
        .export_file_name("Manual.pdf")
        .build()
        .unwrap();

    let outcome = export_with(&config, scenario(), &NoOpProgress)
        .await
        .unwrap();

    assert_eq!(outcome.export_path, dir.path().join("Manual.pdf"));
    assert_eq!(file_names(dir.path()), vec!["Manual.pdf"]);
}
