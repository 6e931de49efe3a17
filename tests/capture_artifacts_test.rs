use sitelens::capture::{list_captures, wait_for_captures, WaitConfig};
use std::time::{Duration, Instant};
use tempfile::tempdir;

// * Test Suite for the Artifact Wait Loop

fn fast_config(expected: usize, max_wait_ms: u64) -> WaitConfig {
    WaitConfig {
        expected_count: expected,
        max_wait: Duration::from_millis(max_wait_ms),
        check_interval: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn test_returns_early_once_expected_count_lands() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("screenshot0.png"), b"").unwrap();

    // * Second file arrives while the loop is polling
    let folder = dir.path().to_path_buf();
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(folder.join("screenshot1.png"), b"").unwrap();
    });

    let started = Instant::now();
    let captures = wait_for_captures(dir.path(), &fast_config(2, 5_000)).await;
    writer.await.unwrap();

    assert_eq!(captures.len(), 2);
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "loop should return well before the wait bound"
    );
}

#[tokio::test]
async fn test_times_out_with_partial_results() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("screenshot0.png"), b"").unwrap();

    let started = Instant::now();
    let captures = wait_for_captures(dir.path(), &fast_config(3, 400)).await;
    let elapsed = started.elapsed();

    assert_eq!(captures.len(), 1);
    assert!(elapsed >= Duration::from_millis(400), "must wait out the bound");
    assert!(elapsed < Duration::from_secs(3), "must not wait much past the bound");
}

#[tokio::test]
async fn test_times_out_empty_when_nothing_arrives() {
    let dir = tempdir().unwrap();
    let captures = wait_for_captures(dir.path(), &fast_config(2, 300)).await;
    assert!(captures.is_empty());
}

#[tokio::test]
async fn test_missing_folder_counts_as_empty() {
    let dir = tempdir().unwrap();
    let ghost = dir.path().join("never_created");
    let captures = wait_for_captures(&ghost, &fast_config(1, 200)).await;
    assert!(captures.is_empty());
}

#[tokio::test]
async fn test_listing_sorts_by_capture_order_not_name() {
    let dir = tempdir().unwrap();
    for name in ["screenshot10.png", "screenshot2.png", "screenshot1.png"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }

    let captures = list_captures(dir.path()).await;
    let names: Vec<String> = captures
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["screenshot1.png", "screenshot2.png", "screenshot10.png"]);
}

#[tokio::test]
async fn test_listing_filters_foreign_files() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("screenshot0.png"), b"").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
    std::fs::write(dir.path().join("archive.json"), b"").unwrap();

    let captures = list_captures(dir.path()).await;
    assert_eq!(captures.len(), 1);
    assert!(captures[0].ends_with("screenshot0.png"));
}

#[tokio::test]
async fn test_unnumbered_pngs_sort_last() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("cover.png"), b"").unwrap();
    std::fs::write(dir.path().join("screenshot0.png"), b"").unwrap();

    let captures = list_captures(dir.path()).await;
    let names: Vec<String> = captures
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["screenshot0.png", "cover.png"]);
}
