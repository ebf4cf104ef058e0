// tests/run_e2e.rs
// Full `run` over page-only sources: no network, real files.

use job_harvester::model::CSV_HEADERS;
use job_harvester::{run, HarvestSettings};
use std::fs;
use std::time::Duration;

const SOURCES: &str = r#"
sources:
  - id: labelco
    name: Label Co
    default_country: UK
    channel: Label careers page
    url: https://labels.test/join-us
  - id: publisher
    name: Big Publisher
    parser_type: page_only
    url: https://publisher.test/careers
"#;

fn settings(root: &std::path::Path) -> HarvestSettings {
    HarvestSettings {
        sources_path: root.join("config").join("sources.yaml"),
        state_path: root.join("data").join("state.json"),
        output_dir: root.join("output"),
        http_timeout: Duration::from_secs(1),
        http_retries: 1,
        http_backoff: Duration::ZERO,
        detail_delay: Duration::ZERO,
    }
}

fn csv_lines(path: &std::path::Path) -> Vec<String> {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "missing BOM in {}", path.display());
    let body = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert!(body.ends_with("\r\n"));
    body.split("\r\n")
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn first_run_reports_everything_second_run_nothing_new() {
    let tmp = tempfile::tempdir().unwrap();
    let s = settings(tmp.path());
    fs::create_dir_all(s.sources_path.parent().unwrap()).unwrap();
    fs::write(&s.sources_path, SOURCES).unwrap();

    let report = run(&s).await.unwrap();
    assert_eq!(report.all.len(), 2);
    assert_eq!(report.new.len(), 2);

    let header = CSV_HEADERS.join(",");
    let latest = csv_lines(&s.latest_csv_path());
    assert_eq!(latest[0], header);
    assert_eq!(latest.len(), 3);
    assert!(latest[1].starts_with("UK,Label Co,,"));
    assert!(latest[1].contains("https://labels.test/join-us"));
    assert_eq!(csv_lines(&s.new_csv_path()).len(), 3);
    assert!(s.state_path.exists());

    let again = run(&s).await.unwrap();
    assert_eq!(again.all.len(), 2);
    assert!(again.new.is_empty());
    assert_eq!(csv_lines(&s.latest_csv_path()).len(), 3);
    assert_eq!(csv_lines(&s.new_csv_path()), vec![header]);
}

#[tokio::test]
async fn malformed_state_aborts_before_any_output() {
    let tmp = tempfile::tempdir().unwrap();
    let s = settings(tmp.path());
    fs::create_dir_all(s.sources_path.parent().unwrap()).unwrap();
    fs::write(&s.sources_path, SOURCES).unwrap();
    fs::create_dir_all(s.state_path.parent().unwrap()).unwrap();
    fs::write(&s.state_path, "[1, 2").unwrap();

    assert!(run(&s).await.is_err());
    assert!(!s.latest_csv_path().exists());
    assert_eq!(fs::read_to_string(&s.state_path).unwrap(), "[1, 2");
}

#[tokio::test]
async fn missing_sources_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let s = settings(tmp.path());
    let err = run(&s).await.unwrap_err();
    assert!(format!("{err:#}").contains("reading sources"));
}
