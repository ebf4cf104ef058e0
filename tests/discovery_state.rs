// tests/discovery_state.rs
use job_harvester::{DiscoveryState, Job};
use std::fs;

fn job(title: &str, company: &str, url: &str) -> Job {
    Job {
        title: title.into(),
        company: company.into(),
        url: url.into(),
        ..Default::default()
    }
}

#[test]
fn missing_file_is_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let s = DiscoveryState::load(&dir.path().join("nope.json")).unwrap();
    assert!(s.is_empty());
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("state.json");
    fs::write(&p, "{not json").unwrap();
    let err = DiscoveryState::load(&p).unwrap_err();
    assert!(format!("{err:#}").contains("malformed state file"));
}

#[test]
fn partial_file_fills_missing_sets() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("state.json");
    fs::write(&p, r#"{"seen_urls":["https://a.test/1"]}"#).unwrap();
    let s = DiscoveryState::load(&p).unwrap();
    assert_eq!(s.seen_urls.len(), 1);
    assert!(s.seen_fingerprints.is_empty());
}

#[test]
fn saved_state_suppresses_the_same_postings_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("nested").join("state.json");

    let with_url = job("Rights Intern", "Acme", "https://acme.test/j/1");
    let without_url = job("Royalties Assistant", "Acme", "");

    let mut first = DiscoveryState::default();
    assert!(first.is_new(&with_url));
    assert!(first.is_new(&without_url));
    first.save(&p).unwrap();

    let mut second = DiscoveryState::load(&p).unwrap();
    assert_eq!(second, first);
    assert!(!second.is_new(&with_url));
    assert!(!second.is_new(&without_url));

    // same title/company but a fresh URL is a new posting
    assert!(second.is_new(&job("Rights Intern", "Acme", "https://acme.test/j/2")));
}

#[test]
fn url_job_is_never_new_via_fingerprint() {
    let mut s = DiscoveryState::default();
    assert!(s.is_new(&job("Rights Intern", "Acme", "https://a.test/1")));
    // same URL, different title: URL already seen, fingerprint recorded but not reported
    let retitled = job("Rights Intern (12 months)", "Acme", "https://a.test/1");
    assert!(!s.is_new(&retitled));
    assert!(s.seen_fingerprints.contains("rights intern (12 months)|acme"));
}

#[test]
fn fingerprint_ignores_case_and_padding() {
    let mut s = DiscoveryState::default();
    assert!(s.is_new(&job(" Rights Intern ", "ACME", "")));
    assert!(!s.is_new(&job("rights intern", "acme", "")));
}

#[test]
fn saved_file_is_sorted_json_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("state.json");
    let mut s = DiscoveryState::default();
    s.is_new(&job("B", "X", "https://b.test"));
    s.is_new(&job("A", "X", "https://a.test"));
    s.save(&p).unwrap();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&p).unwrap()).unwrap();
    assert_eq!(
        v["seen_urls"],
        serde_json::json!(["https://a.test", "https://b.test"])
    );
    assert!(v["seen_fingerprints"].as_array().unwrap().is_empty());
}
