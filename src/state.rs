// src/state.rs
//! Persisted "seen" sets that give the harvester its new-since-last-run output.
//!
//! On disk: `{"seen_urls": [...], "seen_fingerprints": [...]}`, sorted arrays.
//! A missing file is an empty state; a malformed file is a startup error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::model::Job;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryState {
    #[serde(default)]
    pub seen_urls: BTreeSet<String>,
    #[serde(default)]
    pub seen_fingerprints: BTreeSet<String>,
}

impl DiscoveryState {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading state from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed state file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating state dir {}", dir.display()))?;
        }
        let body = serde_json::to_vec_pretty(self).context("serializing state")?;
        fs::write(path, body).with_context(|| format!("writing state to {}", path.display()))
    }

    /// Check-and-record. Keys are inserted on first sight, so this must be
    /// called exactly once per kept candidate per run.
    ///
    /// The fingerprint is only a fallback identity: a candidate that has a URL
    /// is never reported new through the fingerprint path.
    pub fn is_new(&mut self, job: &Job) -> bool {
        let key_url = job.url.trim();
        let key_fp = job.fingerprint();

        if !key_url.is_empty() && !self.seen_urls.contains(key_url) {
            self.seen_urls.insert(key_url.to_string());
            return true;
        }
        if !key_fp.is_empty() && !self.seen_fingerprints.contains(&key_fp) {
            self.seen_fingerprints.insert(key_fp);
            return key_url.is_empty();
        }
        false
    }

    pub fn len(&self) -> usize {
        self.seen_urls.len() + self.seen_fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_urls.is_empty() && self.seen_fingerprints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> Job {
        Job {
            title: "Rights Intern".into(),
            company: "Acme".into(),
            url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn seen_url_is_not_new() {
        let mut st = DiscoveryState::default();
        st.seen_urls.insert("https://x/a".into());

        assert!(!st.is_new(&with_url("https://x/a")));
        assert!(st.is_new(&with_url("https://x/b")));
        assert!(st.seen_urls.contains("https://x/b"));
    }

    #[test]
    fn duplicate_within_one_run_counts_once() {
        let mut st = DiscoveryState::default();
        assert!(st.is_new(&with_url(" https://x/c ")));
        assert!(!st.is_new(&with_url("https://x/c")));
    }

    #[test]
    fn url_less_candidates_use_fingerprint() {
        let mut st = DiscoveryState::default();
        let job = Job {
            title: "Ops Intern".into(),
            company: "Acme".into(),
            ..Default::default()
        };
        assert!(st.is_new(&job));
        assert!(st.seen_fingerprints.contains("ops intern|acme"));
        assert!(!st.is_new(&job));
    }

    #[test]
    fn url_collision_never_new_via_fingerprint() {
        let mut st = DiscoveryState::default();
        st.seen_urls.insert("https://x/a".into());
        let job = with_url("https://x/a");

        assert!(!st.is_new(&job));
        // the fingerprint was still recorded
        assert!(st.seen_fingerprints.contains("rights intern|acme"));
    }

    #[test]
    fn missing_file_is_empty_and_malformed_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(DiscoveryState::load(&missing).unwrap().is_empty());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        let err = DiscoveryState::load(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("malformed state file"));
    }

    #[test]
    fn partial_file_defaults_missing_sets() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("state.json");
        fs::write(&p, r#"{"seen_urls": ["https://x/a"]}"#).unwrap();
        let st = DiscoveryState::load(&p).unwrap();
        assert_eq!(st.seen_urls.len(), 1);
        assert!(st.seen_fingerprints.is_empty());
    }
}
