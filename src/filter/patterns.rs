// src/filter/patterns.rs
//! Allow/exclude decision from literal substring patterns over title + URL.

use crate::config::SourceConfig;
use crate::filter::keywords::{contains_any, KeywordSets};
use crate::model::Job;

/// Pure check: global excludes, then source excludes, then source includes (if any).
pub fn is_allowed(job: &Job, source: &SourceConfig, keywords: &KeywordSets) -> bool {
    let combined = format!("{} {}", job.title, job.url).to_lowercase();

    if contains_any(&combined, &keywords.global_exclude) {
        return false;
    }
    if contains_any(&combined, &source.exclude_patterns) {
        return false;
    }
    if !source.include_patterns.is_empty() && !contains_any(&combined, &source.include_patterns)
    {
        return false;
    }
    true
}
