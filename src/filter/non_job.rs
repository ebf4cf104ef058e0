// src/filter/non_job.rs
//! Second, stricter gate that runs on the fetched detail page.

use crate::filter::keywords::{contains_any, count_distinct, KeywordSets};

/// A page saturated with this many distinct boilerplate terms is not a posting.
pub const EXCLUDE_DENSITY_THRESHOLD: usize = 3;

const JOB_SHAPE_MARKERS: [&str; 3] = ["job", "career", "apply"];

pub fn looks_like_non_job(
    title: &str,
    page_text: &str,
    bullets: &[String],
    keywords: &KeywordSets,
) -> bool {
    let title_l = title.to_lowercase();
    let text_l = page_text.to_lowercase();

    if contains_any(&title_l, &keywords.global_exclude) {
        return true;
    }
    if count_distinct(&text_l, &keywords.global_exclude) >= EXCLUDE_DENSITY_THRESHOLD {
        return true;
    }
    bullets.is_empty() && !JOB_SHAPE_MARKERS.iter().any(|m| text_l.contains(m))
}
