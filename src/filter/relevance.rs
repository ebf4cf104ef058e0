// src/filter/relevance.rs
//! High-recall keyword gate: does this text plausibly describe a job at all?
//! False positives are expected here and are corrected by the later stages.

use crate::config::ParserKind;
use crate::filter::keywords::{contains_any, KeywordSets};
use crate::model::Job;

pub fn matches_keywords(job: &Job, parser: ParserKind, keywords: &KeywordSets) -> bool {
    // The page placeholder stands for the careers page itself.
    if parser == ParserKind::PageOnly && job.title.is_empty() {
        return true;
    }
    let text = format!(
        "{} {} {} {}",
        job.title, job.responsibilities, job.hard_skills, job.soft_skills
    )
    .to_lowercase();

    contains_any(&text, &keywords.role) || contains_any(&text, &keywords.domain)
}
