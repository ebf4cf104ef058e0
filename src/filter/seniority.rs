// src/filter/seniority.rs
//! Seniority relevance classifier.
//!
//! Decision order (first match wins):
//! 1. page placeholder sources are never classified → keep
//! 2. sources that opt out of `junior_focus` → keep
//! 3. junior title (and not a junior override like "senior associate") → keep
//! 4. senior title → keep only with the domain override and ≥ 2 strong domain hits
//! 5. otherwise → keep on ≥ 1 domain hit or a job-board source
//!
//! Step 5 rejections are reported as `TooSenior` as well, even though the real
//! cause is low domain relevance.

use crate::config::SourceConfig;
use crate::filter::keywords::{contains_any, count_distinct, KeywordSets};
use crate::model::Job;

const STRONG_MATCHES_FOR_SENIOR: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Kept,
    TooSenior,
    NonJob,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Kept => "kept",
            Verdict::TooSenior => "too_senior",
            Verdict::NonJob => "non_job",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleClass {
    Junior,
    Senior,
    Neutral,
}

/// Outcome plus the signals that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub keep: bool,
    pub verdict: Verdict,
    pub title_class: Option<TitleClass>,
    pub domain_matches: usize,
    pub strong_domain_matches: usize,
}

impl Assessment {
    fn pass_through() -> Self {
        Self {
            keep: true,
            verdict: Verdict::Kept,
            title_class: None,
            domain_matches: 0,
            strong_domain_matches: 0,
        }
    }
}

pub fn classify_title(title: &str, keywords: &KeywordSets) -> TitleClass {
    let t = title.to_lowercase();
    if contains_any(&t, &keywords.junior_include) && !contains_any(&t, &keywords.junior_override) {
        TitleClass::Junior
    } else if contains_any(&t, &keywords.senior_exclude) {
        TitleClass::Senior
    } else {
        TitleClass::Neutral
    }
}

pub fn is_job_board(source: &SourceConfig, keywords: &KeywordSets) -> bool {
    keywords.job_board_source_ids.iter().any(|id| id == &source.id)
        || source
            .channel
            .to_lowercase()
            .contains(keywords.job_board_channel_marker.as_str())
}

pub fn assess(job: &Job, source: &SourceConfig, keywords: &KeywordSets) -> Assessment {
    if source.is_page_only() || !source.junior_focus() {
        return Assessment::pass_through();
    }

    let text = format!("{} {} {}", job.title, job.responsibilities, job.hard_skills).to_lowercase();
    let domain_matches = count_distinct(&text, &keywords.domain);
    let strong_domain_matches = count_distinct(&text, &keywords.strong_domain);

    let title_class = classify_title(&job.title, keywords);
    let keep = match title_class {
        TitleClass::Junior => true,
        TitleClass::Senior => {
            source.allow_senior_if_domain_match
                && strong_domain_matches >= STRONG_MATCHES_FOR_SENIOR
        }
        TitleClass::Neutral => domain_matches >= 1 || is_job_board(source, keywords),
    };

    Assessment {
        keep,
        verdict: if keep { Verdict::Kept } else { Verdict::TooSenior },
        title_class: Some(title_class),
        domain_matches,
        strong_domain_matches,
    }
}
