// src/filter/mod.rs
//! Candidate filter chain: patterns → keyword relevance → seniority, then the
//! non-job page gate after detail fetch.

pub mod keywords;
pub mod non_job;
pub mod patterns;
pub mod relevance;
pub mod seniority;

pub use keywords::KeywordSets;
pub use non_job::looks_like_non_job;
pub use patterns::is_allowed;
pub use relevance::matches_keywords;
pub use seniority::{assess, Assessment, TitleClass, Verdict};
