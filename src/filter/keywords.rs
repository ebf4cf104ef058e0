// src/filter/keywords.rs
//! Keyword and pattern lists used by the candidate filters.
//!
//! All matching is lowercase substring matching with no word boundaries,
//! so every entry here must be lowercase. The sets are passed explicitly into
//! the filter functions; tests build their own fixtures with struct update syntax.

/// Named, versioned keyword configuration for the whole filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSets {
    pub version: &'static str,
    /// Legal, boilerplate and news terms that mark a link or page as not a posting.
    pub global_exclude: Vec<String>,
    /// Role words that make a text plausibly a job.
    pub role: Vec<String>,
    /// Domain vocabulary for the target field.
    pub domain: Vec<String>,
    /// Stricter subset of `domain`, used only to rebut a senior title.
    pub strong_domain: Vec<String>,
    pub junior_include: Vec<String>,
    /// Phrases that cancel a junior match (e.g. "senior associate").
    pub junior_override: Vec<String>,
    pub senior_exclude: Vec<String>,
    /// Source ids treated as dedicated job boards.
    pub job_board_source_ids: Vec<String>,
    /// A source channel containing this marker is a job board too.
    pub job_board_channel_marker: String,
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self::v1()
    }
}

impl KeywordSets {
    pub fn v1() -> Self {
        Self {
            version: "v1",
            global_exclude: owned(&["privacy", "cookie", "terms", "press", "blog"]),
            role: owned(&["intern", "internship", "assistant", "coordinator"]),
            domain: owned(&[
                "operations",
                "operational",
                "royalties",
                "royalty",
                "rights",
                "copyright",
                "licensing",
                "distribution",
                "digital",
                "publishing",
                "label services",
                "metadata",
            ]),
            strong_domain: owned(&[
                "rights",
                "royalties",
                "copyright",
                "licensing",
                "publishing",
                "distribution",
                "metadata",
            ]),
            junior_include: owned(&[
                "intern",
                "internship",
                "assistant",
                "coordinator",
                "administrator",
                "associate",
            ]),
            junior_override: owned(&["senior associate"]),
            senior_exclude: owned(&[
                "manager",
                "senior",
                "lead",
                "head",
                "director",
                "vp",
                "principal",
                "chief",
                "executive",
                "consultant",
            ]),
            job_board_source_ids: owned(&[
                "musicweek_jobs",
                "mbw_jobs",
                "creative_access",
                "uk_music_jobs",
                "entertainment_careers",
            ]),
            job_board_channel_marker: "job board".to_string(),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// True if any pattern is a substring of `haystack`.
pub fn contains_any(haystack: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| haystack.contains(p.as_str()))
}

/// Number of distinct patterns that occur in `haystack`.
pub fn count_distinct(haystack: &str, patterns: &[String]) -> usize {
    let mut seen: Vec<&str> = Vec::with_capacity(patterns.len());
    for p in patterns {
        if haystack.contains(p.as_str()) && !seen.contains(&p.as_str()) {
            seen.push(p.as_str());
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_lists_are_lowercase() {
        let k = KeywordSets::v1();
        for list in [
            &k.global_exclude,
            &k.role,
            &k.domain,
            &k.strong_domain,
            &k.junior_include,
            &k.junior_override,
            &k.senior_exclude,
        ] {
            for item in list {
                assert_eq!(item, &item.to_lowercase());
            }
        }
    }

    #[test]
    fn strong_domain_is_subset_of_domain() {
        let k = KeywordSets::v1();
        for s in &k.strong_domain {
            assert!(k.domain.contains(s), "{s} missing from domain");
        }
    }

    #[test]
    fn count_distinct_ignores_repeats() {
        let pats = owned(&["rights", "rights", "metadata"]);
        assert_eq!(count_distinct("rights and more rights", &pats), 1);
        assert_eq!(count_distinct("rights metadata", &pats), 2);
    }
}
