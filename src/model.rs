// src/model.rs
//! The job-posting record that flows through the harvest pipeline.

use serde::{Deserialize, Serialize};

/// Header row of the CSV reports, in `Job` field order.
pub const CSV_HEADERS: [&str; 15] = [
    "Base国家",
    "公司",
    "岗位名称",
    "Base城市",
    "发布时间",
    "职业渠道",
    "职位分类",
    "职位类型",
    "职位开始时间",
    "职位结束时间",
    "具体职责",
    "要求硬技能",
    "要求软技能",
    "链接",
    "联系方式",
];

/// A scraped, not-yet-validated job posting. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub base_country: String,
    pub company: String,
    pub title: String,
    pub base_city: String,
    pub posting_date: String,
    pub channel: String,
    pub category: String,
    pub job_type: String,
    pub start_date: String,
    pub end_date: String,
    pub responsibilities: String,
    pub hard_skills: String,
    pub soft_skills: String,
    pub url: String,
    /// Semicolon-joined e-mail addresses.
    pub contact: String,
}

impl Job {
    /// Fallback identity when the posting has no URL: `title|company`, trimmed and lowercased.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}",
            self.title.trim().to_lowercase(),
            self.company.trim().to_lowercase()
        )
    }

    /// URL when present, otherwise the fingerprint.
    pub fn identity_key(&self) -> String {
        let url = self.url.trim();
        if url.is_empty() {
            self.fingerprint()
        } else {
            url.to_string()
        }
    }

    /// Cells in CSV column order.
    pub fn to_csv_row(&self) -> [&str; 15] {
        [
            &self.base_country,
            &self.company,
            &self.title,
            &self.base_city,
            &self.posting_date,
            &self.channel,
            &self.category,
            &self.job_type,
            &self.start_date,
            &self.end_date,
            &self.responsibilities,
            &self.hard_skills,
            &self.soft_skills,
            &self.url,
            &self.contact,
        ]
    }

    /// Apply detail-page findings. Only empty fields are filled; returns true
    /// when the city was filled by this patch.
    pub fn apply_patch(&mut self, patch: DetailPatch) -> bool {
        let city_filled = fill(&mut self.base_city, patch.base_city);
        fill(&mut self.responsibilities, patch.responsibilities);
        fill(&mut self.hard_skills, patch.hard_skills);
        fill(&mut self.soft_skills, patch.soft_skills);
        fill(&mut self.contact, patch.contact);
        city_filled
    }
}

/// Field values found on a posting's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPatch {
    pub base_city: Option<String>,
    pub responsibilities: Option<String>,
    pub hard_skills: Option<String>,
    pub soft_skills: Option<String>,
    pub contact: Option<String>,
}

impl DetailPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn fill(slot: &mut String, value: Option<String>) -> bool {
    match value {
        Some(v) if slot.trim().is_empty() && !v.trim().is_empty() => {
            *slot = v;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_prefers_trimmed_url() {
        let job = Job {
            title: "Ops Intern".into(),
            company: "Acme".into(),
            url: "  https://x/a ".into(),
            ..Default::default()
        };
        assert_eq!(job.identity_key(), "https://x/a");
    }

    #[test]
    fn identity_falls_back_to_fingerprint() {
        let job = Job {
            title: " Ops Intern ".into(),
            company: "ACME".into(),
            url: "   ".into(),
            ..Default::default()
        };
        assert_eq!(job.identity_key(), "ops intern|acme");
    }

    #[test]
    fn patch_never_overwrites_filled_city() {
        let mut job = Job {
            base_city: "London".into(),
            ..Default::default()
        };
        let filled = job.apply_patch(DetailPatch {
            base_city: Some("Remote".into()),
            contact: Some("jobs@acme.test".into()),
            ..Default::default()
        });
        assert!(!filled);
        assert_eq!(job.base_city, "London");
        assert_eq!(job.contact, "jobs@acme.test");
    }

    #[test]
    fn patch_fills_empty_city() {
        let mut job = Job::default();
        assert!(job.apply_patch(DetailPatch {
            base_city: Some("Berlin".into()),
            ..Default::default()
        }));
        assert_eq!(job.base_city, "Berlin");
    }
}
