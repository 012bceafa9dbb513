// src/pipeline/report.rs

//! Aggregation of collected postings and skill counters into report tables.

use serde::Serialize;

use crate::models::PostingRecord;
use crate::services::SkillCounter;

/// Row of the skill usage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillUsageRow {
    #[serde(rename = "Programming Skill")]
    pub skill: String,
    #[serde(rename = "Number of Job Postings")]
    pub posting_count: usize,
}

/// Row of the company-breadth table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyBreadthRow {
    #[serde(rename = "Programming Skill")]
    pub skill: String,
    #[serde(rename = "Number of Companies")]
    pub distinct_company_count: usize,
}

/// Employers of every posting that matched one skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerColumn {
    pub skill: String,
    pub employers: Vec<Option<String>>,
}

/// Final tables of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// One row per fetched posting, in fetch order
    pub postings: Vec<PostingRecord>,
    /// Skills with at least one posting, in registry order
    pub skill_usage: Vec<SkillUsageRow>,
    /// Every skill, by distinct employers descending
    pub company_breadth: Vec<CompanyBreadthRow>,
    /// Raw employer lists, one column per skill in registry order
    pub employers: Vec<EmployerColumn>,
}

impl Report {
    pub fn build(postings: Vec<PostingRecord>, counter: &SkillCounter) -> Self {
        let skill_usage = counter
            .iter()
            .filter(|t| t.posting_count > 0)
            .map(|t| SkillUsageRow {
                skill: t.skill.clone(),
                posting_count: t.posting_count,
            })
            .collect();

        let mut company_breadth: Vec<CompanyBreadthRow> = counter
            .iter()
            .map(|t| CompanyBreadthRow {
                skill: t.skill.clone(),
                distinct_company_count: t.distinct_companies(),
            })
            .collect();
        // stable: ties keep registry order
        company_breadth.sort_by(|a, b| b.distinct_company_count.cmp(&a.distinct_company_count));

        let employers = counter
            .iter()
            .map(|t| EmployerColumn {
                skill: t.skill.clone(),
                employers: t.employers_seen.clone(),
            })
            .collect();

        Self {
            postings,
            skill_usage,
            company_breadth,
            employers,
        }
    }

    /// Height of the employer table.
    pub fn employer_rows(&self) -> usize {
        self.employers
            .iter()
            .map(|c| c.employers.len())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{SkillMatcher, SkillRegistry};

    fn counter_with(postings: &[(&str, Option<&str>)]) -> SkillCounter {
        let registry = SkillRegistry::from_skills(["Python", "Go", "Rust", "Java"]).unwrap();
        let matcher = SkillMatcher::new(&registry);
        let mut counter = registry.counter();
        for (body, company) in postings {
            matcher.apply(body, *company, &mut counter);
        }
        counter
    }

    #[test]
    fn usage_drops_unmatched_skills() {
        let counter = counter_with(&[("python", Some("Acme")), ("rust", None)]);
        let report = Report::build(Vec::new(), &counter);
        let skills: Vec<_> = report.skill_usage.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(skills, ["Python", "Rust"]);
    }

    #[test]
    fn breadth_lists_every_skill_once() {
        let counter = counter_with(&[("python go", Some("Acme"))]);
        let report = Report::build(Vec::new(), &counter);
        let mut skills: Vec<_> = report
            .company_breadth
            .iter()
            .map(|r| r.skill.as_str())
            .collect();
        skills.sort_unstable();
        assert_eq!(skills, ["Go", "Java", "Python", "Rust"]);
    }

    #[test]
    fn breadth_sorted_descending_with_stable_ties() {
        let counter = counter_with(&[
            ("rust", Some("Acme")),
            ("rust", Some("Beta")),
            ("go", Some("Acme")),
            ("python", Some("Beta")),
        ]);
        let report = Report::build(Vec::new(), &counter);
        let order: Vec<_> = report
            .company_breadth
            .iter()
            .map(|r| (r.skill.as_str(), r.distinct_company_count))
            .collect();
        assert_eq!(
            order,
            [("Rust", 2), ("Python", 1), ("Go", 1), ("Java", 0)]
        );
    }

    #[test]
    fn distinct_companies_never_exceed_postings() {
        let counter = counter_with(&[
            ("python", Some("Acme")),
            ("python", Some("Acme")),
            ("python", None),
            ("go", None),
        ]);
        let report = Report::build(Vec::new(), &counter);

        for row in &report.company_breadth {
            let postings = counter.get(&row.skill).unwrap().posting_count;
            assert!(row.distinct_company_count <= postings);
        }
        let go = report.company_breadth.iter().find(|r| r.skill == "Go").unwrap();
        assert_eq!(go.distinct_company_count, 0);
        assert_eq!(report.employer_rows(), 3);
    }
}
