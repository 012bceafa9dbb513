// src/services/registry.rs

//! Skill vocabulary and the per-skill counters keyed by it.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use crate::error::{AppError, Result};

/// Header of the vocabulary column.
const SKILLS_COLUMN: &str = "skills";

/// The fixed set of skills searched for in posting bodies.
///
/// Order is the order of first appearance in the source, and is the order
/// every report table falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRegistry {
    skills: Vec<String>,
}

impl SkillRegistry {
    /// Load the vocabulary from a CSV file with a `skills` column.
    ///
    /// Without such a header the first column is used and the first row is
    /// read as a skill.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AppError::config(format!("Cannot open skills file {}: {e}", path.display()))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);
        let mut records = reader.records();

        let mut skills = Vec::new();
        // The first row is a header only if it names the skills column.
        let column = match records.next().transpose()? {
            Some(first) => {
                let named = first
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(SKILLS_COLUMN));
                if named.is_none() {
                    skills.extend(first.get(0).map(str::to_string));
                }
                named.unwrap_or(0)
            }
            None => 0,
        };

        for record in records {
            let record = record?;
            if let Some(value) = record.get(column) {
                skills.push(value.to_string());
            }
        }

        let registry = Self::from_skills(skills).map_err(|_| {
            AppError::config(format!("Skills file {} lists no skills", path.display()))
        })?;
        log::info!(
            "Loaded {} skills from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Build a registry from in-memory names, dropping blanks and duplicates.
    pub fn from_skills<I, S>(skills: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let skills: Vec<String> = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        if skills.is_empty() {
            return Err(AppError::config("Skill registry is empty"));
        }
        Ok(Self { skills })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Fresh counters with an entry for every skill.
    pub fn counter(&self) -> SkillCounter {
        SkillCounter {
            entries: self
                .skills
                .iter()
                .map(|skill| SkillTally {
                    skill: skill.clone(),
                    posting_count: 0,
                    employers_seen: Vec::new(),
                })
                .collect(),
        }
    }
}

/// Running tally for a single skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTally {
    pub skill: String,
    /// Postings whose body mentioned the skill
    pub posting_count: usize,
    /// Employer of each matching posting, duplicates and unknowns included
    pub employers_seen: Vec<Option<String>>,
}

impl SkillTally {
    /// Number of distinct known employers.
    pub fn distinct_companies(&self) -> usize {
        self.employers_seen
            .iter()
            .flatten()
            .collect::<HashSet<_>>()
            .len()
    }

    pub(crate) fn record(&mut self, company: Option<&str>) {
        self.posting_count += 1;
        self.employers_seen.push(company.map(str::to_string));
    }
}

/// Counters for every registered skill, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCounter {
    entries: Vec<SkillTally>,
}

impl SkillCounter {
    pub fn get(&self, skill: &str) -> Option<&SkillTally> {
        self.entries.iter().find(|t| t.skill == skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillTally> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut SkillTally> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
