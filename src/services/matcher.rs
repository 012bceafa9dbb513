// src/services/matcher.rs

//! Skill keyword matching against posting bodies.

use std::collections::HashMap;

use crate::services::registry::{SkillCounter, SkillRegistry};

/// Case-insensitive substring matcher over the registry vocabulary.
pub struct SkillMatcher {
    /// Lowercased keyword per registered skill name
    needles: HashMap<String, String>,
}

impl SkillMatcher {
    pub fn new(registry: &SkillRegistry) -> Self {
        Self {
            needles: registry
                .iter()
                .map(|skill| (skill.to_string(), skill.to_lowercase()))
                .collect(),
        }
    }

    /// Record one posting against `state`.
    ///
    /// Each matching skill gains exactly one posting and one employer entry,
    /// however often the keyword occurs. Tallies are matched by skill name;
    /// skills this matcher does not know are left untouched. Returns the
    /// number of skills matched.
    pub fn apply(&self, body: &str, company: Option<&str>, state: &mut SkillCounter) -> usize {
        let haystack = body.to_lowercase();
        let mut matched = 0;

        for tally in state.iter_mut() {
            let Some(needle) = self.needles.get(&tally.skill) else {
                continue;
            };
            if haystack.contains(needle.as_str()) {
                tally.record(company);
                matched += 1;
            }
        }
        matched
    }
}
