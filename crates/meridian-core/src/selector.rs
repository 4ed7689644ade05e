//! Parameter selection by normalized name
//!
//! Registry parameter names vary between sources ("Latitude of natural
//! origin", "latitude_of_origin", "Lat. of origin"). Compilers describe the
//! roles they need with [`ParameterSelector`]s and let a [`ParameterLookup`]
//! bind each role to at most one parameter.
//!
//! Assignment is greedy in selector order: every selector takes the
//! unclaimed parameter with the highest positive score, the earliest
//! parameter winning ties. When two selectors want the same parameter the
//! one passed first keeps it.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::model::NamedParameter;
use crate::naming::normalize_parameter_name;

/// Scores parameter names against one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSelector {
    /// Score 1 when the normalized name equals the text
    FullMatch(String),
    /// Score one point per keyword contained in the normalized name
    Keywords(Vec<String>),
}

impl ParameterSelector {
    /// # Panics
    ///
    /// Panics when `text` normalizes to an empty string.
    pub fn full_match(text: &str) -> Self {
        let normalized = normalize_parameter_name(text);
        assert!(
            !normalized.is_empty(),
            "full match selector needs non-empty text"
        );
        ParameterSelector::FullMatch(normalized)
    }

    /// # Panics
    ///
    /// Panics when `keywords` is empty or any keyword normalizes to nothing.
    pub fn keywords(keywords: &[&str]) -> Self {
        assert!(
            !keywords.is_empty(),
            "keyword selector needs at least one keyword"
        );
        let keywords: Vec<String> = keywords
            .iter()
            .map(|keyword| normalize_parameter_name(keyword))
            .collect();
        assert!(
            keywords.iter().all(|keyword| !keyword.is_empty()),
            "keyword selector keywords must not be empty"
        );
        ParameterSelector::Keywords(keywords)
    }

    /// Score an already normalized parameter name
    pub fn score(&self, normalized_name: &str) -> usize {
        match self {
            ParameterSelector::FullMatch(text) => usize::from(normalized_name == text),
            ParameterSelector::Keywords(keywords) => keywords
                .iter()
                .filter(|keyword| normalized_name.contains(keyword.as_str()))
                .count(),
        }
    }
}

/// Parameters of one operation with their names normalized once
#[derive(Debug)]
pub struct ParameterLookup<'a> {
    candidates: Vec<(String, &'a NamedParameter)>,
}

impl<'a> ParameterLookup<'a> {
    pub fn new(parameters: &'a [NamedParameter]) -> Self {
        let candidates = parameters
            .iter()
            .map(|parameter| (normalize_parameter_name(&parameter.name), parameter))
            .collect();
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Bind a fixed set of roles
    pub fn assign<const N: usize>(
        &self,
        selectors: [&ParameterSelector; N],
    ) -> [Option<&'a NamedParameter>; N] {
        let mut claimed = vec![false; self.candidates.len()];
        selectors.map(|selector| self.claim(selector, &mut claimed))
    }

    /// Bind a variable number of roles
    pub fn assign_all(&self, selectors: &[ParameterSelector]) -> Vec<Option<&'a NamedParameter>> {
        let mut claimed = vec![false; self.candidates.len()];
        selectors
            .iter()
            .map(|selector| self.claim(selector, &mut claimed))
            .collect()
    }

    fn claim(
        &self,
        selector: &ParameterSelector,
        claimed: &mut [bool],
    ) -> Option<&'a NamedParameter> {
        let mut best: Option<(usize, usize)> = None;
        for (index, (name, _)) in self.candidates.iter().enumerate() {
            if claimed[index] {
                continue;
            }
            let score = selector.score(name);
            if score == 0 {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        best.map(|(index, _)| {
            claimed[index] = true;
            self.candidates[index].1
        })
    }
}

/// True when the list is non-empty and every role is bound
pub fn all_selected(bindings: &[Option<&NamedParameter>]) -> bool {
    !bindings.is_empty() && bindings.iter().all(Option::is_some)
}
