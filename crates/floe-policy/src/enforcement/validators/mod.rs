//! Built-in validators.
//!
//! Each validator is a pure function of `(graph, policy)`. None reads
//! another's output, so they can run in any order or in parallel; the
//! enforcer still merges them in `ValidatorKind::ALL` order.

pub mod coverage;
pub mod custom;
pub mod documentation;
pub mod naming;
pub mod semantic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::violation::Violation;
use crate::graph::GraphModel;
use crate::inheritance::ResolvedPolicy;

pub type ValidatorFn = fn(&GraphModel, &ResolvedPolicy) -> Vec<Violation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    Naming,
    Coverage,
    Documentation,
    Semantic,
    Custom,
}

impl ValidatorKind {
    /// Merge order. Custom rules come last: they only add.
    pub const ALL: [ValidatorKind; 5] = [
        ValidatorKind::Naming,
        ValidatorKind::Coverage,
        ValidatorKind::Documentation,
        ValidatorKind::Semantic,
        ValidatorKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::Coverage => "coverage",
            Self::Documentation => "documentation",
            Self::Semantic => "semantic",
            Self::Custom => "custom",
        }
    }

    fn function(&self) -> ValidatorFn {
        match self {
            Self::Naming => naming::validate,
            Self::Coverage => coverage::validate,
            Self::Documentation => documentation::validate,
            Self::Semantic => semantic::validate,
            Self::Custom => custom::validate,
        }
    }

    pub fn run(&self, graph: &GraphModel, policy: &ResolvedPolicy) -> Vec<Violation> {
        (self.function())(graph, policy)
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown validator '{s}'"))
    }
}

/// `a, b, c`
pub(crate) fn join<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items.into_iter().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_name() {
        for kind in ValidatorKind::ALL {
            assert_eq!(kind.as_str().parse::<ValidatorKind>(), Ok(kind));
        }
    }
}
