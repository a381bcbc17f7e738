use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::{Event, EventType};
use crate::predicate::{all_of, Predicate, PredicateFault, Test};

/// Commentary clip identifier (`chunk-{id}.wav` in a clip directory)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub u32);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Predicate fault attributed to the clip whose rule raised it
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("clip {clip_id} faulted while matching: {source}")]
pub struct MatchFault {
    pub clip_id: ClipId,
    pub source: PredicateFault,
}

/// One clip and the conjunction of predicates that makes it eligible
///
/// Identifiers may repeat: alternate takes of the same line share an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClipRule {
    pub id: ClipId,
    #[serde(default)]
    pub when: Vec<Predicate>,
}

impl ClipRule {
    pub fn new(id: u32, when: Vec<Predicate>) -> Self {
        Self { id: ClipId(id), when }
    }

    /// Conjunction of the rule's predicates; an empty rule matches everything
    pub fn matches<R: Rng + ?Sized>(&self, event: &Event, rng: &mut R) -> Result<bool, MatchFault> {
        all_of(&self.when, event, rng).map_err(|source| MatchFault { clip_id: self.id, source })
    }

    /// Event type the rule is gated on (first top-level `type_is`)
    pub fn gating_type(&self) -> Option<&EventType> {
        self.when.iter().find_map(|p| match p {
            Predicate::Leaf(Test::TypeIs(t)) => Some(t),
            _ => None,
        })
    }

    /// Rule contains a `todo` leaf at top level and can never match
    pub fn is_disabled(&self) -> bool {
        self.when.iter().any(|p| matches!(p, Predicate::Leaf(Test::Todo(_))))
    }

    pub fn is_random(&self) -> bool {
        self.when.iter().any(Predicate::is_random)
    }
}
