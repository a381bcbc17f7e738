//! Predicate algebra over match events
//!
//! Rules are explicit expression trees rather than closures, so they can be
//! loaded from data, validated, inspected and serialized:
//!
//! ```text
//! Predicate = Leaf(Test) | And[Predicate..] | Or[Predicate..] | Not(Predicate)
//! ```
//!
//! Evaluation is pure except for [`Test::Chance`], which draws from the random
//! source passed in by the caller. Conjunctions and disjunctions evaluate left
//! to right and stop at the first deciding term.

pub mod fields;
pub mod leaf;
pub mod zone;

pub use fields::{CmpOp, DetailKind, FlagField, NameField, PointField, ScalarField};
pub use leaf::Test;
pub use zone::{Zone, ZonePreset};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventType};

/// Structurally unexpected event data met during evaluation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredicateFault {
    #[error("{event_type} event carries no {detail} detail")]
    MissingDetail { event_type: EventType, detail: DetailKind },

    #[error("non-finite coordinate in {field}")]
    NonFiniteCoordinate { field: PointField },
}

/// Predicate expression tree
///
/// In catalogs a leaf is written directly (`type_is: Pass`), combinators as
/// `and: [..]`, `or: [..]` and `not: ..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    #[serde(untagged)]
    Leaf(Test),
}

impl Predicate {
    pub fn evaluate<R: Rng + ?Sized>(&self, event: &Event, rng: &mut R) -> Result<bool, PredicateFault> {
        match self {
            Predicate::Leaf(test) => test.evaluate(event, rng),
            Predicate::And(terms) => all_of(terms, event, rng),
            Predicate::Or(terms) => {
                for term in terms {
                    if term.evaluate(event, rng)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(inner) => Ok(!inner.evaluate(event, rng)?),
        }
    }

    /// Every leaf of the tree, depth first
    pub fn leaves(&self) -> Vec<&Test> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Test>) {
        match self {
            Predicate::Leaf(test) => out.push(test),
            Predicate::And(terms) | Predicate::Or(terms) => {
                terms.iter().for_each(|t| t.collect_leaves(out));
            }
            Predicate::Not(inner) => inner.collect_leaves(out),
        }
    }

    pub fn is_random(&self) -> bool {
        self.leaves().iter().any(|t| t.is_random())
    }

    // Builders

    pub fn type_is(event_type: EventType) -> Self {
        Predicate::Leaf(Test::TypeIs(event_type))
    }

    pub fn in_zone(point: PointField, zone: Zone) -> Self {
        Predicate::Leaf(Test::InZone { point, zone })
    }

    pub fn name_is(field: NameField, name: &str) -> Self {
        Predicate::Leaf(Test::NameIs { field, name: name.to_string() })
    }

    pub fn compare(field: ScalarField, op: CmpOp, value: f64) -> Self {
        Predicate::Leaf(Test::Compare { field, op, value })
    }

    pub fn flag(field: FlagField) -> Self {
        Predicate::Leaf(Test::Flag(field))
    }

    pub fn chance(probability: f64) -> Self {
        Predicate::Leaf(Test::Chance { probability })
    }

    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }
}

impl From<Test> for Predicate {
    fn from(test: Test) -> Self {
        Predicate::Leaf(test)
    }
}

/// Conjunction with short-circuit; empty is vacuously true
pub fn all_of<R: Rng + ?Sized>(terms: &[Predicate], event: &Event, rng: &mut R) -> Result<bool, PredicateFault> {
    for term in terms {
        if !term.evaluate(event, rng)? {
            return Ok(false);
        }
    }
    Ok(true)
}
