use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fields::{self, CmpOp, DetailKind, FlagField, NameField, PointField, ScalarField};
use super::zone::Zone;
use super::PredicateFault;
use crate::event::{Event, EventType};

fn default_true() -> bool {
    true
}

/// Leaf test of the predicate tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Test {
    /// Annotation; always holds
    Comment(String),
    /// Rule not usable yet; never holds
    Todo(String),
    TypeIs(EventType),
    InZone {
        point: PointField,
        zone: Zone,
    },
    /// `end.x < location.x - margin`
    Backwards {
        end: PointField,
        margin: f64,
    },
    NameIs {
        field: NameField,
        name: String,
    },
    NameIn {
        field: NameField,
        names: Vec<String>,
    },
    NameContains {
        field: NameField,
        fragment: String,
    },
    Compare {
        field: ScalarField,
        op: CmpOp,
        value: f64,
    },
    Flag(FlagField),
    /// Pass with no recorded outcome (StatsBomb omits it for completed passes)
    PassCompleted,
    HasDetail(DetailKind),
    /// xG2 at least `value`; `default` when the event has no xG2
    Xg2AtLeast {
        value: f64,
        #[serde(default = "default_true")]
        default: bool,
    },
    /// Random gate: one uniform draw per evaluation
    Chance {
        probability: f64,
    },
}

impl Test {
    pub fn evaluate<R: Rng + ?Sized>(&self, event: &Event, rng: &mut R) -> Result<bool, PredicateFault> {
        match self {
            Test::Comment(_) => Ok(true),
            Test::Todo(_) => Ok(false),
            Test::TypeIs(t) => Ok(&event.event_type == t),
            Test::InZone { point, zone } => Ok(point.extract(event)?.is_some_and(|p| zone.contains(p))),
            Test::Backwards { end, margin } => {
                let start = PointField::Location.extract(event)?;
                let end = end.extract(event)?;
                Ok(match (start, end) {
                    (Some(s), Some(e)) => e.x < s.x - margin,
                    _ => false,
                })
            }
            Test::NameIs { field, name } => Ok(field.extract(event)? == Some(name.as_str())),
            Test::NameIn { field, names } => {
                Ok(field.extract(event)?.is_some_and(|n| names.iter().any(|candidate| candidate == n)))
            }
            Test::NameContains { field, fragment } => {
                Ok(field.extract(event)?.is_some_and(|n| n.contains(fragment.as_str())))
            }
            Test::Compare { field, op, value } => {
                Ok(field.extract(event)?.is_some_and(|v| op.apply(v, *value)))
            }
            Test::Flag(field) => Ok(field.extract(event)? == Some(true)),
            Test::PassCompleted => Ok(fields::pass(event)?.is_some_and(|p| p.outcome.is_none())),
            Test::HasDetail(kind) => Ok(kind.is_present(event)),
            Test::Xg2AtLeast { value, default } => {
                Ok(match ScalarField::ShotXg2.extract(event)? {
                    Some(xg2) => xg2 >= *value,
                    None => *default,
                })
            }
            Test::Chance { probability } => Ok(rng.gen::<f64>() < *probability),
        }
    }

    /// True for tests whose outcome depends on the random source
    pub fn is_random(&self) -> bool {
        matches!(self, Test::Chance { .. })
    }
}
