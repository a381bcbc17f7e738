//! Field extraction from events
//!
//! Each accessor returns `Ok(None)` when the value is absent for an expected
//! reason, and a [`PredicateFault`] when the event's own sub-record is missing.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PredicateFault;
use crate::event::{
    CarryDetail, DribbleDetail, DribbledPastDetail, Event, EventType, FoulCommittedDetail,
    Named, PassDetail, PitchPoint, ShotDetail,
};

/// Type-specific sub-record of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    Pass,
    Shot,
    Dribble,
    Carry,
    FoulCommitted,
    DribbledPast,
}

impl DetailKind {
    /// Event type on which this sub-record must be present
    ///
    /// Foul and dribbled-past details are optional even on their own events.
    pub fn required_on(self) -> Option<EventType> {
        match self {
            DetailKind::Pass => Some(EventType::Pass),
            DetailKind::Shot => Some(EventType::Shot),
            DetailKind::Dribble => Some(EventType::Dribble),
            DetailKind::Carry => Some(EventType::Carry),
            DetailKind::FoulCommitted | DetailKind::DribbledPast => None,
        }
    }

    pub fn is_present(self, event: &Event) -> bool {
        match self {
            DetailKind::Pass => event.pass.is_some(),
            DetailKind::Shot => event.shot.is_some(),
            DetailKind::Dribble => event.dribble.is_some(),
            DetailKind::Carry => event.carry.is_some(),
            DetailKind::FoulCommitted => event.foul_committed.is_some(),
            DetailKind::DribbledPast => event.dribbled_past.is_some(),
        }
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DetailKind::Pass => "pass",
            DetailKind::Shot => "shot",
            DetailKind::Dribble => "dribble",
            DetailKind::Carry => "carry",
            DetailKind::FoulCommitted => "foul_committed",
            DetailKind::DribbledPast => "dribbled_past",
        };
        f.write_str(name)
    }
}

fn detail<'a, T>(
    event: &Event,
    kind: DetailKind,
    value: Option<&'a T>,
) -> Result<Option<&'a T>, PredicateFault> {
    match value {
        Some(d) => Ok(Some(d)),
        None if kind.required_on().as_ref() == Some(&event.event_type) => {
            Err(PredicateFault::MissingDetail { event_type: event.event_type.clone(), detail: kind })
        }
        None => Ok(None),
    }
}

pub(crate) fn pass(event: &Event) -> Result<Option<&PassDetail>, PredicateFault> {
    detail(event, DetailKind::Pass, event.pass.as_ref())
}

pub(crate) fn shot(event: &Event) -> Result<Option<&ShotDetail>, PredicateFault> {
    detail(event, DetailKind::Shot, event.shot.as_ref())
}

pub(crate) fn dribble(event: &Event) -> Result<Option<&DribbleDetail>, PredicateFault> {
    detail(event, DetailKind::Dribble, event.dribble.as_ref())
}

pub(crate) fn carry(event: &Event) -> Result<Option<&CarryDetail>, PredicateFault> {
    detail(event, DetailKind::Carry, event.carry.as_ref())
}

pub(crate) fn foul(event: &Event) -> Result<Option<&FoulCommittedDetail>, PredicateFault> {
    detail(event, DetailKind::FoulCommitted, event.foul_committed.as_ref())
}

pub(crate) fn dribbled_past(event: &Event) -> Result<Option<&DribbledPastDetail>, PredicateFault> {
    detail(event, DetailKind::DribbledPast, event.dribbled_past.as_ref())
}

/// Coordinate carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointField {
    Location,
    PassEnd,
    CarryEnd,
}

impl PointField {
    pub fn extract(self, event: &Event) -> Result<Option<PitchPoint>, PredicateFault> {
        let point = match self {
            PointField::Location => event.location,
            PointField::PassEnd => pass(event)?.and_then(|p| p.end_location),
            PointField::CarryEnd => carry(event)?.and_then(|c| c.end_location),
        };
        match point {
            Some(p) if !p.is_finite() => Err(PredicateFault::NonFiniteCoordinate { field: self }),
            other => Ok(other),
        }
    }
}

impl fmt::Display for PointField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PointField::Location => "location",
            PointField::PassEnd => "pass_end",
            PointField::CarryEnd => "carry_end",
        };
        f.write_str(name)
    }
}

/// Enumerated value tested by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameField {
    Position,
    PassHeight,
    PassOutcome,
    PassTechnique,
    ShotOutcome,
    ShotType,
    ShotTechnique,
    ShotBodyPart,
    DribbleOutcome,
    FoulCard,
}

impl NameField {
    pub fn extract(self, event: &Event) -> Result<Option<&str>, PredicateFault> {
        let named: Option<&Named> = match self {
            NameField::Position => event.position.as_ref(),
            NameField::PassHeight => pass(event)?.and_then(|p| p.height.as_ref()),
            NameField::PassOutcome => pass(event)?.and_then(|p| p.outcome.as_ref()),
            NameField::PassTechnique => pass(event)?.and_then(|p| p.technique.as_ref()),
            NameField::ShotOutcome => shot(event)?.and_then(|s| s.outcome.as_ref()),
            NameField::ShotType => shot(event)?.and_then(|s| s.shot_type.as_ref()),
            NameField::ShotTechnique => shot(event)?.and_then(|s| s.technique.as_ref()),
            NameField::ShotBodyPart => shot(event)?.and_then(|s| s.body_part.as_ref()),
            NameField::DribbleOutcome => dribble(event)?.and_then(|d| d.outcome.as_ref()),
            NameField::FoulCard => foul(event)?.and_then(|f| f.card.as_ref()),
        };
        Ok(named.map(|n| n.name.as_str()))
    }
}

/// Numeric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    PassLength,
    ShotXg,
    ShotXg2,
}

impl ScalarField {
    pub fn extract(self, event: &Event) -> Result<Option<f64>, PredicateFault> {
        Ok(match self {
            ScalarField::PassLength => pass(event)?.and_then(|p| p.length),
            ScalarField::ShotXg => shot(event)?.and_then(|s| s.statsbomb_xg),
            ScalarField::ShotXg2 => shot(event)?.and_then(|s| s.statsbomb_xg2),
        })
    }
}

/// Boolean value; absent counts as false
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagField {
    PassCross,
    ShotOneOnOne,
    DribbleNutmeg,
    DribbledPastCounterpress,
    FoulAdvantage,
    FoulPenalty,
}

impl FlagField {
    pub fn extract(self, event: &Event) -> Result<Option<bool>, PredicateFault> {
        Ok(match self {
            FlagField::PassCross => pass(event)?.and_then(|p| p.cross),
            FlagField::ShotOneOnOne => shot(event)?.and_then(|s| s.one_on_one),
            FlagField::DribbleNutmeg => dribble(event)?.and_then(|d| d.nutmeg),
            FlagField::DribbledPastCounterpress => dribbled_past(event)?.and_then(|d| d.counterpress),
            FlagField::FoulAdvantage => foul(event)?.and_then(|f| f.advantage),
            FlagField::FoulPenalty => foul(event)?.and_then(|f| f.penalty),
        })
    }
}

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl CmpOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}
