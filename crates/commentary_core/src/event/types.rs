use serde::{Deserialize, Serialize};
use std::fmt;

/// StatsBomb pitch length (x axis), in yards
pub const PITCH_LENGTH: f64 = 120.0;
/// StatsBomb pitch width (y axis), in yards
pub const PITCH_WIDTH: f64 = 80.0;

/// Pitch coordinate in StatsBomb units (x: 0..=120, y: 0..=80)
///
/// JSON form is an array of two or three numbers; a third (height) component
/// is accepted and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
}

impl PitchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl TryFrom<Vec<f64>> for PitchPoint {
    type Error = String;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        match coords.as_slice() {
            [x, y] | [x, y, _] => Ok(Self { x: *x, y: *y }),
            other => Err(format!("location must have 2 or 3 components, got {}", other.len())),
        }
    }
}

impl From<PitchPoint> for [f64; 2] {
    fn from(p: PitchPoint) -> Self {
        [p.x, p.y]
    }
}

/// Enumerated StatsBomb value (`{"id": 9, "name": "Incomplete"}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub id: u32,
    pub name: String,
}

impl Named {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Event type tag
///
/// Serialized as the StatsBomb type name. Names this crate has no variant for
/// are kept verbatim in [`EventType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TypeTag", into = "String")]
pub enum EventType {
    StartingXi,
    HalfStart,
    HalfEnd,
    Pass,
    BallReceipt,
    Carry,
    Pressure,
    Shot,
    GoalKeeper,
    Dribble,
    DribbledPast,
    Dispossessed,
    Duel,
    Interception,
    Clearance,
    Block,
    BallRecovery,
    Miscontrol,
    FoulCommitted,
    FoulWon,
    Offside,
    Substitution,
    InjuryStoppage,
    OwnGoalFor,
    OwnGoalAgainst,
    Other(String),
}

impl EventType {
    const KNOWN: [EventType; 25] = [
        EventType::StartingXi,
        EventType::HalfStart,
        EventType::HalfEnd,
        EventType::Pass,
        EventType::BallReceipt,
        EventType::Carry,
        EventType::Pressure,
        EventType::Shot,
        EventType::GoalKeeper,
        EventType::Dribble,
        EventType::DribbledPast,
        EventType::Dispossessed,
        EventType::Duel,
        EventType::Interception,
        EventType::Clearance,
        EventType::Block,
        EventType::BallRecovery,
        EventType::Miscontrol,
        EventType::FoulCommitted,
        EventType::FoulWon,
        EventType::Offside,
        EventType::Substitution,
        EventType::InjuryStoppage,
        EventType::OwnGoalFor,
        EventType::OwnGoalAgainst,
    ];

    /// StatsBomb display name
    pub fn name(&self) -> &str {
        match self {
            EventType::StartingXi => "Starting XI",
            EventType::HalfStart => "Half Start",
            EventType::HalfEnd => "Half End",
            EventType::Pass => "Pass",
            EventType::BallReceipt => "Ball Receipt*",
            EventType::Carry => "Carry",
            EventType::Pressure => "Pressure",
            EventType::Shot => "Shot",
            EventType::GoalKeeper => "Goal Keeper",
            EventType::Dribble => "Dribble",
            EventType::DribbledPast => "Dribbled Past",
            EventType::Dispossessed => "Dispossessed",
            EventType::Duel => "Duel",
            EventType::Interception => "Interception",
            EventType::Clearance => "Clearance",
            EventType::Block => "Block",
            EventType::BallRecovery => "Ball Recovery",
            EventType::Miscontrol => "Miscontrol",
            EventType::FoulCommitted => "Foul Committed",
            EventType::FoulWon => "Foul Won",
            EventType::Offside => "Offside",
            EventType::Substitution => "Substitution",
            EventType::InjuryStoppage => "Injury Stoppage",
            EventType::OwnGoalFor => "Own Goal For",
            EventType::OwnGoalAgainst => "Own Goal Against",
            EventType::Other(name) => name,
        }
    }

    /// Parse a StatsBomb type name
    pub fn from_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .unwrap_or_else(|| EventType::Other(name.to_string()))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        t.name().to_string()
    }
}

/// Accepts both `"Pass"` and `{"id": 30, "name": "Pass"}`
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeTag {
    Name(String),
    Named(Named),
}

impl From<TypeTag> for EventType {
    fn from(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Name(name) => EventType::from_name(&name),
            TypeTag::Named(named) => EventType::from_name(&named.name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<PitchPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Named>,
    /// Absent when the pass was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statsbomb_xg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statsbomb_xg2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_part: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<Named>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub shot_type: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_on_one: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<PitchPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DribbleDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutmeg: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarryDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<PitchPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoulCommittedDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advantage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DribbledPastDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpress: Option<bool>,
}

/// One match event
///
/// Only the type tag and the clock are mandatory. Sub-records other than the
/// one matching the type tag are normally absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub index: u32,
    #[serde(default = "default_period")]
    pub period: u8,
    pub minute: u32,
    pub second: u32,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PitchPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Named>,
    #[serde(rename = "pass", default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<PassDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot: Option<ShotDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dribble: Option<DribbleDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carry: Option<CarryDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foul_committed: Option<FoulCommittedDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dribbled_past: Option<DribbledPastDetail>,
}

fn default_period() -> u8 {
    1
}

impl Event {
    /// Bare event of the given type at `minute:second`
    pub fn new(event_type: EventType, minute: u32, second: u32) -> Self {
        Self {
            id: None,
            index: 0,
            period: 1,
            minute,
            second,
            event_type,
            duration: None,
            location: None,
            position: None,
            pass: None,
            shot: None,
            dribble: None,
            carry: None,
            foul_committed: None,
            dribbled_past: None,
        }
    }

    /// Event starting at an arbitrary second offset (fractional part dropped)
    pub fn at(event_type: EventType, start_secs: u32) -> Self {
        Self::new(event_type, start_secs / 60, start_secs % 60)
    }

    pub fn with_location(mut self, x: f64, y: f64) -> Self {
        self.location = Some(PitchPoint::new(x, y));
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_position(mut self, name: &str) -> Self {
        self.position = Some(Named::new(0, name));
        self
    }

    pub fn with_pass(mut self, pass: PassDetail) -> Self {
        self.pass = Some(pass);
        self
    }

    pub fn with_shot(mut self, shot: ShotDetail) -> Self {
        self.shot = Some(shot);
        self
    }

    /// Start time in seconds (minute * 60 + second)
    pub fn start_time(&self) -> f64 {
        f64::from(self.minute) * 60.0 + f64::from(self.second)
    }

    /// End time in seconds; a missing duration counts as zero
    pub fn end_time(&self) -> f64 {
        self.start_time() + self.duration.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parses_statsbomb_shape() {
        let json = r#"{
            "id": "a1",
            "index": 12,
            "period": 1,
            "timestamp": "00:01:05.120",
            "minute": 1,
            "second": 5,
            "type": {"id": 30, "name": "Pass"},
            "duration": 1.4,
            "location": [35.0, 20.5],
            "position": {"id": 3, "name": "Right Center Back"},
            "pass": {
                "end_location": [30.0, 22.0],
                "length": 5.4,
                "height": {"id": 1, "name": "Ground Pass"}
            }
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Pass);
        assert_eq!(event.start_time(), 65.0);
        assert!((event.end_time() - 66.4).abs() < 1e-9);
        assert_eq!(event.location, Some(PitchPoint::new(35.0, 20.5)));
        let pass = event.pass.unwrap();
        assert_eq!(pass.height.unwrap().name, "Ground Pass");
        assert!(pass.outcome.is_none());
    }

    #[test]
    fn test_unknown_type_name_is_preserved() {
        let json = r#"{"minute": 0, "second": 0, "type": {"id": 99, "name": "Referee Ball-Drop"}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Other("Referee Ball-Drop".into()));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["type"], "Referee Ball-Drop");
    }

    #[test]
    fn test_type_name_roundtrip() {
        for t in EventType::KNOWN.iter() {
            assert_eq!(&EventType::from_name(t.name()), t);
        }
        assert_eq!(EventType::from_name("Ball Receipt*"), EventType::BallReceipt);
    }

    #[test]
    fn test_three_component_location_drops_height() {
        let p: PitchPoint = serde_json::from_str("[118.5, 40.1, 2.3]").unwrap();
        assert_eq!(p, PitchPoint::new(118.5, 40.1));
        assert!(serde_json::from_str::<PitchPoint>("[1.0]").is_err());
    }

    #[test]
    fn test_missing_duration_means_instant_event() {
        let event = Event::at(EventType::Offside, 125);
        assert_eq!(event.minute, 2);
        assert_eq!(event.second, 5);
        assert_eq!(event.start_time(), event.end_time());
    }
}
