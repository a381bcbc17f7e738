//! Clip catalog: ordered clip rules loaded as data
//!
//! Catalog files are YAML (or JSON) documents:
//!
//! ```yaml
//! version: 1
//! clips:
//!   - id: 2
//!     when:
//!       - type_is: Pass
//!       - in_zone: { point: location, zone: defensive_third }
//!       - pass_completed
//!       - chance: { probability: 0.05 }
//! ```
//!
//! Rules are validated on load and immutable afterwards.

pub mod rule;
pub mod validate;

pub use rule::{ClipId, ClipRule, MatchFault};
pub use validate::validate_rules;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::event::Event;

/// Sample catalog shipped with the crate
pub const SAMPLE_CATALOG_YAML: &str = include_str!("../../../../data/catalog/sample_clips.yaml");

pub const CATALOG_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("invalid yaml catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid json catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported catalog version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("unsupported catalog file extension: {0}")]
    UnsupportedFormat(String),

    #[error("clip {clip_id}: {reason}")]
    InvalidRule { clip_id: ClipId, reason: String },
}

fn default_version() -> u32 {
    CATALOG_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDoc {
    #[serde(default = "default_version")]
    version: u32,
    /// Written as `type_is: Pass` / `not: {...}` maps, the shape the loader reads
    #[serde(serialize_with = "serde_yaml::with::singleton_map_recursive::serialize")]
    clips: Vec<ClipRule>,
}

/// Result of matching one event against the whole catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    /// Matching clip ids in catalog order, duplicates kept
    pub ids: Vec<ClipId>,
    /// Faults raised by individual rules; the other rules were still evaluated
    pub faults: Vec<MatchFault>,
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }
}

/// Rule counts for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub rules: usize,
    pub distinct_ids: usize,
    /// Rules carrying a top-level `todo`
    pub disabled: usize,
    /// Rules with a random gate anywhere in their tree
    pub random: usize,
    /// Rules per gating event type; ungated rules are counted under "*"
    pub by_event_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipCatalog {
    rules: Vec<ClipRule>,
}

impl ClipCatalog {
    /// Build a catalog from rules, rejecting invalid ones
    pub fn new(rules: Vec<ClipRule>) -> Result<Self, CatalogError> {
        validate_rules(&rules)?;
        Ok(Self { rules })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDoc = serde_yaml::from_str(yaml)?;
        Self::from_doc(doc)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDoc = serde_json::from_str(json)?;
        Self::from_doc(doc)
    }

    /// Load a catalog file; format follows the extension (.yaml/.yml/.json)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
        let text = fs::read_to_string(path)?;
        let catalog = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };
        log::info!("Loaded {} clip rules from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// The sample catalog embedded at compile time
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_yaml_str(SAMPLE_CATALOG_YAML)
    }

    fn from_doc(doc: CatalogDoc) -> Result<Self, CatalogError> {
        if doc.version != CATALOG_VERSION {
            return Err(CatalogError::Version { found: doc.version, expected: CATALOG_VERSION });
        }
        Self::new(doc.clips)
    }

    pub fn to_yaml_string(&self) -> Result<String, CatalogError> {
        let doc = CatalogDoc { version: CATALOG_VERSION, clips: self.rules.clone() };
        Ok(serde_yaml::to_string(&doc)?)
    }

    pub fn rules(&self) -> &[ClipRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Match every rule against `event`, in catalog order
    ///
    /// A faulting rule is recorded and skipped; it never stops the scan.
    pub fn candidates<R: Rng + ?Sized>(&self, event: &Event, rng: &mut R) -> CandidateSet {
        let mut set = CandidateSet::default();
        for rule in &self.rules {
            match rule.matches(event, rng) {
                Ok(true) => set.ids.push(rule.id),
                Ok(false) => {}
                Err(fault) => set.faults.push(fault),
            }
        }
        set
    }

    pub fn summary(&self) -> CatalogSummary {
        let mut by_event_type = BTreeMap::new();
        for rule in &self.rules {
            let key = rule.gating_type().map_or_else(|| "*".to_string(), |t| t.name().to_string());
            *by_event_type.entry(key).or_insert(0) += 1;
        }
        CatalogSummary {
            rules: self.rules.len(),
            distinct_ids: self.rules.iter().map(|r| r.id).collect::<BTreeSet<_>>().len(),
            disabled: self.rules.iter().filter(|r| r.is_disabled()).count(),
            random: self.rules.iter().filter(|r| r.is_random()).count(),
            by_event_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventType, Named, PassDetail};
    use crate::predicate::{NameField, PointField, Predicate, PredicateFault, Test, Zone};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn test_empty_rule_matches_everything() {
        let rule = ClipRule::new(1, vec![]);
        for event in [Event::at(EventType::Pass, 1), Event::at(EventType::Other("Shield".into()), 2)] {
            assert_eq!(rule.matches(&event, &mut rng()), Ok(true));
        }
    }

    #[test]
    fn test_fault_carries_clip_id() {
        let rule = ClipRule::new(
            42,
            vec![
                Predicate::type_is(EventType::Pass),
                Predicate::name_is(NameField::PassHeight, "Ground Pass"),
            ],
        );
        let fault = rule.matches(&Event::at(EventType::Pass, 1), &mut rng()).unwrap_err();
        assert_eq!(fault.clip_id, ClipId(42));
        assert!(matches!(fault.source, PredicateFault::MissingDetail { .. }));
        assert!(fault.to_string().contains("clip 42"));
    }

    #[test]
    fn test_fault_does_not_stop_other_rules() {
        let catalog = ClipCatalog::new(vec![
            ClipRule::new(1, vec![Predicate::type_is(EventType::Pass)]),
            ClipRule::new(
                2,
                vec![Predicate::type_is(EventType::Pass), Predicate::name_is(NameField::PassHeight, "High Pass")],
            ),
            ClipRule::new(3, vec![]),
        ])
        .unwrap();

        let set = catalog.candidates(&Event::at(EventType::Pass, 1), &mut rng());
        assert_eq!(set.ids, vec![ClipId(1), ClipId(3)]);
        assert_eq!(set.faults.len(), 1);
        assert_eq!(set.faults[0].clip_id, ClipId(2));
    }

    #[test]
    fn test_duplicate_ids_are_kept_in_candidates() {
        let catalog = ClipCatalog::new(vec![
            ClipRule::new(5, vec![Predicate::type_is(EventType::Offside)]),
            ClipRule::new(5, vec![]),
            ClipRule::new(6, vec![Predicate::type_is(EventType::Shot)]),
        ])
        .unwrap();
        let set = catalog.candidates(&Event::at(EventType::Offside, 9), &mut rng());
        assert_eq!(set.ids, vec![ClipId(5), ClipId(5)]);
        assert!(!set.has_faults());
    }

    #[test]
    fn test_random_rules_change_candidates_with_rng() {
        let catalog = ClipCatalog::new(vec![ClipRule::new(
            1,
            vec![Predicate::type_is(EventType::BallReceipt), Predicate::chance(0.05)],
        )])
        .unwrap();
        let event = Event::at(EventType::BallReceipt, 4);
        assert_eq!(catalog.candidates(&event, &mut StepRng::new(0, 0)).ids, vec![ClipId(1)]);
        assert!(catalog.candidates(&event, &mut StepRng::new(u64::MAX, 0)).is_empty());
    }

    #[test]
    fn test_load_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("clips.yaml");
        let json_path = dir.path().join("clips.json");
        fs::write(
            &yaml_path,
            "clips:\n  - id: 446\n    when:\n      - type_is: Offside\n  - id: 1\n",
        )
        .unwrap();
        fs::write(
            &json_path,
            r#"{"version": 1, "clips": [{"id": 446, "when": [{"type_is": "Offside"}]}, {"id": 1}]}"#,
        )
        .unwrap();

        let from_yaml = ClipCatalog::load(&yaml_path).unwrap();
        let from_json = ClipCatalog::load(&json_path).unwrap();
        assert_eq!(from_yaml, from_json);
        assert_eq!(from_yaml.len(), 2);
        assert!(from_yaml.rules()[1].when.is_empty());

        let txt = dir.path().join("clips.txt");
        fs::write(&txt, "").unwrap();
        assert!(matches!(ClipCatalog::load(&txt), Err(CatalogError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let err = ClipCatalog::from_yaml_str("version: 9\nclips: []\n").unwrap_err();
        assert!(matches!(err, CatalogError::Version { found: 9, expected: 1 }));
    }

    #[test]
    fn test_invalid_rule_rejected_on_load() {
        let yaml = "clips:\n  - id: 8\n    when:\n      - chance: { probability: -0.1 }\n";
        assert!(matches!(
            ClipCatalog::from_yaml_str(yaml),
            Err(CatalogError::InvalidRule { clip_id: ClipId(8), .. })
        ));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let catalog = ClipCatalog::embedded().unwrap();
        let yaml = catalog.to_yaml_string().unwrap();
        assert_eq!(ClipCatalog::from_yaml_str(&yaml).unwrap(), catalog);
    }

    #[test]
    fn test_flat_rule_written_as_maps() {
        let catalog = ClipCatalog::new(vec![ClipRule::new(1, vec![Predicate::type_is(EventType::Pass)])]).unwrap();
        let yaml = catalog.to_yaml_string().unwrap();
        assert!(yaml.contains("type_is: Pass"), "{}", yaml);
        assert!(!yaml.contains('!'), "{}", yaml);
        assert_eq!(ClipCatalog::from_yaml_str(&yaml).unwrap(), catalog);
    }

    #[test]
    fn test_nested_rule_yaml_roundtrip() {
        let catalog = ClipCatalog::new(vec![ClipRule::new(
            4,
            vec![
                Predicate::type_is(EventType::Pass),
                Predicate::negate(Predicate::in_zone(PointField::Location, Zone::DEFENSIVE_THIRD)),
                Predicate::Leaf(Test::PassCompleted),
                Predicate::chance(0.25),
            ],
        )])
        .unwrap();
        let yaml = catalog.to_yaml_string().unwrap();
        assert!(yaml.contains("not:"), "{}", yaml);
        assert_eq!(ClipCatalog::from_yaml_str(&yaml).unwrap(), catalog);
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        let rule_typo = "clips:\n  - id: 9\n    whne:\n      - type_is: Shot\n";
        assert!(matches!(ClipCatalog::from_yaml_str(rule_typo), Err(CatalogError::Yaml(_))));

        let doc_typo = "version: 1\nclip:\n  - id: 9\n";
        assert!(matches!(ClipCatalog::from_yaml_str(doc_typo), Err(CatalogError::Yaml(_))));
    }

    #[test]
    fn test_embedded_catalog_loads_and_matches() {
        let catalog = ClipCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());

        let summary = catalog.summary();
        assert_eq!(summary.rules, catalog.len());
        assert!(summary.by_event_type.contains_key("Pass"));
        assert!(summary.random > 0);
        assert!(summary.disabled > 0);

        let offside = Event::at(EventType::Offside, 600).with_location(100.0, 40.0);
        let set = catalog.candidates(&offside, &mut rng());
        assert!(!set.is_empty());
        assert!(!set.has_faults());

        // A completed ground pass deep in defence never faults
        let pass = Event::at(EventType::Pass, 30).with_location(10.0, 40.0).with_pass(PassDetail {
            end_location: Some(crate::event::PitchPoint::new(20.0, 40.0)),
            length: Some(10.0),
            height: Some(Named::new(1, "Ground Pass")),
            ..Default::default()
        });
        assert!(!catalog.candidates(&pass, &mut rng()).has_faults());
    }
}
