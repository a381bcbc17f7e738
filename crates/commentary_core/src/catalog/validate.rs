use super::rule::ClipRule;
use super::CatalogError;
use crate::predicate::Test;

/// Check every leaf of every rule for values that can never evaluate sensibly
pub fn validate_rules(rules: &[ClipRule]) -> Result<(), CatalogError> {
    for rule in rules {
        for leaf in rule.when.iter().flat_map(|p| p.leaves()) {
            validate_leaf(leaf).map_err(|reason| CatalogError::InvalidRule { clip_id: rule.id, reason })?;
        }
    }
    Ok(())
}

fn validate_leaf(leaf: &Test) -> Result<(), String> {
    match leaf {
        Test::Chance { probability } => {
            if !probability.is_finite() || !(0.0..=1.0).contains(probability) {
                return Err(format!("chance probability {} outside [0, 1]", probability));
            }
        }
        Test::InZone { zone, .. } => {
            if !zone.is_well_formed() {
                return Err(format!(
                    "zone x [{}, {}) y [{}, {}) is empty or not finite",
                    zone.x_min, zone.x_max, zone.y_min, zone.y_max
                ));
            }
        }
        Test::Backwards { margin, .. } => {
            if !margin.is_finite() {
                return Err(format!("backwards margin {} is not finite", margin));
            }
        }
        Test::Compare { value, .. } | Test::Xg2AtLeast { value, .. } => {
            if !value.is_finite() {
                return Err(format!("comparison value {} is not finite", value));
            }
        }
        Test::NameIn { names, .. } => {
            if names.is_empty() {
                return Err("name_in needs at least one name".into());
            }
        }
        _ => {}
    }
    Ok(())
}
