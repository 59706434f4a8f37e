//! Type/instance property merge and key lookup.

use crate::model::{AttributeValue, ElementRecord, PropertySet};

/// A property set after merging, with values already unwrapped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSet {
    pub name: String,
    pub values: Vec<(String, AttributeValue)>,
}

impl MergedSet {
    fn upsert(&mut self, key: &str, value: AttributeValue) {
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((key.to_string(), value)),
        }
    }
}

/// Property sets of an element merged over the sets of its type.
///
/// Iteration order is insertion order: type sets first, then instance sets
/// that the type did not have. A key overridden by the instance keeps the
/// position it had in the type set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedProperties {
    sets: Vec<MergedSet>,
}

impl MergedProperties {
    #[must_use]
    pub fn sets(&self) -> &[MergedSet] {
        &self.sets
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Exact lookup by set name and key.
    #[must_use]
    pub fn get(&self, set_name: &str, key: &str) -> Option<&AttributeValue> {
        self.sets
            .iter()
            .find(|s| s.name == set_name)?
            .values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn apply(&mut self, property_set: &PropertySet) {
        let index = match self.sets.iter().position(|s| s.name == property_set.name) {
            Some(index) => index,
            None => {
                self.sets.push(MergedSet {
                    name: property_set.name.clone(),
                    values: Vec::new(),
                });
                self.sets.len() - 1
            }
        };

        let set = &mut self.sets[index];
        for property in &property_set.properties {
            set.upsert(&property.name, property.value.to_scalar());
        }
    }

    /// Finds the first value whose key matches one of `candidates`.
    ///
    /// An exact case-insensitive key match anywhere wins over a substring
    /// match, even when the substring match comes first. With `set_filter`
    /// only sets whose name contains it (case-insensitive) are searched.
    #[must_use]
    pub fn find(&self, candidates: &[&str], set_filter: Option<&str>) -> Option<&AttributeValue> {
        let candidates: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
        let filter = set_filter.map(str::to_lowercase);
        let filter = filter.as_deref();
        let in_scope = |set: &&MergedSet| match filter {
            Some(f) => set.name.to_lowercase().contains(f),
            None => true,
        };

        let exact = self
            .sets
            .iter()
            .filter(in_scope)
            .flat_map(|set| set.values.iter())
            .find(|(key, _)| {
                let key = key.to_lowercase();
                candidates.iter().any(|c| *c == key)
            });
        if let Some((_, value)) = exact {
            return Some(value);
        }

        self.sets
            .iter()
            .filter(in_scope)
            .flat_map(|set| set.values.iter())
            .find(|(key, _)| {
                let key = key.to_lowercase();
                candidates.iter().any(|c| key.contains(c.as_str()))
            })
            .map(|(_, value)| value)
    }
}

/// Merges type-level and instance-level sets: type pass first, instance pass second.
#[must_use]
pub fn merge_property_sets(
    type_sets: &[PropertySet],
    instance_sets: &[PropertySet],
) -> MergedProperties {
    let mut merged = MergedProperties::default();
    for set in type_sets.iter().chain(instance_sets) {
        merged.apply(set);
    }
    merged
}

#[must_use]
pub fn get_merged_properties(record: &ElementRecord) -> MergedProperties {
    merge_property_sets(&record.type_property_sets, &record.property_sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn instance_overrides_type_on_same_set_and_key() {
        let type_sets = [PropertySet::new("Pset_WallCommon")
            .with("IsExternal", false)
            .with("ThermalTransmittance", 0.35)];
        let instance_sets = [PropertySet::new("Pset_WallCommon").with("IsExternal", true)];

        let merged = merge_property_sets(&type_sets, &instance_sets);

        assert_eq!(
            merged.get("Pset_WallCommon", "IsExternal"),
            Some(&AttributeValue::Boolean(true))
        );
        assert_eq!(
            merged.get("Pset_WallCommon", "ThermalTransmittance"),
            Some(&AttributeValue::Number(0.35))
        );
        assert_eq!(merged.sets().len(), 1);
        assert_eq!(merged.sets()[0].values[0].0, "IsExternal");
    }

    #[test]
    fn instance_only_sets_are_appended() {
        let type_sets = [PropertySet::new("Identity").with("Mark", "W1")];
        let instance_sets = [PropertySet::new("Dimensions").with("Area", 2.0)];

        let merged = merge_property_sets(&type_sets, &instance_sets);
        let names: Vec<&str> = merged.sets().iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["Identity", "Dimensions"]);
    }

    #[test]
    fn merge_unwraps_defined_types() {
        let instance_sets = [PropertySet::new("Pset_WindowCommon").with(
            "ThermalTransmittance",
            PropertyValue::wrapped("IFCTHERMALTRANSMITTANCEMEASURE", PropertyValue::Number(1.3)),
        )];

        let merged = merge_property_sets(&[], &instance_sets);

        assert_eq!(
            merged.find(&["ThermalTransmittance"], None),
            Some(&AttributeValue::Number(1.3))
        );
    }

    #[test]
    fn exact_match_beats_earlier_substring_match() {
        let sets = [
            PropertySet::new("Analytical").with("Gross Area Ratio", 0.9),
            PropertySet::new("Dimensions").with("area", 12.0),
        ];
        let merged = merge_property_sets(&[], &sets);

        assert_eq!(merged.find(&["Area"], None), Some(&AttributeValue::Number(12.0)));
    }

    #[test]
    fn substring_match_is_the_fallback() {
        let sets = [PropertySet::new("Dimensions").with("NetSideArea", 7.5)];
        let merged = merge_property_sets(&[], &sets);

        assert_eq!(merged.find(&["Area"], None), Some(&AttributeValue::Number(7.5)));
    }

    #[test]
    fn set_filter_restricts_both_passes() {
        let sets = [
            PropertySet::new("Other").with("Area", 1.0),
            PropertySet::new("Dimensions").with("NetArea", 3.0),
        ];
        let merged = merge_property_sets(&[], &sets);

        assert_eq!(
            merged.find(&["Area"], Some("dimension")),
            Some(&AttributeValue::Number(3.0))
        );
        assert_eq!(merged.find(&["Volume"], Some("Dimensions")), None);
    }

    #[test]
    fn first_candidate_order_follows_keys_not_candidates() {
        let sets = [PropertySet::new("Pset")
            .with("Thickness", 0.3)
            .with("Width", 0.2)];
        let merged = merge_property_sets(&[], &sets);

        assert_eq!(
            merged.find(&["Width", "Thickness"], None),
            Some(&AttributeValue::Number(0.3))
        );
    }
}
