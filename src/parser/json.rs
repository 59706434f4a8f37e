use crate::error::{ElementError, ParseError};
use crate::model::ElementRecord;
use std::path::Path;

/// Reads element records exported by another model reader as a JSON array.
pub fn read_records_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Result<ElementRecord, ElementError>>, ParseError> {
    let content = std::fs::read_to_string(&path).map_err(|source| ParseError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    parse_records(&content)
}

/// Decodes a JSON array of element records.
///
/// Only a document that is not a JSON array fails as a whole; an entry that
/// does not decode becomes [`ElementError::Malformed`], identified by its
/// `global_id` when present, else by its array index.
pub fn parse_records(
    content: &str,
) -> Result<Vec<Result<ElementRecord, ElementError>>, ParseError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(content)?;
    Ok(entries.into_iter().enumerate().map(decode_record).collect())
}

fn decode_record(
    (index, entry): (usize, serde_json::Value),
) -> Result<ElementRecord, ElementError> {
    let id = entry
        .get("global_id")
        .and_then(serde_json::Value::as_str)
        .filter(|g| !g.trim().is_empty())
        .map_or_else(|| format!("[{index}]"), str::to_string);

    serde_json::from_value(entry).map_err(|err| ElementError::Malformed {
        id,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, MaterialAssociation, PropertyValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_minimal_record() {
        let json = r#"[{
            "global_id": "w1",
            "name": "Window",
            "kind": "Window",
            "overall_width": {"type": "IfcPositiveLengthMeasure", "value": 1200},
            "property_sets": [
                {"name": "Dimensions", "properties": [{"name": "Width", "value": "1.2 m"}]}
            ],
            "materials": [{"kind": "unresolved", "entity": "IfcMaterialLayerSet"}]
        }]"#;

        let records = parse_records(json).unwrap();
        let record = records[0].as_ref().unwrap();

        assert_eq!(record.kind, ElementKind::Window);
        assert_eq!(
            record.overall_width,
            Some(PropertyValue::wrapped("IfcPositiveLengthMeasure", PropertyValue::Number(1200.0)))
        );
        assert_eq!(
            record.property_sets[0].properties[0].value,
            PropertyValue::Text("1.2 m".into())
        );
        assert_eq!(
            record.materials,
            vec![MaterialAssociation::Unresolved {
                entity: "IfcMaterialLayerSet".into()
            }]
        );
        assert_eq!(record.location, None);
    }

    #[test]
    fn bad_entry_is_isolated() {
        let json = r#"[
            {"global_id": "wall-1", "kind": "Wall"},
            {"global_id": "door-1", "kind": "Door"},
            {"name": "no id", "kind": "Slab", "property_sets": null}
        ]"#;

        let records = parse_records(json).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().global_id, "wall-1");
        let errors: Vec<&str> = records[1..]
            .iter()
            .map(|r| r.as_ref().unwrap_err().element_id())
            .collect();
        assert_eq!(errors, vec!["door-1", "[2]"]);
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            parse_records(r#"{"global_id": "x"}"#),
            Err(ParseError::InvalidRecords { .. })
        ));
    }
}
