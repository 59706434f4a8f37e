//! Category and position of an element.

use crate::model::{AttributeValue, Category, ElementKind, ElementRecord, Position};
use crate::thermal::properties::MergedProperties;

fn is_external(props: &MergedProperties) -> bool {
    props
        .find(&["IsExternal"], None)
        .is_some_and(AttributeValue::is_truthy)
}

/// Assigns category and position.
///
/// `IfcRoof` entities are always roofs. Slab entities are checked in
/// priority order: roof tag or name, base-slab tag or foundation name,
/// external flag, then internal floor.
/// Walls are external when flagged so or when their `Function` mentions
/// "ext". Windows are always external.
#[must_use]
pub fn classify(record: &ElementRecord, props: &MergedProperties) -> (Category, Position) {
    match record.kind {
        ElementKind::Window => (Category::Window, Position::External),
        ElementKind::Wall => {
            let function_external = props
                .find(&["Function"], None)
                .is_some_and(|f| f.to_string().to_lowercase().contains("ext"));
            if is_external(props) || function_external {
                (Category::Wall, Position::External)
            } else {
                (Category::Wall, Position::Internal)
            }
        }
        ElementKind::Slab | ElementKind::Roof => {
            let tag = record
                .predefined_type
                .as_deref()
                .unwrap_or_default()
                .to_uppercase();
            let name = record.name.to_lowercase();

            if record.kind == ElementKind::Roof || tag == "ROOF" || name.contains("roof") {
                (Category::Roof, Position::External)
            } else if tag == "BASESLAB" || name.contains("found") {
                (Category::Foundation, Position::External)
            } else if is_external(props) {
                (Category::Slab, Position::External)
            } else {
                (Category::Floor, Position::Internal)
            }
        }
    }
}
