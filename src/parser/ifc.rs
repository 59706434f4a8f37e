use crate::error::{ElementError, ParseError};
use crate::model::{
    Constituent, ElementKind, ElementRecord, Material, MaterialAssociation, Property,
    PropertySet, PropertyValue,
};
use crate::parser::step::{StepEntity, StepFile, StepValue};
use std::collections::HashMap;
use std::path::Path;

// Envelope entities and the family they are processed as (IFC4 and IFC2X3)
const ELEMENT_ENTITIES: &[(&str, ElementKind)] = &[
    ("IFCWINDOW", ElementKind::Window),
    ("IFCWINDOWSTANDARDCASE", ElementKind::Window),
    ("IFCWALL", ElementKind::Wall),
    ("IFCWALLSTANDARDCASE", ElementKind::Wall),
    ("IFCWALLELEMENTEDCASE", ElementKind::Wall),
    ("IFCSLAB", ElementKind::Slab),
    ("IFCSLABSTANDARDCASE", ElementKind::Slab),
    ("IFCSLABELEMENTEDCASE", ElementKind::Slab),
    ("IFCROOF", ElementKind::Roof),
];

const QUANTITY_ENTITIES: &[&str] = &[
    "IFCQUANTITYLENGTH",
    "IFCQUANTITYAREA",
    "IFCQUANTITYVOLUME",
    "IFCQUANTITYCOUNT",
    "IFCQUANTITYWEIGHT",
];

/// Placement chains deeper than this are treated as cyclic.
const MAX_PLACEMENT_DEPTH: usize = 64;

/// Reads an IFC file and materializes one record per envelope element.
///
/// Records that cannot be built come back as per-element errors; only an
/// unreadable file or a broken STEP structure fails the whole call.
///
/// # Example
///
/// ```no_run
/// use ifc_thermal::parser::read_ifc_file;
///
/// let records = read_ifc_file("model.ifc")?;
/// println!("{} envelope elements", records.len());
/// # Ok::<(), ifc_thermal::error::ParseError>(())
/// ```
pub fn read_ifc_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Result<ElementRecord, ElementError>>, ParseError> {
    let content = std::fs::read_to_string(&path).map_err(|source| ParseError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    let step_file = StepFile::parse(&content)?;
    tracing::debug!(
        schema = %step_file.schema,
        entities = step_file.entities.len(),
        "parsed STEP file"
    );

    Ok(extract_elements(&step_file))
}

/// Builds element records from an already parsed STEP file.
#[must_use]
pub fn extract_elements(step_file: &StepFile) -> Vec<Result<ElementRecord, ElementError>> {
    let model = IfcModel::new(step_file);
    let mut records = Vec::new();

    for (entity_type, kind) in ELEMENT_ENTITIES {
        for entity in step_file.get_entities_by_type(entity_type) {
            records.push(model.element_record(entity, *kind));
        }
    }

    records
}

/// Relationship indexes over a STEP file.
struct IfcModel<'a> {
    step: &'a StepFile,
    type_of: HashMap<u64, u64>,
    property_definitions: HashMap<u64, Vec<u64>>,
    material_relations: HashMap<u64, Vec<u64>>,
    material_properties: HashMap<u64, Vec<PropertySet>>,
}

impl<'a> IfcModel<'a> {
    fn new(step: &'a StepFile) -> Self {
        let mut model = Self {
            step,
            type_of: HashMap::new(),
            property_definitions: HashMap::new(),
            material_relations: HashMap::new(),
            material_properties: HashMap::new(),
        };

        // Index 4 = RelatedObjects, index 5 = the relating type / definition / material
        for rel in step.get_entities_by_type("IFCRELDEFINESBYTYPE") {
            if let Some(type_id) = rel.get_reference(5) {
                for element_id in rel.get_references(4) {
                    model.type_of.insert(element_id, type_id);
                }
            }
        }

        for rel in step.get_entities_by_type("IFCRELDEFINESBYPROPERTIES") {
            if let Some(definition_id) = rel.get_reference(5) {
                for element_id in rel.get_references(4) {
                    model
                        .property_definitions
                        .entry(element_id)
                        .or_default()
                        .push(definition_id);
                }
            }
        }

        for rel in step.get_entities_by_type("IFCRELASSOCIATESMATERIAL") {
            if let Some(material_id) = rel.get_reference(5) {
                for element_id in rel.get_references(4) {
                    model
                        .material_relations
                        .entry(element_id)
                        .or_default()
                        .push(material_id);
                }
            }
        }

        model.index_material_properties();
        model
    }

    fn index_material_properties(&mut self) {
        let step = self.step;

        // IFC4: Name, Description, Properties, Material
        for props in step.get_entities_by_type("IFCMATERIALPROPERTIES") {
            if let Some(material_id) = props.get_reference(3) {
                let name = props.get_str(0).unwrap_or("Material");
                let set = self.single_value_set(name, &props.get_references(2));
                self.material_properties.entry(material_id).or_default().push(set);
            }
        }

        // IFC2X3: Material, ExtendedProperties, Description, Name
        for props in step.get_entities_by_type("IFCEXTENDEDMATERIALPROPERTIES") {
            if let Some(material_id) = props.get_reference(0) {
                let name = props.get_str(3).unwrap_or("Material");
                let set = self.single_value_set(name, &props.get_references(1));
                self.material_properties.entry(material_id).or_default().push(set);
            }
        }

        // IFC2X3: Material, SpecificHeatCapacity, BoilingPoint, FreezingPoint, ThermalConductivity
        for props in step.get_entities_by_type("IFCTHERMALMATERIALPROPERTIES") {
            let (Some(material_id), Some(k)) = (props.get_reference(0), props.get_f64(4)) else {
                continue;
            };
            let set = PropertySet::new("ThermalMaterialProperties").with("ThermalConductivity", k);
            self.material_properties.entry(material_id).or_default().push(set);
        }
    }

    fn element_record(
        &self,
        entity: &StepEntity,
        kind: ElementKind,
    ) -> Result<ElementRecord, ElementError> {
        let global_id = entity
            .get_str(0)
            .filter(|g| !g.trim().is_empty())
            .ok_or_else(|| ElementError::Malformed {
                id: format!("#{}", entity.id),
                message: format!("{} without GlobalId", entity.entity_type),
            })?;

        let name = entity.get_str(2).unwrap_or_default();
        let mut record = ElementRecord::new(global_id, name, kind);

        // IfcWindow: 8 = OverallHeight, 9 = OverallWidth, 10 = PredefinedType
        // IfcWall / IfcSlab / IfcRoof: 8 = PredefinedType (ShapeType for IFC2X3 roofs)
        match kind {
            ElementKind::Window => {
                record.overall_height = entity.get_f64(8).map(PropertyValue::Number);
                record.overall_width = entity.get_f64(9).map(PropertyValue::Number);
                record.predefined_type = enum_value(entity.get(10));
            }
            ElementKind::Wall | ElementKind::Slab | ElementKind::Roof => {
                record.predefined_type = enum_value(entity.get(8));
            }
        }

        if let Some(type_entity) = self
            .type_of
            .get(&entity.id)
            .and_then(|id| self.step.get_entity(*id))
        {
            record.type_name = type_entity.get_str(2).map(str::to_string);
            // IfcTypeObject index 5 = HasPropertySets
            record.type_property_sets = type_entity
                .get_references(5)
                .into_iter()
                .filter_map(|id| self.property_set(id))
                .collect();
        }

        record.property_sets = self
            .property_definitions
            .get(&entity.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.property_set(*id))
            .collect();

        record.materials = self
            .material_relations
            .get(&entity.id)
            .into_iter()
            .flatten()
            .map(|id| self.material_association(*id))
            .collect();

        record.location = entity
            .get_reference(5)
            .and_then(|id| self.world_origin(id, 0));

        Ok(record)
    }

    fn property_set(&self, id: u64) -> Option<PropertySet> {
        let entity = self.step.get_entity(id)?;
        let name = entity.get_str(2).unwrap_or_default();

        match entity.entity_type.as_str() {
            "IFCPROPERTYSET" => Some(self.single_value_set(name, &entity.get_references(4))),
            "IFCELEMENTQUANTITY" => {
                let mut set = PropertySet::new(name);
                for quantity in entity
                    .get_references(5)
                    .into_iter()
                    .filter_map(|q| self.step.get_entity(q))
                    .filter(|q| QUANTITY_ENTITIES.contains(&q.entity_type.as_str()))
                {
                    // Name, Description, Unit, <Length|Area|Volume|...>Value
                    if let (Some(qname), Some(value)) = (quantity.get_str(0), quantity.get_f64(3)) {
                        set.properties.push(Property {
                            name: qname.to_string(),
                            value: PropertyValue::Number(value),
                        });
                    }
                }
                Some(set)
            }
            _ => None,
        }
    }

    /// Collects single and enumerated values referenced by a set.
    fn single_value_set(&self, name: &str, property_ids: &[u64]) -> PropertySet {
        let mut set = PropertySet::new(name);

        for property in property_ids.iter().filter_map(|id| self.step.get_entity(*id)) {
            let Some(property_name) = property.get_str(0) else {
                continue;
            };
            let value = match property.entity_type.as_str() {
                "IFCPROPERTYSINGLEVALUE" => property.get(2).and_then(property_value),
                "IFCPROPERTYENUMERATEDVALUE" => match property.get(2) {
                    Some(StepValue::List(values)) => values.first().and_then(property_value),
                    _ => None,
                },
                _ => None,
            };
            if let Some(value) = value {
                set.properties.push(Property {
                    name: property_name.to_string(),
                    value,
                });
            }
        }

        set
    }

    fn material(&self, entity: &StepEntity) -> Material {
        Material {
            name: entity.get_str(0).unwrap_or_default().to_string(),
            property_sets: self
                .material_properties
                .get(&entity.id)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn materials_in(&self, ids: &[u64]) -> Vec<Material> {
        ids.iter()
            .filter_map(|id| self.step.get_entity(*id))
            .filter(|e| e.entity_type == "IFCMATERIAL")
            .map(|e| self.material(e))
            .collect()
    }

    fn material_association(&self, id: u64) -> MaterialAssociation {
        let Some(entity) = self.step.get_entity(id) else {
            return MaterialAssociation::Unresolved {
                entity: format!("#{id}"),
            };
        };

        match entity.entity_type.as_str() {
            "IFCMATERIAL" => MaterialAssociation::Material(self.material(entity)),
            "IFCMATERIALLIST" => MaterialAssociation::List {
                materials: self.materials_in(&entity.get_references(0)),
            },
            // Name, Description, MaterialConstituents
            "IFCMATERIALCONSTITUENTSET" => MaterialAssociation::ConstituentSet {
                constituents: entity
                    .get_references(2)
                    .into_iter()
                    .filter_map(|c| self.step.get_entity(c))
                    .map(|constituent| Constituent {
                        name: constituent.get_str(0).map(str::to_string),
                        material: constituent
                            .get_reference(2)
                            .and_then(|m| self.step.get_entity(m))
                            .filter(|m| m.entity_type == "IFCMATERIAL")
                            .map(|m| self.material(m)),
                    })
                    .collect(),
            },
            other => MaterialAssociation::Unresolved {
                entity: other.to_string(),
            },
        }
    }

    /// World position of an `IFCLOCALPLACEMENT`, following `PlacementRelTo`.
    fn world_origin(&self, placement_id: u64, depth: usize) -> Option<[f64; 3]> {
        self.world_frame(placement_id, depth).map(|f| f.origin)
    }

    fn world_frame(&self, placement_id: u64, depth: usize) -> Option<Frame> {
        if depth > MAX_PLACEMENT_DEPTH {
            return None;
        }
        let placement = self.step.get_entity(placement_id)?;
        if placement.entity_type != "IFCLOCALPLACEMENT" {
            return None;
        }

        // 0 = PlacementRelTo, 1 = RelativePlacement
        let local = placement
            .get_reference(1)
            .and_then(|id| self.axis_placement(id))
            .unwrap_or_default();

        match placement.get_reference(0) {
            Some(parent) => Some(self.world_frame(parent, depth + 1)?.compose(&local)),
            None => Some(local),
        }
    }

    fn axis_placement(&self, id: u64) -> Option<Frame> {
        let entity = self.step.get_entity(id)?;
        let origin = entity.get_reference(0).and_then(|p| self.coordinates(p))?;

        let (axis, ref_direction) = match entity.entity_type.as_str() {
            // Location, Axis, RefDirection
            "IFCAXIS2PLACEMENT3D" => (
                entity.get_reference(1).and_then(|d| self.coordinates(d)),
                entity.get_reference(2).and_then(|d| self.coordinates(d)),
            ),
            // Location, RefDirection
            "IFCAXIS2PLACEMENT2D" => (
                None,
                entity.get_reference(1).and_then(|d| self.coordinates(d)),
            ),
            _ => return None,
        };

        Some(Frame::from_axes(origin, axis, ref_direction))
    }

    /// Coordinates of an `IFCCARTESIANPOINT` or ratios of an `IFCDIRECTION`.
    fn coordinates(&self, id: u64) -> Option<[f64; 3]> {
        let entity = self.step.get_entity(id)?;
        let StepValue::List(items) = entity.get(0)? else {
            return None;
        };
        let values: Vec<f64> = items.iter().filter_map(StepValue::as_f64).collect();
        match values.as_slice() {
            [x, y] => Some([*x, *y, 0.0]),
            [x, y, z] => Some([*x, *y, *z]),
            _ => None,
        }
    }
}

fn enum_value(value: Option<&StepValue>) -> Option<String> {
    match value? {
        StepValue::Enum(e) => Some(e.clone()),
        _ => None,
    }
}

fn property_value(value: &StepValue) -> Option<PropertyValue> {
    match value {
        StepValue::Typed(name, inner) => {
            Some(PropertyValue::wrapped(name, property_value(inner)?))
        }
        StepValue::String(s) | StepValue::Enum(s) => Some(PropertyValue::Text(s.clone())),
        StepValue::Real(f) => Some(PropertyValue::Number(*f)),
        StepValue::Integer(i) => Some(PropertyValue::Number(*i as f64)),
        StepValue::Boolean(b) => Some(PropertyValue::Boolean(*b)),
        StepValue::Reference(_) | StepValue::List(_) | StepValue::Null | StepValue::Derived => None,
    }
}

/// Right-handed placement frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    origin: [f64; 3],
    x: [f64; 3],
    y: [f64; 3],
    z: [f64; 3],
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            x: [1.0, 0.0, 0.0],
            y: [0.0, 1.0, 0.0],
            z: [0.0, 0.0, 1.0],
        }
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = dot(v, v).sqrt();
    if len < 1e-12 {
        None
    } else {
        Some([v[0] / len, v[1] / len, v[2] / len])
    }
}

impl Frame {
    fn from_axes(
        origin: [f64; 3],
        axis: Option<[f64; 3]>,
        ref_direction: Option<[f64; 3]>,
    ) -> Self {
        let z = axis.and_then(normalize).unwrap_or([0.0, 0.0, 1.0]);
        let reference = ref_direction.unwrap_or([1.0, 0.0, 0.0]);
        let projection = dot(reference, z);
        let x = normalize([
            reference[0] - projection * z[0],
            reference[1] - projection * z[1],
            reference[2] - projection * z[2],
        ])
        .unwrap_or([1.0, 0.0, 0.0]);

        Self {
            origin,
            x,
            y: cross(z, x),
            z,
        }
    }

    /// Expresses a local vector in this frame's parent coordinates.
    fn rotate(&self, v: [f64; 3]) -> [f64; 3] {
        [
            self.x[0] * v[0] + self.y[0] * v[1] + self.z[0] * v[2],
            self.x[1] * v[0] + self.y[1] * v[1] + self.z[1] * v[2],
            self.x[2] * v[0] + self.y[2] * v[1] + self.z[2] * v[2],
        ]
    }

    fn compose(&self, local: &Frame) -> Frame {
        let offset = self.rotate(local.origin);
        Frame {
            origin: [
                self.origin[0] + offset[0],
                self.origin[1] + offset[1],
                self.origin[2] + offset[2],
            ],
            x: self.rotate(local.x),
            y: self.rotate(local.y),
            z: self.rotate(local.z),
        }
    }
}
