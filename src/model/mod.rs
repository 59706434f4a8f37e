pub mod element;
pub mod material;
pub mod mesh;
pub mod record;
pub mod report;
pub mod summary;
pub mod value;

pub use element::{round3, Category, Element, Position, WindowAssembly};
pub use material::{Constituent, Material, MaterialAssociation};
pub use mesh::Mesh;
pub use record::{ElementKind, ElementRecord, Property, PropertySet};
pub use report::{SkippedElement, ThermalReport};
pub use summary::{MeanKind, Summary, SummaryRow};
pub use value::{AttributeValue, PropertyValue};
