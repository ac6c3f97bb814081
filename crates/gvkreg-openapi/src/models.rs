//! Catalog boundary: the read-only view of named model definitions.

use crate::extensions::{ExtensionValue, Extensions};
use std::collections::BTreeMap;

/// One model definition, or one nested property of it.
pub trait Model {
    fn extensions(&self) -> &Extensions;
    fn shape(&self) -> &Shape;
}

/// A catalog of named model definitions.
///
/// Every name returned by `list_models` must resolve through `lookup_model`.
pub trait Models {
    fn list_models(&self) -> Vec<String>;
    fn lookup_model(&self, name: &str) -> Option<&dyn Model>;
}

/// Structural shape of a model or property.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Object with named properties, ordered by name.
    Kind { fields: BTreeMap<String, Property> },
    /// Object whose values all share one type (`additionalProperties`).
    Map(Box<Property>),
    Array(Box<Property>),
    Primitive {
        ty: String,
        format: Option<String>,
    },
    /// No structural information; any value is accepted.
    Arbitrary,
    /// Reference to another model by name.
    Reference(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub extensions: Extensions,
    pub shape: Shape,
}

impl Property {
    pub fn new(shape: Shape) -> Self {
        Self {
            extensions: Extensions::new(),
            shape,
        }
    }

    #[must_use]
    pub fn with_extension(
        mut self,
        key: &str,
        value: impl Into<ExtensionValue>,
    ) -> Self {
        self.extensions.insert(key.to_owned(), value.into());
        self
    }
}

impl Model for Property {
    fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }
}
