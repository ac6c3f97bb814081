//! Structural type schema.
//!
//! A [`Schema`] is an ordered list of named [`TypeDef`]s. Each definition
//! carries an [`Atom`] describing how values of that type are decomposed for
//! merging: scalars and atomic containers are replaced wholesale, separable
//! maps merge field by field, associative lists merge element by element
//! using their keys.

use crate::types::TypeName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub types: Vec<TypeDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: TypeName,
    pub atom: Atom,
}

/// Shape of a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Atom {
    Scalar(Scalar),
    List(List),
    Map(Map),
    Untyped(Untyped),
}

/// Reference to a type, either by name or by an inline shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRef {
    #[serde(rename = "namedType")]
    Named(TypeName),
    Inlined(Atom),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scalar {
    Numeric,
    String,
    Boolean,
    /// Any scalar: accepts numbers, strings, and booleans alike.
    Untyped,
}

/// How the elements of a container relate to each other during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementRelationship {
    /// The container is replaced as a whole.
    Atomic,
    /// Elements are identified by key fields (or by value for sets).
    Associative,
    /// Elements are independent and merged one by one.
    Separable,
}

/// A struct (fixed fields), a map (uniform element type), or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<StructField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<Box<TypeRef>>,
    pub element_relationship: ElementRelationship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub element_type: Box<TypeRef>,
    pub element_relationship: ElementRelationship,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
}

/// A value whose structure is not known statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Untyped {
    pub element_relationship: ElementRelationship,
}

impl Schema {
    pub fn new(types: Vec<TypeDef>) -> Self {
        Self { types }
    }

    /// Returns the first type definition with the given name.
    pub fn find_named_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Resolve a reference to the atom it denotes.
    ///
    /// Named references that do not exist in this schema resolve to `None`.
    pub fn resolve<'a>(&'a self, type_ref: &'a TypeRef) -> Option<&'a Atom> {
        match type_ref {
            TypeRef::Named(name) => self.find_named_type(name).map(|t| &t.atom),
            TypeRef::Inlined(atom) => Some(atom),
        }
    }
}

impl TypeDef {
    pub fn new(name: impl Into<TypeName>, atom: Atom) -> Self {
        Self {
            name: name.into(),
            atom,
        }
    }
}

impl TypeRef {
    pub fn named(name: impl Into<TypeName>) -> Self {
        TypeRef::Named(name.into())
    }
}

impl Atom {
    /// Untyped atomic value: opaque to field-level merging.
    pub fn untyped_atomic() -> Self {
        Atom::Untyped(Untyped {
            element_relationship: ElementRelationship::Atomic,
        })
    }

    /// True when values of this shape are merged as a single unit.
    pub fn is_atomic(&self) -> bool {
        match self {
            Atom::Scalar(_) => true,
            Atom::List(list) => list.element_relationship == ElementRelationship::Atomic,
            Atom::Map(map) => map.element_relationship == ElementRelationship::Atomic,
            Atom::Untyped(untyped) => untyped.element_relationship == ElementRelationship::Atomic,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Atom::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Atom::List(list) => Some(list),
            _ => None,
        }
    }
}

impl Map {
    pub fn find_field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
