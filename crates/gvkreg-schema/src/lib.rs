//! Structural type schema and resource identity for gvkreg.
//!
//! This crate defines the schema layer consumed by merge/diff engines: the
//! `Schema` type list with its `Atom` shapes, the `GroupVersionKind` identity
//! used to key resources, and the `Parser` that hands out `ParseableType`
//! handles for named types.

pub mod gvk;
pub mod schema;
pub mod typed;
pub mod types;

pub use gvk::GroupVersionKind;
pub use schema::{
    Atom, ElementRelationship, List, Map, Scalar, Schema, StructField, TypeDef, TypeRef, Untyped,
};
pub use typed::{ParseableType, Parser};
pub use types::{ModelName, TypeName};
