//! Conversion of a model catalog into a structural [`Schema`].
//!
//! Merge semantics come from the Kubernetes vendor extensions:
//! `x-kubernetes-list-type`, `x-kubernetes-list-map-keys`,
//! `x-kubernetes-map-type`, and the legacy `x-kubernetes-patch-strategy` /
//! `x-kubernetes-patch-merge-key` pair.

use crate::extensions::{ExtensionValue, Extensions};
use crate::models::{Model, Models, Shape};
use gvkreg_schema::{
    Atom, ElementRelationship, List, Map, Scalar, Schema, StructField, TypeDef, TypeRef, Untyped,
};
use thiserror::Error;
use tracing::debug;

const LIST_TYPE: &str = "x-kubernetes-list-type";
const LIST_MAP_KEYS: &str = "x-kubernetes-list-map-keys";
const MAP_TYPE: &str = "x-kubernetes-map-type";
const PATCH_STRATEGY: &str = "x-kubernetes-patch-strategy";
const PATCH_MERGE_KEY: &str = "x-kubernetes-patch-merge-key";
const INT_OR_STRING: &str = "x-kubernetes-int-or-string";
const PRESERVE_UNKNOWN_FIELDS: &str = "x-kubernetes-preserve-unknown-fields";

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The catalog listed a model it cannot resolve.
    #[error("catalog lists model '{0}' but it cannot be looked up")]
    CatalogInconsistency(String),
    #[error("model '{model}' references unknown model '{target}'")]
    UnknownReference { model: String, target: String },
    #[error("model '{model}' uses unknown primitive type '{ty}'")]
    UnknownPrimitive { model: String, ty: String },
}

/// Turns a whole model catalog into a type schema.
pub trait ToSchema {
    fn to_schema(&self, models: &dyn Models) -> Result<Schema, ConvertError>;
}

/// Default converter: one named type per model, in catalog order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaConverter;

impl ToSchema for SchemaConverter {
    fn to_schema(&self, models: &dyn Models) -> Result<Schema, ConvertError> {
        let names = models.list_models();
        let mut types = Vec::with_capacity(names.len());
        for name in names {
            let model = models
                .lookup_model(&name)
                .ok_or_else(|| ConvertError::CatalogInconsistency(name.clone()))?;
            let ctx = Context {
                models,
                model: &name,
            };
            let atom = ctx.atom(model)?;
            types.push(TypeDef::new(name.as_str(), atom));
        }
        debug!("converted {} models into schema types", types.len());
        Ok(Schema::new(types))
    }
}

impl<F> ToSchema for F
where
    F: Fn(&dyn Models) -> Result<Schema, ConvertError>,
{
    fn to_schema(&self, models: &dyn Models) -> Result<Schema, ConvertError> {
        self(models)
    }
}

struct Context<'a> {
    models: &'a dyn Models,
    model: &'a str,
}

impl Context<'_> {
    fn type_ref(&self, model: &dyn Model) -> Result<TypeRef, ConvertError> {
        match model.shape() {
            Shape::Reference(target) => {
                self.check_reference(target)?;
                Ok(TypeRef::named(target.as_str()))
            }
            _ => Ok(TypeRef::Inlined(self.atom(model)?)),
        }
    }

    fn check_reference(&self, target: &str) -> Result<(), ConvertError> {
        if self.models.lookup_model(target).is_none() {
            return Err(ConvertError::UnknownReference {
                model: self.model.to_owned(),
                target: target.to_owned(),
            });
        }
        Ok(())
    }

    fn atom(&self, model: &dyn Model) -> Result<Atom, ConvertError> {
        let ext = model.extensions();
        match model.shape() {
            Shape::Kind { fields, .. } => {
                let mut struct_fields = Vec::with_capacity(fields.len());
                for (name, prop) in fields {
                    struct_fields.push(StructField {
                        name: name.clone(),
                        ty: self.type_ref(prop)?,
                    });
                }
                let element_type = preserves_unknown_fields(ext).then(|| {
                    Box::new(TypeRef::Inlined(Atom::Untyped(Untyped {
                        element_relationship: ElementRelationship::Separable,
                    })))
                });
                Ok(Atom::Map(Map {
                    fields: struct_fields,
                    element_type,
                    element_relationship: map_relationship(ext),
                }))
            }
            Shape::Map(element) => Ok(Atom::Map(Map {
                fields: Vec::new(),
                element_type: Some(Box::new(self.type_ref(element.as_ref())?)),
                element_relationship: map_relationship(ext),
            })),
            Shape::Array(element) => {
                let (element_relationship, keys) = list_relationship(ext);
                Ok(Atom::List(List {
                    element_type: Box::new(self.type_ref(element.as_ref())?),
                    element_relationship,
                    keys,
                }))
            }
            Shape::Primitive { ty, format } => self.primitive(ty, format.as_deref(), ext),
            Shape::Arbitrary => Ok(Atom::untyped_atomic()),
            Shape::Reference(target) => {
                // Aliases have no shape of their own to define a type with.
                self.check_reference(target)?;
                debug!("model '{}' aliases '{target}', treating as untyped", self.model);
                Ok(Atom::untyped_atomic())
            }
        }
    }

    fn primitive(
        &self,
        ty: &str,
        format: Option<&str>,
        ext: &Extensions,
    ) -> Result<Atom, ConvertError> {
        if format == Some("int-or-string")
            || ext.get(INT_OR_STRING).and_then(ExtensionValue::as_bool) == Some(true)
        {
            return Ok(Atom::Scalar(Scalar::Untyped));
        }
        let scalar = match ty {
            "integer" | "number" => Scalar::Numeric,
            "string" => Scalar::String,
            "boolean" => Scalar::Boolean,
            other => {
                return Err(ConvertError::UnknownPrimitive {
                    model: self.model.to_owned(),
                    ty: other.to_owned(),
                })
            }
        };
        Ok(Atom::Scalar(scalar))
    }
}

fn preserves_unknown_fields(ext: &Extensions) -> bool {
    ext.get(PRESERVE_UNKNOWN_FIELDS)
        .and_then(ExtensionValue::as_bool)
        .unwrap_or(false)
}

fn map_relationship(ext: &Extensions) -> ElementRelationship {
    match ext.get(MAP_TYPE).and_then(ExtensionValue::as_str) {
        Some("atomic") => ElementRelationship::Atomic,
        _ => ElementRelationship::Separable,
    }
}

fn list_relationship(ext: &Extensions) -> (ElementRelationship, Vec<String>) {
    match ext.get(LIST_TYPE).and_then(ExtensionValue::as_str) {
        Some("atomic") => return (ElementRelationship::Atomic, Vec::new()),
        Some("set") => return (ElementRelationship::Associative, Vec::new()),
        Some("map") => {
            let keys: Vec<String> = ext
                .get(LIST_MAP_KEYS)
                .and_then(ExtensionValue::as_list)
                .map(|keys| {
                    keys.iter()
                        .filter_map(ExtensionValue::as_str)
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default();
            return (ElementRelationship::Associative, keys);
        }
        _ => {}
    }

    let merges = ext
        .get(PATCH_STRATEGY)
        .and_then(ExtensionValue::as_str)
        .is_some_and(|strategy| strategy.split(',').any(|s| s.trim() == "merge"));
    if merges {
        let keys = ext
            .get(PATCH_MERGE_KEY)
            .and_then(ExtensionValue::as_str)
            .map(|key| vec![key.to_owned()])
            .unwrap_or_default();
        return (ElementRelationship::Associative, keys);
    }

    (ElementRelationship::Atomic, Vec::new())
}
