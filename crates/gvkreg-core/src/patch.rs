use gvkreg_schema::{Atom, Schema, TypeDef};

/// Schema type holding an embedded object of arbitrary kind.
pub const RAW_EXTENSION_TYPE_NAME: &str = "io.k8s.apimachinery.pkg.runtime.RawExtension";

/// Copy of `schema` with `RawExtension` turned into an untyped atomic value.
///
/// Its payload is dynamically typed, so whatever structure the converter
/// inferred must not be merged field by field. Every other type is copied
/// unchanged and in order. Without a `RawExtension` type this is a plain copy.
pub fn make_raw_extension_untyped(schema: &Schema) -> Schema {
    let types = schema
        .types
        .iter()
        .map(|t| {
            if t.name == RAW_EXTENSION_TYPE_NAME {
                TypeDef::new(t.name.clone(), Atom::untyped_atomic())
            } else {
                t.clone()
            }
        })
        .collect();
    Schema::new(types)
}
