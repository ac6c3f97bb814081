//! GroupVersionKind registry over a structural type schema.
//!
//! `GvkParser` maps a resource's group/version/kind to the schema type that
//! describes it. It is built once from a model catalog: the catalog is
//! converted into a schema, `RawExtension` is forced atomic, and every
//! `x-kubernetes-group-version-kind` extension is indexed. After
//! construction the registry is immutable and lookups need no locking.

pub mod builder;
pub mod extract;
pub mod parser;
pub mod patch;

pub use builder::GvkParserBuilder;
pub use extract::{parse_group_version_kind, GVK_EXTENSION_KEY};
pub use parser::GvkParser;
pub use patch::{make_raw_extension_untyped, RAW_EXTENSION_TYPE_NAME};

use gvkreg_openapi::ConvertError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to convert models to schema: {0}")]
    SchemaConversion(ConvertError),
    /// The catalog listed a model it cannot resolve; its own contract is broken.
    #[error("catalog lists model '{0}' but it cannot be looked up")]
    CatalogInconsistency(String),
}

impl From<ConvertError> for CoreError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::CatalogInconsistency(model) => CoreError::CatalogInconsistency(model),
            other => CoreError::SchemaConversion(other),
        }
    }
}
