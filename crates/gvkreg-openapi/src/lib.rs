//! OpenAPI model catalog and structural schema conversion for gvkreg.
//!
//! The catalog boundary is the [`Models`]/[`Model`] trait pair. `OpenApiModels`
//! is the bundled implementation, loaded from a Swagger 2.0 or OpenAPI 3
//! document. [`SchemaConverter`] turns any catalog into a structural
//! [`gvkreg_schema::Schema`].

pub mod convert;
pub mod document;
pub mod extensions;
pub mod models;

pub use convert::{ConvertError, SchemaConverter, ToSchema};
pub use document::OpenApiModels;
pub use extensions::{ExtensionValue, Extensions};
pub use models::{Model, Models, Property, Shape};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenApiError {
    #[error("failed to read OpenAPI document: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse OpenAPI document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("document has neither 'definitions' nor 'components.schemas'")]
    MissingDefinitions,
    #[error("unsupported $ref '{reference}' in '{model}'")]
    UnsupportedReference { model: String, reference: String },
    #[error("array schema without 'items' in '{model}'")]
    MissingItems { model: String },
}
