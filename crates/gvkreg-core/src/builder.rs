use crate::extract::parse_group_version_kind;
use crate::parser::GvkParser;
use crate::patch::make_raw_extension_untyped;
use crate::CoreError;
use gvkreg_openapi::{Models, SchemaConverter, ToSchema};
use gvkreg_schema::{GroupVersionKind, ModelName, Parser};
use std::collections::HashMap;
use tracing::{debug, trace};

/// One-shot construction of a [`GvkParser`] from a model catalog.
///
/// The converter is pluggable so callers can supply their own catalog to
/// schema translation; [`SchemaConverter`] is used by default.
#[derive(Debug, Clone, Default)]
pub struct GvkParserBuilder<C = SchemaConverter> {
    converter: C,
}

impl GvkParserBuilder<SchemaConverter> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: ToSchema> GvkParserBuilder<C> {
    pub fn with_converter(converter: C) -> Self {
        Self { converter }
    }

    /// Convert, patch, and index `models`.
    ///
    /// Fails only when the converter fails or the catalog lists a model it
    /// cannot look up. Models that declare a GVK already claimed by an
    /// earlier model take it over; GVKs with an empty kind are not indexed.
    pub fn build(&self, models: &dyn Models) -> Result<GvkParser, CoreError> {
        let schema = self.converter.to_schema(models)?;
        let schema = make_raw_extension_untyped(&schema);
        let parser = Parser::new(schema);

        let mut gvks: HashMap<GroupVersionKind, ModelName> = HashMap::new();
        for model_name in models.list_models() {
            let Some(model) = models.lookup_model(&model_name) else {
                return Err(CoreError::CatalogInconsistency(model_name));
            };
            for gvk in parse_group_version_kind(model.extensions()) {
                if gvk.kind.is_empty() {
                    trace!("model '{model_name}' declares {gvk} without a kind, ignoring");
                    continue;
                }
                let owner = ModelName::new(model_name.as_str());
                if let Some(previous) = gvks.insert(gvk.clone(), owner) {
                    trace!("{gvk} moved from '{previous}' to '{model_name}'");
                }
            }
        }

        debug!(
            "indexed {} group-version-kinds over {} schema types",
            gvks.len(),
            parser.schema().types.len()
        );
        Ok(GvkParser::from_parts(gvks, parser))
    }
}
