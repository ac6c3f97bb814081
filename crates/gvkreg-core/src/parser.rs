use crate::builder::GvkParserBuilder;
use crate::CoreError;
use gvkreg_openapi::Models;
use gvkreg_schema::{GroupVersionKind, ModelName, ParseableType, Parser, Schema};
use std::collections::HashMap;

/// Immutable registry from group/version/kind to schema type.
///
/// Built by [`GvkParserBuilder`]; shared freely across threads afterwards.
#[derive(Debug, Clone)]
pub struct GvkParser {
    gvks: HashMap<GroupVersionKind, ModelName>,
    parser: Parser,
}

impl GvkParser {
    /// Build a registry with the default schema converter.
    pub fn new(models: &dyn Models) -> Result<Self, CoreError> {
        GvkParserBuilder::new().build(models)
    }

    pub(crate) fn from_parts(gvks: HashMap<GroupVersionKind, ModelName>, parser: Parser) -> Self {
        Self { gvks, parser }
    }

    /// Schema type for `gvk`, or `None` when no model declares it.
    pub fn type_for(&self, gvk: &GroupVersionKind) -> Option<ParseableType<'_>> {
        let model = self.gvks.get(gvk)?;
        Some(self.parser.type_named(model.as_str()))
    }

    /// Name of the model indexed under `gvk`.
    pub fn model_for(&self, gvk: &GroupVersionKind) -> Option<&ModelName> {
        self.gvks.get(gvk)
    }

    /// Index entries, in no particular order.
    pub fn gvks(&self) -> impl Iterator<Item = (&GroupVersionKind, &ModelName)> {
        self.gvks.iter()
    }

    pub fn len(&self) -> usize {
        self.gvks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gvks.is_empty()
    }

    /// The schema lookups resolve against, with `RawExtension` already atomic.
    pub fn schema(&self) -> &Schema {
        self.parser.schema()
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }
}
