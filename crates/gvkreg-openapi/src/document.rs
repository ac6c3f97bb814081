use crate::extensions::{ExtensionValue, Extensions};
use crate::models::{Model, Models, Property, Shape};
use crate::OpenApiError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const SWAGGER_REF_PREFIX: &str = "#/definitions/";
const OPENAPI_V3_REF_PREFIX: &str = "#/components/schemas/";

/// Model catalog loaded from an OpenAPI document.
///
/// Definitions are kept sorted by name, so `list_models` is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenApiModels {
    models: BTreeMap<String, Property>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    definitions: Option<BTreeMap<String, RawSchema>>,
    #[serde(default)]
    components: Option<RawComponents>,
}

#[derive(Debug, Deserialize)]
struct RawComponents {
    #[serde(default)]
    schemas: Option<BTreeMap<String, RawSchema>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(rename = "type")]
    ty: Option<RawType>,
    format: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, RawSchema>,
    additional_properties: Option<AdditionalProperties>,
    items: Option<Box<RawSchema>>,
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(default)]
    all_of: Vec<RawSchema>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// OpenAPI 3.1 allows a list of types, typically `["string", "null"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawType {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<RawSchema>),
}

impl OpenApiModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> Result<Self, OpenApiError> {
        Self::from_document(serde_json::from_str(input)?)
    }

    pub fn from_slice(input: &[u8]) -> Result<Self, OpenApiError> {
        Self::from_document(serde_json::from_slice(input)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OpenApiError> {
        let content = fs::read(path)?;
        Self::from_slice(&content)
    }

    fn from_document(doc: RawDocument) -> Result<Self, OpenApiError> {
        let definitions = match (doc.definitions, doc.components.and_then(|c| c.schemas)) {
            (Some(defs), _) | (None, Some(defs)) => defs,
            (None, None) => return Err(OpenApiError::MissingDefinitions),
        };

        let mut models = BTreeMap::new();
        for (name, raw) in definitions {
            let property = to_property(&name, raw)?;
            models.insert(name, property);
        }
        debug!("loaded {} model definitions", models.len());
        Ok(Self { models })
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl FromIterator<(String, Property)> for OpenApiModels {
    fn from_iter<I: IntoIterator<Item = (String, Property)>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().collect(),
        }
    }
}

impl Models for OpenApiModels {
    fn list_models(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    fn lookup_model(&self, name: &str) -> Option<&dyn Model> {
        self.models.get(name).map(|p| p as &dyn Model)
    }
}

fn to_property(model: &str, raw: RawSchema) -> Result<Property, OpenApiError> {
    let extensions: Extensions = raw
        .extra
        .into_iter()
        .filter(|(key, _)| key.starts_with("x-"))
        .map(|(key, value)| (key, ExtensionValue::from(value)))
        .collect();

    let shape = if let Some(reference) = raw.reference {
        Shape::Reference(strip_ref(model, &reference)?)
    } else if let [single] = raw.all_of.as_slice() {
        match &single.reference {
            Some(reference) => Shape::Reference(strip_ref(model, reference)?),
            None => Shape::Arbitrary,
        }
    } else {
        let ty = match raw.ty {
            Some(RawType::One(ty)) => Some(ty),
            Some(RawType::Many(types)) => types.into_iter().find(|t| t != "null"),
            None => None,
        };
        match ty.as_deref() {
            Some("array") => {
                let items = raw.items.ok_or_else(|| OpenApiError::MissingItems {
                    model: model.to_owned(),
                })?;
                Shape::Array(Box::new(to_property(model, *items)?))
            }
            Some("object") | None if !raw.properties.is_empty() => {
                let mut fields = BTreeMap::new();
                for (name, prop) in raw.properties {
                    fields.insert(name, to_property(model, prop)?);
                }
                Shape::Kind { fields }
            }
            Some("object") => Shape::Map(Box::new(element_property(
                model,
                raw.additional_properties,
            )?)),
            None => match raw.additional_properties {
                Some(additional) => Shape::Map(Box::new(element_property(
                    model,
                    Some(additional),
                )?)),
                None => Shape::Arbitrary,
            },
            Some(ty) => Shape::Primitive {
                ty: ty.to_owned(),
                format: raw.format,
            },
        }
    };

    Ok(Property { extensions, shape })
}

fn element_property(
    model: &str,
    additional: Option<AdditionalProperties>,
) -> Result<Property, OpenApiError> {
    match additional {
        Some(AdditionalProperties::Schema(schema)) => to_property(model, *schema),
        Some(AdditionalProperties::Allowed(_)) | None => Ok(Property::new(Shape::Arbitrary)),
    }
}

fn strip_ref(model: &str, reference: &str) -> Result<String, OpenApiError> {
    reference
        .strip_prefix(SWAGGER_REF_PREFIX)
        .or_else(|| reference.strip_prefix(OPENAPI_V3_REF_PREFIX))
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| OpenApiError::UnsupportedReference {
            model: model.to_owned(),
            reference: reference.to_owned(),
        })
}
