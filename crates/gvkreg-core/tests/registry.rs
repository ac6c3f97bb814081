use gvkreg_core::{CoreError, GvkParser, RAW_EXTENSION_TYPE_NAME};
use gvkreg_openapi::{Model, Models, OpenApiModels};
use gvkreg_schema::{Atom, GroupVersionKind};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::thread;

fn catalog(definitions: Value) -> OpenApiModels {
    let doc = json!({"swagger": "2.0", "definitions": definitions});
    OpenApiModels::from_json_str(&doc.to_string()).unwrap()
}

fn gvk(group: &str, version: &str, kind: &str) -> GroupVersionKind {
    GroupVersionKind::new(group, version, kind)
}

fn apps_catalog() -> OpenApiModels {
    catalog(json!({
        "io.k8s.api.apps.v1.Deployment": {
            "type": "object",
            "properties": {
                "apiVersion": {"type": "string"},
                "kind": {"type": "string"},
                "spec": {"$ref": "#/definitions/io.k8s.api.apps.v1.DeploymentSpec"}
            },
            "x-kubernetes-group-version-kind": [
                {"group": "apps", "version": "v1", "kind": "Deployment"}
            ]
        },
        "io.k8s.api.apps.v1.DeploymentSpec": {
            "type": "object",
            "properties": {
                "replicas": {"type": "integer", "format": "int32"},
                "template": {"$ref": "#/definitions/io.k8s.apimachinery.pkg.runtime.RawExtension"}
            }
        },
        "io.k8s.apimachinery.pkg.runtime.RawExtension": {
            "type": "object",
            "properties": {"raw": {"type": "string", "format": "byte"}}
        },
        "io.k8s.api.core.v1.ConfigMap": {
            "type": "object",
            "properties": {
                "data": {"type": "object", "additionalProperties": {"type": "string"}}
            },
            "x-kubernetes-group-version-kind": [
                {"group": "", "version": "v1", "kind": "ConfigMap"}
            ]
        }
    }))
}

fn index_of(parser: &GvkParser) -> BTreeMap<GroupVersionKind, String> {
    parser
        .gvks()
        .map(|(gvk, model)| (gvk.clone(), model.to_string()))
        .collect()
}

#[test]
fn catalog_without_gvk_extensions_has_empty_index() {
    let models = catalog(json!({
        "A": {"type": "string"},
        "B": {"properties": {"a": {"$ref": "#/definitions/A"}}}
    }));
    let parser = GvkParser::new(&models).unwrap();

    assert!(parser.is_empty());
    assert!(parser.type_for(&gvk("", "v1", "A")).is_none());
    assert!(parser.type_for(&gvk("apps", "v1", "Deployment")).is_none());
    assert_eq!(parser.schema().types.len(), 2);
}

#[test]
fn declared_gvk_resolves_to_model_type() {
    let parser = GvkParser::new(&apps_catalog()).unwrap();

    let deployment = parser.type_for(&gvk("apps", "v1", "Deployment")).unwrap();
    assert!(deployment.is_valid());
    assert_eq!(
        deployment,
        parser.parser().type_named("io.k8s.api.apps.v1.Deployment")
    );

    let replicas = deployment.field("spec").unwrap().field("replicas").unwrap();
    assert!(replicas.atom().unwrap().is_atomic());

    let config_map = parser.type_for(&gvk("", "v1", "ConfigMap")).unwrap();
    assert_eq!(config_map.name(), Some("io.k8s.api.core.v1.ConfigMap"));
    assert_eq!(
        parser
            .model_for(&gvk("", "v1", "ConfigMap"))
            .map(|m| m.as_str()),
        Some("io.k8s.api.core.v1.ConfigMap")
    );
}

#[test]
fn unknown_gvk_is_absent_not_error() {
    let parser = GvkParser::new(&apps_catalog()).unwrap();
    assert!(parser.type_for(&gvk("apps", "v1beta1", "Deployment")).is_none());
    assert!(parser.type_for(&gvk("example.com", "v1", "Widget")).is_none());
}

#[test]
fn entry_missing_kind_is_skipped_but_siblings_indexed() {
    let models = catalog(json!({
        "io.k8s.api.batch.v1.Job": {
            "type": "object",
            "properties": {"kind": {"type": "string"}},
            "x-kubernetes-group-version-kind": [
                {"group": "batch", "version": "v1"},
                {"group": "batch", "version": "v1", "kind": "Job"}
            ]
        }
    }));
    let parser = GvkParser::new(&models).unwrap();

    assert_eq!(parser.len(), 1);
    assert!(parser.type_for(&gvk("batch", "v1", "Job")).is_some());
    assert!(parser.type_for(&gvk("batch", "v1", "")).is_none());
}

#[test]
fn empty_kind_is_not_indexed() {
    let models = catalog(json!({
        "io.k8s.apimachinery.pkg.apis.meta.v1.Status": {
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "x-kubernetes-group-version-kind": [
                {"group": "", "version": "v1", "kind": ""}
            ]
        }
    }));
    let parser = GvkParser::new(&models).unwrap();

    assert!(parser.is_empty());
    assert!(parser.type_for(&gvk("", "v1", "")).is_none());
}

#[test]
fn rebuilding_from_same_catalog_yields_equal_index() {
    let models = apps_catalog();
    let first = GvkParser::new(&models).unwrap();
    let second = GvkParser::new(&models).unwrap();

    assert_eq!(index_of(&first), index_of(&second));
    assert_eq!(first.schema(), second.schema());
}

#[test]
fn raw_extension_is_forced_atomic() {
    let models = catalog(json!({
        "io.k8s.apimachinery.pkg.runtime.RawExtension": {
            "type": "object",
            "additionalProperties": {"type": "string"}
        }
    }));
    let parser = GvkParser::new(&models).unwrap();

    let raw: Vec<_> = parser
        .schema()
        .types
        .iter()
        .filter(|t| t.name == RAW_EXTENSION_TYPE_NAME)
        .collect();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].atom, Atom::untyped_atomic());
}

#[test]
fn raw_extension_referenced_from_field_resolves_atomic() {
    let parser = GvkParser::new(&apps_catalog()).unwrap();
    let template = parser
        .type_for(&gvk("apps", "v1", "Deployment"))
        .and_then(|t| t.field("spec"))
        .and_then(|t| t.field("template"))
        .unwrap();
    assert_eq!(template.name(), Some(RAW_EXTENSION_TYPE_NAME));
    assert!(matches!(template.atom(), Some(Atom::Untyped(_))));
    assert!(template.field("raw").is_none());
}

#[test]
fn conversion_failure_yields_no_parser() {
    let models = catalog(json!({
        "io.k8s.api.core.v1.Pod": {
            "type": "object",
            "properties": {"spec": {"$ref": "#/definitions/io.k8s.api.core.v1.PodSpec"}},
            "x-kubernetes-group-version-kind": [
                {"group": "", "version": "v1", "kind": "Pod"}
            ]
        }
    }));
    let err = GvkParser::new(&models).unwrap_err();
    assert!(matches!(err, CoreError::SchemaConversion(_)));
}

/// Catalog whose listing names one model more than it can resolve.
struct ListsVanishedModel(OpenApiModels);

impl Models for ListsVanishedModel {
    fn list_models(&self) -> Vec<String> {
        let mut names = self.0.list_models();
        names.push("io.k8s.api.core.v1.Vanished".to_owned());
        names
    }

    fn lookup_model(&self, name: &str) -> Option<&dyn Model> {
        self.0.lookup_model(name)
    }
}

#[test]
fn unresolvable_listed_model_is_catalog_inconsistency() {
    let models = ListsVanishedModel(apps_catalog());
    let err = GvkParser::new(&models).unwrap_err();

    assert!(
        matches!(err, CoreError::CatalogInconsistency(ref name) if name == "io.k8s.api.core.v1.Vanished"),
        "got: {err:?}"
    );
    assert!(!matches!(err, CoreError::SchemaConversion(_)));
}

#[test]
fn duplicate_gvk_binds_to_last_model_listed() {
    let declared = json!([{"group": "example.com", "version": "v1", "kind": "Widget"}]);
    let models = catalog(json!({
        "com.example.v1.WidgetA": {
            "properties": {"a": {"type": "string"}},
            "x-kubernetes-group-version-kind": declared
        },
        "com.example.v1.WidgetB": {
            "properties": {"b": {"type": "string"}},
            "x-kubernetes-group-version-kind": declared
        }
    }));
    let parser = GvkParser::new(&models).unwrap();

    assert_eq!(parser.len(), 1);
    let widget = parser.type_for(&gvk("example.com", "v1", "Widget")).unwrap();
    assert_eq!(widget.name(), Some("com.example.v1.WidgetB"));
}

#[test]
fn model_serving_several_versions_indexes_each() {
    let models = catalog(json!({
        "io.k8s.apimachinery.pkg.apis.meta.v1.DeleteOptions": {
            "properties": {"dryRun": {"type": "array", "items": {"type": "string"}}},
            "x-kubernetes-group-version-kind": [
                {"group": "", "version": "v1", "kind": "DeleteOptions"},
                {"group": "apps", "version": "v1", "kind": "DeleteOptions"},
                {"group": "batch", "version": "v1", "kind": "DeleteOptions"}
            ]
        }
    }));
    let parser = GvkParser::new(&models).unwrap();

    assert_eq!(parser.len(), 3);
    let core = parser.type_for(&gvk("", "v1", "DeleteOptions")).unwrap();
    let batch = parser.type_for(&gvk("batch", "v1", "DeleteOptions")).unwrap();
    assert_eq!(core, batch);
}

#[test]
fn builds_from_document_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swagger.json");
    let doc = json!({"definitions": {
        "io.k8s.api.core.v1.Namespace": {
            "properties": {"metadata": {"type": "object"}},
            "x-kubernetes-group-version-kind": [
                {"group": "", "version": "v1", "kind": "Namespace"}
            ]
        }
    }});
    fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

    let models = OpenApiModels::from_file(&path).unwrap();
    let parser = GvkParser::new(&models).unwrap();
    assert!(parser.type_for(&gvk("", "v1", "Namespace")).is_some());
}

#[test]
fn concurrent_lookups_see_same_types() {
    let parser = GvkParser::new(&apps_catalog()).unwrap();
    let expected = parser
        .type_for(&gvk("apps", "v1", "Deployment"))
        .and_then(|t| t.name())
        .map(str::to_owned);

    let parser = &parser;
    thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(move || {
                    (0..100)
                        .map(|_| {
                            parser
                                .type_for(&gvk("apps", "v1", "Deployment"))
                                .and_then(|t| t.name())
                                .map(str::to_owned)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for name in handle.join().unwrap() {
                assert_eq!(name, expected);
            }
        }
    });
}
