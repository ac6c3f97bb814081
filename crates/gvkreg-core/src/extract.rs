use gvkreg_openapi::{ExtensionValue, Extensions};
use gvkreg_schema::GroupVersionKind;
use tracing::trace;

/// Extension key under which a model definition lists the group/version/kinds
/// it serves.
pub const GVK_EXTENSION_KEY: &str = "x-kubernetes-group-version-kind";

/// Decode the group/version/kinds declared in a model's extensions.
///
/// Missing or non-list extensions yield an empty result. Entries that are not
/// maps with string `group`, `version`, and `kind` are skipped; the remaining
/// entries are returned in declaration order.
pub fn parse_group_version_kind(extensions: &Extensions) -> Vec<GroupVersionKind> {
    let Some(entries) = extensions
        .get(GVK_EXTENSION_KEY)
        .and_then(ExtensionValue::as_list)
    else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let gvk = decode_entry(entry);
            if gvk.is_none() {
                trace!("skipping malformed {GVK_EXTENSION_KEY} entry: {entry:?}");
            }
            gvk
        })
        .collect()
}

fn decode_entry(entry: &ExtensionValue) -> Option<GroupVersionKind> {
    let field = |name: &str| entry.get(name).and_then(ExtensionValue::as_str);
    Some(GroupVersionKind::new(
        field("group")?,
        field("version")?,
        field("kind")?,
    ))
}
