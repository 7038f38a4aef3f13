//! Web app manifest and package manifest files

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::output::{GeneratedFile, GeneratedFolder};
use crate::uidl::ProjectUidl;
use crate::utils::{prefix_assets_path, slugify};

/// `manifest.json` with the project's manifest overlaid on defaults
pub fn create_manifest_file(uidl: &ProjectUidl, assets_prefix: &str) -> Result<Option<GeneratedFile>> {
    let Some(manifest) = &uidl.globals.manifest else {
        return Ok(None);
    };

    let mut content = Map::new();
    content.insert("short_name".into(), json!(uidl.name));
    content.insert("name".into(), json!(uidl.name));
    content.insert("display".into(), json!("standalone"));
    content.insert("start_url".into(), json!("/"));

    if let Value::Object(overlay) = serde_json::to_value(manifest)? {
        content.extend(overlay);
    }

    let mut icons = manifest.icons.clone();
    for icon in &mut icons {
        icon.src = prefix_assets_path(assets_prefix, &icon.src);
    }
    content.insert("icons".into(), serde_json::to_value(icons)?);

    let text = serde_json::to_string_pretty(&Value::Object(content))?;
    Ok(Some(GeneratedFile::new("manifest", "json", text)))
}

fn default_package_json(name: &str) -> Value {
    json!({
        "name": name,
        "version": "1.0.0",
        "private": true,
        "scripts": {},
    })
}

/// Write the project's dependencies into `package.json` at the folder root.
///
/// An existing template manifest keeps its other fields; declared dependency
/// maps are merged over the existing ones.
pub fn handle_package_json(
    folder: &mut GeneratedFolder,
    uidl: &ProjectUidl,
    dependencies: &BTreeMap<String, String>,
    dev_dependencies: &BTreeMap<String, String>,
) -> Result<()> {
    let name = slugify(&uidl.name);

    let existing = folder
        .files
        .iter()
        .position(|file| file.name == "package" && file.file_type.as_deref() == Some("json"));

    let mut package = match existing {
        Some(index) => serde_json::from_str(&folder.files[index].content)?,
        None => default_package_json(&name),
    };

    if let Value::Object(fields) = &mut package {
        fields.insert("name".into(), json!(name));
        merge_map(fields, "dependencies", dependencies);
        if !dev_dependencies.is_empty() || existing.is_some() {
            merge_map(fields, "devDependencies", dev_dependencies);
        }
    }

    let content = serde_json::to_string_pretty(&package)?;
    match existing {
        Some(index) => folder.files[index].content = content,
        None => folder.files.push(GeneratedFile::new("package", "json", content)),
    }
    Ok(())
}

fn merge_map(fields: &mut Map<String, Value>, key: &str, entries: &BTreeMap<String, String>) {
    let target = fields
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        for (name, version) in entries {
            map.insert(name.clone(), json!(version));
        }
    }
}
