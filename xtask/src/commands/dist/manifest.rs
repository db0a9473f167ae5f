use super::config::DistConfig;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// `package.json` for the packaged output directory.
pub(crate) fn package_manifest(config: &DistConfig, version: &str, stylesheet: &str) -> Value {
    let out_name = config.out_name.as_str();
    let import = config.format_for("import");
    let require = config.format_for("require");

    let mut root = Map::new();
    root.insert("name".into(), json!(config.package.replace('_', "-")));
    root.insert("version".into(), json!(version));
    root.insert("type".into(), json!("module"));

    if let Some(entry) = require.or(import) {
        root.insert("main".into(), json!(format!("./{}", entry.entry(out_name))));
    }
    if let Some(entry) = import {
        root.insert("module".into(), json!(format!("./{}", entry.entry(out_name))));
    }
    let types = config
        .typescript
        .then(|| import.or(require))
        .flatten()
        .map(|format| format!("./{}", format.declarations(out_name)));
    if let Some(types) = &types {
        root.insert("types".into(), json!(types));
    }
    root.insert("style".into(), json!(format!("./{stylesheet}")));

    let mut entry_exports = Map::new();
    for format in &config.formats {
        let entry = json!(format!("./{}", format.entry(out_name)));
        let target = if config.typescript {
            json!({
                "types": format!("./{}", format.declarations(out_name)),
                "default": entry,
            })
        } else {
            entry
        };
        entry_exports.insert(format.condition.clone(), target);
    }
    root.insert(
        "exports".into(),
        json!({
            ".": entry_exports,
            "./style.css": format!("./{stylesheet}"),
        }),
    );

    let mut files: Vec<String> = config
        .formats
        .iter()
        .map(|format| format.name.clone())
        .collect();
    files.push(stylesheet.to_string());
    root.insert("files".into(), json!(files));

    Value::Object(root)
}

/// Record of one packaging run, written next to `package.json`.
#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub(crate) struct BuildInfo {
    pub(crate) package: String,
    pub(crate) version: String,
    pub(crate) profile: &'static str,
    pub(crate) built_at: String,
    pub(crate) minified: bool,
    pub(crate) keep_debug: bool,
    pub(crate) formats: Vec<BuiltFormat>,
}

#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub(crate) struct BuiltFormat {
    pub(crate) name: String,
    pub(crate) target: String,
    pub(crate) entry: String,
}
