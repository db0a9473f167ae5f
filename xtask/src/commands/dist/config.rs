use crate::runtime::config::ConfigLoader;
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};
use serde::Deserialize;
use std::collections::BTreeSet;

pub(crate) const DIST_CONFIG_FILE: &str = "tools/packaging/dist.toml";

const WASM_BINDGEN_TARGETS: [&str; 5] = ["bundler", "web", "nodejs", "no-modules", "deno"];

/// Packaging layout loaded from [`DIST_CONFIG_FILE`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DistConfig {
    /// Cargo package to compile.
    pub package: String,
    /// Workspace-relative crate directory.
    pub crate_dir: String,
    /// Stylesheet path, relative to `crate_dir`.
    pub stylesheet: String,
    /// Workspace-relative output directory.
    pub out_dir: String,
    /// Base file name for generated modules.
    pub out_name: String,
    /// Remove the output directory before packaging.
    pub clean: bool,
    /// Optimize generated wasm with `wasm-opt -Oz`.
    pub minify: bool,
    /// Keep DWARF debug info in generated wasm.
    pub keep_debug: bool,
    /// Emit `.d.ts` declarations.
    pub typescript: bool,
    /// Module formats to emit.
    #[serde(rename = "format")]
    pub formats: Vec<FormatSpec>,
}

/// One distributable module format.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormatSpec {
    /// Output subdirectory and display name.
    pub name: String,
    /// `wasm-bindgen --target` value.
    pub target: String,
    /// Entry module extension (`js`, `mjs`, or `cjs`).
    pub extension: String,
    /// Package export condition (`import` or `require`).
    pub condition: String,
}

impl FormatSpec {
    fn new(name: &str, target: &str, extension: &str, condition: &str) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            extension: extension.to_string(),
            condition: condition.to_string(),
        }
    }

    /// Entry file path relative to the output directory.
    pub fn entry(&self, out_name: &str) -> String {
        format!("{}/{out_name}.{}", self.name, self.extension)
    }

    /// Declaration file path relative to the output directory.
    pub fn declarations(&self, out_name: &str) -> String {
        format!("{}/{out_name}.{}", self.name, self.declaration_extension())
    }

    /// Declaration extension TypeScript pairs with the entry extension.
    pub fn declaration_extension(&self) -> &'static str {
        match self.extension.as_str() {
            "cjs" => "d.cts",
            "mjs" => "d.mts",
            _ => "d.ts",
        }
    }
}

impl Default for DistConfig {
    fn default() -> Self {
        Self {
            package: "activity_indicator".to_string(),
            crate_dir: "crates/activity_indicator".to_string(),
            stylesheet: "style/activity_indicator.css".to_string(),
            out_dir: "dist".to_string(),
            out_name: "activity_indicator".to_string(),
            clean: true,
            minify: true,
            keep_debug: true,
            typescript: true,
            formats: vec![
                FormatSpec::new("esm", "bundler", "js", "import"),
                FormatSpec::new("cjs", "nodejs", "cjs", "require"),
            ],
        }
    }
}

impl DistConfig {
    /// Semantic checks that TOML deserialization cannot express.
    pub fn validate(self) -> XtaskResult<Self> {
        for (field, value) in [
            ("package", &self.package),
            ("crate_dir", &self.crate_dir),
            ("out_dir", &self.out_dir),
            ("out_name", &self.out_name),
        ] {
            if value.trim().is_empty() {
                return Err(XtaskError::config(format!("`{field}` must not be empty")));
            }
        }
        if self.formats.is_empty() {
            return Err(XtaskError::config("at least one [[format]] is required"));
        }

        let mut names = BTreeSet::new();
        let mut conditions = BTreeSet::new();
        for format in &self.formats {
            if !names.insert(format.name.as_str()) {
                return Err(XtaskError::config(format!(
                    "duplicate format name `{}`",
                    format.name
                )));
            }
            if !WASM_BINDGEN_TARGETS.contains(&format.target.as_str()) {
                return Err(XtaskError::config(format!(
                    "format `{}` has unsupported target `{}` (expected one of: {})",
                    format.name,
                    format.target,
                    WASM_BINDGEN_TARGETS.join(", ")
                )));
            }
            let extension_ok = match format.condition.as_str() {
                "import" => matches!(format.extension.as_str(), "js" | "mjs"),
                "require" => format.extension == "cjs",
                other => {
                    return Err(XtaskError::config(format!(
                        "format `{}` has invalid condition `{other}` (expected `import` or `require`)",
                        format.name
                    )))
                }
            };
            if !extension_ok {
                return Err(XtaskError::config(format!(
                    "format `{}` uses extension `{}`, which does not match condition `{}`",
                    format.name, format.extension, format.condition
                )));
            }
            if !conditions.insert(format.condition.as_str()) {
                return Err(XtaskError::config(format!(
                    "more than one format exports condition `{}`",
                    format.condition
                )));
            }
        }
        Ok(self)
    }

    /// Format exported under the given condition.
    pub fn format_for(&self, condition: &str) -> Option<&FormatSpec> {
        self.formats
            .iter()
            .find(|format| format.condition == condition)
    }
}

pub(crate) fn load_dist_config(ctx: &CommandContext) -> XtaskResult<DistConfig> {
    let loader = ConfigLoader::<DistConfig>::new(ctx.root(), DIST_CONFIG_FILE);
    let config = loader.load_optional()?.unwrap_or_default();
    config
        .validate()
        .map_err(|err| err.with_path(loader.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::XtaskErrorCategory;

    fn with_formats(formats: Vec<FormatSpec>) -> DistConfig {
        DistConfig {
            formats,
            ..DistConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid_esm_and_cjs() {
        let config = DistConfig::default().validate().expect("valid default");
        assert_eq!(config.format_for("import").map(|f| f.name.as_str()), Some("esm"));
        assert_eq!(config.format_for("require").map(|f| f.name.as_str()), Some("cjs"));
    }

    #[test]
    fn checked_in_config_matches_defaults() {
        let body = include_str!("../../../../tools/packaging/dist.toml");
        let parsed: DistConfig = toml::from_str(body).expect("parse dist.toml");
        assert_eq!(parsed, DistConfig::default());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: DistConfig = toml::from_str("out_dir = \"pkg\"\nminify = false\n").expect("parse");
        assert_eq!(parsed.out_dir, "pkg");
        assert!(!parsed.minify);
        assert_eq!(parsed.formats.len(), 2);
    }

    #[test]
    fn rejects_empty_format_list() {
        let err = with_formats(Vec::new()).validate().expect_err("no formats");
        assert_eq!(err.category, XtaskErrorCategory::Config);
    }

    #[test]
    fn rejects_unknown_target() {
        let err = with_formats(vec![FormatSpec::new("esm", "rollup", "js", "import")])
            .validate()
            .expect_err("bad target");
        assert!(err.to_string().contains("rollup"));
    }

    #[test]
    fn rejects_require_without_cjs_extension() {
        let err = with_formats(vec![FormatSpec::new("cjs", "nodejs", "js", "require")])
            .validate()
            .expect_err("bad extension");
        assert!(err.to_string().contains("does not match condition"));
    }

    #[test]
    fn rejects_duplicate_names_and_conditions() {
        let err = with_formats(vec![
            FormatSpec::new("esm", "bundler", "js", "import"),
            FormatSpec::new("esm", "web", "mjs", "import"),
        ])
        .validate()
        .expect_err("duplicate name");
        assert!(err.to_string().contains("duplicate format name"));

        let err = with_formats(vec![
            FormatSpec::new("esm", "bundler", "js", "import"),
            FormatSpec::new("web", "web", "mjs", "import"),
        ])
        .validate()
        .expect_err("duplicate condition");
        assert!(err.to_string().contains("more than one format"));
    }

    #[test]
    fn entry_paths_use_format_directory_and_extension() {
        let format = FormatSpec::new("cjs", "nodejs", "cjs", "require");
        assert_eq!(format.entry("activity_indicator"), "cjs/activity_indicator.cjs");
        assert_eq!(
            format.declarations("activity_indicator"),
            "cjs/activity_indicator.d.cts"
        );
        let esm = FormatSpec::new("esm", "bundler", "js", "import");
        assert_eq!(esm.declarations("activity_indicator"), "esm/activity_indicator.d.ts");
        let mjs = FormatSpec::new("web", "web", "mjs", "import");
        assert_eq!(mjs.declaration_extension(), "d.mts");
    }
}
