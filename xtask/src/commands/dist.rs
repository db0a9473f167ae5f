//! Packaging workflow: compiles the indicator to wasm and emits ESM/CommonJS module bundles.

mod config;
mod manifest;

use crate::runtime::context::CommandContext;
use crate::runtime::error::{IoContext, XtaskError, XtaskResult};
use crate::XtaskCommand;
pub(crate) use config::load_dist_config;
pub use config::{DistConfig, FormatSpec};
use config::DIST_CONFIG_FILE;
use manifest::{package_manifest, BuildInfo, BuiltFormat};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const WASM_TARGET: &str = "wasm32-unknown-unknown";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BuildProfile {
    Dev,
    Release,
}

impl BuildProfile {
    fn token(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Release => "release",
        }
    }

    fn target_subdir(self) -> &'static str {
        match self {
            Self::Dev => "debug",
            Self::Release => "release",
        }
    }
}

/// Parsed `cargo xtask dist` options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistOptions {
    pub(crate) profile: BuildProfile,
    pub(crate) out_dir: Option<String>,
    pub(crate) no_minify: bool,
    pub(crate) show_help: bool,
}

/// `cargo xtask dist`
pub struct DistCommand;

impl XtaskCommand for DistCommand {
    type Options = DistOptions;

    fn parse(args: &[String]) -> XtaskResult<Self::Options> {
        parse_dist_options(args)
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()> {
        if options.show_help {
            print_dist_usage();
            return Ok(());
        }

        let mut config = load_dist_config(ctx)?;
        if let Some(out_dir) = options.out_dir.clone() {
            config.out_dir = out_dir;
        }
        if options.no_minify {
            config.minify = false;
        }

        run_dist(ctx, &config, options.profile).map_err(|err| err.with_operation("dist"))
    }
}

fn parse_dist_options(args: &[String]) -> XtaskResult<DistOptions> {
    let mut options = DistOptions {
        profile: BuildProfile::Release,
        out_dir: None,
        no_minify: false,
        show_help: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dev" => options.profile = BuildProfile::Dev,
            "--release" => options.profile = BuildProfile::Release,
            "--no-minify" => options.no_minify = true,
            "--out-dir" => {
                let Some(value) = iter.next() else {
                    return Err(XtaskError::validation("`--out-dir` requires a path"));
                };
                options.out_dir = Some(value.clone());
            }
            "--help" | "-h" => options.show_help = true,
            other => {
                return Err(XtaskError::validation(format!(
                    "unknown dist argument: {other}"
                ))
                .with_hint("run `cargo xtask dist --help`"))
            }
        }
    }
    Ok(options)
}

fn print_dist_usage() {
    eprintln!(
        "Usage: cargo xtask dist [--dev|--release] [--out-dir <path>] [--no-minify]\n\
         \n\
         Builds the component for {WASM_TARGET}, runs wasm-bindgen once per configured format,\n\
         and writes package.json plus build-info.json into the output directory.\n\
         \n\
         Layout and formats come from `{DIST_CONFIG_FILE}`.\n"
    );
}

fn run_dist(ctx: &CommandContext, config: &DistConfig, profile: BuildProfile) -> XtaskResult<()> {
    ctx.process().ensure_command(
        "wasm-bindgen",
        "install it with `cargo install wasm-bindgen-cli` (version must match the wasm-bindgen crate)",
    )?;
    if !ctx.process().rust_target_installed(WASM_TARGET) {
        return Err(
            XtaskError::environment(format!("rust target `{WASM_TARGET}` is not installed"))
                .with_hint(format!("run `rustup target add {WASM_TARGET}`")),
        );
    }

    let root = ctx.root();
    let out_dir = root.join(&config.out_dir);
    let crate_dir = root.join(&config.crate_dir);
    let wasm = wasm_artifact(&target_dir(ctx), &config.package, profile);

    if config.clean {
        ctx.stages()
            .run_timed_stage(&format!("Clean {}", config.out_dir), || {
                clean_dir(&out_dir)
            })?;
    }

    ctx.stages().run_timed_stage(
        &format!("Compile {} for {WASM_TARGET} ({})", config.package, profile.token()),
        || ctx.process().run_owned(root, "cargo", cargo_build_args(config, profile)),
    )?;

    for format in &config.formats {
        ctx.stages().run_timed_stage(
            &format!("Generate {} bindings (wasm-bindgen --target {})", format.name, format.target),
            || {
                let format_dir = out_dir.join(&format.name);
                ctx.process().run_owned(
                    root,
                    "wasm-bindgen",
                    wasm_bindgen_args(config, format, &wasm, &format_dir),
                )?;
                rename_outputs(&format_dir, &config.out_name, format, config.typescript)
            },
        )?;
    }

    let mut minified = false;
    if config.minify {
        if ctx.process().command_available("wasm-opt") {
            ctx.stages().run_timed_stage("Minify wasm (wasm-opt -Oz)", || {
                for format in &config.formats {
                    let module = out_dir
                        .join(&format.name)
                        .join(format!("{}_bg.wasm", config.out_name));
                    ctx.process()
                        .run_owned(root, "wasm-opt", wasm_opt_args(config, &module))?;
                }
                Ok(())
            })?;
            minified = true;
        } else {
            ctx.stages()
                .warn("`wasm-opt` not found; skipping minification (install binaryen to enable)");
        }
    }

    let stylesheet_name = Path::new(&config.stylesheet)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            XtaskError::config(format!("stylesheet `{}` has no file name", config.stylesheet))
        })?;

    ctx.stages().run_timed_stage("Copy stylesheet", || {
        let source = crate_dir.join(&config.stylesheet);
        fs::copy(&source, out_dir.join(&stylesheet_name))
            .map(|_| ())
            .io_context("copy stylesheet", &source)
    })?;

    ctx.stages().run_timed_stage("Write package manifest", || {
        let version = read_package_version(&crate_dir)?;
        let manifest = package_manifest(config, &version, &stylesheet_name);
        let info = BuildInfo {
            package: config.package.clone(),
            version,
            profile: profile.token(),
            built_at: chrono::Utc::now().to_rfc3339(),
            minified,
            keep_debug: config.keep_debug,
            formats: config
                .formats
                .iter()
                .map(|format| BuiltFormat {
                    name: format.name.clone(),
                    target: format.target.clone(),
                    entry: format.entry(&config.out_name),
                })
                .collect(),
        };
        write_json(&out_dir.join("package.json"), &manifest)?;
        write_json(&out_dir.join("build-info.json"), &info)
    })?;

    println!("\npackaged {} into {}", config.package, out_dir.display());
    Ok(())
}

/// Cargo's target directory. `cargo metadata` already applies `CARGO_TARGET_DIR` and
/// `build.target-dir`; without it the env var and then `<root>/target` are used.
fn target_dir(ctx: &CommandContext) -> PathBuf {
    let manifest = ctx.root().join("Cargo.toml").display().to_string();
    ctx.process()
        .capture_stdout(
            "cargo",
            &[
                "metadata",
                "--format-version",
                "1",
                "--no-deps",
                "--manifest-path",
                manifest.as_str(),
            ],
        )
        .and_then(|stdout| parse_target_directory(&stdout))
        .unwrap_or_else(|| {
            ctx.stages()
                .warn("`cargo metadata` unavailable; guessing the target directory");
            fallback_target_dir(ctx.root(), std::env::var_os("CARGO_TARGET_DIR"))
        })
}

fn parse_target_directory(metadata: &str) -> Option<PathBuf> {
    let metadata: serde_json::Value = serde_json::from_str(metadata).ok()?;
    metadata
        .get("target_directory")?
        .as_str()
        .map(PathBuf::from)
}

fn fallback_target_dir(root: &Path, env_dir: Option<OsString>) -> PathBuf {
    match env_dir {
        Some(dir) if !dir.is_empty() => root.join(dir),
        _ => root.join("target"),
    }
}

fn wasm_artifact(target_dir: &Path, package: &str, profile: BuildProfile) -> PathBuf {
    target_dir
        .join(WASM_TARGET)
        .join(profile.target_subdir())
        .join(format!("{}.wasm", package.replace('-', "_")))
}

fn cargo_build_args(config: &DistConfig, profile: BuildProfile) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        "-p".to_string(),
        config.package.clone(),
        "--lib".to_string(),
        "--target".to_string(),
        WASM_TARGET.to_string(),
    ];
    if profile == BuildProfile::Release {
        args.push("--release".to_string());
    }
    args
}

fn wasm_bindgen_args(
    config: &DistConfig,
    format: &FormatSpec,
    wasm: &Path,
    format_dir: &Path,
) -> Vec<String> {
    let mut args = vec![
        "--target".to_string(),
        format.target.clone(),
        "--out-dir".to_string(),
        format_dir.display().to_string(),
        "--out-name".to_string(),
        config.out_name.clone(),
    ];
    if !config.typescript {
        args.push("--no-typescript".to_string());
    }
    if config.keep_debug {
        args.push("--keep-debug".to_string());
    }
    args.push(wasm.display().to_string());
    args
}

fn wasm_opt_args(config: &DistConfig, module: &Path) -> Vec<String> {
    let module = module.display().to_string();
    let mut args = vec!["-Oz".to_string()];
    if config.keep_debug {
        args.push("-g".to_string());
    }
    args.extend([module.clone(), "-o".to_string(), module]);
    args
}

fn rename_outputs(
    format_dir: &Path,
    out_name: &str,
    format: &FormatSpec,
    typescript: bool,
) -> XtaskResult<()> {
    for (from, to) in output_renames(out_name, format, typescript) {
        let from = format_dir.join(from);
        fs::rename(&from, format_dir.join(to)).io_context("rename generated module", &from)?;
    }
    Ok(())
}

/// wasm-bindgen always writes `<out_name>.js` and `<out_name>.d.ts`; `cjs` and `mjs` formats need
/// both renamed so Node resolves the entry and TypeScript pairs the declarations with it.
fn output_renames(out_name: &str, format: &FormatSpec, typescript: bool) -> Vec<(String, String)> {
    if format.extension == "js" {
        return Vec::new();
    }
    let mut renames = vec![(
        format!("{out_name}.js"),
        format!("{out_name}.{}", format.extension),
    )];
    if typescript {
        renames.push((
            format!("{out_name}.d.ts"),
            format!("{out_name}.{}", format.declaration_extension()),
        ));
    }
    renames
}

fn clean_dir(dir: &Path) -> XtaskResult<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).io_context("remove output directory", dir)?;
    }
    fs::create_dir_all(dir).io_context("create output directory", dir)
}

fn read_package_version(crate_dir: &Path) -> XtaskResult<String> {
    let manifest_path = crate_dir.join("Cargo.toml");
    let body = fs::read_to_string(&manifest_path).io_context("read crate manifest", &manifest_path)?;
    let manifest: toml::Value = toml::from_str(&body).map_err(|err| {
        XtaskError::config(format!("failed to parse crate manifest: {err}"))
            .with_path(&manifest_path)
    })?;
    manifest
        .get("package")
        .and_then(|package| package.get("version"))
        .and_then(toml::Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            XtaskError::config("crate manifest has no [package] version").with_path(&manifest_path)
        })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> XtaskResult<()> {
    let mut body = serde_json::to_string_pretty(value)
        .map_err(|err| XtaskError::io(format!("failed to serialize json: {err}")))?;
    body.push('\n');
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).io_context("create directory", parent)?;
    }
    fs::write(path, body).io_context("write json", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::XtaskErrorCategory;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parse_defaults_to_release_with_config_layout() {
        let options = parse_dist_options(&[]).expect("parse");
        assert_eq!(options.profile, BuildProfile::Release);
        assert_eq!(options.out_dir, None);
        assert!(!options.no_minify);
    }

    #[test]
    fn parse_accepts_overrides() {
        let options =
            parse_dist_options(&args(&["--dev", "--out-dir", "pkg", "--no-minify"])).expect("parse");
        assert_eq!(options.profile, BuildProfile::Dev);
        assert_eq!(options.out_dir.as_deref(), Some("pkg"));
        assert!(options.no_minify);
    }

    #[test]
    fn parse_rejects_missing_out_dir_value_and_unknown_flags() {
        let err = parse_dist_options(&args(&["--out-dir"])).expect_err("missing value");
        assert_eq!(err.category, XtaskErrorCategory::Validation);
        let err = parse_dist_options(&args(&["--sourcemap"])).expect_err("unknown flag");
        assert!(err.to_string().contains("--sourcemap"));
    }

    #[test]
    fn wasm_bindgen_args_follow_format_and_config() {
        let config = DistConfig::default();
        let format = &config.formats[1];
        let got = wasm_bindgen_args(
            &config,
            format,
            Path::new("/w/target/activity_indicator.wasm"),
            Path::new("/w/dist/cjs"),
        );
        assert_eq!(
            got,
            args(&[
                "--target",
                "nodejs",
                "--out-dir",
                "/w/dist/cjs",
                "--out-name",
                "activity_indicator",
                "--keep-debug",
                "/w/target/activity_indicator.wasm",
            ])
        );

        let config = DistConfig {
            typescript: false,
            keep_debug: false,
            ..DistConfig::default()
        };
        let got = wasm_bindgen_args(&config, &config.formats[0], Path::new("a.wasm"), Path::new("d"));
        assert!(got.contains(&"--no-typescript".to_string()));
        assert!(!got.contains(&"--keep-debug".to_string()));
    }

    #[test]
    fn cargo_build_args_add_release_flag_only_for_release() {
        let config = DistConfig::default();
        assert!(cargo_build_args(&config, BuildProfile::Release).contains(&"--release".to_string()));
        assert!(!cargo_build_args(&config, BuildProfile::Dev).contains(&"--release".to_string()));
    }

    #[test]
    fn wasm_artifact_path_tracks_target_dir_and_profile() {
        let path = wasm_artifact(Path::new("/cache/build"), "activity_indicator", BuildProfile::Dev);
        assert_eq!(
            path,
            Path::new("/cache/build/wasm32-unknown-unknown/debug/activity_indicator.wasm")
        );
    }

    #[test]
    fn target_directory_comes_from_cargo_metadata() {
        let metadata = r#"{"packages":[],"target_directory":"/cache/build","version":1}"#;
        assert_eq!(
            parse_target_directory(metadata),
            Some(PathBuf::from("/cache/build"))
        );
        assert_eq!(parse_target_directory("not json"), None);
        assert_eq!(parse_target_directory(r#"{"version":1}"#), None);
    }

    #[test]
    fn fallback_target_dir_honors_env_override() {
        let root = Path::new("/w");
        assert_eq!(fallback_target_dir(root, None), Path::new("/w/target"));
        assert_eq!(
            fallback_target_dir(root, Some(OsString::new())),
            Path::new("/w/target")
        );
        assert_eq!(
            fallback_target_dir(root, Some(OsString::from("out"))),
            Path::new("/w/out")
        );
        assert_eq!(
            fallback_target_dir(root, Some(OsString::from("/abs/target"))),
            Path::new("/abs/target")
        );
    }

    #[test]
    fn commonjs_outputs_get_cjs_entry_and_cts_declarations() {
        let config = DistConfig::default();
        let esm = &config.formats[0];
        let cjs = &config.formats[1];
        assert!(output_renames("activity_indicator", esm, true).is_empty());
        assert_eq!(
            output_renames("activity_indicator", cjs, true),
            vec![
                (
                    "activity_indicator.js".to_string(),
                    "activity_indicator.cjs".to_string()
                ),
                (
                    "activity_indicator.d.ts".to_string(),
                    "activity_indicator.d.cts".to_string()
                ),
            ]
        );
        assert_eq!(output_renames("activity_indicator", cjs, false).len(), 1);
    }

    #[test]
    fn reads_version_from_component_manifest() {
        let crate_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .expect("workspace root")
            .join("crates/activity_indicator");
        let version = read_package_version(&crate_dir).expect("read version");
        assert!(!version.is_empty());
    }
}
