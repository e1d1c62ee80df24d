//! Built-in templates embedded at compile time.
//!
//! The workspace `templates/` directory holds the default `config.toml` and
//! one prompt per stage. They serve both as the runtime defaults for
//! [`PromptSet::embedded`](crate::config::prompts::PromptSet::embedded) and as
//! the files `init` writes into a project.

use rust_embed::RustEmbed;

/// Embedded template files from the workspace `templates/` directory.
///
/// With the `debug-embed` feature the files are compiled in for debug builds
/// as well, so tests see the same content as release binaries.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path relative to `templates/`.
///
/// # Example
/// ```
/// use di_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("[llm]"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List embedded template paths under `prefix`, sorted.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}
