//! Directory structure and file generation for `.doc-insight` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a `.doc-insight` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where `.doc-insight` will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.doc-insight` directory.
    pub force: bool,

    /// Only write `config.toml`, keeping the built-in prompts.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.doc-insight` directory populated from the built-in templates.
///
/// ```text
/// .doc-insight/
/// ├── config.toml
/// └── prompts/            (unless minimal)
///     ├── classifier.md
///     ├── extractor.md
///     ├── insight_generator.md
///     └── summarizer.md
/// ```
///
/// Returns the paths written, relative to `.doc-insight/`.
///
/// # Errors
///
/// - [`InitError::AlreadyInitialized`] when the directory exists and `force` is unset
/// - [`InitError::MissingTemplate`] when an embedded template is missing
/// - I/O failures creating directories or writing files
pub async fn generate_project_structure(options: InitOptions) -> InitResult<Vec<String>> {
    let di_dir = options.target_dir.join(CONFIG_DIR);

    if di_dir.exists() && !options.force {
        return Err(InitError::AlreadyInitialized(di_dir));
    }

    fs::create_dir_all(&di_dir).map_err(|source| InitError::CreateDir {
        path: di_dir.clone(),
        source,
    })?;

    let mut written = vec!["config.toml".to_string()];
    if !options.minimal {
        written.extend(list_templates("prompts/"));
    }

    for template_path in &written {
        write_template_file(&di_dir, template_path)?;
    }

    tracing::info!(dir = %di_dir.display(), files = written.len(), "initialized project");
    Ok(written)
}

fn write_template_file(di_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::MissingTemplate(template_path.to_string()))?;

    let target_path = di_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::Write {
        path: target_path,
        source,
    })?;

    Ok(())
}
