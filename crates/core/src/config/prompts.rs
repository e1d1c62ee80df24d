//! Stage prompt templates and rendering.

use crate::config::error::{ConfigError, ConfigResult};
use crate::init::templates::get_template;
use di_protocol::prompt_models::PromptTemplate;
use di_protocol::run_models::StageKind;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use std::path::Path;

/// One prompt template per stage.
///
/// Always complete: every stage has a template, either the built-in one or
/// a project override from `.doc-insight/prompts/`.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSet {
    classifier: PromptTemplate,
    extractor: PromptTemplate,
    summarizer: PromptTemplate,
    insight_generator: PromptTemplate,
}

impl PromptSet {
    /// The built-in templates compiled into the binary.
    pub fn embedded() -> ConfigResult<Self> {
        Ok(Self {
            classifier: embedded_template(StageKind::Classifier)?,
            extractor: embedded_template(StageKind::Extractor)?,
            summarizer: embedded_template(StageKind::Summarizer)?,
            insight_generator: embedded_template(StageKind::InsightGenerator)?,
        })
    }

    /// The template for `stage`.
    pub fn get(&self, stage: StageKind) -> &PromptTemplate {
        match stage {
            StageKind::Classifier => &self.classifier,
            StageKind::Extractor => &self.extractor,
            StageKind::Summarizer => &self.summarizer,
            StageKind::InsightGenerator => &self.insight_generator,
        }
    }

    /// Replace the template for the stage named in `template`.
    pub fn with_override(mut self, template: PromptTemplate) -> Self {
        let slot = match template.stage {
            StageKind::Classifier => &mut self.classifier,
            StageKind::Extractor => &mut self.extractor,
            StageKind::Summarizer => &mut self.summarizer,
            StageKind::InsightGenerator => &mut self.insight_generator,
        };
        *slot = template;
        self
    }
}

fn embedded_template(stage: StageKind) -> ConfigResult<PromptTemplate> {
    let rel = format!("prompts/{}.md", stage.name());
    let content = get_template(&rel).ok_or_else(|| ConfigError::BuiltinPrompt {
        stage,
        reason: format!("{rel} is not embedded"),
    })?;

    let template = parse_prompt_template(Path::new(&rel), &content)?;
    if template.stage != stage {
        return Err(ConfigError::BuiltinPrompt {
            stage,
            reason: format!("{rel} declares stage {}", template.stage),
        });
    }
    Ok(template)
}

/// Parse a Markdown prompt file with YAML front matter.
///
/// `path` is only used for error reporting.
pub fn parse_prompt_template(path: &Path, content: &str) -> ConfigResult<PromptTemplate> {
    let matter = Matter::<YAML>::new();
    let result = matter.parse(content);

    let mut template: PromptTemplate = result
        .data
        .ok_or_else(|| ConfigError::FrontMatter {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ConfigError::FrontMatter {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {e}"),
        })?;

    let body = result.content.trim().to_string();
    if body.is_empty() {
        return Err(ConfigError::EmptyPrompt {
            path: path.to_path_buf(),
        });
    }
    template.template = body;

    Ok(template)
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Only names present in `vars` are replaced; every other brace sequence,
/// including JSON examples in the template, is copied verbatim. Substituted
/// values are never re-scanned.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
