//! Prompt template parsing and rendering
//!
//! Placeholders use `{name}` syntax. `{{` and `}}` render as literal braces.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Matches escaped braces or a `{name}` placeholder
static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex is valid")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },

    #[error("Template input variables {declared:?} do not match placeholders {found:?}")]
    VariableMismatch {
        declared: Vec<String>,
        found: Vec<String>,
    },
}

/// A prompt template with named slots
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    /// Parses `template` and checks its placeholders are exactly `input_variables`
    pub fn new(
        template: impl Into<String>,
        input_variables: &[&str],
    ) -> Result<Self, TemplateError> {
        let template = template.into();

        let found: BTreeSet<String> = PLACEHOLDER_PATTERN
            .captures_iter(&template)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect();
        let declared: BTreeSet<String> = input_variables.iter().map(|v| v.to_string()).collect();

        if found != declared {
            return Err(TemplateError::VariableMismatch {
                declared: declared.into_iter().collect(),
                found: found.into_iter().collect(),
            });
        }

        Ok(Self {
            template,
            input_variables: input_variables.iter().map(|v| v.to_string()).collect(),
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitutes every placeholder; values are inserted verbatim
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|name| !values.contains_key(name.as_str()))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.clone(),
            });
        }

        let rendered = PLACEHOLDER_PATTERN.replace_all(&self.template, |caps: &regex::Captures| {
            match caps.get(1) {
                Some(name) => values.get(name.as_str()).copied().unwrap_or_default().to_string(),
                None => caps[0][..1].to_string(),
            }
        });

        Ok(rendered.into_owned())
    }
}
