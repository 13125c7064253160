use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use crate::agent::stateless_llm::{ChatMessage, Role};

pub const SYSTEM_TEMPLATE: &str =
    "Translate the following into {language}. Return only the translated text.";
pub const USER_TEMPLATE: &str = "{text}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("missing value for prompt variable `{0}`")]
    MissingVariable(String),
}

/// Chat prompt made of role-tagged templates with `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    messages: Vec<(Role, String)>,
    placeholder: Regex,
}

impl PromptTemplate {
    pub fn from_messages(messages: &[(Role, &str)]) -> anyhow::Result<Self> {
        Ok(Self {
            messages: messages
                .iter()
                .map(|(role, template)| (*role, template.to_string()))
                .collect(),
            placeholder: Regex::new(r"\{(\w+)\}")?,
        })
    }

    /// The system instruction + raw user text prompt used by `/translate`.
    pub fn translation() -> anyhow::Result<Self> {
        Self::from_messages(&[(Role::System, SYSTEM_TEMPLATE), (Role::User, USER_TEMPLATE)])
    }

    /// Names of every placeholder across all messages.
    pub fn variables(&self) -> BTreeSet<String> {
        self.messages
            .iter()
            .flat_map(|(_, template)| {
                self.placeholder
                    .captures_iter(template)
                    .map(|caps| caps[1].to_string())
            })
            .collect()
    }

    /// Fill every placeholder from `values`.
    ///
    /// Substitution is a single pass over the template, so braces inside
    /// the supplied values are left alone.
    pub fn format_messages(
        &self,
        values: &HashMap<&str, &str>,
    ) -> Result<Vec<ChatMessage>, PromptError> {
        if let Some(missing) = self
            .variables()
            .into_iter()
            .find(|name| !values.contains_key(name.as_str()))
        {
            return Err(PromptError::MissingVariable(missing));
        }

        Ok(self
            .messages
            .iter()
            .map(|(role, template)| {
                let content = self.placeholder.replace_all(template, |caps: &Captures| {
                    values.get(&caps[1]).copied().unwrap_or_default().to_string()
                });
                ChatMessage {
                    role: *role,
                    content: content.into_owned(),
                }
            })
            .collect())
    }
}
