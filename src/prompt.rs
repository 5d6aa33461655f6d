//! # Prompt
//! A prompt is simply a string.
//!
//! ## PromptTemplate
//! A prompt template is a string with placeholders. It can also have metadata in JSON format.
//!
//! ## Placeholder
//! A placeholder is a string in the format of `{name}`. It can be filled with a value.
//! Its name is the string inside the braces, which may be empty and may not span a line break.
//! A template keeps every occurrence of its placeholders in scan order, duplicates included.
//!
//! ## ChatPrompt
//! A chat prompt is an ordered list of message templates, each with a [Role]. Resolving a template
//! gives a chat prompt with a single user turn, see [crate::resolver].
//!
//! ## PartialPrompt
//! A partial prompt is a prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
//!
//! The placeholders in a partial prompt can be filled with values via [PartialPrompt::fill] or [PartialPrompt::try_fill]. You can also use these two methods to update the filling values of the placeholders.
//! When all placeholders are filled, the partial prompt can be completed via [PartialPrompt::complete], in which the placeholders in a template are **actually** replaced with the filling values.


use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::prompt::errors::{PlaceholderNotExist, UnfilledPlaceholders};
use crate::utils::prompt_processing::{get_placeholders, replace_all_placeholders};
use crate::utils::JsonMap;


/// A prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PartialPrompt {
    /// The template of the partial prompt, readonly
    #[readonly]
    pub template: PromptTemplate,

    /// Mapping from placeholder name to its filling value
    pub(crate) placeholder_to_vals: HashMap<String, Option<String>>,

    /// Record the placeholders that are not filled yet
    pub(crate) unfilled_placeholders: HashSet<String>,
}

impl PartialPrompt {
    /// Fill the placeholders in the partial prompt with the given values.
    /// Panics if the placeholder does not exist.
    pub fn fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.try_fill(placeholder, value).unwrap()
    }

    /// Fill the placeholders in the partial prompt with the given values.
    /// Returns an error if the placeholder does not exist.
    pub fn try_fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, PlaceholderNotExist> {
        let placeholder = placeholder.into();
        if self.placeholder_to_vals.contains_key(&placeholder) {
            self.unfilled_placeholders.remove(&placeholder);
            self.placeholder_to_vals.insert(placeholder, Some(value.into()));
            Ok(self)
        } else {
            Err(PlaceholderNotExist::new(placeholder, value, &self.template.unique_placeholders()))
        }
    }

    /// The value a placeholder is currently filled with, if any.
    pub fn value_of(&self, placeholder: &str) -> Option<&str> {
        self.placeholder_to_vals.get(placeholder).and_then(|v| v.as_deref())
    }

    /// Names of the placeholders that are not filled yet.
    pub fn unfilled_placeholders(&self) -> &HashSet<String> {
        &self.unfilled_placeholders
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unfilled_placeholders.is_empty()
    }

    /// Complete the partial prompt and return the completed prompt.
    /// Returns an error if there are still unfilled placeholders.
    pub fn complete(&self) -> Result<String, UnfilledPlaceholders> {
        if self.is_complete() {
            Ok(replace_all_placeholders(self.template.str(), &self.placeholder_to_vals))
        } else {
            let mut unfilled_placeholders: Vec<String> = self.unfilled_placeholders.iter().cloned().collect();
            unfilled_placeholders.sort();
            Err(UnfilledPlaceholders {
                all_placeholders: self.template.unique_placeholders_in_order(),
                unfilled_placeholders,
            })
        }
    }
}

/// A prompt template with placeholders. It can also have metadata in JSON format.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptTemplate {
    /// The template text, immutable
    template: Arc<String>,

    /// Every placeholder occurrence in the template, in scan order and with duplicates, readonly
    #[readonly]
    pub placeholders: Vec<String>,

    /// The metadata of the prompt template, readonly
    #[readonly]
    pub meta_data: Arc<JsonMap>,
}

impl PromptTemplate {
    /// Create a prompt template from a string without metadata.
    pub fn new(template: impl Into<String>) -> Self {
        Self::with_metadata(template, JsonMap::new())
    }

    /// Create a prompt template from a string with metadata.
    pub fn with_metadata(template: impl Into<String>, metadata: JsonMap) -> Self {
        let template = template.into();
        let placeholders = get_placeholders(&template);
        Self {
            template: Arc::new(template),
            meta_data: Arc::new(metadata),
            placeholders,
        }
    }

    /// Get the prompt template as a string.
    #[inline]
    pub fn str(&self) -> &str {
        &self.template
    }

    /// Distinct placeholder names.
    pub fn unique_placeholders(&self) -> HashSet<String> {
        self.placeholders.iter().cloned().collect()
    }

    /// Distinct placeholder names in order of first occurrence.
    pub fn unique_placeholders_in_order(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.placeholders
            .iter()
            .filter(|p| seen.insert(p.as_str()))
            .cloned()
            .collect()
    }

    /// Construct a partial prompt from the prompt template.
    pub fn construct_prompt(&self) -> PartialPrompt {
        let unfilled_placeholders = self.unique_placeholders();
        PartialPrompt {
            template: self.clone(),
            placeholder_to_vals: unfilled_placeholders.iter().map(|p| (p.clone(), None)).collect(),
            unfilled_placeholders,
        }
    }
}

/// Who a chat message is from, from the perspective of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(role)
    }
}

/// A rendered chat message, ready for a model client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A message whose content is still a template.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub role: Role,
    pub template: PromptTemplate,
}

impl MessageTemplate {
    pub fn new(role: Role, template: PromptTemplate) -> Self {
        Self { role, template }
    }

    pub fn user(template: PromptTemplate) -> Self {
        Self::new(Role::User, template)
    }

    /// Render the message, ignoring values for placeholders this message does not have.
    pub fn format(&self, values: &HashMap<String, String>) -> Result<ChatMessage, UnfilledPlaceholders> {
        let mut partial_prompt = self.template.construct_prompt();
        for (placeholder, value) in values {
            if partial_prompt.placeholder_to_vals.contains_key(placeholder) {
                partial_prompt.fill(placeholder.as_str(), value.as_str());
            }
        }
        let content = partial_prompt.complete()?;
        Ok(ChatMessage {
            role: self.role,
            content,
        })
    }
}

/// An ordered list of message templates that a model client can render and send.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct ChatPrompt {
    #[readonly]
    pub messages: Vec<MessageTemplate>,
}

impl ChatPrompt {
    /// A chat prompt with one user turn whose content is `template`.
    pub fn from_template(template: PromptTemplate) -> Self {
        Self::from_messages(vec![MessageTemplate::user(template)])
    }

    pub fn from_messages(messages: Vec<MessageTemplate>) -> Self {
        Self { messages }
    }

    /// Template of the first message, if any. A resolved prompt always has exactly one.
    pub fn template(&self) -> Option<&PromptTemplate> {
        self.messages.first().map(|m| &m.template)
    }

    /// Placeholder occurrences of all messages, in message order then scan order.
    pub fn input_variables(&self) -> Vec<String> {
        self.messages
            .iter()
            .flat_map(|m| m.template.placeholders.iter().cloned())
            .collect()
    }

    /// Render every message with the given values.
    /// Returns an error naming the placeholders of the first message that cannot be completed.
    pub fn format_messages(&self, values: &HashMap<String, String>) -> Result<Vec<ChatMessage>, UnfilledPlaceholders> {
        self.messages.iter().map(|m| m.format(values)).collect()
    }
}

pub mod errors {
    use std::collections::HashSet;
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when trying to complete a partial prompt but there are still unfilled placeholders.
    #[derive(Debug)]
    pub struct UnfilledPlaceholders {
        pub unfilled_placeholders: Vec<String>,
        pub all_placeholders: Vec<String>,
    }

    impl fmt::Display for UnfilledPlaceholders {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "UnfilledPlaceholders: to complete the prompt template,\n  Requires Placeholders:{:?}\n  Unfilled Placeholders:{:?}",
                   self.all_placeholders, self.unfilled_placeholders)
        }
    }

    impl Error for UnfilledPlaceholders {}

    /// Error when trying to fill a placeholder that does not exist in the prompt template of the partial prompt.
    #[derive(Debug)]
    pub struct PlaceholderNotExist {
        pub try_fill_placeholder: String,
        pub value: String,
        pub available_placeholders: Vec<String>,
    }

    impl PlaceholderNotExist {
        pub(crate) fn new(try_fill_placeholder: impl Into<String>,
                          value: impl Into<String>,
                          available_placeholders: &HashSet<String>) -> Self {
            let mut available_placeholders: Vec<String> = available_placeholders.iter().cloned().collect();
            available_placeholders.sort();
            PlaceholderNotExist {
                try_fill_placeholder: try_fill_placeholder.into(),
                value: value.into(),
                available_placeholders,
            }
        }
    }

    impl fmt::Display for PlaceholderNotExist {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "PlaceholderNotExist: try to fill placeholder = {} with value = {}, but available placeholders are {:?}",
                   self.try_fill_placeholder,
                   self.value,
                   self.available_placeholders)
        }
    }

    impl Error for PlaceholderNotExist {}
}

#[cfg(test)]
mod test_prompt {
    use std::collections::HashMap;
    use serde_json::json;
    use super::{ChatMessage, ChatPrompt, MessageTemplate, PromptTemplate, Role};

    #[test]
    fn test_template_keeps_occurrences() {
        let template = PromptTemplate::new("{a} then {b} then {a}");
        assert_eq!(template.placeholders, vec!["a", "b", "a"]);
        assert_eq!(template.unique_placeholders_in_order(), vec!["a", "b"]);
        assert_eq!(template.unique_placeholders().len(), 2);
        assert_eq!(template.str(), "{a} then {b} then {a}");
    }

    #[test]
    fn test_fill_and_complete() {
        let template = PromptTemplate::new("Hello {name}, welcome to {place}! Bye {name}.");
        let mut prompt = template.construct_prompt();
        assert!(!prompt.is_complete());
        let err = prompt.complete().expect_err("nothing is filled yet");
        assert_eq!(err.unfilled_placeholders, vec!["name", "place"]);
        assert_eq!(err.all_placeholders, vec!["name", "place"]);

        prompt.fill("name", "Ada").fill("place", "London");
        assert!(prompt.is_complete());
        assert_eq!(prompt.value_of("name"), Some("Ada"));
        assert_eq!(prompt.complete().unwrap(), "Hello Ada, welcome to London! Bye Ada.");

        // refilling updates the value
        prompt.fill("place", "Paris");
        assert_eq!(prompt.complete().unwrap(), "Hello Ada, welcome to Paris! Bye Ada.");
    }

    #[test]
    fn test_unfilled_placeholders_shrink_as_filled() {
        let mut prompt = PromptTemplate::new("{a}{b}{a}").construct_prompt();
        assert_eq!(prompt.unfilled_placeholders().len(), 2);
        prompt.fill("a", "x");
        assert!(prompt.unfilled_placeholders().contains("b"));
        assert!(!prompt.unfilled_placeholders().contains("a"));
        prompt.fill("b", "y");
        assert!(prompt.unfilled_placeholders().is_empty());
        assert_eq!(prompt.complete().unwrap(), "xyx");
    }

    #[test]
    fn test_try_fill_unknown_placeholder() {
        let mut prompt = PromptTemplate::new("{a}").construct_prompt();
        let err = prompt.try_fill("b", "bob").expect_err("b is not in the template");
        assert_eq!(err.try_fill_placeholder, "b");
        assert_eq!(err.available_placeholders, vec!["a"]);
        assert!(err.to_string().contains("try to fill placeholder = b"));
    }

    #[test]
    #[should_panic]
    fn test_fill_unknown_placeholder_panics() {
        PromptTemplate::new("{a}").construct_prompt().fill("b", "bob");
    }

    #[test]
    fn test_empty_placeholder_name() {
        let mut prompt = PromptTemplate::new("[{}]").construct_prompt();
        prompt.fill("", "x");
        assert_eq!(prompt.complete().unwrap(), "[x]");
    }

    #[test]
    fn test_template_without_placeholders_completes_as_is() {
        let prompt = PromptTemplate::new("static text").construct_prompt();
        assert!(prompt.is_complete());
        assert_eq!(prompt.complete().unwrap(), "static text");
    }

    #[test]
    fn test_metadata() {
        let mut metadata = crate::utils::JsonMap::new();
        metadata.insert("source".to_string(), json!("literal"));
        let template = PromptTemplate::with_metadata("{x}", metadata);
        assert_eq!(template.meta_data["source"], "literal");
    }

    #[test]
    fn test_chat_prompt_format_messages() {
        let chat_prompt = ChatPrompt::from_messages(vec![
            MessageTemplate::new(Role::System, PromptTemplate::new("You speak {language}.")),
            MessageTemplate::user(PromptTemplate::new("Translate {text} into {language}.")),
        ]);
        assert_eq!(chat_prompt.input_variables(), vec!["language", "text", "language"]);

        let values = HashMap::from([
            ("language".to_string(), "French".to_string()),
            ("text".to_string(), "cat".to_string()),
            ("unused".to_string(), "ignored".to_string()),
        ]);
        let messages = chat_prompt.format_messages(&values).unwrap();
        assert_eq!(messages, vec![
            ChatMessage { role: Role::System, content: "You speak French.".to_string() },
            ChatMessage { role: Role::User, content: "Translate cat into French.".to_string() },
        ]);

        let missing = HashMap::from([("language".to_string(), "French".to_string())]);
        let err = chat_prompt.format_messages(&missing).expect_err("text is missing");
        assert_eq!(err.unfilled_placeholders, vec!["text"]);
    }

    #[test]
    fn test_single_turn_chat_prompt() {
        let chat_prompt = ChatPrompt::from_template(PromptTemplate::new("Hi {who}"));
        assert_eq!(chat_prompt.messages.len(), 1);
        assert_eq!(chat_prompt.messages[0].role, Role::User);
        assert_eq!(chat_prompt.template().unwrap().str(), "Hi {who}");
    }

    #[test]
    fn test_chat_message_json() {
        let message = ChatMessage { role: Role::User, content: "hi".to_string() };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
        let back: ChatMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, message);
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
