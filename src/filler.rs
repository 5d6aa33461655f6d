use std::collections::HashMap;
use crate::prompt::PartialPrompt;
use anyhow::Result;

/// Anything that fills one or more placeholders of a [PartialPrompt].
pub trait FillPlaceholders {
    fn placeholders_to_fill(&self) -> &Vec<String>;
}

pub trait Fill: FillPlaceholders {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()>;
}

/// A filler that needs some context, handing the context back when done.
pub trait FillWith<CTX>: FillPlaceholders {
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: CTX) -> Result<CTX>;
}

impl<T: FillWith<()>> Fill for T {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()> {
        self.fill_with(partial_prompt, ())
    }
}

/// Fills placeholders with fixed values.
#[derive(Debug, Clone, Default)]
pub struct ValueFiller {
    placeholders_to_fill: Vec<String>,
    values: HashMap<String, String>,
}

impl ValueFiller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a placeholder, replacing any earlier value.
    pub fn with(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        if !self.values.contains_key(&placeholder) {
            self.placeholders_to_fill.push(placeholder.clone());
        }
        self.values.insert(placeholder, value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueFiller {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |filler, (k, v)| filler.with(k, v))
    }
}

impl FillPlaceholders for ValueFiller {
    fn placeholders_to_fill(&self) -> &Vec<String> {
        &self.placeholders_to_fill
    }
}

impl FillWith<()> for ValueFiller {
    /// Fails on the first placeholder the partial prompt does not have.
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: ()) -> Result<()> {
        for placeholder in &self.placeholders_to_fill {
            partial_prompt.try_fill(placeholder.as_str(), self.values[placeholder].as_str())?;
        }
        Ok(context)
    }
}
