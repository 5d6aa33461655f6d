use chrono::NaiveDateTime;
use promptload::filler::{FillPlaceholders, FillWith};
use promptload::prompt::PartialPrompt;

/// Fills `{date}` with the day of the time passed as context, e.g. `Saturday, July 8, 2006`.
pub struct DateFiller {
    placeholders_to_fill: Vec<String>,
}

impl Default for DateFiller {
    fn default() -> Self {
        Self {
            placeholders_to_fill: vec!["date".to_string()],
        }
    }
}

impl FillPlaceholders for DateFiller {
    fn placeholders_to_fill(&self) -> &Vec<String> {
        &self.placeholders_to_fill
    }
}

impl FillWith<NaiveDateTime> for DateFiller {
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: NaiveDateTime) -> anyhow::Result<NaiveDateTime> {
        partial_prompt.try_fill("date", context.format("%A, %B %-d, %Y").to_string())?;
        Ok(context)
    }
}
