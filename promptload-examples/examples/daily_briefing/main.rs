use std::path::PathBuf;
use anyhow::Result;
use chrono::Local;
use promptload::filler::{Fill, FillWith, ValueFiller};
use promptload::prompt::{ChatMessage, Role};
use promptload::{ResolverConfig, TemplateResolver};
use promptload_examples::date::DateFiller;

fn main() -> Result<()> {
    env_logger::init();
    let templates_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates");
    let resolver = TemplateResolver::new(ResolverConfig::new(templates_root));

    let chat_prompt = resolver.resolve(Some("daily_briefing"), None)?;
    println!("input variables: {:?}", chat_prompt.input_variables());

    let Some(template) = chat_prompt.template() else {
        anyhow::bail!("resolved prompt has no message");
    };
    let mut partial_prompt = template.construct_prompt();
    DateFiller::default().fill_with(&mut partial_prompt, Local::now().naive_local())?;
    println!("still unfilled: {:?}", partial_prompt.unfilled_placeholders());

    let filler: ValueFiller = [("name", "Ada"), ("topic", "the analytical engine")].into_iter().collect();
    filler.fill(&mut partial_prompt)?;

    let message = ChatMessage {
        role: Role::User,
        content: partial_prompt.complete()?,
    };
    println!("{}", serde_json::to_string_pretty(&[message])?);
    Ok(())
}
