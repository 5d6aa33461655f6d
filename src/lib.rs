//! # promptload
//!
//! Load prompt templates from files or strings and turn them into chat prompts.
//!
//! ## Usage
//! ```
//! use std::collections::HashMap;
//!
//! let prompt = promptload::resolve(None, Some("Hello {name}, welcome to {place}!")).unwrap();
//! assert_eq!(prompt.input_variables(), vec!["name", "place"]);
//!
//! let values = HashMap::from([
//!     ("name".to_string(), "Ada".to_string()),
//!     ("place".to_string(), "London".to_string()),
//! ]);
//! let messages = prompt.format_messages(&values).unwrap();
//! assert_eq!(messages[0].content, "Hello Ada, welcome to London!");
//! ```
//!
//! ## Concepts
//!
//! ### Template and Placeholder
//!
//! A template is plain text, for example
//!
//! ```text
//! You are a friendly and helpful assistant. Today is {date}.
//! ```
//!
//! `{date}` is a placeholder named `"date"`. A name is whatever sits between a `{` and the next `}` on the same line,
//! so `{}` is a placeholder with an empty name and braces do not nest.
//! Every occurrence is kept: `{a}{a}` requires `["a", "a"]`.
//!
//! ### Resolving
//!
//! A [TemplateResolver](crate::resolver::TemplateResolver) takes either an identifier, read from
//! `<templates_root>/template_<identifier>.txt`, or the template text itself, and returns a
//! [ChatPrompt](crate::prompt::ChatPrompt) with a single user turn. The identifier wins if both are given;
//! an empty identifier counts as not given.
//! The resolver logs through an injected [ResolveLog](crate::utils::logging::ResolveLog).
//!
//! ### Partial Prompt
//!
//! A [PartialPrompt](crate::prompt::PartialPrompt) is a template with some placeholders filled. It comes only from
//! [PromptTemplate::construct_prompt](crate::prompt::PromptTemplate::construct_prompt). When all placeholders are filled,
//! [PartialPrompt::complete](crate::prompt::PartialPrompt::complete) gives the final string.
//!
//! ### Filler
//!
//! Anything that fills one or more placeholders in a partial prompt.
//!
//! In Rust, it means anything that implements [`FillPlaceholders`](crate::filler::FillPlaceholders) and
//! [`FillWith<CTX>`](crate::filler::FillWith). A filler that needs no context implements `FillWith<()>` and gets
//! [`Fill`](crate::filler::Fill) for free.
//!
//! ## License
//!
//! Apache license.


pub mod prompt;
pub mod filler;
pub mod resolver;
pub mod utils;

pub use resolver::errors::ResolveError;
pub use resolver::{resolve, ResolverConfig, TemplateResolver};
