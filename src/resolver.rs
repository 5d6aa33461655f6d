//! # Resolver
//! Turns a template identifier or a literal template text into a [ChatPrompt].
//!
//! An identifier names a file `template_<identifier>.txt` under [ResolverConfig::templates_root].
//! When both an identifier and a literal text are given, the identifier wins.
//!
//! ```no_run
//! use promptload::resolver::{ResolverConfig, TemplateResolver};
//!
//! let resolver = TemplateResolver::new(ResolverConfig::new("prompts"));
//! // reads prompts/template_summarize.txt
//! let prompt = resolver.resolve(Some("summarize"), None).unwrap();
//! println!("{:?}", prompt.input_variables());
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use serde_json::Value;
use crate::prompt::{ChatPrompt, PromptTemplate};
use crate::resolver::errors::ResolveError;
use crate::utils::JsonMap;
use crate::utils::logging::{LogFacade, ResolveLog};

/// Environment variable read by [ResolverConfig::from_env].
pub const TEMPLATES_ROOT_ENV: &str = "PROMPTLOAD_TEMPLATES_ROOT";
/// Root used when nothing else is configured.
pub const DEFAULT_TEMPLATES_ROOT: &str = "templates";

const TEMPLATE_FILE_PREFIX: &str = "template_";
const TEMPLATE_FILE_EXTENSION: &str = "txt";

/// Where template files live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub templates_root: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            templates_root: PathBuf::from(DEFAULT_TEMPLATES_ROOT),
        }
    }
}

impl ResolverConfig {
    pub fn new(templates_root: impl Into<PathBuf>) -> Self {
        Self {
            templates_root: templates_root.into(),
        }
    }

    /// Root from `PROMPTLOAD_TEMPLATES_ROOT` if set and not empty, otherwise the default.
    pub fn from_env() -> Self {
        match env::var_os(TEMPLATES_ROOT_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    /// Parse a JSON object such as `{"templates_root": "prompts"}`. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Loads templates and wraps them into chat prompts.
///
/// The resolver keeps no state between calls, so one instance can serve any number of callers.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver<L: ResolveLog = LogFacade> {
    config: ResolverConfig,
    logger: L,
}

impl TemplateResolver {
    /// A resolver that logs through the `log` facade.
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_logger(config, LogFacade)
    }
}

impl<L: ResolveLog> TemplateResolver<L> {
    pub fn with_logger(config: ResolverConfig, logger: L) -> Self {
        Self { config, logger }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Path of the file backing `identifier`. Does not check that it exists.
    pub fn template_path(&self, identifier: &str) -> PathBuf {
        let file_name = format!("{}{}.{}", TEMPLATE_FILE_PREFIX, identifier, TEMPLATE_FILE_EXTENSION);
        self.config.templates_root.join(file_name)
    }

    /// Read the whole template file of `identifier`.
    ///
    /// Failures are logged at error level before they are returned.
    pub fn load_template(&self, identifier: &str) -> Result<String, ResolveError> {
        check_identifier(identifier)?;
        let path = self.template_path(identifier);
        match fs::read_to_string(&path) {
            Ok(template) => {
                self.logger.info(&format!("Template {} loaded successfully from {}", identifier, path.display()));
                Ok(template)
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                self.logger.error(&format!("Template file not found: {}", path.display()));
                Err(ResolveError::NotFound {
                    identifier: identifier.to_string(),
                    path,
                    source,
                })
            }
            Err(source) => {
                self.logger.error(&format!("Error loading template {} from {}: {}", identifier, path.display(), source));
                Err(ResolveError::Io {
                    identifier: identifier.to_string(),
                    path,
                    source,
                })
            }
        }
    }

    /// Resolve a chat prompt with a single user turn.
    ///
    /// * `identifier` given: the template is read from its file and `text` is ignored.
    /// * only `text` given: it is used as is, even when empty.
    /// * neither given: [ResolveError::InvalidArgument].
    ///
    /// An empty identifier counts as not given.
    pub fn resolve(&self, identifier: Option<&str>, text: Option<&str>) -> Result<ChatPrompt, ResolveError> {
        let identifier = identifier.filter(|identifier| !identifier.is_empty());
        let template = match (identifier, text) {
            (Some(identifier), _) => {
                let template = self.load_template(identifier)?;
                let metadata = file_metadata(identifier, &self.template_path(identifier));
                let template = PromptTemplate::with_metadata(template, metadata);
                self.logger.debug(&format!("Template {} has {} placeholder occurrence(s): {:?}",
                                           identifier, template.placeholders.len(), template.placeholders));
                template
            }
            (None, Some(text)) => PromptTemplate::with_metadata(text, literal_metadata()),
            (None, None) => return Err(ResolveError::invalid_argument("either an identifier or literal text must be provided")),
        };
        Ok(ChatPrompt::from_template(template))
    }
}

/// Resolve with the default configuration, logging through the `log` facade.
pub fn resolve(identifier: Option<&str>, text: Option<&str>) -> Result<ChatPrompt, ResolveError> {
    TemplateResolver::new(ResolverConfig::default()).resolve(identifier, text)
}

/// An identifier has to stay a single file name component under the templates root.
fn check_identifier(identifier: &str) -> Result<(), ResolveError> {
    if identifier.contains(['/', '\\']) {
        return Err(ResolveError::invalid_argument(format!("identifier {:?} must not contain path separators", identifier)));
    }
    Ok(())
}

fn file_metadata(identifier: &str, path: &Path) -> JsonMap {
    let mut metadata = JsonMap::new();
    metadata.insert("source".to_string(), Value::from("file"));
    metadata.insert("identifier".to_string(), Value::from(identifier));
    metadata.insert("path".to_string(), Value::from(path.display().to_string()));
    metadata
}

fn literal_metadata() -> JsonMap {
    let mut metadata = JsonMap::new();
    metadata.insert("source".to_string(), Value::from("literal"));
    metadata
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;
    use std::io;
    use std::path::PathBuf;

    /// Error when a template cannot be resolved.
    #[derive(Debug)]
    pub enum ResolveError {
        /// The arguments cannot drive a resolution.
        InvalidArgument {
            reason: String,
        },
        /// The template file does not exist.
        NotFound {
            identifier: String,
            path: PathBuf,
            source: io::Error,
        },
        /// The template file exists but cannot be read as text.
        Io {
            identifier: String,
            path: PathBuf,
            source: io::Error,
        },
    }

    impl ResolveError {
        pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
            ResolveError::InvalidArgument { reason: reason.into() }
        }

        /// Path of the template file involved, if any.
        pub fn path(&self) -> Option<&PathBuf> {
            match self {
                ResolveError::InvalidArgument { .. } => None,
                ResolveError::NotFound { path, .. } | ResolveError::Io { path, .. } => Some(path),
            }
        }
    }

    impl fmt::Display for ResolveError {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            match self {
                ResolveError::InvalidArgument { reason } =>
                    write!(f, "InvalidArgument: {}", reason),
                ResolveError::NotFound { identifier, path, .. } =>
                    write!(f, "NotFound: template {} has no file at {}", identifier, path.display()),
                ResolveError::Io { identifier, path, source } =>
                    write!(f, "IOError: failed to read template {} from {}: {}", identifier, path.display(), source),
            }
        }
    }

    impl Error for ResolveError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            match self {
                ResolveError::InvalidArgument { .. } => None,
                ResolveError::NotFound { source, .. } | ResolveError::Io { source, .. } => Some(source),
            }
        }
    }
}
