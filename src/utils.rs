pub mod logging;
pub mod prompt_processing;

use serde_json::{Map, Value};

pub type JsonMap = Map<String, Value>;
