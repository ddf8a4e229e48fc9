//! Request type definitions
//!
//! Defines the structures sent to the DM API when launching Jobs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Job specification, identifying the Job and the variables passed to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpecification {
    /// Job collection, e.g. `im-test`
    pub collection: String,

    /// Job name, e.g. `nop`
    pub job: String,

    /// Job version, e.g. `1.0.0`
    pub version: String,

    /// Job-specific variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

impl JobSpecification {
    /// Create a specification without variables
    pub fn new(
        collection: impl Into<String>,
        job: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            job: job.into(),
            version: version.into(),
            variables: None,
        }
    }

    /// Add a Job variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Optional settings used when starting a Job instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartJobOptions {
    /// URL capable of handling Job callbacks
    pub callback_url: Option<String>,

    /// Context string passed to the callback URL
    pub callback_context: Option<String>,

    /// Ask the DM to generate a callback token (needs a callback URL)
    pub generate_callback_token: bool,

    /// Prevents automatic removal of the Job instance
    pub debug: Option<String>,
}

impl StartJobOptions {
    /// Create options with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callback URL
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Set the callback context
    pub fn with_callback_context(mut self, callback_context: impl Into<String>) -> Self {
        self.callback_context = Some(callback_context.into());
        self
    }

    /// Set the generate-callback-token flag
    pub fn with_generate_callback_token(mut self, generate: bool) -> Self {
        self.generate_callback_token = generate;
        self
    }

    /// Set the debug value
    pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
        self.debug = Some(debug.into());
        self
    }

    /// The optional form fields these options contribute to an instance request
    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(debug) = &self.debug {
            fields.push(("debug", debug.clone()));
        }
        if let Some(callback_url) = &self.callback_url {
            fields.push(("callback_url", callback_url.clone()));
            if let Some(callback_context) = &self.callback_context {
                fields.push(("callback_context", callback_context.clone()));
            }
            if self.generate_callback_token {
                fields.push(("generate_callback_token", "true".to_string()));
            }
        }
        fields
    }
}
