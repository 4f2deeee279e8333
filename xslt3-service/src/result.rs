//! Result of one transformation

use xslt_engine_traits::OutputMethod;

/// Either the serialized result document or the messages explaining why there is none
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Success {
        body: String,
        output_method: OutputMethod,
    },
    Failure {
        messages: Vec<String>,
    },
}

impl TransformOutcome {
    pub fn success(body: String, output_method: OutputMethod) -> Self {
        Self::Success {
            body,
            output_method,
        }
    }

    /// A failure always carries at least one message
    pub fn failure(messages: Vec<String>) -> Self {
        debug_assert!(!messages.is_empty(), "failure without messages");
        Self::Failure { messages }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Messages of a failure; empty for a success
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { messages } => messages,
        }
    }
}
