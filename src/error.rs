use crate::GrammarError;
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new(what: String, message: String) -> Self {
        Self { message, what }
    }

    pub fn what(&self) -> &str {
        &self.what
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}-{}", self.what, self.message)
    }
}

impl std::error::Error for GrammarError {}
