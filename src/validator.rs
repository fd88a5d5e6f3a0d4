use log::debug;

use crate::circuit::{Circuit, Tokenizer};
use crate::config::Config;
use crate::error::{ParseError, Result};

/// Consumer-facing wrapper around a single [`Tokenizer`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    tokenizer: Tokenizer,
}

impl Validator {
    pub fn new() -> Self {
        Validator::default()
    }

    pub fn with_config(config: Config) -> Self {
        Validator {
            tokenizer: Tokenizer::with_config(config),
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Parses `source` and hands the outcome to `callback`, returning
    /// whatever the callback returns.
    pub fn validate<F, R>(&self, source: &str, callback: F) -> R
    where
        F: FnOnce(std::result::Result<&Circuit, &ParseError>) -> R,
    {
        match self.check(source) {
            Ok(circuit) => callback(Ok(&circuit)),
            Err(err) => callback(Err(&err)),
        }
    }

    pub fn check(&self, source: &str) -> Result<Circuit> {
        self.tokenizer.parse(source).inspect_err(|err| {
            debug!("rejected `{source}`: {err}");
        })
    }

    pub fn is_valid(&self, source: &str) -> bool {
        self.check(source).is_ok()
    }
}
