//! AI-generated financial commentary
//!
//! The advice surface is strictly read-only and strictly best-effort: it
//! never touches stored data and never lets a backend failure escape as an
//! error. An empty ledger short-circuits to a fixed message without calling
//! the backend at all, and any backend failure is downgraded to a fixed
//! service-unavailable message.

pub mod gemini;
mod prompt;

pub use gemini::GeminiBackend;
pub use prompt::build_prompt;

use thiserror::Error;

use crate::models::{Account, Category, Transaction};

/// Message returned when there is nothing to analyze
pub const INSUFFICIENT_DATA_MESSAGE: &str = "There is not enough transaction history to \
    generate an analysis yet. Add some income or expense records first.";

/// Message returned when the backend cannot be reached
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The advice service is temporarily unavailable. Please try again later.";

/// Most recent transactions included in the prompt
pub const RECENT_TRANSACTION_LIMIT: usize = 50;

/// Errors internal to the advice module; callers of
/// [`AdviceService::generate`] never see them
#[derive(Error, Debug)]
pub enum AdviceError {
    #[error("backend request failed: {0}")]
    Http(String),

    #[error("backend returned no content")]
    Empty,

    #[error("missing API key")]
    MissingKey,
}

/// A text-generation backend
pub trait AdviceBackend {
    fn complete(&self, prompt: &str) -> Result<String, AdviceError>;
}

/// Generates financial commentary from ledger data
pub struct AdviceService<B: AdviceBackend> {
    backend: B,
}

impl<B: AdviceBackend> AdviceService<B> {
    /// Create a new advice service over a backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Produce commentary for the given ledger snapshot
    ///
    /// Always returns displayable text.
    pub fn generate(
        &self,
        transactions: &[Transaction],
        categories: &[Category],
        accounts: &[Account],
    ) -> String {
        if transactions.is_empty() {
            return INSUFFICIENT_DATA_MESSAGE.to_string();
        }

        let prompt = build_prompt(transactions, categories, accounts);
        match self.backend.complete(&prompt) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("advice backend failed: {}", err);
                SERVICE_UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}
