use std::sync::Arc;
use std::time::Duration;

use ragdb_core::error::{GenerationError, Result};
use ragdb_core::traits::{Generator, SearchEngine};
use ragdb_core::types::{GroundedAnswer, GroundingRequest, SELECTED_TEXT_SOURCE};
use tracing::{debug, warn};

use crate::context::{assemble, AssembledContext};
use crate::prompt::{build_request, failure_message, placeholder_message, NO_RELEVANT_INFORMATION};

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Decides where an answer's context comes from and shapes the generation
/// call. Holds no per-request state; every outcome, including search and
/// generation failures, becomes a [`GroundedAnswer`].
pub struct GroundingEnforcer<S> {
    search: Arc<S>,
    generator: Box<dyn Generator>,
    limit: usize,
    timeout: Duration,
}

impl<S: SearchEngine> GroundingEnforcer<S> {
    pub fn new(search: Arc<S>, generator: Box<dyn Generator>) -> Self {
        Self { search, generator, limit: DEFAULT_LIMIT, timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn answer(&self, request: &GroundingRequest) -> GroundedAnswer {
        debug!(mode = request.mode(), query_len = request.query().len(), "grounding request");
        match self.gather_context(request) {
            Ok(Some(context)) => self.generate(request.query(), context).await,
            Ok(None) => GroundedAnswer::new(NO_RELEVANT_INFORMATION, vec![]),
            Err(e) => {
                warn!(error = %e, "could not gather context");
                GroundedAnswer::new(failure_message(&e), vec![])
            }
        }
    }

    /// `None` means the index holds nothing relevant; generation is skipped.
    fn gather_context(&self, request: &GroundingRequest) -> Result<Option<AssembledContext>> {
        match request {
            GroundingRequest::Indexed { query } => {
                // The index lock is released when `search` returns, before
                // any await below.
                let results = self.search.search(query, self.limit)?;
                if results.is_empty() {
                    return Ok(None);
                }
                Ok(Some(assemble(&results)))
            }
            GroundingRequest::Restricted { selected_text, .. } => {
                // An empty selection still goes to the model; rejecting it is
                // left to the caller.
                if selected_text.trim().is_empty() {
                    debug!("restricted request with empty selected text");
                }
                Ok(Some(AssembledContext { text: selected_text.clone(), sources: vec![SELECTED_TEXT_SOURCE.to_string()] }))
            }
        }
    }

    async fn generate(&self, query: &str, context: AssembledContext) -> GroundedAnswer {
        if !self.generator.is_available() {
            return GroundedAnswer::new(placeholder_message(query, &context.sources), context.sources);
        }
        let request = build_request(&context.text, query);
        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(&request.system_prompt, &request.user_prompt))
            .await
            .unwrap_or(Err(GenerationError::Timeout(self.timeout)));
        match outcome {
            Ok(text) => GroundedAnswer::new(text, context.sources),
            Err(e) => {
                warn!(error = %e, "generation failed");
                GroundedAnswer::new(failure_message(&e), vec![])
            }
        }
    }
}
