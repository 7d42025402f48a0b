//! Completion orchestrator
//!
//! Drives the full pipeline for one caller turn: normalization, moderation,
//! session resolution, prompt assembly, one or two provider calls, response
//! post-processing, and the history commit.

use std::sync::Arc;

use crate::config::{CompletionConfig, DialogosConfig};
use crate::conversation::SessionStore;
use crate::error::{DialogosError, Result};
use crate::llm::{CompletionProvider, CompletionRequest, Message};
use crate::moderation::{DenyListPolicy, ModerationPolicy};
use crate::normalize::{TextNormalizer, collapse_whitespace, strip_control_chars};
use crate::persona::{DEFAULT_PERSONA, REFINEMENT_INSTRUCTION};
use crate::prompt;

/// Result of one successful caller turn
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Final assistant reply
    pub reply: String,
    /// Resolved session id (minted when the caller supplied none)
    pub session_id: String,
}

/// Passes of the draft/refine protocol.
///
/// The draft pass runs loose for exploration; the refine pass runs tight over
/// the extended sequence and produces the committed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefinementPass {
    Draft,
    Refine,
}

impl RefinementPass {
    fn temperature(self, config: &CompletionConfig) -> f32 {
        match self {
            RefinementPass::Draft => config.draft_temperature,
            RefinementPass::Refine => config.refine_temperature,
        }
    }
}

/// The conversation engine exposed to the transport layer.
///
/// Owns an injected [`SessionStore`] (no ambient global), a moderation
/// policy, and a completion provider. `ask` and `clear_session` are the only
/// two operations a transport needs.
pub struct ChatEngine {
    store: Arc<SessionStore>,
    provider: Arc<dyn CompletionProvider>,
    moderation: Box<dyn ModerationPolicy>,
    normalizer: TextNormalizer,
    persona: String,
    completion: CompletionConfig,
}

impl ChatEngine {
    /// Create an engine from configuration, an injected store, and a
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured moderation deny-list fails to
    /// compile.
    pub fn new(
        config: &DialogosConfig,
        store: Arc<SessionStore>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self> {
        let moderation = DenyListPolicy::new(&config.moderation.deny_patterns)?;

        Ok(Self {
            store,
            provider,
            moderation: Box::new(moderation),
            normalizer: TextNormalizer::with_max_chars(config.normalizer.max_chars),
            persona: config
                .persona
                .clone()
                .unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
            completion: config.completion.clone(),
        })
    }

    /// Replace the moderation policy (e.g., with a classifier).
    pub fn with_moderation_policy(mut self, policy: Box<dyn ModerationPolicy>) -> Self {
        self.moderation = policy;
        self
    }

    /// Get the session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Process one caller message and return the committed reply.
    ///
    /// Validation and moderation run before any session mutation or provider
    /// call; a failed provider call leaves history exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`DialogosError::EmptyInput`] if the message normalizes to nothing
    /// - [`DialogosError::ModerationRejected`] if a deny pattern matches
    /// - [`DialogosError::CompletionProvider`] for any provider failure
    pub async fn ask(
        &self,
        message: &str,
        session_id: Option<&str>,
        use_refinement: bool,
    ) -> Result<ChatOutcome> {
        let normalized = self.normalizer.normalize(message)?;

        let verdict = self.moderation.moderate(&normalized);
        if !verdict.is_safe {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "rejected by moderation policy".to_string());
            tracing::warn!(policy = self.moderation.name(), "message rejected");
            return Err(DialogosError::ModerationRejected { reason });
        }

        let session_id = self.store.resolve_or_create(session_id);
        let history = self.store.history(&session_id);
        let assembled = prompt::assemble(&self.persona, &history, &normalized);

        tracing::debug!(
            session_id = %session_id,
            history_entries = history.len(),
            refinement = use_refinement,
            "dispatching completion"
        );

        let raw_reply = if use_refinement {
            self.draft_and_refine(assembled).await?
        } else {
            self.complete_once(assembled, self.completion.temperature)
                .await?
        };

        let reply = postprocess_response(&raw_reply);
        if reply.is_empty() {
            return Err(DialogosError::CompletionProvider(
                "provider returned an empty completion".to_string(),
            ));
        }

        self.store.append(&session_id, &normalized, &reply);
        tracing::info!(session_id = %session_id, "turn committed");

        Ok(ChatOutcome { reply, session_id })
    }

    /// Remove a session entirely. Returns whether it existed.
    pub fn clear_session(&self, session_id: &str) -> bool {
        self.store.clear(session_id)
    }

    /// Number of currently tracked sessions
    pub fn session_count(&self) -> usize {
        self.store.count()
    }

    async fn complete_once(&self, messages: Vec<Message>, temperature: f32) -> Result<String> {
        let request = CompletionRequest::new(messages)
            .with_temperature(temperature)
            .with_max_tokens(self.completion.max_tokens);

        // Bound the round trip here as well, so a provider implementation
        // without its own timeout cannot hang the caller.
        let response = tokio::time::timeout(
            self.completion.request_timeout,
            self.provider.complete(&request),
        )
        .await
        .map_err(|_| {
            DialogosError::CompletionProvider(format!(
                "provider call timed out after {:?}",
                self.completion.request_timeout
            ))
        })??;

        if let Some(usage) = &response.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "completion received");
        }

        Ok(response.content)
    }

    /// Run the two-pass protocol. The draft never reaches history; only the
    /// refined text does.
    async fn draft_and_refine(&self, assembled: Vec<Message>) -> Result<String> {
        let draft = self
            .complete_once(
                assembled.clone(),
                RefinementPass::Draft.temperature(&self.completion),
            )
            .await?;

        let refine_sequence =
            prompt::extend_for_refinement(&assembled, &draft, REFINEMENT_INSTRUCTION);

        self.complete_once(
            refine_sequence,
            RefinementPass::Refine.temperature(&self.completion),
        )
        .await
    }
}

/// Post-process provider text: whitespace collapse and trim, plus a
/// defensive control-character strip.
fn postprocess_response(text: &str) -> String {
    strip_control_chars(&collapse_whitespace(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refinement_pass_temperatures() {
        let config = CompletionConfig::default();
        assert_eq!(RefinementPass::Draft.temperature(&config), 0.9);
        assert_eq!(RefinementPass::Refine.temperature(&config), 0.7);
    }

    #[test]
    fn test_postprocess_collapses_and_trims() {
        assert_eq!(postprocess_response("  4.  "), "4.");
        assert_eq!(
            postprocess_response("spread    out\n\nreply"),
            "spread out reply"
        );
    }

    #[test]
    fn test_postprocess_strips_control_bytes() {
        assert_eq!(postprocess_response("ok\u{0007}ay"), "okay");
    }
}
