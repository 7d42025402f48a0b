//! Moderation filter over normalized messages
//!
//! A pattern-based safety gate behind the [`ModerationPolicy`] trait, so a
//! richer classifier can be substituted without touching the pipeline.

use regex::Regex;

use crate::error::{DialogosError, Result};

/// Outcome of a moderation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationVerdict {
    /// Whether the message may proceed
    pub is_safe: bool,
    /// Human-readable rejection reason, when unsafe
    pub reason: Option<String>,
}

impl ModerationVerdict {
    /// Verdict allowing the message through
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            reason: None,
        }
    }

    /// Verdict rejecting the message with a reason
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            is_safe: false,
            reason: Some(reason.into()),
        }
    }
}

/// Trait for moderation policy implementations.
///
/// A pure predicate over the normalized message text: no mutation, no side
/// effects. The shipped implementation is [`DenyListPolicy`]; production
/// systems can plug in a classifier behind the same contract.
pub trait ModerationPolicy: Send + Sync {
    /// Check a normalized message.
    fn moderate(&self, text: &str) -> ModerationVerdict;

    /// Get the policy name
    fn name(&self) -> &'static str;
}

/// Case-insensitive whole-word deny-list policy.
///
/// A denied term embedded inside a longer word does not match; the same term
/// as a standalone token, in any case, does.
pub struct DenyListPolicy {
    pattern: Option<Regex>,
}

impl DenyListPolicy {
    /// Compile a policy from a list of denied terms.
    ///
    /// An empty list yields a policy that allows everything.
    ///
    /// # Errors
    ///
    /// Returns [`DialogosError::Configuration`] if the combined pattern fails
    /// to compile.
    pub fn new(deny_patterns: &[String]) -> Result<Self> {
        if deny_patterns.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternation = deny_patterns
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).map_err(|e| {
            DialogosError::Configuration(format!("invalid moderation deny-list: {}", e))
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Policy that allows every message
    pub fn allow_all() -> Self {
        Self { pattern: None }
    }
}

impl ModerationPolicy for DenyListPolicy {
    fn moderate(&self, text: &str) -> ModerationVerdict {
        let Some(pattern) = self.pattern.as_ref() else {
            return ModerationVerdict::safe();
        };

        match pattern.find(text) {
            Some(m) => ModerationVerdict::rejected(format!(
                "message contains a disallowed term: \"{}\"",
                m.as_str()
            )),
            None => ModerationVerdict::safe(),
        }
    }

    fn name(&self) -> &'static str {
        "deny_list"
    }
}
