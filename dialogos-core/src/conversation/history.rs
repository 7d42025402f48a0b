//! Turn history with sliding-window truncation

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::llm::Message;

/// A committed turn: one user message paired with its assistant reply.
///
/// Turns only exist as complete pairs; the pipeline never stores a user
/// message whose reply has not arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// User message
    pub user: String,
    /// Assistant reply
    pub assistant: String,
    /// When the turn was committed
    pub completed_at: SystemTime,
}

impl Turn {
    /// Create a completed turn
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            completed_at: SystemTime::now(),
        }
    }

    /// Convert to role/text entries, user first
    pub fn to_messages(&self) -> Vec<Message> {
        vec![
            Message::user(self.user.clone()),
            Message::assistant(self.assistant.clone()),
        ]
    }
}

/// Bounded message history for one session.
///
/// Entries alternate strictly user, assistant, user, assistant. The window is
/// measured in entries (`max_entries`, even so truncation preserves pairing);
/// oldest turns are dropped first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHistory {
    turns: Vec<Turn>,
    max_entries: usize,
}

impl MessageHistory {
    /// Create an empty history with the given entry window
    pub fn new(max_entries: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_entries,
        }
    }

    /// Get the entry window
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Get all turns
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Get turn count
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Number of stored entries (two per turn)
    pub fn entry_count(&self) -> usize {
        self.turns.len() * 2
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a completed turn, then apply the sliding window in place.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);

        let max_turns = self.max_entries / 2;
        if self.turns.len() > max_turns {
            let dropped = self.turns.len() - max_turns;
            self.turns.drain(..dropped);
            tracing::debug!(dropped_turns = dropped, "history truncated to window");
        }
    }

    /// Flatten to ordered role/text entries
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns.iter().flat_map(|t| t.to_messages()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_turn_to_messages() {
        let turn = Turn::new("Hello", "Hi!");
        let messages = turn.to_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "Hi!");
    }

    #[test]
    fn test_push_and_flatten() {
        let mut history = MessageHistory::new(20);
        history.push_turn(Turn::new("q1", "a1"));
        history.push_turn(Turn::new("q2", "a2"));

        assert_eq!(history.turn_count(), 2);
        assert_eq!(history.entry_count(), 4);

        let messages = history.to_messages();
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant
            ]
        );
    }

    #[test]
    fn test_window_drops_oldest_first() {
        let mut history = MessageHistory::new(4);
        for i in 0..5 {
            history.push_turn(Turn::new(format!("q{}", i), format!("a{}", i)));
        }

        assert_eq!(history.entry_count(), 4);
        assert_eq!(history.turns()[0].user, "q3");
        assert_eq!(history.turns()[1].user, "q4");
    }

    #[test]
    fn test_entry_count_bounded_after_every_push() {
        let mut history = MessageHistory::new(6);
        for i in 0..20 {
            history.push_turn(Turn::new(format!("q{}", i), format!("a{}", i)));
            assert!(history.entry_count() <= 6);
        }
    }

    #[test]
    fn test_small_history_not_truncated() {
        let mut history = MessageHistory::new(10);
        history.push_turn(Turn::new("only", "one"));
        assert_eq!(history.entry_count(), 2);
        assert_eq!(history.turns()[0].user, "only");
    }

    #[test]
    fn test_alternation_preserved_across_truncation() {
        let mut history = MessageHistory::new(4);
        for i in 0..10 {
            history.push_turn(Turn::new(format!("q{}", i), format!("a{}", i)));
        }

        let messages = history.to_messages();
        for (i, message) in messages.iter().enumerate() {
            let expected = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            assert_eq!(message.role, expected);
        }
    }
}
