//! Prompt assembly
//!
//! Pure construction of the message sequences sent to the completion
//! provider. Nothing here is stored; assembled sequences are ephemeral.

use crate::llm::Message;

/// Build the completion sequence: one system entry holding the persona
/// instruction, the session history in original order, then the current
/// message as the trailing user entry.
pub fn assemble(persona: &str, history: &[Message], current_message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(persona));
    messages.extend_from_slice(history);
    messages.push(Message::user(current_message));
    messages
}

/// Build the refinement sequence from an already-assembled one: the draft as
/// an assistant entry, then the refinement instruction as the trailing user
/// entry.
pub fn extend_for_refinement(
    assembled: &[Message],
    draft: &str,
    instruction: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(assembled.len() + 2);
    messages.extend_from_slice(assembled);
    messages.push(Message::assistant(draft));
    messages.push(Message::user(instruction));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_assemble_ordering() {
        let history = vec![Message::user("q1"), Message::assistant("a1")];
        let messages = assemble("persona text", &history, "q2");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, "persona text");
        assert_eq!(messages[1].content, "q1");
        assert_eq!(messages[2].content, "a1");
        assert_eq!(messages[3].role, MessageRole::User);
        assert_eq!(messages[3].content, "q2");
    }

    #[test]
    fn test_assemble_empty_history() {
        let messages = assemble("persona", &[], "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_assemble_does_not_mutate_inputs() {
        let history = vec![Message::user("q1"), Message::assistant("a1")];
        let before = history.clone();
        let _ = assemble("persona", &history, "q2");
        assert_eq!(history, before);
    }

    #[test]
    fn test_refinement_extends_assembled_sequence() {
        let assembled = assemble("persona", &[], "question");
        let refined = extend_for_refinement(&assembled, "draft reply", "tighten it");

        assert_eq!(refined.len(), assembled.len() + 2);
        assert_eq!(refined[..assembled.len()], assembled[..]);
        assert_eq!(refined[assembled.len()].role, MessageRole::Assistant);
        assert_eq!(refined[assembled.len()].content, "draft reply");
        assert_eq!(refined[assembled.len() + 1].role, MessageRole::User);
        assert_eq!(refined[assembled.len() + 1].content, "tighten it");
    }
}
