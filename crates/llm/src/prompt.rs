//! Prompt construction for conversational turns

use plushpal_core::Message;

/// How many trailing history messages are included in the prompt.
///
/// The window is intentionally small: the persona caps replies at 2-3
/// sentences, so older turns add tokens without adding useful grounding.
const CONTEXT_WINDOW: usize = 3;

/// Build the prompt for a conversational turn
///
/// With context, the last [`CONTEXT_WINDOW`] messages are prepended as a
/// labeled block, one `role: content` line each; without context the raw
/// utterance is the prompt.
pub fn conversation_prompt(utterance: &str, context: Option<&[Message]>) -> String {
    match context {
        Some(messages) if !messages.is_empty() => {
            let start = messages.len().saturating_sub(CONTEXT_WINDOW);
            let history = messages[start..]
                .iter()
                .map(|m| format!("{}: {}", m.role, m.content))
                .collect::<Vec<_>>()
                .join("\n");
            format!("Previous conversation:\n{}\n\nChild: {}", history, utterance)
        }
        _ => utterance.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plushpal_core::Message;

    #[test]
    fn bare_utterance_without_context() {
        assert_eq!(conversation_prompt("hi there", None), "hi there");
        assert_eq!(conversation_prompt("hi there", Some(&[])), "hi there");
    }

    #[test]
    fn context_is_labeled_and_formatted() {
        let messages = vec![Message::user("hello"), Message::assistant("hi friend!")];
        let prompt = conversation_prompt("tell me more", Some(&messages));
        assert_eq!(
            prompt,
            "Previous conversation:\nuser: hello\nassistant: hi friend!\n\nChild: tell me more"
        );
    }

    #[test]
    fn window_keeps_only_last_three_messages() {
        let messages = vec![
            Message::user("one"),
            Message::assistant("two"),
            Message::user("three"),
            Message::assistant("four"),
        ];
        let prompt = conversation_prompt("five", Some(&messages));
        assert!(!prompt.contains("one"));
        assert!(prompt.contains("two"));
        assert!(prompt.contains("three"));
        assert!(prompt.contains("four"));
    }
}
