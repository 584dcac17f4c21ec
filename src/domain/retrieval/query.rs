//! Retrieval query composition

use crate::domain::conversation::{ConversationTurn, TurnRole};

/// Marker line separating prior context from the current request
const CURRENT_REQUEST_MARKER: &str = "Current request:";

/// How many prior user turns are folded into the retrieval query
const MAX_HISTORY_TURNS: usize = 2;

/// Builds the text submitted for embedding from the current request plus
/// bounded conversation history.
///
/// Only user turns are considered: assistant turns would dilute the
/// embedding with generated text, and a short window of two turns is enough
/// to resolve pronoun references without dragging in stale topics.
pub fn compose_query(turns: &[ConversationTurn], current: &str) -> String {
    let recent_user_turns: Vec<&str> = turns
        .iter()
        .rev()
        .filter(|turn| turn.role == TurnRole::User)
        .take(MAX_HISTORY_TURNS)
        .map(|turn| turn.content.as_str())
        .collect();

    if recent_user_turns.is_empty() {
        return current.to_string();
    }

    let mut composed = String::new();

    // Reverse back to chronological order
    for content in recent_user_turns.iter().rev() {
        composed.push_str(content);
        composed.push('\n');
    }

    composed.push_str(CURRENT_REQUEST_MARKER);
    composed.push('\n');
    composed.push_str(current);
    composed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(content: &str) -> ConversationTurn {
        ConversationTurn::new(TurnRole::User, content, Utc::now())
    }

    fn assistant(content: &str) -> ConversationTurn {
        ConversationTurn::new(TurnRole::Assistant, content, Utc::now())
    }

    #[test]
    fn test_no_history_returns_current_text_unchanged() {
        assert_eq!(compose_query(&[], "send an email"), "send an email");
    }

    #[test]
    fn test_assistant_only_history_returns_current_text_unchanged() {
        let turns = vec![assistant("Generated workflow successfully")];

        assert_eq!(compose_query(&turns, "change it to Slack"), "change it to Slack");
    }

    #[test]
    fn test_single_user_turn_is_prepended() {
        let turns = vec![user("send an email when a form is submitted")];

        assert_eq!(
            compose_query(&turns, "change it to Slack"),
            "send an email when a form is submitted\nCurrent request:\nchange it to Slack"
        );
    }

    #[test]
    fn test_at_most_two_user_turns_in_chronological_order() {
        let turns = vec![
            user("first request"),
            assistant("ok"),
            user("second request"),
            assistant("ok"),
            user("third request"),
            assistant("ok"),
        ];

        assert_eq!(
            compose_query(&turns, "current"),
            "second request\nthird request\nCurrent request:\ncurrent"
        );
    }

    #[test]
    fn test_assistant_turns_are_skipped_not_counted() {
        let turns = vec![
            user("older user turn"),
            assistant("reply one"),
            assistant("reply two"),
            user("newer user turn"),
        ];

        assert_eq!(
            compose_query(&turns, "current"),
            "older user turn\nnewer user turn\nCurrent request:\ncurrent"
        );
    }

    #[test]
    fn test_composition_is_deterministic() {
        let turns = vec![user("a"), user("b")];

        let first = compose_query(&turns, "current");
        let second = compose_query(&turns, "current");

        assert_eq!(first, second);
    }
}
