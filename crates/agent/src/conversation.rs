use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
}

/// Append-only log of one session. Entries come in user/assistant pairs and are
/// never edited or removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Conversation {
    entries: Vec<ConversationEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the question verbatim, then the answer text.
    pub fn record_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.entries.push(ConversationEntry { role: Role::User, content: question.into() });
        self.entries.push(ConversationEntry { role: Role::Assistant, content: answer.into() });
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// The last `limit` entries; `0` means all of them.
    pub fn recent(&self, limit: usize) -> &[ConversationEntry] {
        if limit == 0 || limit >= self.entries.len() {
            return &self.entries;
        }
        &self.entries[self.entries.len() - limit..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn turns(&self) -> usize {
        self.entries.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, Role};

    #[test]
    fn turns_append_user_then_assistant() {
        let mut conversation = Conversation::new();
        conversation.record_turn("Hello", "Hi there");
        conversation.record_turn("  What are the costs?  ", "Costs...");

        let roles = conversation.entries().iter().map(|entry| entry.role).collect::<Vec<_>>();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(conversation.entries()[2].content, "  What are the costs?  ");
        assert_eq!(conversation.turns(), 2);
    }

    #[test]
    fn recent_limits_from_the_end() {
        let mut conversation = Conversation::new();
        for index in 0..3 {
            conversation.record_turn(format!("q{index}"), format!("a{index}"));
        }

        let recent = conversation.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "q2");
        assert_eq!(recent[1].content, "a2");
        assert_eq!(conversation.recent(0).len(), 6);
        assert_eq!(conversation.recent(50).len(), 6);
    }

    #[test]
    fn new_conversation_is_empty() {
        let conversation = Conversation::new();
        assert!(conversation.is_empty());
        assert_eq!(conversation.len(), 0);
        assert!(conversation.recent(3).is_empty());
    }

    #[test]
    fn entries_serialize_with_snake_case_roles() {
        let mut conversation = Conversation::new();
        conversation.record_turn("hi", "Hello!");

        let value = serde_json::to_value(conversation.entries()).expect("entries serialize");
        assert_eq!(value[0]["role"], "user");
        assert_eq!(value[1]["role"], "assistant");
    }
}
