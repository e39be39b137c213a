use std::collections::HashMap;

use crate::models::ChatMessage;

/// Chat history for the session, one list per contact.
///
/// Lists are oldest-first: inbound and outbound messages are both appended,
/// and the chat view renders them top to bottom in the same order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversationStore {
    by_contact: HashMap<String, Vec<ChatMessage>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` to the conversation with `contact`, creating it if needed.
    pub fn push(&mut self, contact: &str, message: ChatMessage) {
        self.conversation_mut(contact).push(message);
    }

    /// The conversation with `contact`, created empty on first access.
    pub fn conversation_mut(&mut self, contact: &str) -> &mut Vec<ChatMessage> {
        self.by_contact.entry(contact.to_string()).or_default()
    }

    /// Read-only view; contacts without history yield an empty slice.
    pub fn conversation(&self, contact: &str) -> &[ChatMessage] {
        self.by_contact
            .get(contact)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn contacts(&self) -> impl Iterator<Item = &str> {
        self.by_contact.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: &str, recipient: &str, text: &str, time_utc: i64) -> ChatMessage {
        ChatMessage::new(sender, recipient, text.to_string(), time_utc)
    }

    #[test]
    fn push_appends_in_arrival_order() {
        let mut store = ConversationStore::new();
        store.push("bob", message("bob", "me", "first", 1));
        store.push("bob", message("me", "bob", "second", 2));
        store.push("bob", message("bob", "me", "third", 3));

        let texts: Vec<&str> = store.conversation("bob").iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn each_contact_has_a_single_list() {
        let mut store = ConversationStore::new();
        store.push("bob", message("bob", "me", "hi", 1));
        store.push("carol", message("carol", "me", "hey", 2));
        store.push("bob", message("bob", "me", "again", 3));

        let mut contacts: Vec<&str> = store.contacts().collect();
        contacts.sort_unstable();
        assert_eq!(contacts, ["bob", "carol"]);
        assert_eq!(store.conversation("bob").len(), 2);
        assert_eq!(store.conversation("carol").len(), 1);
    }

    #[test]
    fn unknown_contact_reads_as_empty_without_creating() {
        let store = ConversationStore::new();
        assert!(store.conversation("nobody").is_empty());
        assert_eq!(store.contacts().count(), 0);
    }

    #[test]
    fn mutable_access_creates_lazily() {
        let mut store = ConversationStore::new();
        assert!(store.conversation_mut("dave").is_empty());
        assert_eq!(store.contacts().collect::<Vec<_>>(), ["dave"]);
    }
}
