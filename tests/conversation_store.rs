#[cfg(test)]
mod tests {
    use ollie::chat::{ChatError, ConversationStore, Role};
    use serde_json::json;

    fn store_with_budget(max_tokens: u32, per_message: u32, count: usize) -> (ConversationStore, uuid::Uuid) {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, max_tokens);
        for i in 0..count {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            store
                .add_message(id, role, &format!("message {}", i), Some(per_message), None)
                .unwrap();
        }
        (store, id)
    }

    #[test]
    fn test_create_defaults() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, 8192);

        let conversation = store.get(id).unwrap();
        assert!(conversation.title.starts_with("Chat "));
        assert_eq!(conversation.model_id, "llama3.2:3b");
        assert_eq!(conversation.max_tokens, 8192);
        assert_eq!(conversation.total_tokens, 0);

        // The default persona is materialized as the first (system) message
        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].role, Role::System);
        assert_eq!(
            conversation.system_prompt.as_deref(),
            Some(conversation.messages[0].content.as_str())
        );
    }

    #[test]
    fn test_empty_system_prompt_falls_back_to_default() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, Some(String::new()), 8192);

        let conversation = store.get(id).unwrap();
        assert_eq!(conversation.messages.len(), 1);
        assert!(!conversation.messages[0].content.is_empty());
    }

    #[test]
    fn test_token_accounting_scenario() {
        // create with default system prompt → user "Hi" → assistant (20 tokens)
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, 8192);

        store.add_message(id, Role::User, "Hi", None, None).unwrap();
        store
            .add_message(id, Role::Assistant, "Hello! How can I help?", Some(20), None)
            .unwrap();

        let conversation = store.get(id).unwrap();
        assert_eq!(conversation.total_tokens, 20);
        assert_eq!(conversation.messages.len(), 3);
        assert_eq!(conversation.messages[0].role, Role::System);
        assert_eq!(conversation.messages[1].role, Role::User);
        assert_eq!(conversation.messages[2].role, Role::Assistant);
    }

    #[test]
    fn test_total_equals_sum_of_known_counts() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, 8192);

        store.add_message(id, Role::User, "a", Some(3), None).unwrap();
        store.add_message(id, Role::Assistant, "b", None, None).unwrap();
        store.add_message(id, Role::User, "c", Some(7), None).unwrap();

        assert_eq!(store.get(id).unwrap().total_tokens, 10);
    }

    #[test]
    fn test_fill_token_count_recomputes_total() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, 8192);

        let message = store.add_message(id, Role::User, "hello", None, None).unwrap();
        assert_eq!(store.get(id).unwrap().total_tokens, 0);

        store.fill_token_count(id, message.id, 12).unwrap();
        assert_eq!(store.get(id).unwrap().total_tokens, 12);
    }

    #[test]
    fn test_add_message_unknown_conversation() {
        let mut store = ConversationStore::new();
        let result = store.add_message(uuid::Uuid::new_v4(), Role::User, "hi", None, None);
        assert!(matches!(result, Err(ChatError::ConversationNotFound(_))));
    }

    #[test]
    fn test_trim_greedy_oldest_first() {
        // max_tokens=100, 10 non-system messages at 15 tokens each (total 150),
        // default target is 75: evict 5 oldest to land exactly on 75.
        let (mut store, id) = store_with_budget(100, 15, 10);
        assert_eq!(store.get(id).unwrap().total_tokens, 150);

        let trimmed = store.trim(id, None).unwrap();
        assert_eq!(trimmed, 5);

        let conversation = store.get(id).unwrap();
        assert_eq!(conversation.total_tokens, 75);
        // 1 system message + 5 surviving non-system messages
        assert_eq!(conversation.messages.len(), 6);
        assert_eq!(conversation.messages[0].role, Role::System);
        // Relative order of survivors is preserved
        assert_eq!(conversation.messages[1].content, "message 5");
        assert_eq!(conversation.messages[5].content, "message 9");
    }

    #[test]
    fn test_trim_noop_when_under_target() {
        let (mut store, id) = store_with_budget(1000, 15, 4);
        assert_eq!(store.trim(id, None).unwrap(), 0);
    }

    #[test]
    fn test_trim_idempotent_at_target() {
        let (mut store, id) = store_with_budget(100, 15, 10);
        assert!(store.trim(id, None).unwrap() > 0);
        assert_eq!(store.trim(id, None).unwrap(), 0);
    }

    #[test]
    fn test_trim_never_below_two_non_system() {
        // Even an impossible target keeps the two most recent messages.
        let (mut store, id) = store_with_budget(100, 50, 3);
        let trimmed = store.trim(id, Some(0)).unwrap();
        assert_eq!(trimmed, 1);

        let conversation = store.get(id).unwrap();
        let non_system = conversation
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .count();
        assert_eq!(non_system, 2);
        assert_eq!(conversation.messages[0].role, Role::System);
    }

    #[test]
    fn test_trim_unknown_counts_contribute_zero() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, 100);
        // Counted messages carry the whole total; uncounted ones are free
        // to evict but reclaim nothing.
        store.add_message(id, Role::User, "old", None, None).unwrap();
        store.add_message(id, Role::Assistant, "old", None, None).unwrap();
        for i in 0..4 {
            store
                .add_message(id, Role::User, &format!("m{}", i), Some(30), None)
                .unwrap();
        }
        assert_eq!(store.get(id).unwrap().total_tokens, 120);

        let trimmed = store.trim(id, None).unwrap();
        // Two uncounted evictions reclaim nothing, then counted ones drop
        // the total: 120 → 90 → 75, stopping at the target.
        assert_eq!(trimmed, 4);
        assert_eq!(store.get(id).unwrap().total_tokens, 60);
    }

    #[test]
    fn test_for_model_projection() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, 8192);
        store
            .add_message(id, Role::User, "Hi", Some(5), Some(json!({"source": "test"})))
            .unwrap();

        let projected = store.for_model(id).unwrap();
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].role, "system");
        assert_eq!(projected[1].role, "user");
        assert_eq!(projected[1].content, "Hi");
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", Some("Roundtrip".to_string()), None, 4096);
        store.add_message(id, Role::User, "Hi", Some(4), None).unwrap();
        store
            .add_message(id, Role::Assistant, "Hello!", Some(6), None)
            .unwrap();

        let snapshot = store.export(id).unwrap();

        let mut other = ConversationStore::new();
        let imported_id = other.import(snapshot.clone());
        assert_eq!(imported_id, id);

        let restored = other.export(id).unwrap();
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            serde_json::to_value(&restored).unwrap()
        );
        assert_eq!(restored.total_tokens, 10);
        assert_eq!(restored.messages.len(), 3);
    }

    #[test]
    fn test_list_sorted_by_updated_desc() {
        let mut store = ConversationStore::new();
        let first = store.create("llama3.2:3b", Some("first".to_string()), None, 8192);
        let second = store.create("llama3.2:3b", Some("second".to_string()), None, 8192);

        // Touching the first conversation makes it most recent
        store.add_message(first, Role::User, "bump", None, None).unwrap();

        let listing = store.list();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].id, first);
        assert_eq!(listing[1].id, second);
        assert_eq!(listing[0].message_count, 2);
    }

    #[test]
    fn test_rename_and_delete() {
        let mut store = ConversationStore::new();
        let id = store.create("llama3.2:3b", None, None, 8192);

        store.rename(id, "Renamed").unwrap();
        assert_eq!(store.get(id).unwrap().title, "Renamed");

        store.delete(id).unwrap();
        assert!(store.get(id).is_none());
        assert!(matches!(
            store.delete(id),
            Err(ChatError::ConversationNotFound(_))
        ));
    }
}
