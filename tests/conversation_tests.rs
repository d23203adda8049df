//! Tests for the conversation store.

use socrates::conversation::{ConversationStore, SOCRATES_PERSONA};
use socrates::error::SocratesError;
use socrates::types::{Message, Role};

fn scripted_roles(len: usize, seed: u64) -> Vec<Role> {
    // Cheap LCG so every run covers the same mixed sequences.
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            if state >> 63 == 0 {
                Role::User
            } else {
                Role::Assistant
            }
        })
        .collect()
}

#[test]
fn length_is_one_plus_appends_for_any_role_sequence() {
    for seed in 0..20 {
        for len in [0, 1, 2, 7, 30] {
            let mut store = ConversationStore::new();
            let sequence = scripted_roles(len, seed);
            for (i, role) in sequence.iter().enumerate() {
                store.append(*role, format!("turn {i}")).unwrap();
            }

            let history = store.history();
            assert_eq!(history.len(), 1 + len);
            assert_eq!(history[0].role, Role::System);
            assert_eq!(history[0].content, SOCRATES_PERSONA);
            let appended: Vec<Role> = history[1..].iter().map(|m| m.role).collect();
            assert_eq!(appended, sequence);
        }
    }
}

#[test]
fn reset_always_returns_to_the_persona() {
    for len in [0, 1, 5, 12] {
        let mut store = ConversationStore::new();
        for role in scripted_roles(len, 3) {
            store.append(role, "x").unwrap();
        }
        store.reset();

        let history = store.history();
        assert_eq!(history.len(), 1);
        assert!(history[0].same_turn(&Message::system(SOCRATES_PERSONA)));
    }
}

#[test]
fn rejected_system_append_is_a_no_op() {
    let mut store = ConversationStore::new();
    store.append(Role::User, "q").unwrap();
    store.append(Role::Assistant, "a").unwrap();
    let before = store.history().to_vec();

    for _ in 0..3 {
        let err = store.append(Role::System, "override").unwrap_err();
        assert!(matches!(err, SocratesError::InvalidRole(Role::System)));
    }
    assert_eq!(store.history(), before.as_slice());
    assert_eq!(store.generation(), 0);
}

#[test]
fn role_parses_from_wire_names() {
    assert_eq!("user".parse::<Role>().unwrap(), Role::User);
    assert_eq!("Assistant".parse::<Role>().unwrap(), Role::Assistant);
    assert!("tool".parse::<Role>().is_err());
    assert_eq!(Role::System.to_string(), "system");
    assert_eq!(
        serde_json::to_value(Message::user("hi")).unwrap()["role"],
        serde_json::json!("user")
    );
}
