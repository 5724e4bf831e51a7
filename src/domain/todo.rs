use serde::{Deserialize, Serialize};

/// Millisecond-derived identifier, stored as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Returns `None` when `raw` is blank after trimming.
    pub fn new(id: TodoId, raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id,
            text: text.to_owned(),
            completed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_and_rejects_blank() {
        let todo = Todo::new(TodoId(1), "  Buy milk \n").unwrap();
        assert_eq!(todo.text, "Buy milk");
        assert!(!todo.completed);
        assert!(Todo::new(TodoId(2), "   ").is_none());
        assert!(Todo::new(TodoId(3), "").is_none());
    }

    #[test]
    fn serializes_with_plain_numeric_id() {
        let todo = Todo::new(TodoId(1_700_000_000_000), "Walk").unwrap();
        let json = serde_json::to_string(&todo).unwrap();
        assert_eq!(json, r#"{"id":1700000000000,"text":"Walk","completed":false}"#);
    }
}
