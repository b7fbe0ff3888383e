use crate::models::chat::{ Role, Turn };

pub const GREETING: &str =
    "Hello! I am a SQL assistant. Ask me questions about your MySQL database.";

/// Append-only conversation log for one session.
///
/// Seeded with a single AI greeting. Turns are never mutated or evicted; the
/// full log is re-rendered into every prompt, so it grows without bound for
/// the life of the session.
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::ai(GREETING)],
        }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }
}

/// Renders the log the way the prompt templates expect it, one turn per line.
pub fn format_history_for_prompt(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return String::new();
    }
    let mut result = String::from("Previous conversation:\n");
    for turn in turns {
        let role_display = match turn.role {
            Role::Human => "User",
            Role::Ai => "Assistant",
        };
        result.push_str(&format!("{}: {}\n", role_display, turn.content));
    }

    result
}
