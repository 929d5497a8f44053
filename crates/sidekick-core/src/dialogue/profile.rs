use serde::{Deserialize, Serialize};

/// Joke flavour a user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumorStyle {
    Puns,
    Memes,
    Roasts,
    Anime,
}

impl HumorStyle {
    pub const ALL: [HumorStyle; 4] = [
        HumorStyle::Puns,
        HumorStyle::Memes,
        HumorStyle::Roasts,
        HumorStyle::Anime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HumorStyle::Puns => "puns",
            HumorStyle::Memes => "memes",
            HumorStyle::Roasts => "roasts",
            HumorStyle::Anime => "anime",
        }
    }
}

/// What the coding follow-up is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpSlot {
    /// Awaiting a language for practice questions.
    Questions,
    /// Awaiting a language for a quick tip.
    QuickTip,
}

/// Durable per-user record.
///
/// Owned by a [`ProfileStore`](crate::storage::ProfileStore); the dialogue
/// engine only reads and mutates a copy and reports changes back through
/// [`Response::updated_profile`](super::Response::updated_profile).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: Option<String>,
    pub hobbies: Vec<String>,
    pub favorite_subject: Option<String>,
    pub humor_style: Option<HumorStyle>,
    pub inventory: Vec<String>,
    pub coins: u32,
    pub coding_followup: Option<FollowUpSlot>,
}

impl Profile {
    /// Stored name, or "friend".
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("friend")
    }

    pub fn favorite_subject_is(&self, subject: &str) -> bool {
        self.favorite_subject
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(subject))
    }

    /// Add coins and an optional item, returning the reward summary line.
    pub fn grant(&mut self, coins: u32, item: Option<&str>) -> Option<String> {
        let mut summary = Vec::new();
        if coins > 0 {
            self.coins = self.coins.saturating_add(coins);
            summary.push(format!("+{coins} coins"));
        }
        if let Some(item) = item {
            self.inventory.push(item.to_string());
            summary.push(format!("Loot: {item}"));
        }
        if summary.is_empty() {
            None
        } else {
            Some(format!("Rewards → {}", summary.join(", ")))
        }
    }

    /// The most recent `n` items, oldest first.
    pub fn recent_items(&self, n: usize) -> &[String] {
        let start = self.inventory.len().saturating_sub(n);
        &self.inventory[start..]
    }
}
