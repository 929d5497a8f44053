use super::Handler;
use crate::dialogue::{Reply, Turn};
use crate::error::DialogueError;

const RECENT_ITEMS: usize = 6;

/// Read-only coin and item report.
pub struct Inventory;

impl Handler for Inventory {
    fn name(&self) -> &'static str {
        "inventory"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        let lower = &turn.lower;
        let profile = &*turn.profile;

        if lower.contains("inventory") || lower.contains("backpack") {
            let items = match profile.recent_items(RECENT_ITEMS) {
                [] => "Inventory empty".to_string(),
                recent => recent.join(", "),
            };
            return Ok(Some(
                format!("You have {} coins. Items: {items}.", profile.coins).into(),
            ));
        }

        if lower.contains("coins") || lower.contains("currency") {
            let tail = if profile.inventory.is_empty() {
                "Earn more by finishing quests!".to_string()
            } else {
                format!("Items: {}", profile.inventory.join(", "))
            };
            return Ok(Some(format!("Coins: {}. {tail}", profile.coins).into()));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::FixedChance;
    use crate::dialogue::{Profile, SessionContext};
    use chrono::Utc;

    fn run(text: &str, profile: &mut Profile) -> Option<String> {
        let mut session = SessionContext::with_chance(Box::new(FixedChance::never()));
        let mut turn = Turn::new(text, Utc::now(), profile, &mut session);
        Inventory.try_handle(&mut turn).unwrap().map(|r| r.text)
    }

    #[test]
    fn empty_inventory() {
        let mut p = Profile::default();
        assert_eq!(
            run("check my inventory", &mut p).as_deref(),
            Some("You have 0 coins. Items: Inventory empty.")
        );
        assert_eq!(
            run("how many coins?", &mut p).as_deref(),
            Some("Coins: 0. Earn more by finishing quests!")
        );
    }

    #[test]
    fn lists_recent_items() {
        let mut p = Profile {
            coins: 22,
            inventory: vec!["Retro Floppy".into(), "Solar Badge".into()],
            ..Profile::default()
        };
        assert_eq!(
            run("open backpack", &mut p).as_deref(),
            Some("You have 22 coins. Items: Retro Floppy, Solar Badge.")
        );
        assert!(run("hello", &mut p).is_none());
    }
}
