//! Last-resort reply when no handler or dispatcher answered.

use crate::dialogue::{Reply, Turn};

const UNKNOWN: &str = "I'm not sure about that. Can you ask differently?";
const ASK_SUBJECT: &str = "I don't know your favorite subject yet, can you tell me?";

pub fn reply(turn: &Turn<'_>) -> Reply {
    if turn.lower.contains("favorite subject") && turn.profile.favorite_subject.is_none() {
        return ASK_SUBJECT.into();
    }
    UNKNOWN.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::FixedChance;
    use crate::dialogue::{Profile, SessionContext};
    use chrono::Utc;

    fn run(text: &str, profile: &mut Profile) -> String {
        let mut session = SessionContext::with_chance(Box::new(FixedChance::never()));
        let turn = Turn::new(text, Utc::now(), profile, &mut session);
        reply(&turn).text
    }

    #[test]
    fn asks_for_a_missing_subject() {
        let mut p = Profile::default();
        assert_eq!(run("what's my favorite subject?", &mut p), ASK_SUBJECT);
    }

    #[test]
    fn known_subject_gets_the_generic_reply() {
        let mut p = Profile {
            favorite_subject: Some("Physics".into()),
            ..Profile::default()
        };
        assert_eq!(run("what's my favorite subject?", &mut p), UNKNOWN);
        assert_eq!(run("blorp", &mut Profile::default()), UNKNOWN);
    }
}
