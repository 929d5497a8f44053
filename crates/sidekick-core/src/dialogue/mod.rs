//! Conversational state machine.
//!
//! One line of input flows through an ordered chain of [`Handler`]s; the
//! first one that answers wins. When none answers, an optional external
//! [`CommandDispatcher`] gets a turn, then the fallback. Every reply except
//! dispatcher output goes through the persona decoration pass.
//!
//! Handler failures are logged and skipped so the user always gets an answer.

mod context;
mod decorate;
pub mod handlers;
mod knowledge;
pub mod loot;
pub mod persona;
mod profile;

pub use context::{ActiveQuest, HackingStage, SessionContext};
pub use knowledge::{DirKnowledgeBase, KnowledgeBase};
pub use persona::{PersonaKind, TypingStyle};
pub use profile::{FollowUpSlot, HumorStyle, Profile};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chance::Chance;
use crate::clock::Clock;
use crate::error::DialogueError;
use crate::storage::DialogueConfig;
use decorate::Decorator;
use handlers::Handler;

/// External keyword-dispatch fallback (weather, search, OS actions, ...).
pub trait CommandDispatcher: Send + Sync {
    /// Returns `None` when the text is not a command it knows.
    fn dispatch(&self, text: &str) -> Option<String>;
}

/// A titled bullet list attached to some replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub bullets: Vec<String>,
}

/// A handler's undecorated answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub card: Option<Card>,
}

impl Reply {
    pub fn with_card(text: impl Into<String>, card: Card) -> Self {
        Self {
            text: text.into(),
            card: Some(card),
        }
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Self { text, card: None }
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

/// The engine's answer to one message.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub text: String,
    /// Set when a handler or decoration changed the profile; the caller
    /// should persist it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_profile: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Name of the handler that answered.
    pub handled_by: &'static str,
    /// Label of the persona that styled the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<&'static str>,
}

/// Everything a handler may read or change during one message.
pub struct Turn<'a> {
    pub text: &'a str,
    pub lower: String,
    pub now: DateTime<Utc>,
    pub profile: &'a mut Profile,
    pub session: &'a mut SessionContext,
    dirty: bool,
}

impl<'a> Turn<'a> {
    pub fn new(
        text: &'a str,
        now: DateTime<Utc>,
        profile: &'a mut Profile,
        session: &'a mut SessionContext,
    ) -> Self {
        Self {
            text,
            lower: text.to_lowercase(),
            now,
            profile,
            session,
            dirty: false,
        }
    }

    pub fn chance(&mut self) -> &mut dyn Chance {
        self.session.chance()
    }

    /// Record that the profile changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Grant a reward to the profile and return its summary line.
    pub fn grant(&mut self, coins: u32, item: Option<&str>) -> Option<String> {
        let line = self.profile.grant(coins, item);
        if line.is_some() {
            self.mark_dirty();
        }
        line
    }
}

pub struct DialogueEngine {
    handlers: Vec<Box<dyn Handler>>,
    dispatcher: Option<Arc<dyn CommandDispatcher>>,
    decorator: Decorator,
    clock: Arc<dyn Clock>,
    intents_cap: usize,
}

impl DialogueEngine {
    /// Build the standard handler chain. A configured `knowledge_dir`
    /// becomes the homework knowledge base.
    pub fn new(config: &DialogueConfig, clock: Arc<dyn Clock>) -> Self {
        let knowledge = config
            .knowledge_dir
            .as_ref()
            .map(|dir| Arc::new(DirKnowledgeBase::new(dir)) as Arc<dyn KnowledgeBase>);
        Self {
            handlers: handlers::default_chain(knowledge),
            dispatcher: None,
            decorator: Decorator::new(config.clone()),
            clock,
            intents_cap: config.recent_intents_cap,
        }
    }

    pub fn with_knowledge(mut self, knowledge: Arc<dyn KnowledgeBase>) -> Self {
        self.handlers = handlers::default_chain(Some(knowledge));
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn CommandDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Replace the handler chain. The fallback always runs last.
    pub fn with_handlers(mut self, handlers: Vec<Box<dyn Handler>>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Answer one message, mutating `profile` and `session` in place.
    pub fn respond(
        &self,
        text: &str,
        profile: &mut Profile,
        session: &mut SessionContext,
    ) -> Response {
        let mut turn = Turn::new(text, self.clock.now(), profile, session);

        let mut answered = None;
        for handler in &self.handlers {
            match handler.try_handle(&mut turn) {
                Ok(Some(reply)) => {
                    answered = Some((handler.name(), reply));
                    break;
                }
                Ok(None) => {}
                Err(e) => log_handler_failure(&e),
            }
        }

        let (handled_by, reply) = match answered {
            Some(found) => found,
            None => {
                if let Some(out) = self.dispatcher.as_ref().and_then(|d| d.dispatch(text)) {
                    turn.session.record_intent("dispatcher", self.intents_cap);
                    return Response {
                        text: out,
                        updated_profile: turn.is_dirty().then(|| turn.profile.clone()),
                        card: None,
                        handled_by: "dispatcher",
                        persona: None,
                    };
                }
                ("fallback", handlers::fallback::reply(&turn))
            }
        };

        turn.session.record_intent(handled_by, self.intents_cap);
        let text = self.decorator.decorate(&mut turn, &reply.text);
        let persona = turn.session.persona.map(|k| k.persona().label);
        Response {
            text,
            updated_profile: turn.is_dirty().then(|| turn.profile.clone()),
            card: reply.card,
            handled_by,
            persona,
        }
    }
}

fn log_handler_failure(e: &DialogueError) {
    tracing::warn!(handler = e.handler, error = %e, "dialogue handler failed, trying the next one");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::FixedChance;
    use crate::clock::SystemClock;

    fn engine() -> DialogueEngine {
        DialogueEngine::new(&DialogueConfig::default(), Arc::new(SystemClock))
    }

    fn quiet_session() -> SessionContext {
        SessionContext::with_chance(Box::new(FixedChance::never()))
    }

    struct Broken;

    impl Handler for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn try_handle(&self, _turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
            Err(DialogueError::new("broken", "always fails"))
        }
    }

    struct Weather;

    impl CommandDispatcher for Weather {
        fn dispatch(&self, text: &str) -> Option<String> {
            text.contains("weather").then(|| "Sunny, 24°C".to_string())
        }
    }

    #[test]
    fn broken_handler_does_not_suppress_fallback() {
        let engine = engine().with_handlers(vec![Box::new(Broken)]);
        let mut profile = Profile::default();
        let resp = engine.respond("hello?", &mut profile, &mut quiet_session());
        assert_eq!(resp.handled_by, "fallback");
        assert!(resp.text.contains("I'm not sure about that"));
    }

    #[test]
    fn dispatcher_runs_only_when_nothing_matched() {
        let engine = engine().with_dispatcher(Arc::new(Weather));
        let mut profile = Profile::default();
        let mut session = quiet_session();

        let resp = engine.respond("what's the weather", &mut profile, &mut session);
        assert_eq!(resp.handled_by, "dispatcher");
        assert_eq!(resp.text, "Sunny, 24°C");

        let resp = engine.respond("hello, what's the weather", &mut profile, &mut session);
        assert_eq!(resp.handled_by, "small_talk");
    }

    #[test]
    fn personal_follow_up_wins_over_a_joke_request() {
        let mut profile = Profile {
            hobbies: vec!["drawing".into()],
            ..Profile::default()
        };
        let resp = engine().respond("draw me a joke", &mut profile, &mut quiet_session());
        assert_eq!(resp.handled_by, "topic_followup");
        assert!(resp.text.contains("Do you want to draw something today"));

        let resp = engine().respond("tell me a joke", &mut profile, &mut quiet_session());
        assert_eq!(resp.handled_by, "joke");
    }

    #[test]
    fn knowledge_notes_reach_homework_replies() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("math.txt"), "Quadratic formula: x = (-b ± √Δ) / 2a\n").unwrap();
        let engine = engine().with_knowledge(Arc::new(DirKnowledgeBase::new(dir.path())));
        let mut profile = Profile::default();
        let resp = engine.respond("algebra homework", &mut profile, &mut quiet_session());
        assert_eq!(resp.handled_by, "homework");
        assert!(resp.text.contains("[Math Notes]\nQuadratic formula"));
        assert_eq!(resp.card.map(|c| c.title).as_deref(), Some("Math help"));
    }

    #[test]
    fn first_reply_carries_persona_prefix_and_intro() {
        let engine = engine();
        let mut profile = Profile::default();
        let mut session = quiet_session();
        let resp = engine.respond("hi", &mut profile, &mut session);
        assert!(resp.text.starts_with("😎 "));
        assert!(resp.text.contains("*Sidekick leans back, chilled out.*"));
        assert_eq!(resp.persona, Some("Chill Sidekick"));
        assert!(resp.updated_profile.is_none());
        assert_eq!(session.recent_intents.back(), Some(&"small_talk"));
    }
}
