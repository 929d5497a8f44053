use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::Handler;
use crate::dialogue::{Card, KnowledgeBase, Reply, Turn};
use crate::error::DialogueError;

struct Category {
    topic: &'static str,
    title: &'static str,
    pattern: Regex,
    steps: [&'static str; 4],
}

static CATEGORIES: LazyLock<[Category; 3]> = LazyLock::new(|| {
    [
        Category {
            topic: "math",
            title: "Math help",
            pattern: Regex::new(r"(?i)\b(?:math|algebra|geometry|calculus|trigonometry)\b").unwrap(),
            steps: [
                "Identify knowns and unknowns.",
                "Write the formula (e.g., quadratic: ax^2 + bx + c = 0).",
                "Substitute values and solve step-by-step.",
                "Check your units and solution by plugging back.",
            ],
        },
        Category {
            topic: "physics",
            title: "Physics help",
            pattern: Regex::new(r"(?i)\b(?:physics|mechanics|optics|thermo|electricity)\b").unwrap(),
            steps: [
                "Draw a quick diagram and set a coordinate system.",
                "List forces or energy forms involved.",
                "Pick the principle: F=ma, Work-Energy, Momentum, etc.",
                "Solve symbolically, then plug numbers, include units.",
            ],
        },
        Category {
            topic: "programming",
            title: "Programming help",
            pattern: Regex::new(
                r"(?i)\b(?:python|programming|variable|function|loop|class|list|dict|tuple)\b",
            )
            .unwrap(),
            steps: [
                "Break the problem into functions.",
                "Use clear variable names and comments.",
                "Test with small inputs and print intermediate states.",
                "Look up errors and read tracebacks to pinpoint lines.",
            ],
        },
    ]
});

/// Fixed study checklists, optionally extended with knowledge-base notes.
pub struct Homework {
    knowledge: Option<Arc<dyn KnowledgeBase>>,
}

impl Homework {
    pub fn new(knowledge: Option<Arc<dyn KnowledgeBase>>) -> Self {
        Self { knowledge }
    }
}

impl Handler for Homework {
    fn name(&self) -> &'static str {
        "homework"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        let Some(category) = CATEGORIES.iter().find(|c| c.pattern.is_match(turn.text)) else {
            return Ok(None);
        };

        let mut text = format!("{}:\n - {}", category.title, category.steps.join("\n - "));
        let notes = self
            .knowledge
            .as_ref()
            .and_then(|kb| kb.lookup(category.topic));
        if let Some(notes) = notes {
            text.push_str(&format!("\n\n[{} Notes]\n{notes}", category.title.trim_end_matches(" help")));
        }

        let card = Card {
            title: category.title.to_string(),
            bullets: category.steps.iter().map(|s| s.to_string()).collect(),
        };
        Ok(Some(Reply::with_card(text, card)))
    }
}
