//! Topic follow-ups.
//!
//! When the favourite subject is coding, "practice question" or "quick tip"
//! parks a slot on the profile and asks for a language; the next message
//! naming a language answers it and clears the slot. Without a pending
//! slot, a few personalised prompts are offered instead.

use super::Handler;
use crate::dialogue::{FollowUpSlot, Reply, Turn};
use crate::error::DialogueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    C,
    Cpp,
    Java,
    JavaScript,
    Html,
    Css,
    HtmlCss,
}

impl Language {
    pub fn label(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::HtmlCss => "HTML/CSS",
        }
    }

    /// Detect a language name in lower-cased text.
    pub fn detect(lower: &str) -> Option<Self> {
        let padded = format!(" {lower} ");
        let has_cpp = lower.contains("c++") || lower.contains("cpp");
        if lower.contains("python") {
            Some(Language::Python)
        } else if padded.contains(" c ") && !has_cpp {
            Some(Language::C)
        } else if has_cpp {
            Some(Language::Cpp)
        } else if lower.contains("java") && !lower.contains("javascript") {
            Some(Language::Java)
        } else if lower.contains("javascript") || padded.contains(" js ") {
            Some(Language::JavaScript)
        } else {
            match (lower.contains("html"), lower.contains("css")) {
                (true, true) => Some(Language::HtmlCss),
                (true, false) => Some(Language::Html),
                (false, true) => Some(Language::Css),
                (false, false) => None,
            }
        }
    }

    pub fn practice_questions(self) -> [&'static str; 3] {
        match self {
            Language::Python => [
                "Write a Python function that returns True if a string is a palindrome.",
                "Given a list of numbers, return the second largest element.",
                "Explain the difference between a list, tuple, and set in Python.",
            ],
            Language::C => [
                "Write a C program to find the largest element in an array.",
                "Explain the difference between a pointer and an array in C.",
                "Implement a function in C that counts the vowels in a string.",
            ],
            Language::Cpp => [
                "Write a C++ program to reverse an array in-place.",
                "What is a reference and how is it different from a pointer in C++?",
                "Implement a simple class for a BankAccount with deposit and withdraw methods.",
            ],
            Language::Java => [
                "Explain the difference between an interface and an abstract class in Java.",
                "Write a Java method to check if a number is prime.",
                "What is the purpose of the 'static' keyword in Java?",
            ],
            Language::JavaScript => [
                "What is the difference between 'let', 'const', and 'var' in JavaScript?",
                "Write a function that debounces another function.",
                "Explain how promises work and what 'async/await' does.",
            ],
            Language::Html | Language::Css | Language::HtmlCss => [
                "Create a simple HTML page with a header, footer, and a main section.",
                "Write CSS to center a div both vertically and horizontally.",
                "Explain the difference between inline, inline-block, and block elements.",
            ],
        }
    }

    pub fn quick_tip(self) -> &'static str {
        match self {
            Language::Python => "Use list comprehensions and 'enumerate' to write clean loops, and always prefer 'with open(...)' for file handling.",
            Language::C => "Practice pointer arithmetic carefully and always free dynamically allocated memory to avoid leaks.",
            Language::Cpp => "Prefer std::vector over raw arrays, and initialize variables using brace initialization to avoid surprises.",
            Language::Java => "Keep your classes small and focused, and always program to interfaces rather than concrete implementations.",
            Language::JavaScript => "Avoid global variables, use 'const' and 'let', and keep async code readable with async/await.",
            Language::Html | Language::Css | Language::HtmlCss => "Use semantic HTML tags and keep your CSS modular with utility classes or BEM-style naming.",
        }
    }
}

pub struct TopicFollowUp;

impl Handler for TopicFollowUp {
    fn name(&self) -> &'static str {
        "topic_followup"
    }

    fn try_handle(&self, turn: &mut Turn<'_>) -> Result<Option<Reply>, DialogueError> {
        if turn.profile.favorite_subject_is("coding") {
            if let Some(reply) = coding_followup(turn) {
                return Ok(Some(reply));
            }
        }
        Ok(personalized(turn).map(Reply::from))
    }
}

fn coding_followup(turn: &mut Turn<'_>) -> Option<Reply> {
    match turn.profile.coding_followup {
        None => {
            let slot = if turn.lower.contains("practice question") {
                FollowUpSlot::Questions
            } else if turn.lower.contains("quick tip") {
                FollowUpSlot::QuickTip
            } else {
                return None;
            };
            turn.profile.coding_followup = Some(slot);
            turn.mark_dirty();
            let ask = match slot {
                FollowUpSlot::Questions => "Nice, let's practice coding! Which language? Python, C++, Java, JavaScript, or HTML/CSS?",
                FollowUpSlot::QuickTip => "Sure! For which language do you want a quick coding tip? Python, C++, Java, JavaScript, or HTML/CSS?",
            };
            Some(ask.into())
        }
        // Still waiting; other handlers may answer in the meantime.
        Some(slot) => {
            let lang = Language::detect(&turn.lower)?;
            turn.profile.coding_followup = None;
            turn.mark_dirty();
            let text = match slot {
                FollowUpSlot::Questions => format!(
                    "Here are some {} practice questions:\n- {}",
                    lang.label(),
                    lang.practice_questions().join("\n- ")
                ),
                FollowUpSlot::QuickTip => format!("Quick {} tip: {}", lang.label(), lang.quick_tip()),
            };
            Some(text.into())
        }
    }
}

fn personalized(turn: &Turn<'_>) -> Option<String> {
    let profile = &*turn.profile;
    let lower = &turn.lower;

    if ["how's your day", "hows your day", "how is your day"]
        .iter()
        .any(|k| lower.contains(k))
    {
        return Some(match &profile.name {
            Some(name) => format!("How's your day, {name}?"),
            None => "How's your day?".to_string(),
        });
    }
    if lower.contains("draw") {
        if let Some(hobby) = profile.hobbies.first() {
            return Some(format!(
                "Do you want to draw something today, {}? I know you like {hobby}!",
                profile.display_name()
            ));
        }
    }
    if let Some(fav) = &profile.favorite_subject {
        if !fav.is_empty() && lower.contains(&fav.to_lowercase()) {
            return Some(format!(
                "I like {fav} too! Want a quick tip or a practice question?"
            ));
        }
    }
    None
}
