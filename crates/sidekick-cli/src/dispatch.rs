//! Keyword commands handled outside the dialogue chain.

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use sidekick_core::{CommandDispatcher, ReminderScheduler, TimerMode, TimerWorker};

static REMIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:remind me to|set reminder to)\s+(.+?)\s+at\s+(\S+(?:\s\S+)?)$").unwrap()
});
static TIMER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bstart (?:a )?(focus|break|mini)?\s*timer(?: for (\d+) ?(?:min|mins|minutes))?\b")
        .unwrap()
});

/// Routes reminder and timer phrases to the engine's components.
pub struct ChatDispatcher {
    timer: Arc<TimerWorker>,
    reminders: Arc<ReminderScheduler>,
}

impl ChatDispatcher {
    pub fn new(timer: Arc<TimerWorker>, reminders: Arc<ReminderScheduler>) -> Self {
        Self { timer, reminders }
    }
}

impl CommandDispatcher for ChatDispatcher {
    fn dispatch(&self, text: &str) -> Option<String> {
        let text = text.trim();
        let lower = text.to_lowercase();

        if lower.contains("remind me") || lower.contains("set reminder") {
            let Some(caps) = REMIND_RE.captures(text) else {
                return Some(
                    "Please include time with 'at'. Example: remind me to call mom at 19:30".into(),
                );
            };
            let Some(when) = parse_when(&caps[2], Local::now()) else {
                return Some(format!("Couldn't set reminder: unrecognised time '{}'", &caps[2]));
            };
            self.reminders.add(caps[1].to_string(), when);
            return Some(format!(
                "Reminder set for {}",
                when.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ));
        }

        if let Some(caps) = TIMER_RE.captures(&lower) {
            let mode = caps
                .get(1)
                .map_or(TimerMode::Focus, |m| TimerMode::normalize(m.as_str()));
            let minutes = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(25);
            self.timer.start(minutes.saturating_mul(60), mode);
            return Some(format!("{mode} timer started for {minutes} minutes."));
        }

        match lower.as_str() {
            "pause timer" => Some(if self.timer.pause() {
                "Timer paused.".into()
            } else {
                "No running timer to pause.".into()
            }),
            "resume timer" => Some(if self.timer.resume() {
                "Timer resumed.".into()
            } else {
                "No paused timer to resume.".into()
            }),
            "stop timer" => {
                self.timer.stop();
                Some("Timer stopped.".into())
            }
            _ => None,
        }
    }
}

/// Parse `HH:MM` (next occurrence, local time), `YYYY-MM-DD HH:MM`, or
/// RFC 3339.
pub fn parse_when(raw: &str, now: DateTime<Local>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|at| at.with_timezone(&Utc));
    }
    let time = NaiveTime::parse_from_str(raw, "%H:%M").ok()?;
    let mut when = Local
        .from_local_datetime(&now.date_naive().and_time(time))
        .earliest()?;
    if when < now {
        when += Duration::days(1);
    }
    Some(when.with_timezone(&Utc))
}
