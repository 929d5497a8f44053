use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    Break,
    Mini,
    ShortFocus,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::Break => "break",
            TimerMode::Mini => "mini",
            TimerMode::ShortFocus => "shortFocus",
        }
    }

    /// Lenient parse; anything unrecognised becomes `Focus`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "break" | "rest" => TimerMode::Break,
            "mini" => TimerMode::Mini,
            "shortfocus" => TimerMode::ShortFocus,
            _ => TimerMode::Focus,
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the shared countdown.
///
/// Invariants: `remaining_seconds <= total_seconds`; when `active` is false
/// both are zero; when `active` is true `total_seconds > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Option<TimerMode>,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub active: bool,
    pub paused: bool,
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerState {
    pub fn empty() -> Self {
        Self {
            mode: None,
            total_seconds: 0,
            remaining_seconds: 0,
            active: false,
            paused: false,
            started_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active && !self.paused
    }

    /// 0.0 .. 1.0 progress through the current run.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_seconds as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_camel_case() {
        let json = serde_json::to_string(&TimerMode::ShortFocus).unwrap();
        assert_eq!(json, "\"shortFocus\"");
        let back: TimerMode = serde_json::from_str("\"break\"").unwrap();
        assert_eq!(back, TimerMode::Break);
    }

    #[test]
    fn normalize_falls_back_to_focus() {
        assert_eq!(TimerMode::normalize("short_focus"), TimerMode::ShortFocus);
        assert_eq!(TimerMode::normalize("MINI"), TimerMode::Mini);
        assert_eq!(TimerMode::normalize("pomodoro"), TimerMode::Focus);
        assert_eq!(TimerMode::normalize(""), TimerMode::Focus);
    }

    #[test]
    fn progress_is_clamped() {
        let mut st = TimerState::empty();
        assert_eq!(st.progress(), 0.0);
        st.total_seconds = 10;
        st.remaining_seconds = 5;
        assert!((st.progress() - 0.5).abs() < f64::EPSILON);
        st.remaining_seconds = 0;
        assert_eq!(st.progress(), 1.0);
    }
}
