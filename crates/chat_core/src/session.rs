use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{deserialize_utc, null_as_default};

/// Characters kept when a session title is derived from the first message.
pub const DEFAULT_TITLE_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_utc")]
    pub created_at: DateTime<Utc>,
}

/// Short title from the first message: at most `max_chars` characters,
/// trimmed and suffixed with `...` when cut.
pub fn derive_title(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionGroup {
    Today,
    Previous7Days,
    Previous30Days,
    Older,
}

impl SessionGroup {
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Previous7Days => "Previous 7 Days",
            Self::Previous30Days => "Previous 30 Days",
            Self::Older => "Older",
        }
    }

    pub fn classify(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if created_at.date_naive() == now.date_naive() {
            Self::Today
        } else if created_at > now - Duration::days(7) {
            Self::Previous7Days
        } else if created_at > now - Duration::days(30) {
            Self::Previous30Days
        } else {
            Self::Older
        }
    }
}

/// Sessions bucketed by age, newest first within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedSessions {
    pub today: Vec<ChatSession>,
    pub previous_7_days: Vec<ChatSession>,
    pub previous_30_days: Vec<ChatSession>,
    pub older: Vec<ChatSession>,
}

impl GroupedSessions {
    pub fn group(mut sessions: Vec<ChatSession>, now: DateTime<Utc>) -> Self {
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut grouped = Self::default();
        for session in sessions {
            match SessionGroup::classify(session.created_at, now) {
                SessionGroup::Today => grouped.today.push(session),
                SessionGroup::Previous7Days => grouped.previous_7_days.push(session),
                SessionGroup::Previous30Days => grouped.previous_30_days.push(session),
                SessionGroup::Older => grouped.older.push(session),
            }
        }
        grouped
    }

    /// Non-empty groups in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SessionGroup, &[ChatSession])> {
        [
            (SessionGroup::Today, self.today.as_slice()),
            (SessionGroup::Previous7Days, self.previous_7_days.as_slice()),
            (SessionGroup::Previous30Days, self.previous_30_days.as_slice()),
            (SessionGroup::Older, self.older.as_slice()),
        ]
        .into_iter()
        .filter(|(_, sessions)| !sessions.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(id: &str, created_at: DateTime<Utc>) -> ChatSession {
        ChatSession {
            session_id: id.to_string(),
            user_id: "u1".to_string(),
            title: id.to_string(),
            created_at,
        }
    }

    #[test]
    fn test_short_title_kept() {
        assert_eq!(derive_title("What is 2+2?", 50), "What is 2+2?");
    }

    #[test]
    fn test_long_title_cut_and_trimmed() {
        let text = "Explain the difference between ownership and borrowing in detail please";
        let title = derive_title(text, 50);
        assert!(title.ends_with("..."));
        assert_eq!(title, "Explain the difference between ownership and borro...");
    }

    #[test]
    fn test_title_trims_trailing_space_before_ellipsis() {
        assert_eq!(derive_title("hello world again", 6), "hello...");
    }

    #[test]
    fn test_title_counts_chars_not_bytes() {
        assert_eq!(derive_title("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_grouping_by_age() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let sessions = vec![
            session("old", now - Duration::days(90)),
            session("today-early", Utc.with_ymd_and_hms(2025, 6, 15, 1, 0, 0).unwrap()),
            session("today-late", Utc.with_ymd_and_hms(2025, 6, 15, 17, 0, 0).unwrap()),
            session("week", now - Duration::days(3)),
            session("month", now - Duration::days(20)),
        ];

        let grouped = GroupedSessions::group(sessions, now);
        let ids = |list: &[ChatSession]| list.iter().map(|s| s.session_id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&grouped.today), vec!["today-late", "today-early"]);
        assert_eq!(ids(&grouped.previous_7_days), vec!["week"]);
        assert_eq!(ids(&grouped.previous_30_days), vec!["month"]);
        assert_eq!(ids(&grouped.older), vec!["old"]);
        assert_eq!(grouped.iter().count(), 4);
    }

    #[test]
    fn test_decode_naive_created_at() {
        let session: ChatSession = serde_json::from_str(
            r#"{"session_id": "s1", "user_id": "u1", "title": null, "created_at": "2025-06-15T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(session.title, "");
        assert_eq!(
            session.created_at,
            Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
        );
    }
}
