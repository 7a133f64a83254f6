//! Session record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Phase;
use crate::error::PomoError;

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Database ID
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// When the session began
    pub start_time: DateTime<Utc>,
    /// When the session ended, if it has
    pub end_time: Option<DateTime<Utc>>,
    /// Length of the session in seconds
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
    /// Which phase this session was
    pub mode: Phase,
    /// Whether the session ran to completion
    pub completed: bool,
    /// Rounds completed when the record was written
    pub rounds: u32,
    /// Free-form notes
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether this record counts towards streaks.
    #[must_use]
    pub fn is_completed_work(&self) -> bool {
        self.completed && self.mode == Phase::Work
    }
}

/// Input for creating a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub start_time: DateTime<Utc>,
    pub duration_seconds: u32,
    pub mode: Phase,
    pub notes: Option<String>,
}

impl NewSession {
    /// Check the session before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::InvalidInput` if the duration is zero.
    pub fn validate(&self) -> Result<(), PomoError> {
        if self.duration_seconds < 1 {
            return Err(PomoError::InvalidInput(
                "Duration must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input for finishing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteSession {
    pub end_time: DateTime<Utc>,
    pub completed: bool,
    /// Replaces the existing notes when set
    pub notes: Option<String>,
}

/// Paging and filter options for listing sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionQuery {
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub limit: u32,
    pub mode: Option<Phase>,
    pub completed: Option<bool>,
}

impl Default for SessionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            mode: None,
            completed: None,
        }
    }
}

impl SessionQuery {
    /// # Errors
    ///
    /// Returns `PomoError::InvalidInput` if `page` or `limit` is zero.
    pub fn validate(&self) -> Result<(), PomoError> {
        if self.page < 1 {
            return Err(PomoError::InvalidInput("Page must be at least 1".to_string()));
        }
        if self.limit < 1 {
            return Err(PomoError::InvalidInput("Limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// One page of sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPage {
    pub sessions: Vec<SessionRecord>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total: u64,
}

/// Filter for loading a user's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub mode: Option<Phase>,
    pub completed: Option<bool>,
    /// Only records starting at or after this time
    pub since: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    /// Completed Work sessions only.
    #[must_use]
    pub const fn completed_work() -> Self {
        Self {
            mode: Some(Phase::Work),
            completed: Some(true),
            since: None,
        }
    }

    /// Completed sessions of any phase starting at or after `since`.
    #[must_use]
    pub const fn completed_since(since: DateTime<Utc>) -> Self {
        Self {
            mode: None,
            completed: Some(true),
            since: Some(since),
        }
    }
}

/// A user's decoded session history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHistory {
    pub records: Vec<SessionRecord>,
    /// Stored rows that could not be decoded
    pub invalid: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(mode: Phase, completed: bool) -> SessionRecord {
        let t = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        SessionRecord {
            id: 1,
            user_id: "ada".to_string(),
            start_time: t,
            end_time: None,
            duration_seconds: 1500,
            mode,
            completed,
            rounds: 0,
            notes: None,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn test_is_completed_work() {
        assert!(record(Phase::Work, true).is_completed_work());
        assert!(!record(Phase::Work, false).is_completed_work());
        assert!(!record(Phase::Break, true).is_completed_work());
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(record(Phase::LongBreak, true)).unwrap();
        assert_eq!(json["userId"], "ada");
        assert_eq!(json["duration"], 1500);
        assert_eq!(json["mode"], "longBreak");
        assert_eq!(json["startTime"], "2024-03-10T09:00:00Z");
    }

    #[test]
    fn test_new_session_rejects_zero_duration() {
        let session = NewSession {
            start_time: Utc::now(),
            duration_seconds: 0,
            mode: Phase::Work,
            notes: None,
        };
        assert!(matches!(session.validate(), Err(PomoError::InvalidInput(_))));
    }

    #[test]
    fn test_query_validation() {
        assert!(SessionQuery::default().validate().is_ok());
        let bad_page = SessionQuery { page: 0, ..SessionQuery::default() };
        assert!(bad_page.validate().is_err());
        let bad_limit = SessionQuery { limit: 0, ..SessionQuery::default() };
        assert!(bad_limit.validate().is_err());
    }
}
