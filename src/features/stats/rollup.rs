//! Per-period totals of completed sessions.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Local, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::core::Phase;
use crate::features::sessions::SessionRecord;

/// Size of a rollup period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// `strftime` pattern of the period key. Weekly keys use the ISO week
    /// and its ISO year, so they sort correctly across new year.
    #[must_use]
    pub const fn key_format(self) -> &'static str {
        match self {
            Self::Daily => "%Y-%m-%d",
            Self::Weekly => "%G-W%V",
            Self::Monthly => "%Y-%m",
        }
    }

    /// Key of the period containing `ts`, in `ts`'s timezone.
    #[must_use]
    pub fn period_key<Tz: TimeZone>(self, ts: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        ts.format(self.key_format()).to_string()
    }

    /// Start of the default trailing window ending at `now`:
    /// 7 days, 28 days or 12 months.
    #[must_use]
    pub fn window_start<Tz: TimeZone>(self, now: &DateTime<Tz>) -> DateTime<Utc> {
        self.window_start_with(now, &StatsConfig::default())
    }

    /// Start of the trailing window configured in `config`.
    #[must_use]
    pub fn window_start_with<Tz: TimeZone>(
        self,
        now: &DateTime<Tz>,
        config: &StatsConfig,
    ) -> DateTime<Utc> {
        let now = now.with_timezone(&Utc);
        match self {
            Self::Daily => now - Duration::days(i64::from(config.daily_window_days)),
            Self::Weekly => now - Duration::days(i64::from(config.weekly_window_days)),
            Self::Monthly => now
                .checked_sub_months(Months::new(config.monthly_window_months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Totals for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    /// Period key, e.g. `2024-03-10`, `2024-W10`, `2024-03`
    #[serde(rename = "_id")]
    pub period: String,
    pub work_sessions: u32,
    /// Seconds of work
    pub work_time: u64,
    /// Seconds of Break and LongBreak
    pub break_time: u64,
    pub total_sessions: u32,
}

/// Completed sessions grouped by period, oldest period first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rollup {
    pub granularity: Granularity,
    pub window_start: DateTime<Utc>,
    pub periods: Vec<PeriodTotals>,
    /// Records ignored as malformed
    pub skipped: usize,
}

impl Rollup {
    /// Sum of all periods.
    #[must_use]
    pub fn totals(&self) -> PeriodTotals {
        self.periods.iter().fold(
            PeriodTotals {
                period: "total".to_string(),
                ..PeriodTotals::default()
            },
            |mut acc, p| {
                acc.work_sessions += p.work_sessions;
                acc.work_time += p.work_time;
                acc.break_time += p.break_time;
                acc.total_sessions += p.total_sessions;
                acc
            },
        )
    }
}

/// Roll up completed sessions by local calendar period.
///
/// See [`compute_rollup_in`].
#[must_use]
pub fn compute_rollup(
    records: &[SessionRecord],
    granularity: Granularity,
    window_start: DateTime<Utc>,
) -> Rollup {
    compute_rollup_in(records, granularity, window_start, &Local)
}

/// Roll up completed sessions starting at or after `window_start`, keyed by
/// period in `tz`. Input order does not matter. Zero-duration records are
/// skipped and counted.
#[must_use]
pub fn compute_rollup_in<Tz: TimeZone>(
    records: &[SessionRecord],
    granularity: Granularity,
    window_start: DateTime<Utc>,
    tz: &Tz,
) -> Rollup
where
    Tz::Offset: fmt::Display,
{
    let mut groups: BTreeMap<String, PeriodTotals> = BTreeMap::new();
    let mut skipped = 0;

    for record in records
        .iter()
        .filter(|r| r.completed && r.start_time >= window_start)
    {
        if record.duration_seconds == 0 {
            skipped += 1;
            continue;
        }

        let key = granularity.period_key(&record.start_time.with_timezone(tz));
        let totals = groups.entry(key).or_insert_with_key(|k| PeriodTotals {
            period: k.clone(),
            ..PeriodTotals::default()
        });

        let seconds = u64::from(record.duration_seconds);
        match record.mode {
            Phase::Work => {
                totals.work_sessions += 1;
                totals.work_time += seconds;
            }
            Phase::Break | Phase::LongBreak => totals.break_time += seconds,
        }
        totals.total_sessions += 1;
    }

    Rollup {
        granularity,
        window_start,
        periods: groups.into_values().collect(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(start: DateTime<Utc>, mode: Phase, seconds: u32, completed: bool) -> SessionRecord {
        SessionRecord {
            id: 0,
            user_id: "ada".to_string(),
            start_time: start,
            end_time: None,
            duration_seconds: seconds,
            mode,
            completed,
            rounds: 0,
            notes: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_daily_single_day() {
        let day = noon(2024, 3, 10);
        let records = vec![
            session(day, Phase::Work, 1500, true),
            session(day, Phase::Work, 1500, true),
            session(day, Phase::Break, 300, true),
        ];

        let rollup = compute_rollup_in(&records, Granularity::Daily, epoch(), &Utc);
        assert_eq!(
            rollup.periods,
            vec![PeriodTotals {
                period: "2024-03-10".to_string(),
                work_sessions: 2,
                work_time: 3000,
                break_time: 300,
                total_sessions: 3,
            }]
        );
        assert_eq!(rollup.skipped, 0);
    }

    #[test]
    fn test_incomplete_and_out_of_window_excluded() {
        let records = vec![
            session(noon(2024, 3, 10), Phase::Work, 1500, false),
            session(noon(2024, 3, 1), Phase::Work, 1500, true),
            session(noon(2024, 3, 9), Phase::LongBreak, 900, true),
        ];

        let rollup = compute_rollup_in(&records, Granularity::Daily, noon(2024, 3, 5), &Utc);
        assert_eq!(rollup.periods.len(), 1);
        assert_eq!(rollup.periods[0].period, "2024-03-09");
        assert_eq!(rollup.periods[0].break_time, 900);
        assert_eq!(rollup.periods[0].work_sessions, 0);
    }

    #[test]
    fn test_periods_sorted_ascending() {
        let records = vec![
            session(noon(2024, 3, 10), Phase::Work, 60, true),
            session(noon(2024, 3, 8), Phase::Work, 60, true),
            session(noon(2024, 3, 9), Phase::Work, 60, true),
        ];
        let rollup = compute_rollup_in(&records, Granularity::Daily, epoch(), &Utc);
        let keys: Vec<_> = rollup.periods.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(keys, ["2024-03-08", "2024-03-09", "2024-03-10"]);
    }

    #[test]
    fn test_sum_of_sessions_is_preserved() {
        let records = vec![
            session(noon(2024, 1, 30), Phase::Work, 1500, true),
            session(noon(2024, 2, 2), Phase::Break, 300, true),
            session(noon(2024, 2, 20), Phase::Work, 1200, true),
            session(noon(2024, 3, 4), Phase::LongBreak, 900, true),
        ];

        for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            let totals = compute_rollup_in(&records, granularity, epoch(), &Utc).totals();
            assert_eq!(totals.total_sessions, 4);
            assert_eq!(totals.work_time, 2700);
            assert_eq!(totals.break_time, 1200);
        }
    }

    #[test]
    fn test_weekly_uses_iso_year() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025
        let records = vec![
            session(noon(2024, 12, 30), Phase::Work, 60, true),
            session(noon(2024, 12, 27), Phase::Work, 60, true),
        ];
        let rollup = compute_rollup_in(&records, Granularity::Weekly, epoch(), &Utc);
        let keys: Vec<_> = rollup.periods.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(keys, ["2024-W52", "2025-W01"]);
    }

    #[test]
    fn test_monthly_keys() {
        let records = vec![
            session(noon(2024, 2, 29), Phase::Work, 60, true),
            session(noon(2024, 2, 1), Phase::Work, 60, true),
            session(noon(2024, 3, 1), Phase::Work, 60, true),
        ];
        let rollup = compute_rollup_in(&records, Granularity::Monthly, epoch(), &Utc);
        assert_eq!(rollup.periods.len(), 2);
        assert_eq!(rollup.periods[0].period, "2024-02");
        assert_eq!(rollup.periods[0].work_sessions, 2);
    }

    #[test]
    fn test_zero_duration_skipped() {
        let records = vec![
            session(noon(2024, 3, 10), Phase::Work, 0, true),
            session(noon(2024, 3, 10), Phase::Work, 60, true),
        ];
        let rollup = compute_rollup_in(&records, Granularity::Daily, epoch(), &Utc);
        assert_eq!(rollup.periods[0].work_sessions, 1);
        assert_eq!(rollup.skipped, 1);
    }

    #[test]
    fn test_empty_input() {
        let rollup = compute_rollup_in(&[], Granularity::Monthly, epoch(), &Utc);
        assert!(rollup.periods.is_empty());
        assert_eq!(rollup.totals().total_sessions, 0);
    }

    #[test]
    fn test_default_windows() {
        let now = noon(2024, 3, 31);
        assert_eq!(Granularity::Daily.window_start(&now), noon(2024, 3, 24));
        assert_eq!(Granularity::Weekly.window_start(&now), noon(2024, 3, 3));
        assert_eq!(Granularity::Monthly.window_start(&now), noon(2023, 3, 31));
    }

    #[test]
    fn test_configured_windows() {
        let now = noon(2024, 3, 31);
        let config = StatsConfig {
            daily_window_days: 1,
            weekly_window_days: 14,
            monthly_window_months: 1,
        };
        assert_eq!(Granularity::Daily.window_start_with(&now, &config), noon(2024, 3, 30));
        assert_eq!(Granularity::Weekly.window_start_with(&now, &config), noon(2024, 3, 17));
        // Clamped to the end of February
        assert_eq!(Granularity::Monthly.window_start_with(&now, &config), noon(2024, 2, 29));
    }

    #[test]
    fn test_period_json_shape() {
        let totals = PeriodTotals {
            period: "2024-03".to_string(),
            work_sessions: 1,
            work_time: 1500,
            break_time: 0,
            total_sessions: 1,
        };
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["_id"], "2024-03");
        assert_eq!(json["workSessions"], 1);
        assert_eq!(json["workTime"], 1500);
        assert_eq!(json["totalSessions"], 1);
    }
}
