//! Streak Engine
//!
//! Timezone-aware consecutive-day activity tracking with an optional grace
//! period. The engine stores nothing: every call takes the caller's prior
//! counts and returns a complete new state.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use education_core::{ensure_non_negative, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Missed days forgiven when the grace period is enabled
    pub grace_period_days: i64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            grace_period_days: 1,
        }
    }
}

impl StreakConfig {
    /// Largest gap in days after the last activity that keeps the streak alive
    pub fn allowed_gap(&self, grace_period: bool) -> i64 {
        if grace_period {
            1 + self.grace_period_days
        } else {
            1
        }
    }
}

/// How "today" relates to the last active date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapClass {
    FirstActivity,
    ActiveToday,
    Consecutive,
    Grace,
    Broken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: i64,
    pub max_streak: i64,
    pub last_active_date: Option<NaiveDate>,
    pub is_active_today: bool,
    pub streak_broken: bool,
    /// Negative once the streak has lapsed
    pub days_until_expiry: i64,
    pub timezone_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdateResult {
    pub previous_state: StreakState,
    pub updated_state: StreakState,
    pub streak_extended: bool,
    pub streak_reset: bool,
    pub is_new_record: bool,
}

/// Caller-held streak data, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakInput {
    pub current_streak: i64,
    pub max_streak: i64,
    pub last_active_date: Option<NaiveDate>,
    pub timezone_label: String,
    pub grace_period: bool,
}

impl StreakInput {
    pub fn new(
        current_streak: i64,
        max_streak: i64,
        last_active_date: Option<NaiveDate>,
        timezone_label: impl Into<String>,
        grace_period: bool,
    ) -> Result<Self, ValidationError> {
        ensure_non_negative("current_streak", current_streak)?;
        ensure_non_negative("max_streak", max_streak)?;
        if max_streak < current_streak {
            return Err(ValidationError::inconsistent(format!(
                "max_streak ({max_streak}) cannot be less than current_streak ({current_streak})."
            )));
        }

        Ok(Self {
            current_streak,
            max_streak,
            last_active_date,
            timezone_label: timezone_label.into(),
            grace_period,
        })
    }
}

/// Parse a `YYYY-MM-DD` date supplied by a caller.
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// IANA label to zone. Unknown labels fall back to UTC.
pub fn resolve_timezone(label: &str) -> Tz {
    match label.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            tracing::warn!("Unrecognised timezone '{}'; falling back to UTC.", label);
            Tz::UTC
        }
    }
}

/// `allowed_gap` comes from [`StreakConfig::allowed_gap`]; gaps between 2 and
/// it are forgiven.
pub fn classify_gap(last_active: Option<NaiveDate>, today: NaiveDate, allowed_gap: i64) -> GapClass {
    let Some(last) = last_active else {
        return GapClass::FirstActivity;
    };
    match (today - last).num_days() {
        0 => GapClass::ActiveToday,
        1 => GapClass::Consecutive,
        gap if (2..=allowed_gap).contains(&gap) => GapClass::Grace,
        // Includes last_active dates in the future
        _ => GapClass::Broken,
    }
}

#[derive(Clone)]
pub struct StreakEngine {
    config: StreakConfig,
    clock: Arc<dyn Clock>,
}

impl Default for StreakEngine {
    fn default() -> Self {
        Self::new(StreakConfig::default())
    }
}

impl std::fmt::Debug for StreakEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreakEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StreakEngine {
    pub fn new(config: StreakConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: StreakConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Current date in `timezone_label`
    pub fn today(&self, timezone_label: &str) -> NaiveDate {
        let tz = resolve_timezone(timezone_label);
        self.clock.now().with_timezone(&tz).date_naive()
    }

    /// Read-only projection of the caller's streak as of today.
    pub fn evaluate(&self, input: &StreakInput) -> StreakState {
        let today = self.today(&input.timezone_label);
        self.evaluate_on(input, today)
    }

    /// Record an activity for today. Repeat calls on the same day leave the
    /// counts unchanged.
    pub fn record_activity(&self, input: &StreakInput) -> StreakUpdateResult {
        let today = self.today(&input.timezone_label);
        self.record_on(input, today)
    }

    fn days_until_expiry(&self, last_active: Option<NaiveDate>, today: NaiveDate, grace: bool) -> i64 {
        match last_active {
            None => 0,
            Some(last) => {
                let latest_allowed = last + Duration::days(self.config.allowed_gap(grace));
                (latest_allowed - today).num_days()
            }
        }
    }

    pub fn evaluate_on(&self, input: &StreakInput, today: NaiveDate) -> StreakState {
        let class = classify_gap(
            input.last_active_date,
            today,
            self.config.allowed_gap(input.grace_period),
        );
        let broken = class == GapClass::Broken;
        let effective = if broken { 0 } else { input.current_streak };

        tracing::debug!(
            "Streak status: classification={:?} current={} max={} today={} last_active={:?}",
            class,
            effective,
            input.max_streak,
            today,
            input.last_active_date
        );

        StreakState {
            current_streak: effective,
            max_streak: input.max_streak,
            last_active_date: input.last_active_date,
            is_active_today: class == GapClass::ActiveToday,
            streak_broken: broken,
            days_until_expiry: self.days_until_expiry(input.last_active_date, today, input.grace_period),
            timezone_label: input.timezone_label.clone(),
        }
    }

    pub fn record_on(&self, input: &StreakInput, today: NaiveDate) -> StreakUpdateResult {
        let previous_state = self.evaluate_on(input, today);
        let class = classify_gap(
            input.last_active_date,
            today,
            self.config.allowed_gap(input.grace_period),
        );

        let (new_streak, extended, reset) = match class {
            GapClass::ActiveToday => {
                tracing::debug!(
                    "Activity already recorded today; streak unchanged at {}.",
                    input.current_streak
                );
                (input.current_streak, false, false)
            }
            GapClass::Consecutive | GapClass::Grace | GapClass::FirstActivity => {
                let next = input.current_streak + 1;
                tracing::debug!(
                    "Streak extended: {} -> {} (classification={:?})",
                    input.current_streak,
                    next,
                    class
                );
                (next, true, false)
            }
            GapClass::Broken => {
                tracing::info!(
                    "Streak broken and reset to 1. Previous streak: {}, last active: {:?}",
                    input.current_streak,
                    input.last_active_date
                );
                (1, false, true)
            }
        };

        let updated_state = StreakState {
            current_streak: new_streak,
            max_streak: input.max_streak.max(new_streak),
            last_active_date: Some(today),
            is_active_today: true,
            streak_broken: false,
            days_until_expiry: self.config.allowed_gap(input.grace_period),
            timezone_label: input.timezone_label.clone(),
        };

        StreakUpdateResult {
            previous_state,
            updated_state,
            streak_extended: extended,
            streak_reset: reset,
            is_new_record: new_streak > input.max_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn engine_at(y: i32, m: u32, d: u32, h: u32) -> StreakEngine {
        let now = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        StreakEngine::with_clock(StreakConfig::default(), Arc::new(FixedClock(now)))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(current: i64, max: i64, last: Option<NaiveDate>, grace: bool) -> StreakInput {
        StreakInput::new(current, max, last, "UTC", grace).unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(StreakInput::new(-1, 5, None, "UTC", false).is_err());
        assert!(StreakInput::new(0, -1, None, "UTC", false).is_err());
        let err = StreakInput::new(6, 5, None, "UTC", false).unwrap_err();
        assert!(err.to_string().contains("max_streak (5)"));
    }

    #[test]
    fn test_gap_classification() {
        let today = date(2024, 3, 10);
        assert_eq!(classify_gap(None, today, 1), GapClass::FirstActivity);
        assert_eq!(classify_gap(Some(today), today, 1), GapClass::ActiveToday);
        assert_eq!(classify_gap(Some(date(2024, 3, 9)), today, 1), GapClass::Consecutive);
        assert_eq!(classify_gap(Some(date(2024, 3, 8)), today, 2), GapClass::Grace);
        assert_eq!(classify_gap(Some(date(2024, 3, 8)), today, 1), GapClass::Broken);
        assert_eq!(classify_gap(Some(date(2024, 3, 7)), today, 2), GapClass::Broken);
        assert_eq!(classify_gap(Some(date(2024, 3, 11)), today, 2), GapClass::Broken);
    }

    #[test]
    fn test_evaluate_reports_broken_streak_as_zero() {
        let engine = engine_at(2024, 3, 10, 12);
        let state = engine.evaluate(&input(8, 12, Some(date(2024, 3, 6)), false));
        assert!(state.streak_broken);
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.max_streak, 12);
        assert_eq!(state.days_until_expiry, -3);
    }

    #[test]
    fn test_evaluate_expiry_window() {
        let engine = engine_at(2024, 3, 10, 12);
        let state = engine.evaluate(&input(3, 3, Some(date(2024, 3, 10)), true));
        assert!(state.is_active_today);
        assert_eq!(state.days_until_expiry, 2);

        let state = engine.evaluate(&input(3, 3, Some(date(2024, 3, 9)), false));
        assert!(!state.is_active_today);
        assert_eq!(state.days_until_expiry, 0);

        let state = engine.evaluate(&input(0, 0, None, true));
        assert_eq!(state.days_until_expiry, 0);
        assert!(!state.streak_broken);
    }

    #[test]
    fn test_record_is_idempotent_within_a_day() {
        let engine = engine_at(2024, 3, 10, 12);
        let first = engine.record_activity(&input(4, 9, Some(date(2024, 3, 9)), false));
        assert_eq!(first.updated_state.current_streak, 5);
        assert!(first.streak_extended);

        let updated = &first.updated_state;
        let second = engine.record_activity(&input(
            updated.current_streak,
            updated.max_streak,
            updated.last_active_date,
            false,
        ));
        assert_eq!(second.updated_state.current_streak, 5);
        assert!(!second.streak_extended);
        assert!(!second.streak_reset);
        assert!(!second.is_new_record);
    }

    #[test]
    fn test_grace_period_extends_instead_of_reset() {
        let engine = engine_at(2024, 3, 10, 12);
        let two_days_ago = Some(date(2024, 3, 8));

        let with_grace = engine.record_activity(&input(5, 5, two_days_ago, true));
        assert_eq!(with_grace.updated_state.current_streak, 6);
        assert!(with_grace.streak_extended);
        assert!(!with_grace.streak_reset);
        assert!(with_grace.is_new_record);
        assert_eq!(with_grace.updated_state.max_streak, 6);
        assert_eq!(with_grace.updated_state.days_until_expiry, 2);

        let without = engine.record_activity(&input(5, 5, two_days_ago, false));
        assert_eq!(without.updated_state.current_streak, 1);
        assert!(without.streak_reset);
        assert!(!without.streak_extended);
        assert_eq!(without.updated_state.max_streak, 5);
        assert_eq!(without.updated_state.days_until_expiry, 1);
        assert!(without.previous_state.streak_broken);
    }

    #[test]
    fn test_longer_grace_period_is_honoured() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap();
        let config = StreakConfig {
            grace_period_days: 2,
        };
        let engine = StreakEngine::with_clock(config, Arc::new(FixedClock(now)));
        let last = Some(date(2026, 3, 1));

        let state = engine.evaluate(&input(4, 4, last, true));
        assert!(!state.streak_broken);
        assert_eq!(state.current_streak, 4);
        assert_eq!(state.days_until_expiry, 0);

        let recorded = engine.record_activity(&input(4, 4, last, true));
        assert!(recorded.streak_extended);
        assert_eq!(recorded.updated_state.current_streak, 5);
        assert_eq!(recorded.updated_state.days_until_expiry, 3);

        let lapsed = engine.evaluate(&input(4, 4, Some(date(2026, 2, 28)), true));
        assert!(lapsed.streak_broken);
        assert_eq!(lapsed.days_until_expiry, -1);

        let without_grace = engine.evaluate(&input(4, 4, last, false));
        assert!(without_grace.streak_broken);
    }

    #[test]
    fn test_first_activity() {
        let engine = engine_at(2024, 3, 10, 12);
        let result = engine.record_activity(&input(0, 0, None, false));
        assert_eq!(result.updated_state.current_streak, 1);
        assert_eq!(result.updated_state.last_active_date, Some(date(2024, 3, 10)));
        assert!(result.streak_extended);
        assert!(result.is_new_record);
    }

    #[test]
    fn test_today_follows_timezone() {
        // 02:00 UTC on the 10th is still the 9th in New York
        let engine = engine_at(2024, 3, 10, 2);
        assert_eq!(engine.today("America/New_York"), date(2024, 3, 9));
        assert_eq!(engine.today("UTC"), date(2024, 3, 10));
        assert_eq!(engine.today("Mars/Olympus_Mons"), date(2024, 3, 10));

        let ny = StreakInput::new(2, 2, Some(date(2024, 3, 9)), "America/New_York", false).unwrap();
        assert!(engine.evaluate(&ny).is_active_today);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("d", "2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(matches!(
            parse_iso_date("last_active_date", "29/02/2024"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_state_serializes_iso_dates() {
        let engine = engine_at(2024, 3, 10, 12);
        let state = engine.evaluate(&input(1, 1, Some(date(2024, 3, 9)), false));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["last_active_date"], "2024-03-09");
        assert_eq!(json["timezone_label"], "UTC");
    }
}
