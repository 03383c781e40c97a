//! Ramadan calendar logic.
//!
//! Pure date arithmetic behind the countdown, the "which day of Ramadan is
//! it" status and the progress banner. Nothing here reads the system clock;
//! callers pass `now` in.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use shared::{BannerStatus, CalendarWindowStatus, ProgressBanner, TimeRemaining};

/// Number of days at the end of the window that form the final phase
pub const FINAL_PHASE_DAYS: u32 = 10;

const MILLIS_PER_SECOND: i64 = 1_000;

/// Time left from `now` until `target`, clamped at zero once it has passed
pub fn time_remaining<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> TimeRemaining {
    let diff_ms = target
        .clone()
        .signed_duration_since(now.clone())
        .num_milliseconds()
        .max(0);
    let total_seconds = (diff_ms / MILLIS_PER_SECOND) as u64;

    TimeRemaining {
        days: total_seconds / 86_400,
        hours: (total_seconds / 3_600) % 24,
        minutes: (total_seconds / 60) % 60,
        seconds: total_seconds % 60,
    }
}

/// Where the calendar date of `now` falls in `[window_start, window_end_exclusive)`
///
/// Only the date part of `now` (in its own time zone) is compared; the time of
/// day never changes the result.
pub fn calendar_window_status<Tz: TimeZone>(
    window_start: NaiveDate,
    window_end_exclusive: NaiveDate,
    total_days: u32,
    now: &DateTime<Tz>,
) -> CalendarWindowStatus {
    let today = now.date_naive();

    if today < window_start || today >= window_end_exclusive {
        return CalendarWindowStatus {
            in_window: false,
            day_index: 0,
            total_days,
            is_final_phase: false,
        };
    }

    let day_index = (today - window_start).num_days() as u32 + 1;
    let final_phase_start = total_days.saturating_sub(FINAL_PHASE_DAYS - 1);

    CalendarWindowStatus {
        in_window: true,
        day_index,
        total_days,
        is_final_phase: day_index >= final_phase_start,
    }
}

/// Fixed dates the app counts towards and measures progress against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamadanCalendar {
    pub countdown_target: DateTime<Utc>,
    pub window_start: NaiveDate,
    /// First day after the window
    pub window_end_exclusive: NaiveDate,
    pub total_days: u32,
}

impl Default for RamadanCalendar {
    /// Ramadan 1447 AH: 18 February to 19 March 2026
    fn default() -> Self {
        Self {
            countdown_target: Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap(),
            window_start: NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(),
            window_end_exclusive: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            total_days: 30,
        }
    }
}

impl RamadanCalendar {
    pub fn time_remaining(&self, now: &DateTime<Utc>) -> TimeRemaining {
        time_remaining(&self.countdown_target, now)
    }

    pub fn window_status<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> CalendarWindowStatus {
        calendar_window_status(
            self.window_start,
            self.window_end_exclusive,
            self.total_days,
            now,
        )
    }

    /// Banner content for the current point in the year
    pub fn progress_banner(&self, now: &DateTime<Utc>) -> ProgressBanner {
        let window = self.window_status(now);

        if window.in_window {
            let days_left = self.total_days.saturating_sub(window.day_index);
            let subtitle = if window.is_final_phase {
                "The Last 10 Nights".to_string()
            } else {
                format!("{} days remaining", days_left)
            };
            let percent_complete = if self.total_days == 0 {
                100
            } else {
                (window.day_index * 100 / self.total_days).min(100)
            };

            return ProgressBanner {
                status: BannerStatus::Active,
                title: format!("Ramadan Day {} of {}", window.day_index, self.total_days),
                subtitle,
                percent_complete,
                window,
                countdown: None,
            };
        }

        if now.date_naive() < self.window_start {
            return ProgressBanner {
                status: BannerStatus::Upcoming,
                title: "Ramadan is coming".to_string(),
                subtitle: format!("Begins {}", self.window_start.format("%B %-d, %Y")),
                percent_complete: 0,
                window,
                countdown: self
                    .window_start_instant()
                    .map(|start| time_remaining(&start, now)),
            };
        }

        ProgressBanner {
            status: BannerStatus::Ended,
            title: "Ramadan has ended".to_string(),
            subtitle: "May your fasts and giving be accepted".to_string(),
            percent_complete: 100,
            window,
            countdown: None,
        }
    }

    fn window_start_instant(&self) -> Option<DateTime<Utc>> {
        self.window_start
            .and_hms_opt(0, 0, 0)
            .map(|midnight| Utc.from_utc_datetime(&midnight))
    }
}
