// Earnings bucket planning
//
// Every window is [start, end) in UTC, with day boundaries taken at local
// midnight in the venue offset. Labels are what the dashboard shows.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Granularity of a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BucketUnit {
    Day,
    Week,
    Month,
}

/// A labelled time window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarningsWindow {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Windows of one breakdown plus their unit
#[derive(Debug, Clone)]
pub struct BucketPlan {
    pub unit: BucketUnit,
    pub windows: Vec<EarningsWindow>,
}

impl BucketPlan {
    /// Start instants of every window, in order
    pub fn starts(&self) -> Vec<DateTime<Utc>> {
        self.windows.iter().map(|w| w.start).collect()
    }

    pub fn ends(&self) -> Vec<DateTime<Utc>> {
        self.windows.iter().map(|w| w.end).collect()
    }
}

/// Local midnight of `date` in `offset`, as a UTC instant
pub fn day_start(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(local - Duration::seconds(offset.local_minus_utc() as i64)))
}

fn local_today(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

fn window(label: String, start: DateTime<Utc>, end: DateTime<Utc>) -> EarningsWindow {
    EarningsWindow { label, start, end }
}

/// Seven calendar days ending today, oldest first
///
/// Labelled `Today`, `Yesterday`, then e.g. `Mon, Jun 2`.
pub fn last_7_days(now: DateTime<Utc>, offset: FixedOffset) -> BucketPlan {
    let today = local_today(now, offset);
    let windows = (0..7i64)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            let label = match days_back {
                0 => "Today".to_string(),
                1 => "Yesterday".to_string(),
                _ => date.format("%a, %b %-d").to_string(),
            };
            window(
                label,
                day_start(date, offset),
                day_start(date + Duration::days(1), offset),
            )
        })
        .collect();

    BucketPlan {
        unit: BucketUnit::Day,
        windows,
    }
}

/// Sunday of the current week through today, one window per day
pub fn current_week(now: DateTime<Utc>, offset: FixedOffset) -> BucketPlan {
    let today = local_today(now, offset);
    let days_since_sunday = today.weekday().num_days_from_sunday() as i64;
    let sunday = today - Duration::days(days_since_sunday);

    let windows = (0..=days_since_sunday)
        .map(|i| {
            let date = sunday + Duration::days(i);
            window(
                date.format("%A").to_string(),
                day_start(date, offset),
                day_start(date + Duration::days(1), offset),
            )
        })
        .collect();

    BucketPlan {
        unit: BucketUnit::Day,
        windows,
    }
}

/// Five Sunday-started weeks, the last one being this week capped at now
pub fn last_5_weeks(now: DateTime<Utc>, offset: FixedOffset) -> BucketPlan {
    let today = local_today(now, offset);
    let sunday = today - Duration::days(today.weekday().num_days_from_sunday() as i64);

    let windows = (0..5i64)
        .rev()
        .map(|weeks_back| {
            let week_start = sunday - Duration::weeks(weeks_back);
            let mut end = day_start(week_start + Duration::weeks(1), offset);
            let label = match weeks_back {
                0 => {
                    end = end.min(now);
                    "This Week".to_string()
                }
                1 => "1 Week Ago".to_string(),
                n => format!("{} Weeks Ago", n),
            };
            window(label, day_start(week_start, offset), end)
        })
        .collect();

    BucketPlan {
        unit: BucketUnit::Week,
        windows,
    }
}

/// The current month in 7-day blocks from the 1st
///
/// Blocks starting after today are left out and the last block ends at now.
pub fn this_month(now: DateTime<Utc>, offset: FixedOffset) -> BucketPlan {
    let today = local_today(now, offset);
    let first = today.with_day(1).unwrap_or(today);
    let next_month = first_of_next_month(first);

    let mut windows = Vec::new();
    let mut block_start = first;
    let mut week = 1;
    while block_start <= today {
        let block_end = (block_start + Duration::weeks(1)).min(next_month);
        windows.push(window(
            format!("Week {}", week),
            day_start(block_start, offset),
            day_start(block_end, offset).min(now),
        ));
        block_start += Duration::weeks(1);
        week += 1;
    }

    BucketPlan {
        unit: BucketUnit::Week,
        windows,
    }
}

/// January through the current month, one full month each
pub fn this_year(now: DateTime<Utc>, offset: FixedOffset) -> BucketPlan {
    let today = local_today(now, offset);

    let windows = (1..=today.month())
        .filter_map(|month| NaiveDate::from_ymd_opt(today.year(), month, 1))
        .map(|first| {
            window(
                first.format("%B").to_string(),
                day_start(first, offset),
                day_start(first_of_next_month(first), offset),
            )
        })
        .collect();

    BucketPlan {
        unit: BucketUnit::Month,
        windows,
    }
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first + Duration::days(31))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn labels(plan: &BucketPlan) -> Vec<&str> {
        plan.windows.iter().map(|w| w.label.as_str()).collect()
    }

    #[test]
    fn test_last_7_days_labels() {
        // Wednesday
        let plan = last_7_days(at(2025, 6, 4, 15, 30), utc());
        assert_eq!(
            labels(&plan),
            vec![
                "Thu, May 29",
                "Fri, May 30",
                "Sat, May 31",
                "Sun, Jun 1",
                "Mon, Jun 2",
                "Yesterday",
                "Today"
            ]
        );
        assert_eq!(plan.unit, BucketUnit::Day);
        assert_eq!(plan.windows[6].start, at(2025, 6, 4, 0, 0));
        assert_eq!(plan.windows[6].end, at(2025, 6, 5, 0, 0));
    }

    #[test]
    fn test_windows_are_contiguous() {
        let plan = last_7_days(at(2025, 6, 4, 15, 30), utc());
        for pair in plan.windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_current_week_runs_sunday_to_today() {
        let plan = current_week(at(2025, 6, 4, 9, 0), utc());
        assert_eq!(labels(&plan), vec!["Sunday", "Monday", "Tuesday", "Wednesday"]);
        assert_eq!(plan.windows[0].start, at(2025, 6, 1, 0, 0));

        let sunday = current_week(at(2025, 6, 1, 9, 0), utc());
        assert_eq!(labels(&sunday), vec!["Sunday"]);
    }

    #[test]
    fn test_last_5_weeks() {
        let now = at(2025, 6, 4, 9, 0);
        let plan = last_5_weeks(now, utc());
        assert_eq!(
            labels(&plan),
            vec!["4 Weeks Ago", "3 Weeks Ago", "2 Weeks Ago", "1 Week Ago", "This Week"]
        );
        assert_eq!(plan.windows[0].start, at(2025, 5, 4, 0, 0));
        assert_eq!(plan.windows[3].end, at(2025, 6, 1, 0, 0));
        assert_eq!(plan.windows[4].end, now);
    }

    #[test]
    fn test_this_month_blocks() {
        let now = at(2025, 6, 16, 12, 0);
        let plan = this_month(now, utc());
        assert_eq!(labels(&plan), vec!["Week 1", "Week 2", "Week 3"]);
        assert_eq!(plan.windows[1].start, at(2025, 6, 8, 0, 0));
        assert_eq!(plan.windows[2].start, at(2025, 6, 15, 0, 0));
        assert_eq!(plan.windows[2].end, now);
    }

    #[test]
    fn test_this_month_last_block_stops_at_month_end() {
        let now = at(2025, 6, 30, 20, 0);
        let plan = this_month(now, utc());
        assert_eq!(plan.windows.len(), 5);
        assert_eq!(plan.windows[4].start, at(2025, 6, 29, 0, 0));
        assert_eq!(plan.windows[4].end, now);
    }

    #[test]
    fn test_this_year_months() {
        let plan = this_year(at(2025, 3, 10, 8, 0), utc());
        assert_eq!(labels(&plan), vec!["January", "February", "March"]);
        assert_eq!(plan.windows[1].end, at(2025, 3, 1, 0, 0));
        assert_eq!(plan.windows[2].end, at(2025, 4, 1, 0, 0));
        assert_eq!(plan.unit, BucketUnit::Month);
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let plan = this_year(at(2025, 12, 31, 23, 0), utc());
        assert_eq!(plan.windows.len(), 12);
        assert_eq!(plan.windows[11].end, at(2026, 1, 1, 0, 0));
    }

    #[test]
    fn test_day_boundaries_follow_venue_offset() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // 20:00 UTC on June 3 is already June 4 in IST
        let plan = last_7_days(at(2025, 6, 3, 20, 0), ist);
        let today = &plan.windows[6];
        assert_eq!(today.label, "Today");
        assert_eq!(today.start, at(2025, 6, 3, 18, 30));
        assert_eq!(today.end, at(2025, 6, 4, 18, 30));
    }
}
