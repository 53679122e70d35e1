//! Aggregated ride statistics.

use super::Ride;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use clap::ValueEnum;
use std::collections::BTreeMap;

/// Weekday names, Monday first.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Time window to aggregate statistics over.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatsRange {
    /// Since midnight today.
    Day,
    /// Since Monday this week.
    Week,
    /// Since the first of this month.
    Month,
    /// All rides.
    #[default]
    All,
}

impl StatsRange {
    /// Returns the start of the window ending at `now`; `None` means
    /// unbounded.
    ///
    /// Windows are computed on the UTC calendar, so the aggregation is
    /// independent of the host timezone.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let start_day = match self {
            StatsRange::Day => today,
            StatsRange::Week => {
                today - Duration::days(today.weekday().num_days_from_monday() as i64)
            }
            StatsRange::Month => today.with_day(1).unwrap(),
            StatsRange::All => return None,
        };
        Some(start_day.and_hms_opt(0, 0, 0).unwrap().and_utc())
    }
}

/// Daily aggregation bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayBucket {
    /// Calendar day of the bucket.
    pub day: NaiveDate,
    /// Total distance, in meters.
    pub distance_meters: u64,
    /// Total moving time, in seconds.
    pub duration_seconds: u64,
    /// Number of rides.
    pub rides: usize,
}

impl DayBucket {
    /// Returns the axis label for this bucket, e.g. `3 Aug`.
    pub fn label(&self) -> String {
        self.day.format("%-d %b").to_string()
    }
}

/// Aggregated statistics over a set of rides.
#[derive(Debug, Default)]
pub struct RideStats {
    /// Total distance, in meters.
    pub total_distance_meters: u64,
    /// Total moving time, in seconds.
    pub total_duration_seconds: u64,
    /// Number of rides.
    pub ride_count: usize,
    /// Name and distance (in meters) of the longest ride, when any.
    pub longest: Option<(String, u64)>,
    /// Up to two weekday names with the most rides.
    pub most_active_days: Vec<&'static str>,
    /// Per-day series, in calendar order.
    pub daily: Vec<DayBucket>,
}

impl RideStats {
    /// Aggregates the given rides.
    pub fn aggregate<'a>(rides: impl IntoIterator<Item = &'a Ride>) -> Self {
        let mut stats = RideStats::default();
        let mut weekday_counts = [0usize; 7];
        let mut longest: Option<(&Ride, u64)> = None;
        let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

        for ride in rides {
            stats.ride_count += 1;
            stats.total_distance_meters += ride.distance_meters as u64;
            stats.total_duration_seconds += ride.duration_seconds;

            // Strict comparison: the earliest ride wins distance ties.
            let distance = ride.distance_meters as u64;
            if longest.is_none_or(|(_, best)| distance > best) {
                longest = Some((ride, distance));
            }

            let day = ride.created_at.date_naive();
            weekday_counts[day.weekday().num_days_from_monday() as usize] += 1;

            let bucket = buckets.entry(day).or_insert_with(|| DayBucket {
                day,
                distance_meters: 0,
                duration_seconds: 0,
                rides: 0,
            });
            bucket.distance_meters += distance;
            bucket.duration_seconds += ride.duration_seconds;
            bucket.rides += 1;
        }

        stats.longest = longest.map(|(ride, distance)| (ride.name.clone(), distance));

        let mut ranked: Vec<(usize, usize)> = weekday_counts
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, count)| count > 0)
            .collect();
        // Stable sort: equal counts keep the Monday-first weekday order.
        ranked.sort_by_key(|&(_, count)| std::cmp::Reverse(count));
        stats.most_active_days = ranked
            .iter()
            .take(2)
            .map(|&(weekday, _)| WEEKDAY_NAMES[weekday])
            .collect();

        stats.daily = buckets.into_values().collect();
        stats
    }

    /// Returns the average speed over the aggregated rides, in km/h.
    pub fn avg_speed_kmh(&self) -> f64 {
        if self.total_duration_seconds == 0 {
            return 0.0;
        }
        let km = self.total_distance_meters as f64 / 1000.0;
        let hours = self.total_duration_seconds as f64 / 3600.0;
        km / hours
    }
}
