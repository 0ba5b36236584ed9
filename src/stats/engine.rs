//! Attendance aggregation engine.
//!
//! Pure functions over already-fetched attendance rows: period windows,
//! overview tallies, per-date/per-type breakdowns, category trends,
//! attendee rankings and streaks. Nothing in here touches the database or
//! the clock; handlers fetch rows and pass `today` in explicitly, so every
//! function is deterministic and safe to recompute on each request.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::member::MemberRef;

/// Reporting window selector. `period_range` turns this plus a reference
/// date into an inclusive `[start, end]` date pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Default for Period {
    fn default() -> Self {
        Period::Monthly
    }
}

/// The slice of an attendance row the engine needs. Fetched straight from
/// the `attendance` table; `attendance_type` stays an opaque string here
/// so unknown types flow through the generic groupings untouched.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SessionRecord {
    pub member_id: u64,
    pub date: NaiveDate,
    pub attendance_type: String,
    pub present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PresenceKind {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_members: u64,
    pub present_count: u64,
    pub absent_count: u64,
    pub attendance_rate: f64,
    pub total_sessions: u64,
    pub period: Period,
    pub weekly_trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DateTypeStat {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub attendance_type: String,
    pub present: u64,
    pub absent: u64,
    pub total: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryTrendPoint {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub church_services: f64,
    pub department_meetings: f64,
    pub zone_meetings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TypeStat {
    #[serde(rename = "type")]
    pub attendance_type: String,
    pub present: u64,
    pub absent: u64,
    pub total: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TopAttendee {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub member_number: String,
    pub photo_url: Option<String>,
    pub attendance_rate: f64,
    pub total_sessions: u64,
    pub present_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    #[serde(rename = "type")]
    pub streak_type: PresenceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyStat {
    /// `YYYY-MM`
    pub month: String,
    pub total: u64,
    pub present: u64,
    pub rate: f64,
}

/// Display buckets for the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub enum ServiceCategory {
    #[display(fmt = "church_services")]
    ChurchServices,
    #[display(fmt = "department_meetings")]
    DepartmentMeetings,
    #[display(fmt = "zone_meetings")]
    ZoneMeetings,
}

/// Raw session type -> display category. `special_event` doubles as the
/// zone-meeting session type in this deployment; the rename lives only in
/// this table so new raw types never touch the aggregation code.
const CATEGORY_MAP: &[(&str, ServiceCategory)] = &[
    ("sunday_service", ServiceCategory::ChurchServices),
    ("midweek_fellowship", ServiceCategory::ChurchServices),
    ("department_meeting", ServiceCategory::DepartmentMeetings),
    ("special_event", ServiceCategory::ZoneMeetings),
];

pub fn display_category(attendance_type: &str) -> Option<ServiceCategory> {
    CATEGORY_MAP
        .iter()
        .find(|(raw, _)| *raw == attendance_type)
        .map(|(_, category)| *category)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage with a zero-denominator guard: empty groups rate 0, never NaN.
fn rate(present: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(present as f64 / total as f64 * 100.0)
    }
}

/// Inclusive reporting window ending at `today`.
///
/// Weekly backs up to the most recent Sunday, monthly to the 1st,
/// quarterly to the first month of the current 3-month block, yearly to
/// January 1.
pub fn period_range(period: Period, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = match period {
        Period::Weekly => {
            today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
        }
        Period::Monthly => today.with_day(1).unwrap_or(today),
        Period::Quarterly => {
            let quarter_month = today.month() - (today.month() - 1) % 3;
            NaiveDate::from_ymd_opt(today.year(), quarter_month, 1).unwrap_or(today)
        }
        Period::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
    };
    (start, today)
}

/// The 7-day window immediately before `start`, used for the weekly trend.
pub fn previous_week_range(start: NaiveDate) -> (NaiveDate, NaiveDate) {
    (start - Duration::days(7), start - Duration::days(1))
}

/// Inclusive date-range filter plus optional session-type and member-subset
/// filters (the subset comes from a department roster lookup).
pub fn filter_records(
    mut records: Vec<SessionRecord>,
    start: NaiveDate,
    end: NaiveDate,
    session_type: Option<&str>,
    member_subset: Option<&HashSet<u64>>,
) -> Vec<SessionRecord> {
    records.retain(|r| {
        r.date >= start
            && r.date <= end
            && session_type.is_none_or(|t| r.attendance_type == t)
            && member_subset.is_none_or(|subset| subset.contains(&r.member_id))
    });
    records
}

/// Top-line numbers for the dashboard.
///
/// Weekly periods count each member once across the week's sessions, and
/// floor the denominator at the active-roster size so members with no
/// records still count as eligible-but-absent. Other periods are raw
/// record tallies. `previous_week` feeds the weekly trend; pass `None`
/// when that secondary fetch failed and the trend degrades to 0.
pub fn overview(
    records: &[SessionRecord],
    total_active_members: u64,
    period: Period,
    previous_week: Option<&[SessionRecord]>,
) -> Overview {
    let total_sessions = records
        .iter()
        .map(|r| (r.date, r.attendance_type.as_str()))
        .collect::<HashSet<_>>()
        .len() as u64;

    let (present_count, absent_count, total_records) = if period == Period::Weekly {
        let mut seen = HashSet::new();
        let mut present_members = HashSet::new();
        for r in records {
            seen.insert(r.member_id);
            if r.present {
                present_members.insert(r.member_id);
            }
        }
        let total = (seen.len() as u64).max(total_active_members);
        let present = present_members.len() as u64;
        (present, total - present, total)
    } else {
        let present = records.iter().filter(|r| r.present).count() as u64;
        (present, records.len() as u64 - present, records.len() as u64)
    };

    let attendance_rate = rate(present_count, total_records);

    let weekly_trend = if period == Period::Weekly {
        trend_vs_previous_week(attendance_rate, total_active_members, previous_week)
    } else {
        0.0
    };

    Overview {
        total_members: total_active_members,
        present_count,
        absent_count,
        attendance_rate,
        total_sessions,
        period,
        weekly_trend,
    }
}

/// Rate delta against the preceding week, where the previous week's rate is
/// unique present members over the active roster (no denominator floor).
/// An absent or empty window yields 0.
fn trend_vs_previous_week(
    current_rate: f64,
    total_active_members: u64,
    previous_week: Option<&[SessionRecord]>,
) -> f64 {
    let Some(previous) = previous_week else {
        return 0.0;
    };
    if previous.is_empty() || total_active_members == 0 {
        return 0.0;
    }
    let previous_present = previous
        .iter()
        .filter(|r| r.present)
        .map(|r| r.member_id)
        .collect::<HashSet<_>>()
        .len() as u64;
    round2(current_rate - rate(previous_present, total_active_members))
}

/// Per-session stats, one row per (date, session type), ascending by date.
pub fn date_type_breakdown(records: &[SessionRecord]) -> Vec<DateTypeStat> {
    let mut groups: BTreeMap<(NaiveDate, &str), (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = groups
            .entry((r.date, r.attendance_type.as_str()))
            .or_default();
        entry.1 += 1;
        if r.present {
            entry.0 += 1;
        }
    }
    groups
        .into_iter()
        .map(|((date, attendance_type), (present, total))| DateTypeStat {
            date,
            attendance_type: attendance_type.to_string(),
            present,
            absent: total - present,
            total,
            percentage: rate(present, total),
        })
        .collect()
}

/// Per-date trend points with session types re-bucketed through
/// `CATEGORY_MAP`. Categories with no data on a date emit 0. Types outside
/// the map are skipped, not folded into a catch-all.
pub fn trend_by_category(records: &[SessionRecord]) -> Vec<CategoryTrendPoint> {
    let mut days: BTreeMap<NaiveDate, BTreeMap<ServiceCategory, (u64, u64)>> = BTreeMap::new();
    for r in records {
        let Some(category) = display_category(&r.attendance_type) else {
            continue;
        };
        let entry = days.entry(r.date).or_default().entry(category).or_default();
        entry.1 += 1;
        if r.present {
            entry.0 += 1;
        }
    }
    days.into_iter()
        .map(|(date, buckets)| {
            let pct = |category: ServiceCategory| {
                buckets
                    .get(&category)
                    .map(|&(present, total)| rate(present, total))
                    .unwrap_or(0.0)
            };
            CategoryTrendPoint {
                date,
                church_services: pct(ServiceCategory::ChurchServices),
                department_meetings: pct(ServiceCategory::DepartmentMeetings),
                zone_meetings: pct(ServiceCategory::ZoneMeetings),
            }
        })
        .collect()
}

/// Stats grouped by session type alone, for the pie/summary display.
pub fn type_breakdown(records: &[SessionRecord]) -> Vec<TypeStat> {
    let mut groups: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(r.attendance_type.as_str()).or_default();
        entry.1 += 1;
        if r.present {
            entry.0 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(attendance_type, (present, total))| TypeStat {
            attendance_type: attendance_type.to_string(),
            present,
            absent: total - present,
            total,
            percentage: rate(present, total),
        })
        .collect()
}

/// Per-member attendance rates joined to roster display fields, sorted
/// descending by rate and truncated to `limit`. The tally map is keyed by
/// member id, so the stable sort leaves rate ties in id order. Record
/// groups without a matching roster row are dropped.
pub fn top_attendees(
    records: &[SessionRecord],
    members: &[MemberRef],
    limit: usize,
) -> Vec<TopAttendee> {
    let roster: HashMap<u64, &MemberRef> = members.iter().map(|m| (m.id, m)).collect();

    let mut tallies: BTreeMap<u64, (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = tallies.entry(r.member_id).or_default();
        entry.1 += 1;
        if r.present {
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<TopAttendee> = tallies
        .into_iter()
        .filter_map(|(member_id, (present, total))| {
            roster.get(&member_id).map(|m| TopAttendee {
                id: member_id,
                first_name: m.first_name.clone(),
                last_name: m.last_name.clone(),
                member_number: m.member_number.clone(),
                photo_url: m.photo_url.clone(),
                attendance_rate: rate(present, total),
                total_sessions: total,
                present_count: present,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.attendance_rate.total_cmp(&a.attendance_rate));
    ranked.truncate(limit);
    ranked
}

/// Longest and current presence streaks for one member.
///
/// Records are scanned most-recent-first; a streak is a run of consecutive
/// records sharing the same presence value. With no records the summary is
/// all-zero with type `present` by convention.
pub fn member_streak(records: &[SessionRecord], member_id: u64) -> StreakSummary {
    let mut own: Vec<&SessionRecord> = records.iter().filter(|r| r.member_id == member_id).collect();
    own.sort_by(|a, b| b.date.cmp(&a.date));

    let Some(latest) = own.first() else {
        return StreakSummary {
            current: 0,
            longest: 0,
            streak_type: PresenceKind::Present,
        };
    };

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut run_value = latest.present;
    for r in &own {
        if r.present == run_value {
            run += 1;
        } else {
            longest = longest.max(run);
            run_value = r.present;
            run = 1;
        }
    }
    // flush the final run
    longest = longest.max(run);

    let mut current = 0u32;
    for r in &own {
        if r.present == latest.present {
            current += 1;
        } else {
            break;
        }
    }

    StreakSummary {
        current,
        longest,
        streak_type: if latest.present {
            PresenceKind::Present
        } else {
            PresenceKind::Absent
        },
    }
}

/// One member's records rolled up per `YYYY-MM`, ascending by month.
pub fn monthly_rollup(records: &[SessionRecord], member_id: u64) -> Vec<MonthlyStat> {
    let mut months: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for r in records.iter().filter(|r| r.member_id == member_id) {
        let entry = months
            .entry(r.date.format("%Y-%m").to_string())
            .or_default();
        entry.1 += 1;
        if r.present {
            entry.0 += 1;
        }
    }
    months
        .into_iter()
        .map(|(month, (present, total))| MonthlyStat {
            month,
            total,
            present,
            rate: rate(present, total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rec(member_id: u64, date: &str, attendance_type: &str, present: bool) -> SessionRecord {
        SessionRecord {
            member_id,
            date: d(date),
            attendance_type: attendance_type.to_string(),
            present,
        }
    }

    fn member(id: u64, first: &str) -> MemberRef {
        MemberRef {
            id,
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            member_number: format!("M-{id:04}"),
            photo_url: None,
        }
    }

    // ---- period_range ----

    #[test]
    fn weekly_range_backs_up_to_most_recent_sunday() {
        // 2026-08-19 is a Wednesday
        let (start, end) = period_range(Period::Weekly, d("2026-08-19"));
        assert_eq!(start, d("2026-08-16"));
        assert_eq!(end, d("2026-08-19"));
    }

    #[test]
    fn weekly_range_starting_on_sunday_is_that_day() {
        let (start, end) = period_range(Period::Weekly, d("2026-08-16"));
        assert_eq!(start, d("2026-08-16"));
        assert_eq!(end, d("2026-08-16"));
    }

    #[test]
    fn monthly_quarterly_yearly_ranges_snap_to_block_starts() {
        let today = d("2026-08-19");
        assert_eq!(period_range(Period::Monthly, today).0, d("2026-08-01"));
        assert_eq!(period_range(Period::Quarterly, today).0, d("2026-07-01"));
        assert_eq!(period_range(Period::Yearly, today).0, d("2026-01-01"));
    }

    #[test]
    fn quarterly_range_in_first_month_of_quarter() {
        assert_eq!(period_range(Period::Quarterly, d("2026-10-02")).0, d("2026-10-01"));
    }

    #[test]
    fn previous_week_window_is_the_seven_days_before_start() {
        let (start, end) = previous_week_range(d("2026-08-16"));
        assert_eq!(start, d("2026-08-09"));
        assert_eq!(end, d("2026-08-15"));
    }

    // ---- filter_records ----

    #[test]
    fn filter_applies_range_type_and_subset() {
        let records = vec![
            rec(1, "2026-08-01", "sunday_service", true),
            rec(1, "2026-07-31", "sunday_service", true), // out of range
            rec(2, "2026-08-02", "department_meeting", true), // wrong type
            rec(3, "2026-08-03", "sunday_service", false), // not in subset
        ];
        let subset: HashSet<u64> = [1, 2].into_iter().collect();
        let kept = filter_records(
            records,
            d("2026-08-01"),
            d("2026-08-31"),
            Some("sunday_service"),
            Some(&subset),
        );
        assert_eq!(kept, vec![rec(1, "2026-08-01", "sunday_service", true)]);
    }

    #[test]
    fn filter_range_is_inclusive_on_both_ends() {
        let records = vec![
            rec(1, "2026-08-01", "sunday_service", true),
            rec(1, "2026-08-31", "sunday_service", true),
        ];
        let kept = filter_records(records.clone(), d("2026-08-01"), d("2026-08-31"), None, None);
        assert_eq!(kept, records);
    }

    // ---- overview ----

    #[test]
    fn empty_input_yields_all_zero_overview() {
        let summary = overview(&[], 0, Period::Monthly, None);
        assert_eq!(summary.present_count, 0);
        assert_eq!(summary.absent_count, 0);
        assert_eq!(summary.attendance_rate, 0.0);
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.weekly_trend, 0.0);
    }

    #[test]
    fn weekly_overview_counts_each_member_once() {
        // one member, two sessions in the week, mixed presence
        let records = vec![
            rec(1, "2026-08-16", "sunday_service", true),
            rec(1, "2026-08-19", "midweek_fellowship", false),
        ];
        let summary = overview(&records, 5, Period::Weekly, None);
        assert_eq!(summary.present_count, 1);
        // roster floor: 5 active members even though only 1 has records
        assert_eq!(summary.absent_count, 4);
        assert_eq!(summary.attendance_rate, 20.0);
        assert_eq!(summary.total_sessions, 2);
    }

    #[test]
    fn weekly_denominator_uses_record_members_when_roster_is_smaller() {
        let records = vec![
            rec(1, "2026-08-16", "sunday_service", true),
            rec(2, "2026-08-16", "sunday_service", true),
            rec(3, "2026-08-16", "sunday_service", false),
        ];
        let summary = overview(&records, 2, Period::Weekly, None);
        assert_eq!(summary.present_count, 2);
        assert_eq!(summary.absent_count, 1);
        assert_eq!(summary.attendance_rate, 66.67);
    }

    #[test]
    fn monthly_overview_tallies_raw_records() {
        let records = vec![
            rec(1, "2026-08-02", "sunday_service", true),
            rec(1, "2026-08-09", "sunday_service", true),
            rec(2, "2026-08-02", "sunday_service", false),
        ];
        let summary = overview(&records, 50, Period::Monthly, None);
        assert_eq!(summary.present_count, 2);
        assert_eq!(summary.absent_count, 1);
        assert_eq!(summary.attendance_rate, 66.67);
        assert_eq!(summary.total_members, 50);
        assert_eq!(summary.weekly_trend, 0.0);
    }

    #[test]
    fn attendance_rate_stays_in_bounds_and_rounds_to_two_decimals() {
        let records = vec![
            rec(1, "2026-08-02", "sunday_service", true),
            rec(2, "2026-08-02", "sunday_service", true),
            rec(3, "2026-08-02", "sunday_service", false),
        ];
        let summary = overview(&records, 3, Period::Monthly, None);
        assert!(summary.attendance_rate >= 0.0 && summary.attendance_rate <= 100.0);
        assert_eq!(summary.attendance_rate, round2(2.0 / 3.0 * 100.0));
    }

    #[test]
    fn weekly_trend_degrades_to_zero_without_previous_window() {
        let records = vec![rec(1, "2026-08-16", "sunday_service", true)];
        assert_eq!(overview(&records, 4, Period::Weekly, None).weekly_trend, 0.0);
        assert_eq!(
            overview(&records, 4, Period::Weekly, Some(&[])).weekly_trend,
            0.0
        );
    }

    #[test]
    fn weekly_trend_compares_against_previous_week_roster_rate() {
        // current week: 2 of 4 roster members present -> 50%
        let current = vec![
            rec(1, "2026-08-16", "sunday_service", true),
            rec(2, "2026-08-16", "sunday_service", true),
            rec(3, "2026-08-16", "sunday_service", false),
            rec(4, "2026-08-16", "sunday_service", false),
        ];
        // previous week: only member 1 present -> 1/4 = 25%
        let previous = vec![
            rec(1, "2026-08-09", "sunday_service", true),
            rec(1, "2026-08-12", "midweek_fellowship", true), // same member, counted once
            rec(2, "2026-08-09", "sunday_service", false),
        ];
        let summary = overview(&current, 4, Period::Weekly, Some(&previous));
        assert_eq!(summary.attendance_rate, 50.0);
        assert_eq!(summary.weekly_trend, 25.0);
    }

    #[test]
    fn overview_is_idempotent() {
        let records = vec![
            rec(1, "2026-08-16", "sunday_service", true),
            rec(2, "2026-08-19", "midweek_fellowship", false),
        ];
        let first = overview(&records, 10, Period::Weekly, None);
        let second = overview(&records, 10, Period::Weekly, None);
        assert_eq!(first, second);
    }

    // ---- breakdowns ----

    #[test]
    fn date_type_breakdown_sums_and_orders_by_date() {
        let records = vec![
            rec(1, "2026-08-09", "sunday_service", true),
            rec(2, "2026-08-09", "sunday_service", false),
            rec(1, "2026-08-02", "sunday_service", true),
            rec(1, "2026-08-02", "department_meeting", false),
        ];
        let rows = date_type_breakdown(&records);
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.total, row.present + row.absent);
            assert_eq!(row.percentage, rate(row.present, row.total));
        }
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(rows[2].percentage, 50.0);
    }

    #[test]
    fn category_trend_combines_both_church_service_types() {
        let records = vec![
            rec(1, "2026-08-02", "sunday_service", true),
            rec(1, "2026-08-02", "midweek_fellowship", false),
        ];
        let points = trend_by_category(&records);
        assert_eq!(points.len(), 1);
        // 1 present of 2 combined church-service records
        assert_eq!(points[0].church_services, 50.0);
        assert_eq!(points[0].department_meetings, 0.0);
        assert_eq!(points[0].zone_meetings, 0.0);
    }

    #[test]
    fn category_trend_defaults_missing_buckets_to_zero() {
        let records = vec![rec(1, "2026-08-03", "department_meeting", true)];
        let points = trend_by_category(&records);
        assert_eq!(points[0].department_meetings, 100.0);
        assert_eq!(points[0].church_services, 0.0);
        assert_eq!(points[0].zone_meetings, 0.0);
    }

    #[test]
    fn special_event_records_land_in_the_zone_bucket() {
        let records = vec![rec(1, "2026-08-04", "special_event", true)];
        let points = trend_by_category(&records);
        assert_eq!(points[0].zone_meetings, 100.0);
    }

    #[test]
    fn unmapped_session_types_are_skipped_by_the_trend() {
        let records = vec![
            rec(1, "2026-08-04", "prayer_retreat", true),
            rec(1, "2026-08-05", "sunday_service", true),
        ];
        let points = trend_by_category(&records);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, d("2026-08-05"));
    }

    #[test]
    fn type_breakdown_groups_by_session_type_alone() {
        let records = vec![
            rec(1, "2026-08-02", "sunday_service", true),
            rec(1, "2026-08-09", "sunday_service", false),
            rec(1, "2026-08-05", "midweek_fellowship", true),
        ];
        let rows = type_breakdown(&records);
        assert_eq!(rows.len(), 2);
        let sunday = rows
            .iter()
            .find(|r| r.attendance_type == "sunday_service")
            .unwrap();
        assert_eq!(sunday.total, 2);
        assert_eq!(sunday.percentage, 50.0);
    }

    // ---- top attendees ----

    #[test]
    fn top_attendees_sorted_descending_by_rate() {
        let records = vec![
            // member 1: 9/10 -> 90%
            rec(1, "2026-08-01", "sunday_service", false),
            // member 2: 1/1 -> 100%
            rec(2, "2026-08-01", "sunday_service", true),
            // member 3: 1/2 -> 50%
            rec(3, "2026-08-01", "sunday_service", true),
            rec(3, "2026-08-02", "sunday_service", false),
        ];
        let mut records = records;
        for day in 2..=10 {
            records.push(rec(1, &format!("2026-08-{day:02}"), "sunday_service", true));
        }
        let members = vec![member(1, "Ama"), member(2, "Kofi"), member(3, "Esi")];
        let ranked = top_attendees(&records, &members, 10);
        let rates: Vec<f64> = ranked.iter().map(|a| a.attendance_rate).collect();
        assert_eq!(rates, vec![100.0, 90.0, 50.0]);
    }

    #[test]
    fn top_attendee_rate_ties_keep_member_id_order() {
        let records = vec![
            rec(2, "2026-08-01", "sunday_service", true),
            rec(1, "2026-08-01", "sunday_service", true),
        ];
        let members = vec![member(1, "Ama"), member(2, "Kofi")];
        let ranked = top_attendees(&records, &members, 10);
        assert_eq!(ranked[0].id, 1);
        assert_eq!(ranked[1].id, 2);
    }

    #[test]
    fn top_attendees_truncates_to_limit() {
        let records: Vec<SessionRecord> = (1..=15)
            .map(|id| rec(id, "2026-08-02", "sunday_service", true))
            .collect();
        let members: Vec<MemberRef> = (1..=15).map(|id| member(id, "Member")).collect();
        assert_eq!(top_attendees(&records, &members, 10).len(), 10);
    }

    #[test]
    fn top_attendees_drops_ids_missing_from_roster() {
        let records = vec![
            rec(1, "2026-08-02", "sunday_service", true),
            rec(99, "2026-08-02", "sunday_service", true),
        ];
        let members = vec![member(1, "Ama")];
        let ranked = top_attendees(&records, &members, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 1);
    }

    // ---- streaks ----

    #[test]
    fn streak_example_from_mixed_history() {
        // most recent first: present, present, absent, present
        let records = vec![
            rec(1, "2026-08-16", "sunday_service", true),
            rec(1, "2026-08-09", "sunday_service", true),
            rec(1, "2026-08-02", "sunday_service", false),
            rec(1, "2026-07-26", "sunday_service", true),
        ];
        let streak = member_streak(&records, 1);
        assert_eq!(streak.current, 2);
        assert_eq!(streak.longest, 2);
        assert_eq!(streak.streak_type, PresenceKind::Present);
    }

    #[test]
    fn streak_with_no_records_defaults_to_present_zero() {
        let streak = member_streak(&[], 1);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 0);
        assert_eq!(streak.streak_type, PresenceKind::Present);
    }

    #[test]
    fn streak_of_all_absences_reports_absent_type() {
        let records = vec![
            rec(1, "2026-08-16", "sunday_service", false),
            rec(1, "2026-08-09", "sunday_service", false),
            rec(1, "2026-08-02", "sunday_service", false),
        ];
        let streak = member_streak(&records, 1);
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
        assert_eq!(streak.streak_type, PresenceKind::Absent);
    }

    #[test]
    fn streak_ignores_other_members_records() {
        let records = vec![
            rec(1, "2026-08-16", "sunday_service", true),
            rec(2, "2026-08-09", "sunday_service", false),
        ];
        let streak = member_streak(&records, 1);
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn longest_streak_found_in_older_history() {
        // latest run is 1 present, but an older absent run spans 3
        let records = vec![
            rec(1, "2026-08-16", "sunday_service", true),
            rec(1, "2026-08-09", "sunday_service", false),
            rec(1, "2026-08-02", "sunday_service", false),
            rec(1, "2026-07-26", "sunday_service", false),
        ];
        let streak = member_streak(&records, 1);
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 3);
    }

    // ---- monthly rollup ----

    #[test]
    fn monthly_rollup_groups_by_month_ascending() {
        let records = vec![
            rec(1, "2026-08-02", "sunday_service", true),
            rec(1, "2026-08-09", "sunday_service", false),
            rec(1, "2026-07-05", "sunday_service", true),
            rec(2, "2026-07-05", "sunday_service", true), // other member, ignored
        ];
        let months = monthly_rollup(&records, 1);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2026-07");
        assert_eq!(months[0].rate, 100.0);
        assert_eq!(months[1].month, "2026-08");
        assert_eq!(months[1].total, 2);
        assert_eq!(months[1].rate, 50.0);
    }

    // ---- category map ----

    #[test]
    fn category_map_covers_all_known_session_types() {
        for raw in [
            "sunday_service",
            "midweek_fellowship",
            "special_event",
            "department_meeting",
        ] {
            assert!(display_category(raw).is_some(), "unmapped type {raw}");
        }
        assert!(display_category("prayer_retreat").is_none());
    }
}
