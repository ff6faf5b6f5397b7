//! Attendance records and the basic payroll computed from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{CompanyId, UserId};
use crate::timestamp::{epoch_millis, Timestamp};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Clock action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceAction {
    In,
    Out,
}

/// One clock-in or clock-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub uid: UserId,
    #[serde(default)]
    pub company_id: CompanyId,
    pub action: AttendanceAction,
    #[serde(default)]
    pub at: Option<Timestamp>,
}

impl AttendanceRecord {
    /// A record stamped now.
    pub fn now(uid: UserId, company_id: Option<CompanyId>, action: AttendanceAction) -> Self {
        Self {
            uid,
            company_id: company_id.unwrap_or_default(),
            action,
            at: Some(Timestamp::now()),
        }
    }

    pub fn millis(&self) -> i64 {
        epoch_millis(self.at.as_ref())
    }
}

/// Inclusive time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    pub start: i64,
    pub end: i64,
}

impl Default for PayPeriod {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl PayPeriod {
    /// Every instant.
    pub fn unbounded() -> Self {
        Self {
            start: i64::MIN,
            end: i64::MAX,
        }
    }

    /// From the start of `start` to the end of `end`, in UTC. Either side
    /// may be open.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let start = start
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or(i64::MIN);
        let end = end
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or(i64::MAX);
        Self { start, end }
    }

    pub fn contains(&self, millis: i64) -> bool {
        millis >= self.start && millis <= self.end
    }
}

/// Hours worked inside `period`.
///
/// Records are paired in time order: an `in` opens a shift (replacing any
/// shift still open) and the next `out` closes it. An `out` with no open
/// shift is ignored.
pub fn worked_hours(records: &[AttendanceRecord], period: PayPeriod) -> f64 {
    let mut sorted: Vec<&AttendanceRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.millis());

    let mut hours = 0.0;
    let mut open: Option<i64> = None;
    for record in sorted {
        let t = record.millis();
        if !period.contains(t) {
            continue;
        }
        match record.action {
            AttendanceAction::In => open = Some(t),
            AttendanceAction::Out => {
                if let Some(started) = open.take() {
                    hours += (t - started) as f64 / MILLIS_PER_HOUR;
                }
            }
        }
    }
    hours
}

/// Result of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Payroll {
    pub hours: f64,
    pub rate: f64,
    pub gross: f64,
}

impl Payroll {
    /// Hours in `period` at an hourly `rate`. A non-finite rate counts as zero.
    pub fn compute(records: &[AttendanceRecord], period: PayPeriod, rate: f64) -> Self {
        let hours = worked_hours(records, period);
        let rate = crate::coerce::finite_or_zero(rate);
        Self {
            hours,
            rate,
            gross: hours * rate,
        }
    }
}

/// One row of the attendance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAttendance {
    pub day: NaiveDate,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub hours: f64,
}

/// Group records by UTC day, newest day first.
///
/// Each day keeps its latest `in` and latest `out`. Hours are counted only
/// when both exist and never go below zero.
pub fn daily_summary(records: &[AttendanceRecord]) -> Vec<DailyAttendance> {
    let mut days: BTreeMap<NaiveDate, (Option<i64>, Option<i64>)> = BTreeMap::new();

    for record in records {
        let Some(at) = record.at.as_ref().and_then(Timestamp::to_datetime) else {
            continue;
        };
        let t = at.timestamp_millis();
        let entry = days.entry(at.date_naive()).or_default();
        let slot = match record.action {
            AttendanceAction::In => &mut entry.0,
            AttendanceAction::Out => &mut entry.1,
        };
        *slot = Some(slot.map_or(t, |prev| prev.max(t)));
    }

    days.into_iter()
        .rev()
        .map(|(day, (clock_in, clock_out))| {
            let hours = match (clock_in, clock_out) {
                (Some(i), Some(o)) => ((o - i) as f64 / MILLIS_PER_HOUR).max(0.0),
                _ => 0.0,
            };
            DailyAttendance {
                day,
                clock_in: clock_in.and_then(DateTime::from_timestamp_millis),
                clock_out: clock_out.and_then(DateTime::from_timestamp_millis),
                hours,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: f64 = MILLIS_PER_HOUR;

    fn rec(action: AttendanceAction, hour: f64) -> AttendanceRecord {
        AttendanceRecord {
            uid: UserId::new("u1"),
            company_id: CompanyId::default(),
            action,
            // 2024-01-01T00:00:00Z
            at: Some(Timestamp::Millis(1_704_067_200_000.0 + hour * HOUR)),
        }
    }

    #[test]
    fn test_worked_hours_pairs_in_time_order() {
        let records = vec![
            rec(AttendanceAction::Out, 17.0),
            rec(AttendanceAction::In, 9.0),
            rec(AttendanceAction::In, 33.0),
            rec(AttendanceAction::Out, 37.5),
        ];
        assert_eq!(worked_hours(&records, PayPeriod::unbounded()), 12.5);
    }

    #[test]
    fn test_unmatched_out_ignored() {
        let records = vec![rec(AttendanceAction::Out, 5.0), rec(AttendanceAction::In, 6.0)];
        assert_eq!(worked_hours(&records, PayPeriod::unbounded()), 0.0);
    }

    #[test]
    fn test_period_excludes_outside_records() {
        let records = vec![
            rec(AttendanceAction::In, 9.0),
            rec(AttendanceAction::Out, 17.0),
            rec(AttendanceAction::In, 33.0),
            rec(AttendanceAction::Out, 37.0),
        ];
        let day_one = NaiveDate::from_ymd_opt(2024, 1, 1);
        let period = PayPeriod::from_dates(day_one, day_one);

        assert_eq!(worked_hours(&records, period), 8.0);
    }

    #[test]
    fn test_payroll_gross() {
        let records = vec![rec(AttendanceAction::In, 9.0), rec(AttendanceAction::Out, 13.0)];
        let pay = Payroll::compute(&records, PayPeriod::default(), 60.0);
        assert_eq!(pay.hours, 4.0);
        assert_eq!(pay.gross, 240.0);
    }

    #[test]
    fn test_daily_summary_latest_per_day() {
        let records = vec![
            rec(AttendanceAction::In, 8.0),
            rec(AttendanceAction::In, 9.0),
            rec(AttendanceAction::Out, 12.0),
            rec(AttendanceAction::Out, 17.0),
            rec(AttendanceAction::In, 32.0),
        ];
        let summary = daily_summary(&records);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(summary[0].hours, 0.0);
        assert!(summary[0].clock_out.is_none());
        assert_eq!(summary[1].hours, 8.0);
    }

    #[test]
    fn test_daily_summary_clamps_negative() {
        let records = vec![rec(AttendanceAction::Out, 8.0), rec(AttendanceAction::In, 9.0)];
        assert_eq!(daily_summary(&records)[0].hours, 0.0);
    }

    #[test]
    fn test_record_document_shape() {
        let record: AttendanceRecord = serde_json::from_str(
            r#"{"uid":"u1","companyId":"c1","action":"out","at":{"seconds":60,"nanoseconds":0}}"#,
        )
        .unwrap();
        assert_eq!(record.action, AttendanceAction::Out);
        assert_eq!(record.millis(), 60_000);
    }
}
