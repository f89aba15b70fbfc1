//! History queries over the event log.
//!
//! Every user-supplied value is parsed into a [`HistoryFilter`] before any
//! event is looked at, so a bad `--from` or `--status` aborts the query
//! without partial output. Filtering happens before sorting.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{Error, Result};
use crate::model::{Event, Status};

const DATE_FORMAT: &str = "%Y-%m-%d";
const EXPECTED_FORMAT: &str = "expected a date in YYYY-MM-DD form";

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    Descending,
    /// Insertion order.
    #[default]
    Unspecified,
}

impl std::str::FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(Error::InvalidSortOrder(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw query
// ---------------------------------------------------------------------------

/// Unparsed `history` options as they arrive from the command line.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub status: Option<String>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, date: impl Into<String>) -> Self {
        self.from = Some(date.into());
        self
    }

    pub fn to(mut self, date: impl Into<String>) -> Self {
        self.to = Some(date.into());
        self
    }

    pub fn sort(mut self, order: impl Into<String>) -> Self {
        self.sort = Some(order.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Validate every option.
    pub fn parse(&self) -> Result<HistoryFilter> {
        let from_ms = self.from.as_deref().map(start_of_day_ms).transpose()?;
        let to_ms = self.to.as_deref().map(end_of_day_ms).transpose()?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<Status>)
            .transpose()?;
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?
            .unwrap_or_default();

        Ok(HistoryFilter {
            from_ms,
            to_ms,
            status,
            sort,
        })
    }
}

// ---------------------------------------------------------------------------
// Parsed filter
// ---------------------------------------------------------------------------

/// Validated history query. Bounds are inclusive milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryFilter {
    pub from_ms: Option<i64>,
    pub to_ms: Option<i64>,
    pub status: Option<Status>,
    pub sort: SortOrder,
}

impl HistoryFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.from_ms.is_none_or(|from| event.timestamp >= from)
            && self.to_ms.is_none_or(|to| event.timestamp <= to)
            && self.status.is_none_or(|status| event.status == status)
    }

    /// Filter, then stable-sort by timestamp.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        let mut selected: Vec<Event> = events
            .iter()
            .filter(|event| self.matches(event))
            .copied()
            .collect();

        match self.sort {
            SortOrder::Ascending => selected.sort_by_key(|event| event.timestamp),
            SortOrder::Descending => {
                selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            }
            SortOrder::Unspecified => {}
        }
        selected
    }
}

/// Parse `query` and run it against `events`.
pub fn query(events: &[Event], query: &HistoryQuery) -> Result<Vec<Event>> {
    Ok(query.parse()?.apply(events))
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

fn parse_date(token: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| Error::DateParse {
        token: token.to_string(),
        reason: describe_date_error(token),
    })
}

fn start_of_day_ms(token: &str) -> Result<i64> {
    Ok(parse_date(token)?
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis())
}

/// Last millisecond of the day, so `--to` includes the whole date.
fn end_of_day_ms(token: &str) -> Result<i64> {
    let date = parse_date(token)?;
    let next_day = date
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
    match next_day {
        Some(ms) => Ok(ms - 1),
        None => Ok(i64::MAX),
    }
}

/// Explain why `token` is not a calendar date.
fn describe_date_error(token: &str) -> String {
    let parts: Vec<&str> = token.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return EXPECTED_FORMAT.to_string();
    };
    let (Ok(year), Ok(month), Ok(day)) = (
        year.parse::<i32>(),
        month.parse::<u32>(),
        day.parse::<u32>(),
    ) else {
        return EXPECTED_FORMAT.to_string();
    };

    if !(1..=12).contains(&month) {
        return format!("invalid value for month (valid values 1 - 12): {month}");
    }
    if !(1..=31).contains(&day) {
        return format!("invalid value for day of month (valid values 1 - 31): {day}");
    }
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return format!("year out of range: {year}");
    }
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return format!("invalid date: day {day} does not exist in {year:04}-{month:02}");
    }
    EXPECTED_FORMAT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Status::*;

    // 2024-03-10T00:00:00Z
    const MAR_10: i64 = 1_710_028_800_000;
    const DAY: i64 = 86_400_000;

    fn sample() -> Vec<Event> {
        vec![
            Event::new(Starting, MAR_10 + 5_000),
            Event::new(Up, MAR_10 + 5_000),
            Event::new(Stopping, MAR_10 - 1),
            Event::new(Failed, MAR_10 + DAY),
            Event::new(Starting, MAR_10 + DAY - 1),
            Event::new(Up, MAR_10 + 2 * DAY),
        ]
    }

    fn statuses(events: &[Event]) -> Vec<Status> {
        events.iter().map(|e| e.status).collect()
    }

    #[test]
    fn no_options_returns_log_unchanged() {
        let events = sample();
        assert_eq!(query(&events, &HistoryQuery::new()).unwrap(), events);
    }

    #[test]
    fn from_and_to_are_inclusive_calendar_days() {
        let events = sample();
        let q = HistoryQuery::new().from("2024-03-10").to("2024-03-10");
        let result = query(&events, &q).unwrap();
        assert_eq!(statuses(&result), vec![Starting, Up, Starting]);
    }

    #[test]
    fn open_ended_bounds() {
        let events = sample();
        let after = query(&events, &HistoryQuery::new().from("2024-03-11")).unwrap();
        assert_eq!(statuses(&after), vec![Failed, Up]);

        let before = query(&events, &HistoryQuery::new().to("2024-03-09")).unwrap();
        assert_eq!(statuses(&before), vec![Stopping]);
    }

    #[test]
    fn status_filter_matches_exactly() {
        let events = sample();
        let result = query(&events, &HistoryQuery::new().status("STARTING")).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|e| e.status == Starting));
    }

    #[test]
    fn ascending_sort_is_stable() {
        let events = sample();
        let result = query(&events, &HistoryQuery::new().sort("asc")).unwrap();
        assert!(result.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        // the STARTING/UP pair shares a timestamp and keeps insertion order
        assert_eq!(statuses(&result), vec![Stopping, Starting, Up, Starting, Failed, Up]);
    }

    #[test]
    fn descending_sort_is_stable() {
        let events = sample();
        let result = query(&events, &HistoryQuery::new().sort("desc")).unwrap();
        assert!(result.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(statuses(&result), vec![Up, Failed, Starting, Starting, Up, Stopping]);
    }

    #[test]
    fn invalid_month_names_token_and_value() {
        let err = query(&sample(), &HistoryQuery::new().from("2024-31-12")).unwrap_err();
        match &err {
            Error::DateParse { token, reason } => {
                assert_eq!(token, "2024-31-12");
                assert_eq!(reason, "invalid value for month (valid values 1 - 12): 31");
            }
            other => panic!("expected DateParse, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "invalid date '2024-31-12': invalid value for month (valid values 1 - 12): 31"
        );
    }

    #[test]
    fn impossible_day_is_explained() {
        let err = HistoryQuery::new().to("2023-02-29").parse().unwrap_err();
        assert!(err.to_string().contains("day 29 does not exist in 2023-02"));

        let err = HistoryQuery::new().to("2023-02-40").parse().unwrap_err();
        assert!(err.to_string().contains("valid values 1 - 31"));
    }

    #[test]
    fn garbage_date_reports_expected_format() {
        let err = HistoryQuery::new().from("yesterday").parse().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid date 'yesterday': expected a date in YYYY-MM-DD form"
        );
    }

    #[test]
    fn unknown_status_and_sort_are_rejected() {
        let err = HistoryQuery::new().status("INVALID_STATUS").parse().unwrap_err();
        assert!(matches!(err, Error::UnknownStatus(ref t) if t == "INVALID_STATUS"));

        let err = HistoryQuery::new().sort("sideways").parse().unwrap_err();
        assert!(matches!(err, Error::InvalidSortOrder(ref t) if t == "sideways"));
    }
}
