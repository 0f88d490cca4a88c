//! XBRL period types: instants and durations, their keys, and fiscal period labels.

use chrono::NaiveDate;

/// Whether a period is a single point in time (balance) or a span (flow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodType {
    Instant,
    Duration,
}

/// One reporting period as it appears on a fact or a statement's period axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Instant { date: NaiveDate },
    Duration { start: NaiveDate, end: NaiveDate },
}

impl Period {
    pub fn period_type(&self) -> PeriodType {
        match self {
            Period::Instant { .. } => PeriodType::Instant,
            Period::Duration { .. } => PeriodType::Duration,
        }
    }

    /// `instant_<YYYY-MM-DD>` or `duration_<YYYY-MM-DD>_<YYYY-MM-DD>`.
    pub fn key(&self) -> String {
        match self {
            Period::Instant { date } => format!("instant_{date}"),
            Period::Duration { start, end } => format!("duration_{start}_{end}"),
        }
    }

    pub fn end_date(&self) -> NaiveDate {
        match self {
            Period::Instant { date } => *date,
            Period::Duration { end, .. } => *end,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Period::Instant { .. } => None,
            Period::Duration { start, .. } => Some(*start),
        }
    }

    /// Inclusive day span of a duration period; `None` for instants.
    pub fn duration_days(&self) -> Option<i64> {
        match self {
            Period::Instant { .. } => None,
            Period::Duration { start, end } => Some((*end - *start).num_days()),
        }
    }

    /// Two periods are duplicates iff same type and same date(s); for durations both
    /// `start` and `end` must match — a Q2-quarterly and a Q2-YTD share
    /// an end date but are not duplicates.
    pub fn is_duplicate_of(&self, other: &Period) -> bool {
        self == other
    }
}

/// `FY`, `Q1..Q4`, or a YTD window (`YTD_6M`, `YTD_9M`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiscalPeriod {
    FY,
    Q1,
    Q2,
    Q3,
    Q4,
    /// `Ytd(6)` is "YTD_6M", the first-half-year cumulative duration.
    Ytd(u32),
}

impl FiscalPeriod {
    pub fn is_quarter(&self) -> bool {
        matches!(self, FiscalPeriod::Q1 | FiscalPeriod::Q2 | FiscalPeriod::Q3 | FiscalPeriod::Q4)
    }

    pub fn quarter_index(&self) -> Option<u32> {
        match self {
            FiscalPeriod::Q1 => Some(1),
            FiscalPeriod::Q2 => Some(2),
            FiscalPeriod::Q3 => Some(3),
            FiscalPeriod::Q4 => Some(4),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Option<FiscalPeriod> {
        match s {
            "FY" => Some(FiscalPeriod::FY),
            "Q1" => Some(FiscalPeriod::Q1),
            "Q2" => Some(FiscalPeriod::Q2),
            "Q3" => Some(FiscalPeriod::Q3),
            "Q4" => Some(FiscalPeriod::Q4),
            other => other
                .strip_prefix("YTD_")
                .and_then(|rest| rest.strip_suffix('M'))
                .and_then(|n| n.parse::<u32>().ok())
                .map(FiscalPeriod::Ytd),
        }
    }
}

impl std::fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FiscalPeriod::FY => write!(f, "FY"),
            FiscalPeriod::Q1 => write!(f, "Q1"),
            FiscalPeriod::Q2 => write!(f, "Q2"),
            FiscalPeriod::Q3 => write!(f, "Q3"),
            FiscalPeriod::Q4 => write!(f, "Q4"),
            FiscalPeriod::Ytd(n) => write!(f, "YTD_{n}M"),
        }
    }
}

/// A named day-range used by the period optimizer, e.g. "annual" is
/// `[350, 380]` with a target of 365.
#[derive(Debug, Clone, Copy)]
pub struct DayRange {
    pub min: i64,
    pub max: i64,
    pub target: i64,
}

impl DayRange {
    pub const fn new(min: i64, max: i64, target: i64) -> Self {
        Self { min, max, target }
    }

    pub fn contains(&self, days: i64) -> bool {
        days >= self.min && days <= self.max
    }

    pub fn distance_from_target(&self, days: i64) -> i64 {
        (days - self.target).abs()
    }
}
