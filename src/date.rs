use std::fmt;
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Simple "YYYY-MM-DD" report date with ordering, as the reporting API expects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(Date);

impl ReportDate {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        let month = time::Month::try_from(month).expect("Month must be 1..=12");
        let date = Date::from_calendar_date(year, month, day).expect("invalid calendar date");
        Self(date)
    }

    pub fn date(self) -> Date {
        self.0
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.0.year(), u8::from(self.0.month()), self.0.day())
    }
}

impl FromStr for ReportDate {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fmt = format_description!("[year]-[month]-[day]");
        Date::parse(s.trim(), &fmt)
            .map(Self)
            .map_err(|e| format!("expected YYYY-MM-DD, got {:?}: {}", s, e))
    }
}

/// `YYYYMMDD` stamp for the current UTC day.
pub fn today_stamp() -> String {
    stamp_for(OffsetDateTime::now_utc().date())
}

pub fn stamp_for(date: Date) -> String {
    format!("{:04}{:02}{:02}", date.year(), u8::from(date.month()), date.day())
}
