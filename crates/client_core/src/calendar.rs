//! Month grid model for the event calendar.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use shared::protocol::Event;

pub const EVENT_DATE_CLASS: &str = "event-date";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Days between the start of the week and `day`.
    fn offset(self, day: Weekday) -> u32 {
        (day.num_days_from_monday() + 7 - self.weekday().num_days_from_monday()) % 7
    }

    pub fn header(self) -> [&'static str; 7] {
        match self {
            Self::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            Self::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

/// A calendar month whose whole-week grid fits in chrono's date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub marked: bool,
}

impl CalendarCell {
    pub fn class(&self) -> Option<&'static str> {
        self.marked.then_some(EVENT_DATE_CLASS)
    }
}

impl MonthView {
    /// `None` for invalid months and for months too close to the ends of the
    /// supported date range to lay out as whole weeks.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let view = Self {
            first: NaiveDate::from_ymd_opt(year, month, 1)?,
        };
        view.grid_bounds(WeekStart::Sunday)?;
        view.grid_bounds(WeekStart::Monday)?;
        Some(view)
    }

    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    /// Parses `YYYY-MM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn next(&self) -> Option<Self> {
        let next = self.first.checked_add_months(Months::new(1))?;
        Self::new(next.year(), next.month())
    }

    pub fn prev(&self) -> Option<Self> {
        let prev = self.first.checked_sub_months(Months::new(1))?;
        Self::new(prev.year(), prev.month())
    }

    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.first.month0() as usize], self.year())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    fn grid_bounds(&self, week_start: WeekStart) -> Option<(NaiveDate, NaiveDate)> {
        let lead = week_start.offset(self.first.weekday());
        let grid_start = self
            .first
            .checked_sub_signed(Duration::days(i64::from(lead)))?;

        let last = self.first.checked_add_months(Months::new(1))?.pred_opt()?;
        let trail = 6 - week_start.offset(last.weekday());
        let grid_end = last.checked_add_signed(Duration::days(i64::from(trail)))?;
        Some((grid_start, grid_end))
    }

    /// Whole weeks covering the month, marked against `events`.
    pub fn cells(&self, week_start: WeekStart, events: &[Event]) -> Vec<CalendarCell> {
        let Some((grid_start, grid_end)) = self.grid_bounds(week_start) else {
            return Vec::new();
        };

        grid_start
            .iter_days()
            .take_while(|date| *date <= grid_end)
            .map(|date| CalendarCell {
                date,
                in_month: self.contains(date),
                marked: marker_class(date, events).is_some(),
            })
            .collect()
    }
}

/// Marker class for a calendar tile: set when any event falls on `date`.
pub fn marker_class(date: NaiveDate, events: &[Event]) -> Option<&'static str> {
    events
        .iter()
        .any(|event| event.calendar_date().ok() == Some(date))
        .then_some(EVENT_DATE_CLASS)
}
