use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Weekday};

/// Anything that can be reduced to a calendar day.
///
/// Habit completion sets are keyed by `NaiveDate`, so every timestamp goes
/// through this before it is stored or compared.
pub trait AsDay {
    fn as_day(&self) -> NaiveDate;
}

impl AsDay for NaiveDate {
    fn as_day(&self) -> NaiveDate {
        *self
    }
}

impl AsDay for NaiveDateTime {
    fn as_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the timezone carried by the value, so `DateTime<Local>` yields the
/// user's local calendar day.
impl<Tz: TimeZone> AsDay for DateTime<Tz> {
    fn as_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: AsDay + ?Sized> AsDay for &T {
    fn as_day(&self) -> NaiveDate {
        (**self).as_day()
    }
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Midnight of the day containing `at`.
pub fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

/// The date `n` days after `date` (before it when `n` is negative).
/// Returns `None` only when the result falls outside chrono's range.
pub fn add_days(date: NaiveDate, n: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(n).and_then(|delta| date.checked_add_signed(delta))
}

pub fn is_same_day(a: impl AsDay, b: impl AsDay) -> bool {
    a.as_day() == b.as_day()
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // December of the last representable year
        None => first.iter_days().take_while(|d| d.month() == first.month()).count() as u32,
    }
}

/// Number of blank cells before `first` in a week starting on `week_start`.
fn leading_offset(first: NaiveDate, week_start: Weekday) -> usize {
    let day = first.weekday().num_days_from_sunday();
    let start = week_start.num_days_from_sunday();
    ((7 + day - start) % 7) as usize
}

/// Cells of a month laid out on a 7-column calendar.
///
/// Starts with blanks up to the first day's column, then one cell per day.
/// The last week is not padded, so it may hold fewer than 7 cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: NaiveDate,
    week_start: Weekday,
    cells: Vec<Option<NaiveDate>>,
}

impl MonthGrid {
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn cells(&self) -> &[Option<NaiveDate>] {
        &self.cells
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rows of up to 7 cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<NaiveDate>]> {
        self.cells.chunks(7)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cells.iter().flatten().copied()
    }
}

/// Build the calendar grid for the month containing `month`.
pub fn month_grid(month: NaiveDate, week_start: Weekday) -> MonthGrid {
    let first = first_of_month(month);
    let blanks = leading_offset(first, week_start);

    let mut cells: Vec<Option<NaiveDate>> = vec![None; blanks];
    cells.extend(
        first
            .iter_days()
            .take(days_in_month(first) as usize)
            .map(Some),
    );

    MonthGrid {
        month: first,
        week_start,
        cells,
    }
}
