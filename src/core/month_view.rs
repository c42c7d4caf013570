use chrono::{Months, NaiveDate, Weekday};

use super::calendar::{self, AsDay, MonthGrid};

/// Navigation state behind a month calendar screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    /// First day of the displayed month.
    pub displayed_month: NaiveDate,
    /// Currently selected day, if any.
    pub selected_day: Option<NaiveDate>,
    pub week_start: Weekday,
}

impl MonthView {
    /// Open on the month containing `today`, with `today` selected.
    pub fn new(today: NaiveDate, week_start: Weekday) -> Self {
        Self {
            displayed_month: calendar::first_of_month(today),
            selected_day: Some(today),
            week_start,
        }
    }

    pub fn prev_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.displayed_month);
        self.selected_day = None;
    }

    pub fn next_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_add_months(Months::new(1))
            .unwrap_or(self.displayed_month);
        self.selected_day = None;
    }

    /// Move `months` months forward (back when negative) in one step.
    /// Leaves the view where it is if the target month is out of range.
    pub fn shift_months(&mut self, months: i32) {
        let step = Months::new(months.unsigned_abs());
        let shifted = if months < 0 {
            self.displayed_month.checked_sub_months(step)
        } else {
            self.displayed_month.checked_add_months(step)
        };
        if let Some(month) = shifted {
            self.displayed_month = month;
        }
        self.selected_day = None;
    }

    /// Select `day`, or clear the selection if it was already selected.
    pub fn select_day(&mut self, day: impl AsDay) {
        let day = day.as_day();
        if self.selected_day == Some(day) {
            self.selected_day = None;
        } else {
            self.selected_day = Some(day);
        }
    }

    pub fn is_selected(&self, day: impl AsDay) -> bool {
        self.selected_day == Some(day.as_day())
    }

    pub fn grid(&self) -> MonthGrid {
        calendar::month_grid(self.displayed_month, self.week_start)
    }

    /// e.g. "October 2026"
    pub fn title(&self) -> String {
        self.displayed_month.format("%B %Y").to_string()
    }

    /// Short weekday names in column order.
    pub fn weekday_labels(&self) -> [&'static str; 7] {
        const LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let offset = self.week_start.num_days_from_sunday() as usize;
        std::array::from_fn(|i| LABELS[(offset + i) % 7])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn opens_on_current_month() {
        let view = MonthView::new(date(2026, 10, 18), Weekday::Sun);
        assert_eq!(view.displayed_month, date(2026, 10, 1));
        assert!(view.is_selected(date(2026, 10, 18)));
        assert_eq!(view.title(), "October 2026");
    }

    #[test]
    fn navigation_wraps_years_and_clears_selection() {
        let mut view = MonthView::new(date(2026, 1, 31), Weekday::Sun);
        view.prev_month();
        assert_eq!(view.displayed_month, date(2025, 12, 1));
        assert_eq!(view.selected_day, None);

        view.next_month();
        view.next_month();
        assert_eq!(view.displayed_month, date(2026, 2, 1));
        assert_eq!(view.grid().len(), 28);
    }

    #[test]
    fn shift_months_jumps_directly() {
        let mut view = MonthView::new(date(2026, 10, 18), Weekday::Sun);
        view.shift_months(-14);
        assert_eq!(view.displayed_month, date(2025, 8, 1));
        assert_eq!(view.selected_day, None);
        view.shift_months(26);
        assert_eq!(view.displayed_month, date(2027, 10, 1));
    }

    #[test]
    fn shift_months_out_of_range_stays_put() {
        let mut view = MonthView::new(date(2026, 10, 18), Weekday::Sun);
        view.shift_months(i32::MAX);
        assert_eq!(view.displayed_month, date(2026, 10, 1));
        view.shift_months(i32::MIN);
        assert_eq!(view.displayed_month, date(2026, 10, 1));
    }

    #[test]
    fn select_toggles() {
        let mut view = MonthView::new(date(2026, 10, 18), Weekday::Sun);
        view.select_day(date(2026, 10, 3));
        assert_eq!(view.selected_day, Some(date(2026, 10, 3)));
        view.select_day(date(2026, 10, 3).and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(view.selected_day, None);
    }

    #[test]
    fn labels_follow_week_start() {
        let sunday = MonthView::new(date(2026, 10, 18), Weekday::Sun);
        assert_eq!(sunday.weekday_labels()[0], "Sun");
        let monday = MonthView::new(date(2026, 10, 18), Weekday::Mon);
        assert_eq!(
            monday.weekday_labels(),
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        );
    }
}
