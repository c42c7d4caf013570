use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::{self, AsDay};
use crate::error::PlannerError;

pub const MIN_TARGET_DAYS: u32 = 1;
pub const MAX_TARGET_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub target_days: u32,
    pub completed_dates: HashSet<NaiveDate>,
    /// Informational only, streaks do not look at it.
    pub start_date: NaiveDate,
}

/// One cell of the seven-day progress strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub completed: bool,
}

impl Habit {
    pub fn new(name: impl Into<String>, target_days: u32, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_days,
            completed_dates: HashSet::new(),
            start_date,
        }
    }

    pub fn is_completed_on(&self, day: impl AsDay) -> bool {
        self.completed_dates.contains(&day.as_day())
    }

    /// Flip the completion mark for `day`. Returns whether it is now completed.
    pub fn toggle(&mut self, day: impl AsDay) -> bool {
        let day = day.as_day();
        if self.completed_dates.remove(&day) {
            false
        } else {
            self.completed_dates.insert(day);
            true
        }
    }

    /// Consecutive completed days ending at `reference`, counting backwards.
    ///
    /// An unfinished `reference` day means a streak of 0, even when the days
    /// before it are all completed.
    pub fn current_streak(&self, reference: impl AsDay) -> u32 {
        let mut streak = 0u32;
        let mut day = Some(reference.as_day());

        while let Some(current) = day {
            if !self.completed_dates.contains(&current) {
                break;
            }
            streak += 1;
            day = calendar::add_days(current, -1);
        }

        streak
    }

    /// Longest run of consecutive completed days anywhere in the history.
    pub fn best_streak(&self) -> u32 {
        let mut dates: Vec<NaiveDate> = self.completed_dates.iter().copied().collect();
        dates.sort();

        let mut best = 0u32;
        let mut current = 0u32;
        let mut previous: Option<NaiveDate> = None;
        for date in dates {
            current = match previous {
                Some(prev) if calendar::add_days(prev, 1) == Some(date) => current + 1,
                _ => 1,
            };
            best = best.max(current);
            previous = Some(date);
        }
        best
    }

    /// The seven days ending at `reference`, oldest first.
    pub fn weekly_progress(&self, reference: impl AsDay) -> Vec<DayProgress> {
        let reference = reference.as_day();
        (0..7)
            .rev()
            .filter_map(|days_ago| calendar::add_days(reference, -days_ago))
            .map(|date| DayProgress {
                date,
                completed: self.completed_dates.contains(&date),
            })
            .collect()
    }

    pub fn target_reached(&self, reference: impl AsDay) -> bool {
        self.current_streak(reference) >= self.target_days
    }
}

/// In-memory list of habits, in creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    fn find(&self, id: Uuid) -> Result<&Habit, PlannerError> {
        self.get(id).ok_or_else(|| PlannerError::habit_not_found(id))
    }

    fn find_mut(&mut self, id: Uuid) -> Result<&mut Habit, PlannerError> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| PlannerError::habit_not_found(id))
    }

    /// Create a habit with no completions and append it.
    pub fn add_habit(
        &mut self,
        name: &str,
        target_days: u32,
        start_date: NaiveDate,
    ) -> Result<&Habit, PlannerError> {
        let name = name.trim();
        if name.is_empty() {
            log::warn!("Rejected habit with empty name");
            return Err(PlannerError::InvalidArgument("habit name is empty".into()));
        }
        if !(MIN_TARGET_DAYS..=MAX_TARGET_DAYS).contains(&target_days) {
            log::warn!("Rejected habit {:?} with target of {} days", name, target_days);
            return Err(PlannerError::InvalidArgument(format!(
                "target days must be between {} and {}, got {}",
                MIN_TARGET_DAYS, MAX_TARGET_DAYS, target_days
            )));
        }

        let habit = Habit::new(name, target_days, start_date);
        log::debug!("Added habit {} ({:?}, {} days)", habit.id, habit.name, target_days);
        self.habits.push(habit);
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// `add_habit` starting today.
    pub fn add_habit_today(&mut self, name: &str, target_days: u32) -> Result<&Habit, PlannerError> {
        self.add_habit(name, target_days, calendar::today())
    }

    /// Flip completion of `date`'s day for the habit. Returns the new state.
    pub fn toggle_completion(&mut self, id: Uuid, date: impl AsDay) -> Result<bool, PlannerError> {
        let day = date.as_day();
        let habit = self.find_mut(id)?;
        let completed = habit.toggle(day);
        log::debug!("Habit {} on {}: completed={}", id, day, completed);
        Ok(completed)
    }

    pub fn current_streak(&self, id: Uuid, reference: impl AsDay) -> Result<u32, PlannerError> {
        Ok(self.find(id)?.current_streak(reference))
    }

    pub fn weekly_progress(
        &self,
        id: Uuid,
        reference: impl AsDay,
    ) -> Result<Vec<DayProgress>, PlannerError> {
        Ok(self.find(id)?.weekly_progress(reference))
    }

    pub fn remove_habit(&mut self, id: Uuid) -> Result<Habit, PlannerError> {
        let pos = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| PlannerError::habit_not_found(id))?;
        log::debug!("Removed habit {}", id);
        Ok(self.habits.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit_with(days: &[NaiveDate]) -> Habit {
        let mut h = Habit::new("Read", 30, date(2026, 1, 1));
        for d in days {
            h.toggle(*d);
        }
        h
    }

    #[test]
    fn streak_counts_run_ending_today() {
        let today = date(2026, 3, 2);
        let h = habit_with(&[
            today,
            date(2026, 3, 1),
            date(2026, 2, 28),
            date(2026, 2, 27),
            // gap on 2026-02-26
            date(2026, 2, 25),
        ]);
        assert_eq!(h.current_streak(today), 4);
    }

    #[test]
    fn streak_is_zero_without_today() {
        let today = date(2026, 3, 2);
        let h = habit_with(&[date(2026, 3, 1), date(2026, 2, 28)]);
        assert_eq!(h.current_streak(today), 0);
        assert_eq!(habit_with(&[]).current_streak(today), 0);
    }

    #[test]
    fn streak_for_every_run_length() {
        let today = date(2026, 1, 3);
        for k in 0..10i64 {
            let days: Vec<NaiveDate> = (0..k)
                .map(|i| calendar::add_days(today, -i).unwrap())
                .collect();
            let mut h = habit_with(&days);
            // an older completion past the gap must not count
            h.toggle(calendar::add_days(today, -(k + 1)).unwrap());
            assert_eq!(h.current_streak(today), k as u32);
        }
    }

    #[test]
    fn streak_accepts_timestamps() {
        let today = date(2026, 6, 10);
        let h = habit_with(&[today, date(2026, 6, 9)]);
        let evening = today.and_hms_opt(21, 45, 0).unwrap();
        assert_eq!(h.current_streak(evening), 2);
    }

    #[test]
    fn toggle_is_an_involution() {
        let mut h = habit_with(&[date(2026, 4, 1)]);
        let before = h.completed_dates.clone();
        let noon = date(2026, 4, 2).and_hms_opt(12, 0, 0).unwrap();

        assert!(h.toggle(noon));
        assert!(h.is_completed_on(date(2026, 4, 2)));
        assert!(!h.toggle(date(2026, 4, 2).and_hms_opt(8, 0, 0).unwrap()));
        assert_eq!(h.completed_dates, before);
    }

    #[test]
    fn best_streak_finds_longest_run() {
        let h = habit_with(&[
            date(2026, 1, 30),
            date(2026, 1, 31),
            date(2026, 2, 1),
            date(2026, 2, 5),
            date(2026, 2, 6),
        ]);
        assert_eq!(h.best_streak(), 3);
        assert_eq!(habit_with(&[]).best_streak(), 0);
    }

    #[test]
    fn weekly_progress_covers_seven_days() {
        let today = date(2026, 3, 3);
        let h = habit_with(&[today, date(2026, 2, 26), date(2026, 2, 20)]);
        let week = h.weekly_progress(today);

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(2026, 2, 25));
        assert_eq!(week[6].date, today);
        assert!(week.windows(2).all(|w| w[0].date < w[1].date));

        let done: Vec<NaiveDate> = week.iter().filter(|p| p.completed).map(|p| p.date).collect();
        assert_eq!(done, vec![date(2026, 2, 26), today]);
    }

    #[test]
    fn target_reached_uses_current_streak() {
        let today = date(2026, 3, 3);
        let mut h = habit_with(&[today, date(2026, 3, 2)]);
        h.target_days = 2;
        assert!(h.target_reached(today));
        h.target_days = 3;
        assert!(!h.target_reached(today));
    }

    #[test]
    fn store_add_toggle_streak() {
        let today = date(2026, 10, 18);
        let mut store = HabitStore::new();
        let id = store.add_habit("Read", 30, today).unwrap().id;

        assert_eq!(store.toggle_completion(id, today), Ok(true));
        assert_eq!(store.toggle_completion(id, date(2026, 10, 17)), Ok(true));
        assert_eq!(store.current_streak(id, today), Ok(2));

        let habit = store.get(id).unwrap();
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.start_date, today);
    }

    #[test]
    fn store_rejects_invalid_input() {
        let today = date(2026, 10, 18);
        let mut store = HabitStore::new();
        assert!(matches!(
            store.add_habit("   ", 10, today),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.add_habit("Run", 0, today),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.add_habit("Run", 366, today),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(store.is_empty());

        assert!(store.add_habit("Run", 1, today).is_ok());
        assert!(store.add_habit("Swim", 365, today).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn store_unknown_id_is_not_found() {
        let mut store = HabitStore::new();
        store.add_habit("Read", 30, date(2026, 1, 1)).unwrap();
        let missing = Uuid::new_v4();

        let err = store.toggle_completion(missing, date(2026, 1, 1)).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.current_streak(missing, date(2026, 1, 1)).is_err());
        assert!(store.weekly_progress(missing, date(2026, 1, 1)).is_err());
        assert!(store.remove_habit(missing).is_err());
        assert!(store.habits()[0].completed_dates.is_empty());
    }

    #[test]
    fn store_remove_habit() {
        let mut store = HabitStore::new();
        let a = store.add_habit("A", 5, date(2026, 1, 1)).unwrap().id;
        let b = store.add_habit("B", 5, date(2026, 1, 1)).unwrap().id;

        let removed = store.remove_habit(a).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(store.habits().len(), 1);
        assert_eq!(store.habits()[0].id, b);
    }
}
