pub mod calendar;
pub mod habit;
pub mod month_view;
pub mod task;
