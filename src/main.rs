use chrono::Datelike;

use daybook::config::DaybookConfig;
use daybook::core::calendar;
use daybook::core::month_view::MonthView;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DaybookConfig::load();

    if let Err(e) = daybook::logging::init(&config) {
        eprintln!("daybook: journal logging unavailable: {}", e);
    }

    let today = calendar::today();
    let mut view = MonthView::new(today, config.week_start);

    // Optional month offset, e.g. `daybook -1` for last month
    if let Some(arg) = std::env::args().nth(1) {
        let offset: i32 = arg.parse()?;
        view.shift_months(offset);
    }

    log::debug!("Printing {} starting on {}", view.title(), config.week_start);

    println!("{:^27}", view.title());
    println!(
        "{}",
        view.weekday_labels()
            .iter()
            .map(|l| format!("{:>3}", &l[..2]))
            .collect::<Vec<_>>()
            .join(" ")
    );

    for week in view.grid().weeks() {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(day) if *day == today => format!("{:>2}*", day.day()),
                Some(day) => format!("{:>3}", day.day()),
                None => "   ".to_string(),
            })
            .collect();
        println!("{}", line.join(" ").trim_end());
    }

    Ok(())
}
