use log::Log;

use crate::config::DaybookConfig;

/// Journal logger that lets `daybook` records through at Info (Debug when
/// debug logging is on) and everything else at Warn.
struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

fn is_own_target(target: &str) -> bool {
    target.starts_with("daybook")
}

fn level_for(target: &str) -> log::LevelFilter {
    if is_own_target(target) {
        if crate::debug_logging() {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    } else {
        log::LevelFilter::Warn
    }
}

impl Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= level_for(metadata.target())
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the journal logger (`journalctl --user -t daybook -f`).
pub fn init(config: &DaybookConfig) -> Result<(), Box<dyn std::error::Error>> {
    let journal = systemd_journal_logger::JournalLog::new()?.with_syslog_identifier("daybook".to_string());

    crate::set_debug_logging(config.debug_logging);

    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
    // Global max must be Debug so debug records can pass once toggled on
    log::set_max_level(log::LevelFilter::Debug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_crates_are_limited_to_warn() {
        assert_eq!(level_for("tokio::runtime"), log::LevelFilter::Warn);
        assert!(is_own_target("daybook::core::habit"));
        assert!(level_for("daybook::auth") >= log::LevelFilter::Info);
    }
}
