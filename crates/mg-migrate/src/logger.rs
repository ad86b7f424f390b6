//! Progress logging for migration runs
//!
//! The runner never writes to a global sink directly. It reports through a
//! [`MigrationLogger`] supplied when the [`crate::Migrator`] is built, and
//! falls back to [`LogCrateLogger`].

use std::fmt;

/// Receiver for formatted progress messages
pub trait MigrationLogger {
    /// Routine progress
    fn info(&self, args: fmt::Arguments<'_>);

    /// Something looks off but the run continues
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.info(args);
    }
}

/// Default logger, forwards to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateLogger;

impl MigrationLogger for LogCrateLogger {
    fn info(&self, args: fmt::Arguments<'_>) {
        log::info!("{args}");
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        log::warn!("{args}");
    }
}

impl<F> MigrationLogger for F
where
    F: Fn(fmt::Arguments<'_>),
{
    fn info(&self, args: fmt::Arguments<'_>) {
        self(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_logger_receives_formatted_text() {
        let lines = RefCell::new(Vec::new());
        let logger = |args: fmt::Arguments<'_>| lines.borrow_mut().push(args.to_string());

        logger.info(format_args!("last migration version: {}", 4));
        logger.warn(format_args!("plain"));

        assert_eq!(
            lines.into_inner(),
            vec!["last migration version: 4".to_string(), "plain".to_string()]
        );
    }

    #[test]
    fn test_log_crate_logger_is_object_safe() {
        let logger: Box<dyn MigrationLogger> = Box::new(LogCrateLogger);
        logger.info(format_args!("no migrations found"));
    }
}
