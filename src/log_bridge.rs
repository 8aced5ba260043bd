// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes records from the [`log`] facade into gardens.
//!
//! Each record's target is split on `::` and looked up through a [`Manager`], so
//! `log::warn!(target: "net::http", "slow")` prints `[net][http][warning] slow` below
//! the manager's garden.
//!
//! | `log` level      | garden operation                      |
//! |------------------|---------------------------------------|
//! | `Error`          | [`failure`](crate::Garden::failure)   |
//! | `Warn`           | [`warning`](crate::Garden::warning)   |
//! | `Info`           | [`info`](crate::Garden::info)         |
//! | `Debug`, `Trace` | [`debug`](crate::Garden::debug)       |
//!
//! Debug and trace records therefore only show up in verbose scopes.

use crate::manager::Manager;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// A [`log::Log`] implementation backed by a [`Manager`].
#[derive(Debug, Clone)]
pub struct GardenLogger {
    manager: Manager,
    level: LevelFilter,
}

impl GardenLogger {
    pub fn new(manager: Manager, level: LevelFilter) -> Self {
        GardenLogger { manager, level }
    }

    /// Installs this logger as the process-wide `log` logger.
    ///
    /// Fails if another logger was installed first.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for GardenLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let garden = self
            .manager
            .scope(record.target().split("::").filter(|s| !s.is_empty()));
        let text = record.args().to_string();
        match record.level() {
            Level::Error => garden.failure(text),
            Level::Warn => garden.warning(text),
            Level::Info => garden.info(text),
            Level::Debug | Level::Trace => {
                garden.debug(text);
            }
        }
    }

    fn flush(&self) {}
}

/// Installs a [`GardenLogger`] for `manager` at `level`.
pub fn init(manager: Manager, level: LevelFilter) -> Result<(), SetLoggerError> {
    GardenLogger::new(manager, level).install()
}
