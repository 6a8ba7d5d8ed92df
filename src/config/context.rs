//! Runtime context handed to the services
//!
//! Bundles the loaded [`AppConfig`] with a [`Clock`] so that "today" can be
//! pinned in tests. Services receive it explicitly; nothing reads
//! configuration from globals.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::app_config::AppConfig;

/// Source of the current date for period windows
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The local system date
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Clone)]
pub struct Context {
    pub config: AppConfig,
    clock: Arc<dyn Clock>,
}

impl Context {
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Context using the system clock
    pub fn system(config: AppConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Context pinned to `today`
    pub fn fixed(config: AppConfig, today: NaiveDate) -> Self {
        Self::new(config, Arc::new(FixedClock(today)))
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("today", &self.today())
            .finish()
    }
}
