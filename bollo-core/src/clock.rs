//! Source of the "current year" a projection starts from.
//!
//! The bollo calculator takes the current year as a plain argument; callers
//! obtain it from a [`Clock`] so tests can pin it.

use chrono::{Datelike, Local};

pub trait Clock {
    fn current_year(&self) -> i32;
}

/// Reads the year from the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Local::now().year()
    }
}

/// Always reports the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
