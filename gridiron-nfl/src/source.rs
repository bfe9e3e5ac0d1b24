//! Providers of schedule and play-by-play records.

use std::ops::RangeInclusive;

use crate::domain::{GameRecord, PlayRecord};

/// A provider of game schedules and results.
pub trait ScheduleSource {
    /// Every game of the given seasons, played or not.
    fn schedule(&self, seasons: RangeInclusive<u16>) -> Result<Vec<GameRecord>, anyhow::Error>;
}

/// A provider of play-by-play records.
pub trait PlaySource {
    fn plays(&self, seasons: RangeInclusive<u16>) -> Result<Vec<PlayRecord>, anyhow::Error>;
}
