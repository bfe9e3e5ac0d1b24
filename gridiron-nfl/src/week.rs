//! Season and week arithmetic, and selection of records by week window.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A week of an NFL season. Weeks past the end of the regular season are postseason weeks.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NflWeek {
    pub season: u16,
    pub week: u8,
}
impl NflWeek {
    pub const fn new(season: u16, week: u8) -> Self {
        Self { season, week }
    }

    pub const fn season_start(season: u16) -> Self {
        Self::new(season, 1)
    }

    /// The final week of the regular season.
    pub const fn season_end(season: u16) -> Self {
        Self::new(season, regular_season_weeks(season))
    }

    pub fn is_postseason(&self) -> bool {
        self.week > regular_season_weeks(self.season)
    }

    /// The next regular-season week, rolling over into the following season after the last week.
    pub fn next(&self) -> Self {
        if self.week >= regular_season_weeks(self.season) {
            Self::season_start(self.season + 1)
        } else {
            Self::new(self.season, self.week + 1)
        }
    }
}

impl Display for NflWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Week {}", self.season, self.week)
    }
}

/// Number of regular-season weeks in a season, bye weeks included.
pub const fn regular_season_weeks(season: u16) -> u8 {
    match season {
        0..=1977 => 14,
        1978..=1989 => 16,
        1993 => 18,
        1990..=2020 => 17,
        _ => 18,
    }
}

/// Implemented by records that belong to a specific week.
pub trait Weekly {
    fn nfl_week(&self) -> NflWeek;
}

/// An inclusive range of weeks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NflWeek,
    pub end: NflWeek,
}
impl Window {
    const EARLIEST: NflWeek = NflWeek::new(1900, 1);
    const LATEST: NflWeek = NflWeek::new(2100, 1);

    pub fn new(start: NflWeek, end: NflWeek) -> Self {
        Self { start, end }
    }

    /// From `start` onwards.
    pub fn starting(start: NflWeek) -> Self {
        Self::new(start, Self::LATEST)
    }

    /// Up to and including `end`.
    pub fn until(end: NflWeek) -> Self {
        Self::new(Self::EARLIEST, end)
    }

    pub fn all() -> Self {
        Self::new(Self::EARLIEST, Self::LATEST)
    }

    pub fn regular_season(season: u16) -> Self {
        Self::new(NflWeek::season_start(season), NflWeek::season_end(season))
    }

    /// The whole season, postseason included.
    pub fn season(season: u16) -> Self {
        Self::new(NflWeek::season_start(season), NflWeek::new(season, u8::MAX))
    }

    pub fn contains(&self, week: &NflWeek) -> bool {
        self.start <= *week && *week <= self.end
    }

    pub fn seasons(&self) -> std::ops::RangeInclusive<u16> {
        self.start.season..=self.end.season
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Retains the records that fall inside the given window.
pub fn filter_weekly<'a, W: Weekly>(
    records: &'a [W],
    window: &Window,
) -> impl Iterator<Item = &'a W> + 'a {
    let window = *window;
    records
        .iter()
        .filter(move |record| window.contains(&record.nfl_week()))
}

/// Retains the records whose season is in `start_season..=end_season`.
pub fn filter_seasonally<W: Weekly>(
    records: &[W],
    start_season: u16,
    end_season: u16,
) -> impl Iterator<Item = &W> {
    records.iter().filter(move |record| {
        let season = record.nfl_week().season;
        start_season <= season && season <= end_season
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row(u16, u8, &'static str);

    impl Weekly for Row {
        fn nfl_week(&self) -> NflWeek {
            NflWeek::new(self.0, self.1)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row(2022, 1, "Team A"),
            Row(2023, 2, "Team B"),
            Row(2023, 3, "Team C"),
            Row(2024, 1, "Team D"),
        ]
    }

    fn labels<'a>(filtered: impl Iterator<Item = &'a Row>) -> Vec<&'static str> {
        filtered.map(|row| row.2).collect()
    }

    #[test]
    fn filter_between_weeks() {
        let rows = rows();
        let window = Window::new(NflWeek::new(2023, 2), NflWeek::new(2023, 3));
        assert_eq!(vec!["Team B", "Team C"], labels(filter_weekly(&rows, &window)));
    }

    #[test]
    fn filter_until_week() {
        let rows = rows();
        let window = Window::until(NflWeek::new(2023, 3));
        assert_eq!(
            vec!["Team A", "Team B", "Team C"],
            labels(filter_weekly(&rows, &window))
        );
    }

    #[test]
    fn filter_from_week() {
        let rows = rows();
        let window = Window::starting(NflWeek::new(2023, 2));
        assert_eq!(
            vec!["Team B", "Team C", "Team D"],
            labels(filter_weekly(&rows, &window))
        );
    }

    #[test]
    fn filter_across_seasons() {
        let rows = rows();
        let window = Window::new(NflWeek::new(2022, 2), NflWeek::new(2024, 1));
        assert_eq!(
            vec!["Team B", "Team C", "Team D"],
            labels(filter_weekly(&rows, &window))
        );
        assert_eq!(2022..=2024, window.seasons());
    }

    #[test]
    fn filter_by_season() {
        let rows = rows();
        assert_eq!(
            vec!["Team B", "Team C"],
            labels(filter_seasonally(&rows, 2023, 2023))
        );
        assert!(labels(filter_seasonally(&rows, 2025, 2030)).is_empty());
    }

    #[test]
    fn season_lengths() {
        assert_eq!(14, regular_season_weeks(1970));
        assert_eq!(16, regular_season_weeks(1985));
        assert_eq!(17, regular_season_weeks(1990));
        assert_eq!(18, regular_season_weeks(1993));
        assert_eq!(17, regular_season_weeks(2020));
        assert_eq!(18, regular_season_weeks(2021));
        assert_eq!(18, regular_season_weeks(2024));
    }

    #[test]
    fn next_rolls_over_season() {
        assert_eq!(NflWeek::new(2024, 2), NflWeek::new(2024, 1).next());
        assert_eq!(NflWeek::new(2021, 1), NflWeek::new(2020, 17).next());
        assert_eq!(NflWeek::new(2025, 1), NflWeek::season_end(2024).next());
        assert!(NflWeek::new(2024, 19).is_postseason());
        assert!(!NflWeek::new(2024, 18).is_postseason());
    }

    #[test]
    fn window_bounds() {
        let window = Window::regular_season(2024);
        assert!(window.contains(&NflWeek::new(2024, 1)));
        assert!(window.contains(&NflWeek::new(2024, 18)));
        assert!(!window.contains(&NflWeek::new(2024, 19)));
        assert!(Window::season(2024).contains(&NflWeek::new(2024, 22)));
        assert!(Window::new(NflWeek::new(2024, 5), NflWeek::new(2024, 4)).is_empty());
        assert_eq!("2024 Week 1 to 2024 Week 18", window.to_string());
    }
}
