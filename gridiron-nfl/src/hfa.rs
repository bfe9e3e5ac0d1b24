//! Home-field advantage, estimated per phase from games played at a home venue.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

use crate::breakdown::PointBreakdownRow;
use crate::domain::error::DegenerateInput;
use crate::domain::{GameRecord, Phase, Side};

/// The mean number of points by which the home side outscores the away side, overall and per
/// phase. `overall` is the sum of the three phase components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeFieldAdvantage {
    pub overall: f64,
    pub offense: f64,
    pub defense: f64,
    pub special_teams: f64,
}
impl HomeFieldAdvantage {
    pub fn phase(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Offense => self.offense,
            Phase::Defense => self.defense,
            Phase::SpecialTeams => self.special_teams,
        }
    }

    fn from_phases(phases: [f64; Phase::COUNT]) -> Self {
        let [offense, defense, special_teams] = phases;
        Self {
            overall: offense + defense + special_teams,
            offense,
            defense,
            special_teams,
        }
    }
}

/// Estimates the home-field advantage from the breakdown rows of games not played at a neutral
/// site. A row's site is looked up in `games` by its game ID; rows with no matching game are
/// taken to have been played at a home venue.
pub fn home_field_advantage<'a>(
    breakdown: impl IntoIterator<Item = &'a PointBreakdownRow>,
    games: impl IntoIterator<Item = &'a GameRecord>,
) -> Result<HomeFieldAdvantage, DegenerateInput> {
    let neutral: FxHashSet<&str> = games
        .into_iter()
        .filter(|game| game.is_neutral())
        .map(|game| game.game_id.as_str())
        .collect();

    let mut differentials = [0.0; Phase::COUNT];
    let mut samples = 0;
    for row in breakdown
        .into_iter()
        .filter(|row| !neutral.contains(row.game_id.as_str()))
    {
        for phase in Phase::iter() {
            differentials[phase.ordinal()] +=
                row.points(Side::Home, phase) - row.points(Side::Away, phase);
        }
        samples += 1;
    }

    if samples == 0 {
        return Err(DegenerateInput::NoHomeGames);
    }
    let hfa = HomeFieldAdvantage::from_phases(differentials.map(|sum| sum / samples as f64));
    debug!("home-field advantage over {samples} games: {hfa:?}");
    Ok(hfa)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;
    use crate::domain::Site;

    fn row(game_id: &str, home: [f64; 3], away: [f64; 3]) -> PointBreakdownRow {
        PointBreakdownRow {
            game_id: game_id.into(),
            home_team: "H".into(),
            away_team: "A".into(),
            home_offensive_points: home[0],
            away_offensive_points: away[0],
            home_defensive_points: home[1],
            away_defensive_points: away[1],
            home_special_teams_points: home[2],
            away_special_teams_points: away[2],
        }
    }

    fn game(game_id: &str, site: Site) -> GameRecord {
        GameRecord {
            game_id: game_id.into(),
            season: 2024,
            week: 1,
            home_team: "H".into(),
            away_team: "A".into(),
            home_score: Some(0),
            away_score: Some(0),
            site,
        }
    }

    #[test]
    fn mean_differential_per_phase() {
        let rows = [
            row("a", [24., 0., 10.], [14., 0., 14.]),
            row("b", [30., 2., 17.], [6., 0., 4.]),
        ];
        let games = [game("a", Site::Home), game("b", Site::Home)];
        let hfa = home_field_advantage(&rows, &games).unwrap();
        assert_float_absolute_eq!(17., hfa.offense);
        assert_float_absolute_eq!(1., hfa.defense);
        assert_float_absolute_eq!(4.5, hfa.special_teams);
        assert_float_absolute_eq!(22.5, hfa.overall);
        assert_float_absolute_eq!(hfa.special_teams, hfa.phase(Phase::SpecialTeams));
    }

    #[test]
    fn neutral_games_excluded() {
        let rows = [
            row("a", [24., 0., 10.], [14., 0., 14.]),
            row("n", [100., 0., 0.], [0., 0., 0.]),
        ];
        let games = [game("a", Site::Home), game("n", Site::Neutral)];
        let hfa = home_field_advantage(&rows, &games).unwrap();
        assert_float_absolute_eq!(10., hfa.offense);
        assert_float_absolute_eq!(-4., hfa.special_teams);
        assert_float_absolute_eq!(6., hfa.overall);
    }

    #[test]
    fn all_neutral_is_degenerate() {
        let rows = [row("n", [7., 0., 0.], [3., 0., 0.])];
        let games = [game("n", Site::Neutral)];
        assert_eq!(
            Err(DegenerateInput::NoHomeGames),
            home_field_advantage(&rows, &games)
        );
        assert_eq!(
            Err(DegenerateInput::NoHomeGames),
            home_field_advantage(&Vec::<PointBreakdownRow>::new(), &games)
        );
    }
}
