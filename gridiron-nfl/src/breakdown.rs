//! Attribution of points to the offensive, defensive and special-teams units of either side.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::error::MissingData;
use crate::domain::{Phase, PlayRecord, Side, Team};

/// Points scored in a game, broken down by side and by the unit that scored them.
///
/// Defensive points are those a side's defense scored itself (e.g., a safety or an interception
/// return), not the points it conceded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointBreakdownRow {
    pub game_id: String,
    pub home_team: Team,
    pub away_team: Team,
    pub home_offensive_points: f64,
    pub away_offensive_points: f64,
    pub home_defensive_points: f64,
    pub away_defensive_points: f64,
    pub home_special_teams_points: f64,
    pub away_special_teams_points: f64,
}
impl PointBreakdownRow {
    fn empty(game_id: &str, home_team: &Team, away_team: &Team) -> Self {
        Self {
            game_id: game_id.into(),
            home_team: home_team.clone(),
            away_team: away_team.clone(),
            home_offensive_points: 0.,
            away_offensive_points: 0.,
            home_defensive_points: 0.,
            away_defensive_points: 0.,
            home_special_teams_points: 0.,
            away_special_teams_points: 0.,
        }
    }

    pub fn points(&self, side: Side, phase: Phase) -> f64 {
        match (side, phase) {
            (Side::Home, Phase::Offense) => self.home_offensive_points,
            (Side::Home, Phase::Defense) => self.home_defensive_points,
            (Side::Home, Phase::SpecialTeams) => self.home_special_teams_points,
            (Side::Away, Phase::Offense) => self.away_offensive_points,
            (Side::Away, Phase::Defense) => self.away_defensive_points,
            (Side::Away, Phase::SpecialTeams) => self.away_special_teams_points,
        }
    }

    fn points_mut(&mut self, side: Side, phase: Phase) -> &mut f64 {
        match (side, phase) {
            (Side::Home, Phase::Offense) => &mut self.home_offensive_points,
            (Side::Home, Phase::Defense) => &mut self.home_defensive_points,
            (Side::Home, Phase::SpecialTeams) => &mut self.home_special_teams_points,
            (Side::Away, Phase::Offense) => &mut self.away_offensive_points,
            (Side::Away, Phase::Defense) => &mut self.away_defensive_points,
            (Side::Away, Phase::SpecialTeams) => &mut self.away_special_teams_points,
        }
    }

    pub fn total(&self, side: Side) -> f64 {
        self.points(side, Phase::Offense)
            + self.points(side, Phase::Defense)
            + self.points(side, Phase::SpecialTeams)
    }

    /// Credits one scoring play to the units responsible for it.
    fn attribute(&mut self, play: &PlayRecord) {
        let (offensive_points, defensive_points) = (play.offensive_points(), play.defensive_points());
        let (possession, defense) = (play.possession(), play.defense());
        if play.special {
            // both sides of a kicking play belong to special teams
            if let Some(side) = possession {
                *self.points_mut(side, Phase::SpecialTeams) += offensive_points;
            }
            if let Some(side) = defense {
                *self.points_mut(side, Phase::SpecialTeams) += defensive_points;
            }
        } else {
            if let Some(side) = possession {
                *self.points_mut(side, Phase::Offense) += offensive_points;
            }
            if let Some(side) = defense {
                *self.points_mut(side, Phase::Defense) += defensive_points;
            }
        }
    }
}

/// Derives one [PointBreakdownRow] per game from play-by-play records, ordered by game ID. Plays
/// that are not flagged as scoring are ignored; a game without a scoring play yields no row.
pub fn compute_point_breakdown<'a>(
    plays: impl IntoIterator<Item = &'a PlayRecord>,
) -> Vec<PointBreakdownRow> {
    let mut rows: BTreeMap<&str, PointBreakdownRow> = BTreeMap::new();
    for play in plays.into_iter().filter(|play| play.scoring) {
        trace!(
            "{}: {:?} scored {}, {:?} scored {}, special: {}",
            play.game_id,
            play.posteam,
            play.offensive_points(),
            play.defteam,
            play.defensive_points(),
            play.special
        );
        rows.entry(&play.game_id)
            .or_insert_with(|| PointBreakdownRow::empty(&play.game_id, &play.home_team, &play.away_team))
            .attribute(play);
    }
    rows.into_values().collect()
}

/// Point breakdown rows keyed by game ID.
#[derive(Debug, Default)]
pub struct BreakdownIndex<'a> {
    rows: FxHashMap<&'a str, &'a PointBreakdownRow>,
}
impl<'a> BreakdownIndex<'a> {
    pub fn new(rows: &'a [PointBreakdownRow]) -> Self {
        Self {
            rows: rows.iter().map(|row| (row.game_id.as_str(), row)).collect(),
        }
    }

    pub fn get(&self, game_id: &str) -> Result<&'a PointBreakdownRow, MissingData> {
        self.rows
            .get(game_id)
            .copied()
            .ok_or_else(|| MissingData::PointBreakdown {
                game_id: game_id.into(),
            })
    }
}
