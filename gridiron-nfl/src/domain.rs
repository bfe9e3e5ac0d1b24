use std::borrow::Borrow;
use std::fmt::Formatter;

use ordinalizer::Ordinal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

use crate::week::{NflWeek, Weekly};

pub mod error;

/// A team's abbreviation, e.g., `"BUF"`. Teams order lexicographically by their code.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team(String);
impl Team {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Team {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl Borrow<str> for Team {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Site {
    Home,
    Away,
    Neutral,
}
impl Site {
    pub fn is_neutral(&self) -> bool {
        matches!(self, Site::Neutral)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// A phase of the game that a point can be attributed to. The ordinal doubles as the index of the
/// phase's block in the rating parameter vector.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Ordinal, EnumCount, EnumIter, Display)]
pub enum Phase {
    Offense,
    Defense,
    SpecialTeams,
}

/// A scheduled (and possibly played) game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub season: u16,
    pub week: u8,
    pub home_team: Team,
    pub away_team: Team,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub site: Site,
}
impl GameRecord {
    /// The final score as a `(home, away)` pair, if the game has been played.
    pub fn scores(&self) -> Option<(u16, u16)> {
        self.home_score.zip(self.away_score)
    }

    pub fn is_played(&self) -> bool {
        self.scores().is_some()
    }

    pub fn is_neutral(&self) -> bool {
        self.site.is_neutral()
    }
}

impl Weekly for GameRecord {
    fn nfl_week(&self) -> NflWeek {
        NflWeek::new(self.season, self.week)
    }
}

/// A single play within a game. Scores are those of the possessing (`posteam`) and defending
/// (`defteam`) sides, before and after the play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub game_id: String,
    pub season: u16,
    pub week: u8,
    pub home_team: Team,
    pub away_team: Team,
    pub posteam: Option<Team>,
    pub defteam: Option<Team>,
    pub posteam_score: u16,
    pub defteam_score: u16,
    pub posteam_score_post: u16,
    pub defteam_score_post: u16,
    pub scoring: bool,
    pub special: bool,
}
impl PlayRecord {
    /// Points gained by the possessing team on this play.
    pub fn offensive_points(&self) -> f64 {
        self.posteam_score_post as f64 - self.posteam_score as f64
    }

    /// Points gained by the defending team on this play, e.g., from a safety or a return.
    pub fn defensive_points(&self) -> f64 {
        self.defteam_score_post as f64 - self.defteam_score as f64
    }

    pub fn possession(&self) -> Option<Side> {
        self.side_of(self.posteam.as_ref())
    }

    pub fn defense(&self) -> Option<Side> {
        self.side_of(self.defteam.as_ref())
    }

    fn side_of(&self, team: Option<&Team>) -> Option<Side> {
        match team {
            Some(team) if *team == self.home_team => Some(Side::Home),
            Some(team) if *team == self.away_team => Some(Side::Away),
            _ => None,
        }
    }
}

impl Weekly for PlayRecord {
    fn nfl_week(&self) -> NflWeek {
        NflWeek::new(self.season, self.week)
    }
}

/// A game to be predicted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateGame {
    pub game_id: String,
    pub home_team: Team,
    pub away_team: Team,
    pub neutral: bool,
}

impl From<&GameRecord> for CandidateGame {
    fn from(game: &GameRecord) -> Self {
        Self {
            game_id: game.game_id.clone(),
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            neutral: game.is_neutral(),
        }
    }
}

/// The distinct teams appearing in a set of games, sorted by code, along with each team's
/// position in that order.
#[derive(Clone, Debug, Default)]
pub struct TeamIndex {
    teams: Vec<Team>,
    positions: FxHashMap<Team, usize>,
}
impl TeamIndex {
    pub fn from_games<'a>(games: impl IntoIterator<Item = &'a GameRecord>) -> Self {
        let mut teams: Vec<Team> = games
            .into_iter()
            .flat_map(|game| [game.home_team.clone(), game.away_team.clone()])
            .collect();
        teams.sort();
        teams.dedup();
        let positions = teams
            .iter()
            .enumerate()
            .map(|(position, team)| (team.clone(), position))
            .collect();
        Self { teams, positions }
    }

    pub fn position(&self, team: &Team) -> Option<usize> {
        self.positions.get(team).copied()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
