use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::error::MissingData;
use crate::domain::{CandidateGame, Phase, Team};
use crate::hfa::HomeFieldAdvantage;
use crate::model::Ratings;

/// Predicted home-minus-away point spreads for a candidate game.
///
/// `spread` is projected from the overall ratings and is not the sum of the phase spreads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub game_id: String,
    pub home_team: Team,
    pub away_team: Team,
    pub neutral: bool,
    pub spread: f64,
    pub spread_o: f64,
    pub spread_d: f64,
    pub spread_st: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SpreadPredictor<'a> {
    ratings: &'a Ratings,
    hfa: &'a HomeFieldAdvantage,
}
impl<'a> SpreadPredictor<'a> {
    pub fn new(ratings: &'a Ratings, hfa: &'a HomeFieldAdvantage) -> Self {
        Self { ratings, hfa }
    }

    /// Predicts a single game. A team without a rating fails this game only.
    pub fn predict(&self, game: &CandidateGame) -> Result<Prediction, MissingData> {
        let home = self.ratings.get(&game.home_team)?;
        let away = self.ratings.get(&game.away_team)?;
        let home_venue = if game.neutral { 0.0 } else { 1.0 };
        let phase_spread = |phase: Phase| {
            home.phase(phase) - away.phase(phase) + self.hfa.phase(phase) * home_venue
        };
        let prediction = Prediction {
            game_id: game.game_id.clone(),
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            neutral: game.neutral,
            spread: home.srs - away.srs + self.hfa.overall * home_venue,
            spread_o: phase_spread(Phase::Offense),
            spread_d: phase_spread(Phase::Defense),
            spread_st: phase_spread(Phase::SpecialTeams),
        };
        trace!("{prediction:?}");
        Ok(prediction)
    }
}

/// Predicts every candidate game. Fails on the first game involving a team without a rating.
pub fn predict_spreads<'a>(
    ratings: &Ratings,
    hfa: &HomeFieldAdvantage,
    candidates: impl IntoIterator<Item = &'a CandidateGame>,
) -> Result<Vec<Prediction>, MissingData> {
    let predictor = SpreadPredictor::new(ratings, hfa);
    candidates
        .into_iter()
        .map(|game| predictor.predict(game))
        .collect()
}

/// Predicts every candidate game independently, so that an unrated team fails only the games it
/// plays in.
pub fn predict_each<'a>(
    ratings: &Ratings,
    hfa: &HomeFieldAdvantage,
    candidates: impl IntoIterator<Item = &'a CandidateGame>,
) -> Vec<Result<Prediction, MissingData>> {
    let predictor = SpreadPredictor::new(ratings, hfa);
    candidates
        .into_iter()
        .map(|game| predictor.predict(game))
        .collect()
}
