//! The rating model: fitting per-phase team ratings and projecting them onto future games.

use std::error::Error;

use anyhow::bail;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use gridiron::linear::lstsq::SolveError;

use crate::breakdown::{compute_point_breakdown, PointBreakdownRow};
use crate::domain::error::{DegenerateInput, MissingData};
use crate::domain::{CandidateGame, GameRecord, Phase, PlayRecord, Team};
use crate::hfa::HomeFieldAdvantage;
use crate::model::rating_fitter::{fit_ratings, FitDiagnostics, RatingFit};
use crate::model::spread_predictor::{predict_each, predict_spreads, Prediction};
use crate::source::{PlaySource, ScheduleSource};
use crate::week::{filter_weekly, Window};

pub mod rating_fitter;
pub mod simple_srs;
pub mod spread_predictor;


#[derive(Debug, Error)]
pub enum FitError {
    #[error("{0}")]
    MissingData(#[from] MissingData),

    #[error("{0}")]
    DegenerateInput(#[from] DegenerateInput),

    #[error("{0}")]
    Solve(#[from] SolveError),

    #[error("{0}")]
    InvalidOptions(#[from] InvalidOptions),
}

#[derive(Debug, Error)]
#[error("invalid fit options: {0}")]
pub struct InvalidOptions(#[from] pub Box<dyn Error + Send + Sync>);

impl From<anyhow::Error> for InvalidOptions {
    fn from(err: anyhow::Error) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FitOptions {
    /// Singular values at or below this fraction of the largest are treated as zero. `None`
    /// scales machine epsilon by the larger dimension of the design.
    pub rcond: Option<f64>,
}
impl FitOptions {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(rcond) = self.rcond {
            if !rcond.is_finite() || !(0.0..1.0).contains(&rcond) {
                bail!("rcond must be in the range [0, 1), got {rcond}");
            }
        }
        Ok(())
    }
}

/// The fitted ratings of one team.
///
/// `srs` is the sum of the three sub-ratings before they were centred, so it need not equal
/// `srs_o + srs_d + srs_st`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
    pub team: Team,
    pub mov: f64,
    pub sos: f64,
    pub srs: f64,
    pub srs_o: f64,
    pub srs_d: f64,
    pub srs_st: f64,
}
impl RatingRow {
    pub fn phase(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Offense => self.srs_o,
            Phase::Defense => self.srs_d,
            Phase::SpecialTeams => self.srs_st,
        }
    }
}

/// A rating table, ordered by team, with lookup by team code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ratings {
    rows: Vec<RatingRow>,
    positions: FxHashMap<Team, usize>,
}
impl Ratings {
    pub fn get(&self, team: &Team) -> Result<&RatingRow, MissingData> {
        self.positions
            .get(team)
            .map(|&position| &self.rows[position])
            .ok_or_else(|| MissingData::Rating { team: team.clone() })
    }

    pub fn rows(&self) -> &[RatingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extracts one column of the table.
    pub fn column(&self, extract: impl Fn(&RatingRow) -> f64) -> Vec<f64> {
        self.rows.iter().map(extract).collect()
    }
}

impl From<Vec<RatingRow>> for Ratings {
    fn from(mut rows: Vec<RatingRow>) -> Self {
        rows.sort_by(|a, b| a.team.cmp(&b.team));
        let positions = rows
            .iter()
            .enumerate()
            .map(|(position, row)| (row.team.clone(), position))
            .collect();
        Self { rows, positions }
    }
}

impl<'a> IntoIterator for &'a Ratings {
    type Item = &'a RatingRow;
    type IntoIter = std::slice::Iter<'a, RatingRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// A fitted model, frozen for prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct SrsModel {
    window: Window,
    fit: RatingFit,
}
impl SrsModel {
    /// Fits the model to games and their point breakdown.
    pub fn fit(
        games: &[GameRecord],
        breakdown: &[PointBreakdownRow],
        window: Window,
        options: &FitOptions,
    ) -> Result<Self, FitError> {
        let fit = fit_ratings(games, breakdown, &window, options)?;
        Ok(Self { window, fit })
    }

    /// Fits the model to games and the play-by-play records they were scored from. Only plays
    /// inside the window are broken down.
    pub fn from_plays(
        games: &[GameRecord],
        plays: &[PlayRecord],
        window: Window,
        options: &FitOptions,
    ) -> Result<Self, FitError> {
        let breakdown = compute_point_breakdown(filter_weekly(plays, &window));
        Self::fit(games, &breakdown, window, options)
    }

    /// Pulls the window's seasons from the given source and fits the model to them.
    pub fn from_source<S>(source: &S, window: Window, options: &FitOptions) -> Result<Self, anyhow::Error>
    where
        S: ScheduleSource + PlaySource,
    {
        let games = source.schedule(window.seasons())?;
        let plays = source.plays(window.seasons())?;
        debug!(
            "loaded {} games and {} plays for {window}",
            games.len(),
            plays.len()
        );
        Ok(Self::from_plays(&games, &plays, window, options)?)
    }

    pub fn predict<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a CandidateGame>,
    ) -> Result<Vec<Prediction>, MissingData> {
        predict_spreads(&self.fit.ratings, &self.fit.hfa, candidates)
    }

    /// As [SrsModel::predict], but each game succeeds or fails on its own.
    pub fn predict_each<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a CandidateGame>,
    ) -> Vec<Result<Prediction, MissingData>> {
        predict_each(&self.fit.ratings, &self.fit.hfa, candidates)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn ratings(&self) -> &Ratings {
        &self.fit.ratings
    }

    pub fn hfa(&self) -> &HomeFieldAdvantage {
        &self.fit.hfa
    }

    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.fit.diagnostics
    }
}
