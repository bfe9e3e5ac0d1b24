//! Least-squares estimation of offensive, defensive and special-teams ratings.
//!
//! Each played game contributes three equations, net of home-field advantage:
//!
//! ```text
//! home_offense - away_defense - hfa_o·[home venue] = O[home] - D[away]
//! away_offense - home_defense + hfa_d·[home venue] = O[away] - D[home]
//! home_special - away_special - hfa_st·[home venue] = ST[home] - ST[away]
//! ```
//!
//! The unknowns are ordered as the offensive ratings of all teams (sorted by code), then the
//! defensive ratings, then the special-teams ratings. The design always has a null space, since a
//! common shift of every offensive and defensive rating (and, separately, of every special-teams
//! rating) leaves each equation unchanged. The minimum-norm solution is taken and each sub-rating
//! is then centred on zero.
//!
//! The fit proceeds through [DataLoaded], [EquationsBuilt] and [Solved] before producing the
//! normalised [RatingFit]; each stage consumes its predecessor.

use rustc_hash::FxHashMap;
use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, trace, warn};

use gridiron::linear::lstsq;
use gridiron::linear::lstsq::Solution;
use gridiron::linear::matrix::Matrix;

use crate::breakdown::{BreakdownIndex, PointBreakdownRow};
use crate::domain::error::DegenerateInput;
use crate::domain::{GameRecord, Phase, Team, TeamIndex};
use crate::hfa::{home_field_advantage, HomeFieldAdvantage};
use crate::model::{FitError, FitOptions, InvalidOptions, RatingRow, Ratings};
use crate::mov::margin_of_victory;
use crate::week::{filter_weekly, Window};

/// Number of translations that leave every equation unchanged: one shared by the offensive and
/// defensive blocks and one for the special-teams block.
const STRUCTURAL_NULLITY: usize = 2;

/// The outcome of a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingFit {
    pub ratings: Ratings,
    pub hfa: HomeFieldAdvantage,
    pub diagnostics: FitDiagnostics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitDiagnostics {
    pub teams: usize,
    pub games: usize,
    pub equations: usize,
    /// Effective rank of the design matrix.
    pub rank: usize,
    /// One per unknown.
    pub expected_rank: usize,
    /// The highest rank the design can reach: the unknowns less the structural nullity.
    pub identifiable_rank: usize,
    pub r_squared: f64,
}
impl FitDiagnostics {
    /// Whether some ratings are not identified beyond the shifts removed by centring, as happens
    /// when the schedule splits the league into disconnected groups.
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.identifiable_rank
    }
}

fn identifiable_rank(unknowns: usize) -> usize {
    unknowns.saturating_sub(STRUCTURAL_NULLITY)
}

/// Fits ratings to the played games inside `window`. Every such game must have a row in
/// `breakdown`.
pub fn fit_ratings(
    games: &[GameRecord],
    breakdown: &[PointBreakdownRow],
    window: &Window,
    options: &FitOptions,
) -> Result<RatingFit, FitError> {
    options.validate().map_err(InvalidOptions::from)?;
    let loaded = DataLoaded::load(games, breakdown, window)?;
    let built = loaded.build_equations();
    let solved = built.solve(options.rcond)?;
    Ok(solved.normalise())
}

/// The played games of the window, paired with their point breakdown.
#[derive(Debug)]
pub struct DataLoaded<'a> {
    games: Vec<(&'a GameRecord, &'a PointBreakdownRow)>,
    teams: TeamIndex,
    hfa: HomeFieldAdvantage,
    margins: FxHashMap<Team, f64>,
}
impl<'a> DataLoaded<'a> {
    pub fn load(
        games: &'a [GameRecord],
        breakdown: &'a [PointBreakdownRow],
        window: &Window,
    ) -> Result<Self, FitError> {
        let index = BreakdownIndex::new(breakdown);
        let games = filter_weekly(games, window)
            .filter(|game| game.is_played())
            .map(|game| index.get(&game.game_id).map(|row| (game, row)))
            .collect::<Result<Vec<_>, _>>()?;
        if games.is_empty() {
            return Err(DegenerateInput::EmptyWindow.into());
        }

        let teams = TeamIndex::from_games(games.iter().map(|&(game, _)| game));
        let hfa = home_field_advantage(
            games.iter().map(|&(_, row)| row),
            games.iter().map(|&(game, _)| game),
        )?;
        let margins = margin_of_victory(games.iter().map(|&(game, _)| game))
            .into_iter()
            .map(|margin| {
                let mov = margin.margin();
                (margin.team, mov)
            })
            .collect();
        debug!(
            "loaded {} games between {} teams in {window}",
            games.len(),
            teams.len()
        );
        Ok(Self {
            games,
            teams,
            hfa,
            margins,
        })
    }

    pub fn build_equations(self) -> EquationsBuilt<'a> {
        let (num_games, num_teams) = (self.games.len(), self.teams.len());
        let mut design = Matrix::allocate(Phase::COUNT * num_games, Phase::COUNT * num_teams);
        let mut response = vec![0.0; Phase::COUNT * num_games];
        let column = |phase: Phase, position: usize| phase.ordinal() * num_teams + position;

        for (game_index, &(game, row)) in self.games.iter().enumerate() {
            let (home, away) = (self.home_position(game), self.away_position(game));
            let home_venue = if game.is_neutral() { 0.0 } else { 1.0 };

            let offense = game_index;
            design[(offense, column(Phase::Offense, home))] += 1.;
            design[(offense, column(Phase::Defense, away))] -= 1.;
            response[offense] = row.home_offensive_points
                - row.away_defensive_points
                - self.hfa.offense * home_venue;

            let defense = num_games + game_index;
            design[(defense, column(Phase::Offense, away))] += 1.;
            design[(defense, column(Phase::Defense, home))] -= 1.;
            response[defense] = row.away_offensive_points - row.home_defensive_points
                + self.hfa.defense * home_venue;

            let special_teams = 2 * num_games + game_index;
            design[(special_teams, column(Phase::SpecialTeams, home))] += 1.;
            design[(special_teams, column(Phase::SpecialTeams, away))] -= 1.;
            response[special_teams] = row.home_special_teams_points
                - row.away_special_teams_points
                - self.hfa.special_teams * home_venue;

            trace!(
                "{}: responses {:.1}, {:.1}, {:.1}",
                game.game_id,
                response[offense],
                response[defense],
                response[special_teams]
            );
        }
        debug!(
            "built {} equations in {} unknowns",
            design.rows(),
            design.cols()
        );
        EquationsBuilt {
            loaded: self,
            design,
            response,
        }
    }

    fn home_position(&self, game: &GameRecord) -> usize {
        self.position(&game.home_team)
    }

    fn away_position(&self, game: &GameRecord) -> usize {
        self.position(&game.away_team)
    }

    fn position(&self, team: &Team) -> usize {
        // the index was built from these very games
        self.teams.position(team).unwrap_or_default()
    }
}

/// The design matrix and response vector of the system.
#[derive(Debug)]
pub struct EquationsBuilt<'a> {
    loaded: DataLoaded<'a>,
    design: Matrix<f64>,
    response: Vec<f64>,
}
impl<'a> EquationsBuilt<'a> {
    pub fn design(&self) -> &Matrix<f64> {
        &self.design
    }

    pub fn response(&self) -> &[f64] {
        &self.response
    }

    pub fn solve(self, rcond: Option<f64>) -> Result<Solved<'a>, FitError> {
        let solution = lstsq::solve(&self.design, &self.response, rcond)?;
        let expected_rank = self.design.cols();
        debug!(
            "solved with rank {} of {expected_rank}, R²: {:.6}",
            solution.rank,
            solution.r_squared.unadjusted()
        );
        let identifiable = identifiable_rank(expected_rank);
        if solution.rank < identifiable {
            warn!(
                "rank-deficient design: rank {} of {identifiable}; some ratings are not identified",
                solution.rank
            );
        }
        Ok(Solved {
            loaded: self.loaded,
            equations: self.design.rows(),
            solution,
        })
    }
}

/// The raw least-squares solution.
#[derive(Debug)]
pub struct Solved<'a> {
    loaded: DataLoaded<'a>,
    equations: usize,
    solution: Solution,
}
impl<'a> Solved<'a> {
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Assembles the rating table and centres each sub-rating column on zero.
    pub fn normalise(self) -> RatingFit {
        let num_teams = self.loaded.teams.len();
        let x = &self.solution.x;
        let sub_rating = |phase: Phase, position: usize| x[phase.ordinal() * num_teams + position];

        let mut means = [0.0; Phase::COUNT];
        for phase in Phase::iter() {
            means[phase.ordinal()] = (0..num_teams)
                .map(|position| sub_rating(phase, position))
                .sum::<f64>()
                / num_teams as f64;
        }
        debug!("sub-rating means before centring: {means:?}");

        let rows: Vec<_> = self
            .loaded
            .teams
            .teams()
            .iter()
            .enumerate()
            .map(|(position, team)| {
                let [srs_o, srs_d, srs_st] =
                    [Phase::Offense, Phase::Defense, Phase::SpecialTeams]
                        .map(|phase| sub_rating(phase, position));
                let srs = srs_o + srs_d + srs_st;
                let mov = self.loaded.margins.get(team).copied().unwrap_or_default();
                RatingRow {
                    team: team.clone(),
                    mov,
                    sos: srs - mov,
                    srs,
                    srs_o: srs_o - means[Phase::Offense.ordinal()],
                    srs_d: srs_d - means[Phase::Defense.ordinal()],
                    srs_st: srs_st - means[Phase::SpecialTeams.ordinal()],
                }
            })
            .collect();

        RatingFit {
            ratings: Ratings::from(rows),
            hfa: self.loaded.hfa,
            diagnostics: FitDiagnostics {
                teams: num_teams,
                games: self.loaded.games.len(),
                equations: self.equations,
                rank: self.solution.rank,
                expected_rank: Phase::COUNT * num_teams,
                identifiable_rank: identifiable_rank(Phase::COUNT * num_teams),
                r_squared: self.solution.r_squared.unadjusted(),
            },
        }
    }
}
