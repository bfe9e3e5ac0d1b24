//! The single-rating variant of the SRS, fitted to final scores alone.

use serde::{Deserialize, Serialize};
use tracing::debug;

use gridiron::linear::lstsq;
use gridiron::linear::matrix::Matrix;

use crate::domain::error::DegenerateInput;
use crate::domain::{GameRecord, Team, TeamIndex};
use crate::model::{FitError, FitOptions, InvalidOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleRating {
    pub team: Team,
    pub srs: f64,
}

/// Fits one rating per team such that `home_score - away_score - hfa ≈ r[home] - r[away]` for
/// every played game, where `hfa` is the mean home score less the mean away score. The ratings
/// are centred on zero and ordered by team.
pub fn simple_srs<'a>(
    games: impl IntoIterator<Item = &'a GameRecord>,
    options: &FitOptions,
) -> Result<Vec<SimpleRating>, FitError> {
    options.validate().map_err(InvalidOptions::from)?;
    let games: Vec<_> = games
        .into_iter()
        .filter_map(|game| game.scores().map(|scores| (game, scores)))
        .collect();
    if games.is_empty() {
        return Err(DegenerateInput::EmptyWindow.into());
    }

    let hfa = games
        .iter()
        .map(|&(_, (home_score, away_score))| home_score as f64 - away_score as f64)
        .sum::<f64>()
        / games.len() as f64;

    let teams = TeamIndex::from_games(games.iter().map(|&(game, _)| game));
    let mut design = Matrix::allocate(games.len(), teams.len());
    let mut response = Vec::with_capacity(games.len());
    for (row, &(game, (home_score, away_score))) in games.iter().enumerate() {
        if let (Some(home), Some(away)) = (
            teams.position(&game.home_team),
            teams.position(&game.away_team),
        ) {
            design[(row, home)] += 1.;
            design[(row, away)] -= 1.;
        }
        response.push(home_score as f64 - away_score as f64 - hfa);
    }

    let solution = lstsq::solve(&design, &response, options.rcond)?;
    debug!(
        "simple SRS over {} games: hfa {hfa:.3}, rank {} of {}",
        games.len(),
        solution.rank,
        teams.len()
    );
    let mean = solution.x.iter().sum::<f64>() / solution.x.len() as f64;
    Ok(teams
        .teams()
        .iter()
        .zip(solution.x)
        .map(|(team, rating)| SimpleRating {
            team: team.clone(),
            srs: rating - mean,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;
    use crate::domain::Site;

    fn game(home: &str, away: &str, home_score: u16, away_score: u16) -> GameRecord {
        GameRecord {
            game_id: format!("{away}_{home}"),
            season: 2024,
            week: 1,
            home_team: home.into(),
            away_team: away.into(),
            home_score: Some(home_score),
            away_score: Some(away_score),
            site: Site::Home,
        }
    }

    #[test]
    fn recovers_rating_differences() {
        // true ratings A = 6, B = 0, C = -6 with a 3-point home edge
        let games = [
            game("A", "B", 27, 18),
            game("B", "A", 18, 21),
            game("B", "C", 25, 16),
            game("C", "B", 16, 19),
            game("A", "C", 33, 18),
            game("C", "A", 15, 24),
        ];
        let ratings = simple_srs(&games, &FitOptions::default()).unwrap();
        assert_eq!(
            vec![Team::from("A"), "B".into(), "C".into()],
            ratings.iter().map(|rating| rating.team.clone()).collect::<Vec<_>>()
        );
        assert_float_absolute_eq!(6., ratings[0].srs, 1e-9);
        assert_float_absolute_eq!(0., ratings[1].srs, 1e-9);
        assert_float_absolute_eq!(-6., ratings[2].srs, 1e-9);
    }

    #[test]
    fn unplayed_games_ignored() {
        let mut unplayed = game("A", "C", 0, 0);
        unplayed.home_score = None;
        let games = [game("A", "B", 20, 10), unplayed];
        let ratings = simple_srs(&games, &FitOptions::default()).unwrap();
        assert_eq!(2, ratings.len());
        assert_float_absolute_eq!(0., ratings[0].srs + ratings[1].srs, 1e-9);
    }

    #[test]
    fn no_games_is_degenerate() {
        let err = simple_srs(&Vec::<GameRecord>::new(), &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::DegenerateInput(DegenerateInput::EmptyWindow)));
    }
}
