use std::path::PathBuf;

use assert_float_eq::*;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;

use gridiron_nfl::breakdown::{compute_point_breakdown, PointBreakdownRow};
use gridiron_nfl::datastore::Datastore;
use gridiron_nfl::domain::error::MissingData;
use gridiron_nfl::domain::{CandidateGame, GameRecord, PlayRecord, Side, Team};
use gridiron_nfl::hfa::home_field_advantage;
use gridiron_nfl::model::{FitOptions, SrsModel};
use gridiron_nfl::mov::margin_of_victory;
use gridiron_nfl::print;
use gridiron_nfl::source::{PlaySource, ScheduleSource};
use gridiron_nfl::week::{filter_weekly, NflWeek, Window};
use gridiron_testing::assert_zero_mean;

fn datastore() -> Datastore {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    Datastore::new(path)
}

fn schedule() -> Vec<GameRecord> {
    datastore().schedule(2024..=2024).unwrap()
}

fn plays() -> Vec<PlayRecord> {
    datastore().plays(2024..=2024).unwrap()
}

fn week_one() -> Window {
    Window::new(NflWeek::new(2024, 1), NflWeek::new(2024, 1))
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn row<'a>(breakdown: &'a [PointBreakdownRow], game_id: &str) -> &'a PointBreakdownRow {
    breakdown.iter().find(|row| row.game_id == game_id).unwrap()
}

#[test]
fn breakdown_of_ari_at_buf() {
    let breakdown = compute_point_breakdown(&plays());
    let row = row(&breakdown, "2024_01_ARI_BUF");
    assert_eq!(Team::from("BUF"), row.home_team);
    assert_eq!(Team::from("ARI"), row.away_team);
    assert_eq!(24.0, row.home_offensive_points);
    assert_eq!(14.0, row.away_offensive_points);
    assert_eq!(0.0, row.home_defensive_points);
    assert_eq!(0.0, row.away_defensive_points);
    assert_eq!(10.0, row.home_special_teams_points);
    assert_eq!(14.0, row.away_special_teams_points);
}

#[test]
fn breakdown_credits_safeties_to_defense() {
    let breakdown = compute_point_breakdown(&plays());
    let row = row(&breakdown, "2024_01_DEN_SEA");
    assert_eq!(18.0, row.home_offensive_points);
    assert_eq!(6.0, row.away_offensive_points);
    assert_eq!(0.0, row.home_defensive_points);
    assert_eq!(4.0, row.away_defensive_points);
    assert_eq!(8.0, row.home_special_teams_points);
    assert_eq!(10.0, row.away_special_teams_points);
}

#[test]
fn breakdown_conserves_final_scores() {
    let breakdown = compute_point_breakdown(&plays());
    assert_eq!(
        vec!["2024_01_ARI_BUF", "2024_01_CAR_NO", "2024_01_DEN_SEA", "2024_01_GB_PHI"],
        breakdown.iter().map(|row| row.game_id.as_str()).collect::<Vec<_>>()
    );
    for game in schedule().iter().filter(|game| game.is_played()) {
        let row = row(&breakdown, &game.game_id);
        let (home_score, away_score) = game.scores().unwrap();
        assert_eq!(home_score as f64, row.total(Side::Home), "{}", game.game_id);
        assert_eq!(away_score as f64, row.total(Side::Away), "{}", game.game_id);
    }
}

#[test]
fn margin_of_victory_in_week_one() {
    let games = schedule();
    let margins = margin_of_victory(filter_weekly(&games, &week_one()));
    let margin = |team: &str| {
        margins
            .iter()
            .find(|margin| margin.team == Team::from(team))
            .map(|margin| margin.margin())
    };
    assert_eq!(8, margins.len());
    assert_eq!(Some(37.0), margin("NO"));
    assert_eq!(Some(-37.0), margin("CAR"));
    assert_eq!(Some(5.0), margin("PHI"));
    assert_eq!(None, margin("MIA"));
}

#[test]
fn home_field_advantage_excludes_neutral_site() {
    let games = schedule();
    let breakdown = compute_point_breakdown(&plays());
    let hfa = home_field_advantage(&breakdown, &games).unwrap();
    assert_float_absolute_eq!(46. / 3., hfa.offense, 1e-9);
    assert_float_absolute_eq!(-4. / 3., hfa.defense, 1e-9);
    assert_float_absolute_eq!(7. / 3., hfa.special_teams, 1e-9);
    assert_float_absolute_eq!(49. / 3., hfa.overall, 1e-9);
}

#[test]
fn fit_and_predict_from_datastore() {
    init_logging();
    let model = SrsModel::from_source(&datastore(), week_one(), &FitOptions::default()).unwrap();
    let ratings = model.ratings();
    assert_eq!(8, ratings.len());
    assert_eq!(4, model.diagnostics().games);
    assert_eq!(24, model.diagnostics().expected_rank);
    assert!(model.diagnostics().is_rank_deficient());
    assert_zero_mean(&ratings.column(|row| row.srs_o), 1e-9);
    assert_zero_mean(&ratings.column(|row| row.srs_d), 1e-9);
    assert_zero_mean(&ratings.column(|row| row.srs_st), 1e-9);
    for row in ratings {
        assert_float_absolute_eq!(row.srs - row.mov, row.sos, 1e-9);
    }
    assert_float_absolute_eq!(37., ratings.get(&"NO".into()).unwrap().mov, 1e-9);
    println!("{}", Console::default().render(&print::tabulate_ratings(ratings)));

    let candidate = CandidateGame {
        game_id: "2024_02_BUF_NO".into(),
        home_team: "NO".into(),
        away_team: "BUF".into(),
        neutral: false,
    };
    let predictions = model.predict([&candidate]).unwrap();
    let (no, buf) = (
        ratings.get(&"NO".into()).unwrap(),
        ratings.get(&"BUF".into()).unwrap(),
    );
    assert_float_absolute_eq!(no.srs - buf.srs + 49. / 3., predictions[0].spread, 1e-9);
    assert_float_absolute_eq!(
        no.srs_o - buf.srs_o + 46. / 3.,
        predictions[0].spread_o,
        1e-9
    );

    let unplayed: Vec<_> = schedule()
        .iter()
        .filter(|game| !game.is_played())
        .map(CandidateGame::from)
        .collect();
    assert_eq!(
        Err(MissingData::Rating {
            team: "MIA".into()
        }),
        model.predict(&unplayed)
    );
}
