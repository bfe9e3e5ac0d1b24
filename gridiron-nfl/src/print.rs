//! Console tables of ratings and predictions.

use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::hfa::HomeFieldAdvantage;
use crate::model::spread_predictor::Prediction;
use crate::model::Ratings;

fn team_col() -> Col {
    Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Left))
}

fn value_col() -> Col {
    Col::new(Styles::default().with(MinWidth(7)).with(HAlign::Right))
}

fn header(labels: &[&str]) -> Row {
    Row::new(
        Styles::default().with(Header(true)),
        labels.iter().map(|&label| label.into()).collect(),
    )
}

pub fn tabulate_ratings(ratings: &Ratings) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            team_col(),
            value_col(),
            value_col(),
            value_col(),
            value_col(),
            value_col(),
            value_col(),
        ])
        .with_row(header(&["Team", "MoV", "SoS", "SRS", "Off", "Def", "ST"]));
    for row in ratings {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                row.team.to_string().into(),
                format!("{:.2}", row.mov).into(),
                format!("{:.2}", row.sos).into(),
                format!("{:.2}", row.srs).into(),
                format!("{:.2}", row.srs_o).into(),
                format!("{:.2}", row.srs_d).into(),
                format!("{:.2}", row.srs_st).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_hfa(hfa: &HomeFieldAdvantage) -> Table {
    let mut table = Table::default()
        .with_cols(vec![team_col(), value_col()])
        .with_row(header(&["Phase", "HFA"]));
    for (label, value) in [
        ("Overall", hfa.overall),
        ("Off", hfa.offense),
        ("Def", hfa.defense),
        ("ST", hfa.special_teams),
    ] {
        table.push_row(Row::new(
            Styles::default(),
            vec![label.into(), format!("{value:.2}").into()],
        ));
    }
    table
}

pub fn tabulate_predictions(predictions: &[Prediction]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(16)).with(HAlign::Left)),
            team_col(),
            team_col(),
            value_col(),
            value_col(),
            value_col(),
            value_col(),
        ])
        .with_row(header(&["Game", "Home", "Away", "Spread", "Off", "Def", "ST"]));
    for prediction in predictions {
        let game = if prediction.neutral {
            format!("{} (N)", prediction.game_id)
        } else {
            prediction.game_id.clone()
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                game.into(),
                prediction.home_team.to_string().into(),
                prediction.away_team.to_string().into(),
                format!("{:+.1}", prediction.spread).into(),
                format!("{:+.1}", prediction.spread_o).into(),
                format!("{:+.1}", prediction.spread_d).into(),
                format!("{:+.1}", prediction.spread_st).into(),
            ],
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RatingRow;

    #[test]
    fn ratings_table() {
        let ratings = Ratings::from(vec![
            RatingRow {
                team: "NO".into(),
                mov: 37.,
                sos: -1.,
                srs: 36.,
                srs_o: 20.,
                srs_d: 10.,
                srs_st: 6.,
            },
            RatingRow {
                team: "CAR".into(),
                mov: -37.,
                sos: 1.,
                srs: -36.,
                srs_o: -20.,
                srs_d: -10.,
                srs_st: -6.,
            },
        ]);
        let table = tabulate_ratings(&ratings);
        assert_eq!(3, table.num_rows());
        assert_eq!(7, table.num_cols());
    }

    #[test]
    fn hfa_table() {
        let table = tabulate_hfa(&HomeFieldAdvantage {
            overall: 2.,
            offense: 1.5,
            defense: 0.,
            special_teams: 0.5,
        });
        assert_eq!(5, table.num_rows());
    }

    #[test]
    fn predictions_table() {
        let table = tabulate_predictions(&[Prediction {
            game_id: "2024_01_GB_PHI".into(),
            home_team: "PHI".into(),
            away_team: "GB".into(),
            neutral: true,
            spread: 1.5,
            spread_o: 1.,
            spread_d: 0.25,
            spread_st: 0.25,
        }]);
        assert_eq!(2, table.num_rows());
    }
}
