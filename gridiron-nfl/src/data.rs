//! CSV encoding of schedule and play-by-play records.
//!
//! Columns are located by name from the header row, so files may carry extra columns in any
//! order. Missing values may be blank or `NA`.

use std::fmt::Display;
use std::io::{self, Read, Write};
use std::str::FromStr;

use ordinalizer::Ordinal;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter};
use thiserror::Error;
use tracing::debug;

use gridiron::csv::{CsvReader, CsvWriter, HeaderIndex, Record};

use crate::domain::{GameRecord, PlayRecord, Site, Team};

#[derive(Debug, Error, PartialEq)]
pub enum InvalidRecord {
    #[error("no header row")]
    MissingHeader,

    #[error("no column named {column}")]
    MissingColumn { column: String },

    #[error("line {line}: invalid value '{value}' in column {column}")]
    BadValue {
        line: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ordinal, EnumCount, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum GameColumn {
    GameId,
    Season,
    Week,
    HomeTeam,
    AwayTeam,
    HomeScore,
    AwayScore,
    Location,
}

impl From<GameColumn> for usize {
    fn from(column: GameColumn) -> Self {
        column.ordinal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ordinal, EnumCount, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PlayColumn {
    GameId,
    Season,
    Week,
    HomeTeam,
    AwayTeam,
    Posteam,
    Defteam,
    PosteamScore,
    DefteamScore,
    PosteamScorePost,
    DefteamScorePost,
    Sp,
    Special,
}

impl From<PlayColumn> for usize {
    fn from(column: PlayColumn) -> Self {
        column.ordinal()
    }
}

/// Positions of the named columns within a file's header.
struct ColumnPositions(Vec<usize>);
impl ColumnPositions {
    fn resolve<C: IntoEnumIterator + Display>(header: &HeaderIndex) -> Result<Self, InvalidRecord> {
        C::iter()
            .map(|column| {
                let name = column.to_string();
                header
                    .position(&name)
                    .ok_or(InvalidRecord::MissingColumn { column: name })
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

/// A single data row, addressed by column.
struct Fields<'a> {
    line: usize,
    values: &'a [String],
    positions: &'a ColumnPositions,
}
impl<'a> Fields<'a> {
    fn raw<C: Into<usize>>(&self, column: C) -> &'a str {
        let column: usize = column.into();
        self.values
            .get(self.positions.0[column])
            .map(|value| value.trim())
            .unwrap_or_default()
    }

    fn bad_value(&self, column: impl Display, value: &str) -> InvalidRecord {
        InvalidRecord::BadValue {
            line: self.line,
            column: column.to_string(),
            value: value.into(),
        }
    }

    fn parse<C: Into<usize> + Display + Copy, T: FromStr>(&self, column: C) -> Result<T, InvalidRecord> {
        let value = self.raw(column);
        value.parse().map_err(|_| self.bad_value(column, value))
    }

    fn optional<C: Into<usize> + Display + Copy, T: FromStr>(
        &self,
        column: C,
    ) -> Result<Option<T>, InvalidRecord> {
        match self.raw(column) {
            "" | "NA" => Ok(None),
            _ => self.parse(column).map(Some),
        }
    }

    fn team<C: Into<usize>>(&self, column: C) -> Team {
        Team::from(self.raw(column))
    }

    fn optional_team<C: Into<usize>>(&self, column: C) -> Option<Team> {
        match self.raw(column) {
            "" | "NA" => None,
            code => Some(Team::from(code)),
        }
    }

    fn flag<C: Into<usize> + Display + Copy>(&self, column: C) -> Result<bool, InvalidRecord> {
        match self.raw(column) {
            "1" | "1.0" => Ok(true),
            "0" | "0.0" | "" | "NA" => Ok(false),
            other => Err(self.bad_value(column, other)),
        }
    }
}

/// Reads every data row, handing each one to `decode`.
fn read_rows<C, R, T, D>(reader: CsvReader<R>, mut decode: D) -> Result<Vec<T>, anyhow::Error>
where
    C: IntoEnumIterator + Display,
    R: Read,
    D: FnMut(&Fields) -> Result<T, InvalidRecord>,
{
    let mut rows = reader.into_iter();
    let header = rows.next().ok_or(InvalidRecord::MissingHeader)??;
    let positions = ColumnPositions::resolve::<C>(&HeaderIndex::new(header))?;
    let mut records = vec![];
    for (index, row) in rows.enumerate() {
        let values = row?;
        if values.iter().all(|value| value.is_empty()) {
            continue;
        }
        let fields = Fields {
            line: index + 2,
            values: &values,
            positions: &positions,
        };
        records.push(decode(&fields)?);
    }
    Ok(records)
}

pub fn read_games<R: Read>(reader: CsvReader<R>) -> Result<Vec<GameRecord>, anyhow::Error> {
    let games = read_rows::<GameColumn, _, _, _>(reader, |fields| {
        let location = fields.raw(GameColumn::Location);
        Ok(GameRecord {
            game_id: fields.raw(GameColumn::GameId).into(),
            season: fields.parse(GameColumn::Season)?,
            week: fields.parse(GameColumn::Week)?,
            home_team: fields.team(GameColumn::HomeTeam),
            away_team: fields.team(GameColumn::AwayTeam),
            home_score: fields.optional(GameColumn::HomeScore)?,
            away_score: fields.optional(GameColumn::AwayScore)?,
            site: Site::from_str(location)
                .map_err(|_| fields.bad_value(GameColumn::Location, location))?,
        })
    })?;
    debug!("read {} games", games.len());
    Ok(games)
}

pub fn read_plays<R: Read>(reader: CsvReader<R>) -> Result<Vec<PlayRecord>, anyhow::Error> {
    let plays = read_rows::<PlayColumn, _, _, _>(reader, |fields| {
        let scoring = fields.flag(PlayColumn::Sp)?;
        // scores are only required where they are used
        let score = |column: PlayColumn| -> Result<u16, InvalidRecord> {
            match fields.optional(column)? {
                Some(score) => Ok(score),
                None if scoring => Err(fields.bad_value(column, fields.raw(column))),
                None => Ok(0),
            }
        };
        Ok(PlayRecord {
            game_id: fields.raw(PlayColumn::GameId).into(),
            season: fields.parse(PlayColumn::Season)?,
            week: fields.parse(PlayColumn::Week)?,
            home_team: fields.team(PlayColumn::HomeTeam),
            away_team: fields.team(PlayColumn::AwayTeam),
            posteam: fields.optional_team(PlayColumn::Posteam),
            defteam: fields.optional_team(PlayColumn::Defteam),
            posteam_score: score(PlayColumn::PosteamScore)?,
            defteam_score: score(PlayColumn::DefteamScore)?,
            posteam_score_post: score(PlayColumn::PosteamScorePost)?,
            defteam_score_post: score(PlayColumn::DefteamScorePost)?,
            scoring,
            special: fields.flag(PlayColumn::Special)?,
        })
    })?;
    debug!("read {} plays", plays.len());
    Ok(plays)
}

fn write_header<C: IntoEnumIterator + Display, W: Write>(writer: &mut CsvWriter<W>) -> Result<(), io::Error> {
    writer.append(Record::with_values(C::iter()))
}

fn optional<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub fn write_games<W: Write>(writer: &mut CsvWriter<W>, games: &[GameRecord]) -> Result<(), io::Error> {
    write_header::<GameColumn, _>(writer)?;
    for game in games {
        let mut record = Record::blank(GameColumn::COUNT);
        record.set(GameColumn::GameId, &game.game_id);
        record.set(GameColumn::Season, game.season);
        record.set(GameColumn::Week, game.week);
        record.set(GameColumn::HomeTeam, &game.home_team);
        record.set(GameColumn::AwayTeam, &game.away_team);
        record.set(GameColumn::HomeScore, optional(game.home_score.as_ref()));
        record.set(GameColumn::AwayScore, optional(game.away_score.as_ref()));
        record.set(GameColumn::Location, game.site);
        writer.append(record)?;
    }
    writer.flush()
}

pub fn write_plays<W: Write>(writer: &mut CsvWriter<W>, plays: &[PlayRecord]) -> Result<(), io::Error> {
    write_header::<PlayColumn, _>(writer)?;
    for play in plays {
        let mut record = Record::blank(PlayColumn::COUNT);
        record.set(PlayColumn::GameId, &play.game_id);
        record.set(PlayColumn::Season, play.season);
        record.set(PlayColumn::Week, play.week);
        record.set(PlayColumn::HomeTeam, &play.home_team);
        record.set(PlayColumn::AwayTeam, &play.away_team);
        record.set(PlayColumn::Posteam, optional(play.posteam.as_ref()));
        record.set(PlayColumn::Defteam, optional(play.defteam.as_ref()));
        record.set(PlayColumn::PosteamScore, play.posteam_score);
        record.set(PlayColumn::DefteamScore, play.defteam_score);
        record.set(PlayColumn::PosteamScorePost, play.posteam_score_post);
        record.set(PlayColumn::DefteamScorePost, play.defteam_score_post);
        record.set(PlayColumn::Sp, flag(play.scoring));
        record.set(PlayColumn::Special, flag(play.special));
        writer.append(record)?;
    }
    writer.flush()
}
