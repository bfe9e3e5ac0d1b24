//! A local file cache of datasets.
//!
//! Each dataset lives in its own CSV file under `<root>/nfl_data/`. The file is named after the
//! dataset and its parameters, sorted by parameter name, e.g., `pbp-year=2024.csv`.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use gridiron::csv::{CsvReader, CsvWriter};
use gridiron::file;

use crate::data;
use crate::domain::{GameRecord, PlayRecord};
use crate::source::{PlaySource, ScheduleSource};

pub const SUBDIR: &str = "nfl_data";

/// Identifies a dataset by name and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    name: String,
    params: BTreeMap<String, String>,
}
impl DatasetKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn schedule(season: u16) -> Self {
        Self::new("schedules").with_param("season", season)
    }

    pub fn plays(season: u16) -> Self {
        Self::new("pbp").with_param("year", season)
    }

    pub fn file_name(&self) -> String {
        format!("{self}.csv")
    }
}

impl Display for DatasetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        for (name, value) in &self.params {
            write!(f, "-{name}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datastore {
    root: PathBuf,
}
impl Datastore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(SUBDIR)
    }

    pub fn path(&self, key: &DatasetKey) -> PathBuf {
        self.dir().join(key.file_name())
    }

    pub fn exists(&self, key: &DatasetKey) -> bool {
        self.path(key).is_file()
    }

    pub fn load_games(&self, key: &DatasetKey) -> Result<Vec<GameRecord>, anyhow::Error> {
        let path = self.path(key);
        let reader = CsvReader::open(&path).with_context(|| format!("opening {}", path.display()))?;
        data::read_games(reader).with_context(|| format!("reading {}", path.display()))
    }

    pub fn load_plays(&self, key: &DatasetKey) -> Result<Vec<PlayRecord>, anyhow::Error> {
        let path = self.path(key);
        let reader = CsvReader::open(&path).with_context(|| format!("opening {}", path.display()))?;
        data::read_plays(reader).with_context(|| format!("reading {}", path.display()))
    }

    /// Writes the games under the given key, replacing any existing file.
    pub fn dump_games(&self, key: &DatasetKey, games: &[GameRecord]) -> Result<(), anyhow::Error> {
        let mut writer = self.create(key)?;
        data::write_games(&mut writer, games)?;
        debug!("dumped {} games to {key}", games.len());
        Ok(())
    }

    /// Writes the plays under the given key, replacing any existing file.
    pub fn dump_plays(&self, key: &DatasetKey, plays: &[PlayRecord]) -> Result<(), anyhow::Error> {
        let mut writer = self.create(key)?;
        data::write_plays(&mut writer, plays)?;
        debug!("dumped {} plays to {key}", plays.len());
        Ok(())
    }

    fn create(&self, key: &DatasetKey) -> Result<CsvWriter, anyhow::Error> {
        file::ensure_dir(self.dir())?;
        let path = self.path(key);
        Ok(CsvWriter::create(&path).with_context(|| format!("creating {}", path.display()))?)
    }
}

/// Reads cached seasons only; a season that has not been cached is an error.
impl ScheduleSource for Datastore {
    fn schedule(&self, seasons: RangeInclusive<u16>) -> Result<Vec<GameRecord>, anyhow::Error> {
        let mut games = vec![];
        for season in seasons {
            games.extend(self.load_games(&DatasetKey::schedule(season))?);
        }
        Ok(games)
    }
}

impl PlaySource for Datastore {
    fn plays(&self, seasons: RangeInclusive<u16>) -> Result<Vec<PlayRecord>, anyhow::Error> {
        let mut plays = vec![];
        for season in seasons {
            plays.extend(self.load_plays(&DatasetKey::plays(season))?);
        }
        Ok(plays)
    }
}

/// Serves seasons from the datastore, pulling those it lacks from an upstream source and caching
/// them. With `refresh` set, every season is pulled afresh and the cache overwritten.
#[derive(Debug)]
pub struct CachedSource<S> {
    store: Datastore,
    upstream: S,
    refresh: bool,
}
impl<S> CachedSource<S> {
    pub fn new(store: Datastore, upstream: S) -> Self {
        Self {
            store,
            upstream,
            refresh: false,
        }
    }

    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn store(&self) -> &Datastore {
        &self.store
    }

    fn is_fresh(&self, key: &DatasetKey) -> bool {
        !self.refresh && self.store.exists(key)
    }
}

impl<S: ScheduleSource> ScheduleSource for CachedSource<S> {
    fn schedule(&self, seasons: RangeInclusive<u16>) -> Result<Vec<GameRecord>, anyhow::Error> {
        let mut games = vec![];
        for season in seasons {
            let key = DatasetKey::schedule(season);
            if self.is_fresh(&key) {
                games.extend(self.store.load_games(&key)?);
            } else {
                info!("fetching {key}");
                let fetched = self.upstream.schedule(season..=season)?;
                self.store.dump_games(&key, &fetched)?;
                games.extend(fetched);
            }
        }
        Ok(games)
    }
}

impl<S: PlaySource> PlaySource for CachedSource<S> {
    fn plays(&self, seasons: RangeInclusive<u16>) -> Result<Vec<PlayRecord>, anyhow::Error> {
        let mut plays = vec![];
        for season in seasons {
            let key = DatasetKey::plays(season);
            if self.is_fresh(&key) {
                plays.extend(self.store.load_plays(&key)?);
            } else {
                info!("fetching {key}");
                let fetched = self.upstream.plays(season..=season)?;
                self.store.dump_plays(&key, &fetched)?;
                plays.extend(fetched);
            }
        }
        Ok(plays)
    }
}
