//! JSON persistence and directory helpers.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, io::Error> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(io::Error::from)
}

/// Writes `value` to `path` as pretty-printed JSON, replacing any existing file.
pub fn write_json<S: Serialize + ?Sized>(path: impl AsRef<Path>, value: &S) -> Result<(), io::Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()
}

/// Loads any deserializable type from a JSON file.
pub trait FromJsonFile: Sized {
    fn from_json_file(path: impl AsRef<Path>) -> Result<Self, io::Error>;
}

impl<D: DeserializeOwned> FromJsonFile for D {
    fn from_json_file(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        read_json(path)
    }
}

/// Creates the directory at `path` with any missing parents. An existing directory is left as is.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<(), io::Error> {
    fs::create_dir_all(path)
}
