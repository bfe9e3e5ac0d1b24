//! Utilities for working with CSV files.
//!
//! Only the unquoted dialect is supported: a comma always separates fields. Every dataset this
//! crate reads (team codes, game identifiers, integer scores) fits that dialect.

use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Lines, Read, Write};
use std::ops::Index;
use std::path::Path;

use rustc_hash::FxHashMap;

pub struct CsvWriter<W: Write = File> {
    writer: BufWriter<W>,
}
impl CsvWriter<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}
impl<W: Write> CsvWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Writes one line, separating the fields with commas.
    pub fn append<R>(&mut self, record: R) -> Result<(), io::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        for (index, field) in record.into_iter().enumerate() {
            if index > 0 {
                self.writer.write_all(b",")?;
            }
            self.writer.write_all(field.as_ref().as_bytes())?;
        }
        self.writer.write_all(b"\n")
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> Result<W, io::Error> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

pub struct CsvReader<R: Read = File> {
    lines: Lines<BufReader<R>>,
}
impl CsvReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}
impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    pub fn read(&mut self) -> Option<Result<Vec<String>, io::Error>> {
        self.lines.next().map(|line| {
            line.map(|line| {
                line.trim_end_matches('\r')
                    .split(',')
                    .map(ToString::to_string)
                    .collect()
            })
        })
    }
}

impl<R: Read> Iterator for CsvReader<R> {
    type Item = Result<Vec<String>, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

/// Maps column names in a header record to their positions.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: FxHashMap<String, usize>,
}
impl HeaderIndex {
    pub fn new<I>(header: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let positions = header
            .into_iter()
            .enumerate()
            .map(|(position, name)| (name.as_ref().trim().to_string(), position))
            .collect();
        Self { positions }
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A row of fields under construction, addressed by column ordinal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(Vec<String>);
impl Record {
    /// A record of `len` empty fields.
    pub fn blank(len: usize) -> Self {
        Self(vec![String::new(); len])
    }

    pub fn with_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        Self(values.into_iter().map(|value| value.to_string()).collect())
    }

    pub fn set(&mut self, column: impl Into<usize>, value: impl ToString) {
        self.0[column.into()] = value.to_string();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<I: Into<usize>> Index<I> for Record {
    type Output = str;

    fn index(&self, column: I) -> &str {
        &self.0[column.into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let mut writer = CsvWriter::from_writer(Vec::new());
        writer.append(["team", "srs"]).unwrap();
        writer.append(Record::with_values(["BUF", "8.0"])).unwrap();
        let bytes = writer.into_inner().unwrap();
        assert_eq!("team,srs\nBUF,8.0\n", String::from_utf8(bytes.clone()).unwrap());

        let mut reader = CsvReader::from_reader(bytes.as_slice());
        let header = HeaderIndex::new(reader.next().unwrap().unwrap());
        assert_eq!(2, header.len());
        assert_eq!(Some(1), header.position("srs"));
        assert_eq!(None, header.position("sos"));
        let rows: Vec<_> = reader.map(Result::unwrap).collect();
        assert_eq!(vec![vec!["BUF".to_string(), "8.0".to_string()]], rows);
    }

    #[test]
    fn carriage_returns_stripped() {
        let mut reader = CsvReader::from_reader("a,b\r\n1,\r\n".as_bytes());
        assert_eq!(vec!["a", "b"], reader.next().unwrap().unwrap());
        assert_eq!(vec!["1", ""], reader.next().unwrap().unwrap());
        assert!(reader.next().is_none());
    }

    #[test]
    fn record_set() {
        let mut record = Record::blank(3);
        record.set(1usize, 42);
        assert_eq!(3, record.len());
        assert_eq!("42", &record[1usize]);
        assert_eq!(vec!["", "42", ""], record.into_iter().collect::<Vec<_>>());
    }
}
