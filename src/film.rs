//! Film batch input: the immutable subject records and the CSV loader.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// One subject of a research session. Read-only for the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRecord {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub stars: Vec<String>,
}

impl FilmRecord {
    /// Record with a title only; remaining fields via struct update.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            author: None,
            director: None,
            studio: None,
            stars: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to open film batch {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed film row at line {line}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("film row at line {line} has an empty title")]
    MissingTitle { line: u64 },
    #[error("film batch {path} contains no records")]
    Empty { path: PathBuf },
}

/// CSV row as it appears in the input file. Stars are a `;`-separated list
/// in billing order.
#[derive(Debug, Deserialize)]
struct FilmRow {
    title: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    studio: Option<String>,
    #[serde(default)]
    stars: Option<String>,
}

impl FilmRow {
    fn into_record(self) -> FilmRecord {
        FilmRecord {
            title: self.title.trim().to_string(),
            year: self.year,
            author: non_empty(self.author),
            director: non_empty(self.director),
            studio: non_empty(self.studio),
            stars: self
                .stars
                .as_deref()
                .unwrap_or_default()
                .split(';')
                .map(str::trim)
                .filter(|star| !star.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load and validate a film batch from a CSV file.
///
/// # Errors
/// Returns [`BatchError`] when the file cannot be opened, a row is
/// malformed or missing its title, or the batch is empty. Validation is
/// complete before any network traffic happens.
pub fn load_batch(path: &Path) -> Result<Vec<FilmRecord>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| BatchError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<FilmRow>().enumerate() {
        // Line 1 is the header row.
        let line = index as u64 + 2;
        let row = row.map_err(|source| BatchError::Row { line, source })?;
        let record = row.into_record();
        if record.title.is_empty() {
            return Err(BatchError::MissingTitle { line });
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(BatchError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), films = records.len(), "film batch loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_batch(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn load_batch_parses_rows_and_star_billing() {
        let file = write_batch(
            "title,year,author,director,studio,stars\n\
             The Wizard of Oz,1939,L. Frank Baum,Victor Fleming,Metro-Goldwyn-Mayer,Judy Garland; Frank Morgan\n\
             Stagecoach,1939,,John Ford,United Artists,\n",
        );

        let films = load_batch(file.path()).expect("batch should load");

        assert_eq!(films.len(), 2);
        assert_eq!(films[0].title, "The Wizard of Oz");
        assert_eq!(films[0].year, Some(1939));
        assert_eq!(films[0].stars, vec!["Judy Garland", "Frank Morgan"]);
        assert_eq!(films[1].author, None);
        assert!(films[1].stars.is_empty());
    }

    #[test]
    fn load_batch_rejects_empty_file() {
        let file = write_batch("title,year,author,director,studio,stars\n");

        let error = load_batch(file.path()).expect_err("empty batch should fail");

        assert!(matches!(error, BatchError::Empty { .. }));
    }

    #[test]
    fn load_batch_rejects_blank_title() {
        let file = write_batch(
            "title,year,author,director,studio,stars\n\
             ,1939,,,,\n",
        );

        let error = load_batch(file.path()).expect_err("blank title should fail");

        assert!(matches!(error, BatchError::MissingTitle { line: 2 }));
    }

    #[test]
    fn load_batch_reports_missing_file() {
        let error =
            load_batch(Path::new("/nonexistent/batch.csv")).expect_err("missing file should fail");

        assert!(matches!(error, BatchError::Open { .. }));
    }
}
