use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::crawl::ensure_parent_dir;
use crate::error::{Result, VlrError};
use crate::model::MatchRecord;

/// Output file holding one JSON-serialized [`MatchRecord`] per line.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

#[derive(Deserialize)]
struct RecordedUrl {
    url: String,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `records` and sync them to disk before returning.
    pub fn append(&self, records: &[MatchRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        ensure_parent_dir(&self.path)?;
        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| VlrError::io(&self.path, e))?;
        let torn = ends_without_newline(&mut file).map_err(|e| VlrError::io(&self.path, e))?;

        let mut writer = BufWriter::new(file);
        if torn {
            warn!(path = %self.path.display(), "terminating torn last line of output");
            writer
                .write_all(b"\n")
                .map_err(|e| VlrError::io(&self.path, e))?;
        }
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer
                .write_all(b"\n")
                .map_err(|e| VlrError::io(&self.path, e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| VlrError::io(&self.path, e.into_error()))?;
        file.sync_data().map_err(|e| VlrError::io(&self.path, e))?;

        debug!(path = %self.path.display(), count = records.len(), "appended records");
        Ok(())
    }

    /// URLs of every record already written. Unreadable lines are skipped.
    ///
    /// The file is read one line at a time; only the `url` of each record is
    /// kept.
    pub fn recorded_urls(&self) -> Result<HashSet<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => return Err(VlrError::io(&self.path, e)),
        };

        let mut reader = BufReader::new(file);
        let mut urls = HashSet::new();
        let mut line = Vec::new();
        let mut number = 0usize;
        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| VlrError::io(&self.path, e))?;
            if read == 0 {
                break;
            }
            number += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<RecordedUrl>(&line) {
                Ok(recorded) => {
                    urls.insert(recorded.url);
                }
                Err(e) => warn!(line = number, error = %e, "skipping unreadable output line"),
            }
        }
        Ok(urls)
    }
}

fn ends_without_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> MatchRecord {
        MatchRecord {
            url: url.to_string(),
            match_id: None,
            team_1: Some("Sentinels".to_string()),
            team_2: Some("LOUD".to_string()),
            event: None,
            event_series: None,
            score: ("3".to_string(), "2".to_string()),
            stage: None,
            match_format: None,
            date: None,
            time: None,
            starts_at: None,
            maps: Vec::new(),
        }
    }

    #[test]
    fn test_append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonLinesSink::new(dir.path().join("out").join("scraped_data.json"));

        sink.append(&[record("https://www.vlr.gg/1/a"), record("https://www.vlr.gg/2/b")])
            .unwrap();
        sink.append(&[record("https://www.vlr.gg/3/c")]).unwrap();
        sink.append(&[]).unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        let third: MatchRecord = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(third, record("https://www.vlr.gg/3/c"));
    }

    #[test]
    fn test_recorded_urls_skips_torn_lines() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonLinesSink::new(dir.path().join("scraped_data.json"));
        assert!(sink.recorded_urls().unwrap().is_empty());

        sink.append(&[record("https://www.vlr.gg/1/a")]).unwrap();
        let mut file = OpenOptions::new().append(true).open(sink.path()).unwrap();
        file.write_all(br#"{"url":"https://www.vlr.gg/2/b","team_1""#).unwrap();

        let urls = sink.recorded_urls().unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://www.vlr.gg/1/a"));

        sink.append(&[record("https://www.vlr.gg/3/c")]).unwrap();
        let urls = sink.recorded_urls().unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains("https://www.vlr.gg/3/c"));
    }

    #[test]
    fn test_recorded_urls_reads_past_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonLinesSink::new(dir.path().join("scraped_data.json"));
        sink.append(&[record("https://www.vlr.gg/1/a")]).unwrap();

        let mut file = OpenOptions::new().append(true).open(sink.path()).unwrap();
        file.write_all(b"{\"url\":\"https://www.vlr.gg/2/\xE2\x82\n\n").unwrap();
        drop(file);
        sink.append(&[record("https://www.vlr.gg/3/c")]).unwrap();

        let urls = sink.recorded_urls().unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains("https://www.vlr.gg/1/a"));
        assert!(urls.contains("https://www.vlr.gg/3/c"));
    }
}
