use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use crate::crawl::ensure_parent_dir;
use crate::error::{Result, VlrError};

/// Read a list of match URLs.
///
/// Accepts either a JSON array of strings, as written by [`write_seeds`], or
/// one URL per line. Blank lines and `#` comments are ignored in the latter.
pub fn read_seeds(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| VlrError::io(path, e))?;

    if content.trim_start().starts_with('[') {
        let urls: Vec<String> = serde_json::from_str(&content)?;
        return Ok(urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect_vec());
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect_vec())
}

/// Write `urls` as a JSON array, replacing the file.
pub fn write_seeds(path: impl AsRef<Path>, urls: &[String]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| VlrError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, urls)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| VlrError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_seeds_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("match_urls.json");
        let urls = vec![
            "https://www.vlr.gg/1/a".to_string(),
            "https://www.vlr.gg/2/b".to_string(),
        ];

        write_seeds(&path, &urls).unwrap();
        assert_eq!(read_seeds(&path).unwrap(), urls);
    }

    #[test]
    fn test_line_delimited_seeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(
            &path,
            "# picked by hand\nhttps://www.vlr.gg/1/a\n\n  https://www.vlr.gg/2/b  \n",
        )
        .unwrap();

        assert_eq!(
            read_seeds(&path).unwrap(),
            vec!["https://www.vlr.gg/1/a", "https://www.vlr.gg/2/b"]
        );
    }

    #[test]
    fn test_missing_seed_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_seeds(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, VlrError::Io { .. }));
    }
}
