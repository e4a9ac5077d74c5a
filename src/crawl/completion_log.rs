use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::crawl::ensure_parent_dir;
use crate::error::{Result, VlrError};

/// Append-only set of URLs whose records are safely in the output file.
///
/// One URL per line. Each entry is written with a single `write_all` on a
/// file opened in append mode and synced before [`record`](Self::record)
/// returns, so a crash can at worst leave one torn final line. A torn line is
/// cut off on the next open and never becomes a member.
#[derive(Debug)]
pub struct CompletionLog {
    path: PathBuf,
    file: File,
    urls: HashSet<String>,
}

impl CompletionLog {
    /// Open (or create) the log and load every completed URL.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path)?;

        let existing = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(VlrError::io(&path, e)),
        };

        // Everything after the last newline is a torn write.
        let keep = existing
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let torn = keep < existing.len();
        if torn {
            let partial = String::from_utf8_lossy(&existing[keep..]);
            warn!(path = %path.display(), %partial, "dropping torn last line of completion log");
        }
        let urls = String::from_utf8_lossy(&existing[..keep])
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect::<HashSet<_>>();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| VlrError::io(&path, e))?;
        if torn {
            file.set_len(keep as u64)
                .and_then(|_| file.sync_data())
                .map_err(|e| VlrError::io(&path, e))?;
        }

        debug!(path = %path.display(), completed = urls.len(), "opened completion log");
        Ok(Self { path, file, urls })
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mark `url` completed. Returns `false` if it already was.
    pub fn record(&mut self, url: &str) -> Result<bool> {
        if self.urls.contains(url) {
            return Ok(false);
        }
        let line = format!("{url}\n");
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.sync_data())
            .map_err(|e| VlrError::io(&self.path, e))?;
        self.urls.insert(url.to_string());
        Ok(true)
    }

    /// Record every URL not yet in the log; returns how many were new.
    pub fn absorb<I, S>(&mut self, urls: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for url in urls {
            if self.record(url.as_ref())? {
                added += 1;
            }
        }
        Ok(added)
    }
}
