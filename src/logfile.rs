// src/logfile.rs
// =============================================================================
// The plain-text run log.
//
// Every problematic check result is appended here as soon as it is produced,
// framed by a header (target host, start time) and a footer (summary, end
// time). Many check tasks write concurrently, so the file sits behind a Mutex
// and each call writes one complete line.
//
// File names follow <host-with-dashes>-<YYYY-MM-DD>-<HH-MM-SS>.log, e.g.
// example-com-2024-05-01-13-45-00.log
// =============================================================================

use chrono::{DateTime, Local, TimeZone};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

/// Used when the sitemap URL has no usable host
pub const FALLBACK_LOG_NAME: &str = "sitemap-check.log";

pub const SEPARATOR: &str = "-------------------------------------------";

#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: Mutex<File>,
}

impl LogFile {
    /// Opens `path` for appending, creating parent directories as needed
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(LogFile {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` followed by a newline
    pub fn log(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(file, "{}", line)
    }
}

/// Builds the log file name for a run against `sitemap_url`
pub fn log_file_name<Tz>(sitemap_url: &str, now: &DateTime<Tz>) -> Result<String, url::ParseError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let parsed = Url::parse(sitemap_url)?;
    // host_str() never includes the port
    let host = parsed.host_str().ok_or(url::ParseError::EmptyHost)?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let host = host.replace(['.', ':'], "-");

    Ok(format!(
        "{}-{}-{}.log",
        host,
        now.format("%Y-%m-%d"),
        now.format("%H-%M-%S")
    ))
}

/// Resolves where this run's log goes, falling back to FALLBACK_LOG_NAME
pub fn log_path(sitemap_url: &str, log_dir: Option<&Path>) -> PathBuf {
    let name = match log_file_name(sitemap_url, &Local::now()) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!(
                "Failed to derive log file name from {}: {}. Using {}",
                sitemap_url,
                e,
                FALLBACK_LOG_NAME
            );
            FALLBACK_LOG_NAME.to_string()
        }
    };

    match log_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
