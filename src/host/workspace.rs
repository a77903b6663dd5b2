//! Idempotent filesystem mutations in the project directory

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Create `path` (and parents) unless it already exists
///
/// Returns `true` when the directory was created by this call.
pub fn ensure_dir(path: &Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    debug!("Created {}", path.display());
    Ok(true)
}

/// Normalised form used to compare ignore-file lines (`/dir/`, `dir/` and `dir` are the same entry)
fn normalize(line: &str) -> &str {
    line.trim().trim_start_matches('/').trim_end_matches('/')
}

/// Make sure `entry` is listed in the ignore-file, appending it when missing
///
/// The ignore-file is created when absent. Existing content is never rewritten,
/// and lines that are not valid UTF-8 are compared lossily rather than rejected.
/// Returns `true` when the file was changed by this call.
pub fn ensure_ignore_entry(ignore_file: &Path, entry: &str) -> io::Result<bool> {
    let wanted = normalize(entry);

    let existing = match fs::read(ignore_file) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let line = format!("{}\n", entry.trim());

    match existing {
        Some(content) => {
            let listed = content
                .split(|b| *b == b'\n')
                .any(|l| normalize(&String::from_utf8_lossy(l)) == wanted);
            if listed {
                return Ok(false);
            }
            let mut file = OpenOptions::new().append(true).open(ignore_file)?;
            if content.last().is_some_and(|b| *b != b'\n') {
                file.write_all(b"\n")?;
            }
            file.write_all(line.as_bytes())?;
            debug!("Appended {} to {}", entry, ignore_file.display());
        }
        None => {
            fs::write(ignore_file, line)?;
            debug!("Created {} with {}", ignore_file.display(), entry);
        }
    }
    Ok(true)
}
