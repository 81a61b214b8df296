// syslogview - platform/fs.rs
//
// Reading log input from files or stdin into lines.
// Invalid UTF-8 is replaced lossily so a single bad byte never aborts a view.

use crate::util::constants;
use crate::util::error::SyslogViewError;
use std::io::{self, Read};
use std::path::Path;

/// Read a file's lines, memory-mapping it above the large-file threshold.
pub fn read_file_lines(path: &Path) -> Result<Vec<String>, SyslogViewError> {
    let size = std::fs::metadata(path)
        .map_err(io_error(path, "stat"))?
        .len();
    let lines = if size > constants::LARGE_FILE_THRESHOLD {
        tracing::debug!(file = %path.display(), size, "Memory-mapping large input file");
        read_large_file(path).map_err(io_error(path, "map"))?
    } else {
        let bytes = std::fs::read(path).map_err(io_error(path, "read"))?;
        split_lines(&String::from_utf8_lossy(&bytes))
    };

    tracing::debug!(file = %path.display(), lines = lines.len(), "Input file read");
    Ok(lines)
}

/// Read all of stdin as lines.
pub fn read_stdin_lines() -> Result<Vec<String>, SyslogViewError> {
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .map_err(|source| SyslogViewError::Io {
            path: "<stdin>".into(),
            operation: "read",
            source,
        })?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes)))
}

fn io_error<'a>(
    path: &'a Path,
    operation: &'static str,
) -> impl FnOnce(io::Error) -> SyslogViewError + 'a {
    move |source| SyslogViewError::Io {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

/// Read lines straight out of a `memmap2` mapping.
///
/// Valid UTF-8 is split in place; only the per-line strings are allocated.
fn read_large_file(path: &Path) -> io::Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the file is read-only and we do not mutate the map.
    // We accept the documented risk that external modification of the file
    // during the map's lifetime could produce undefined behaviour, which is
    // acceptable for a log viewer reading already-written files.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(split_lines(&String::from_utf8_lossy(&mmap)))
}

/// Split on `\n`, dropping a trailing `\r` from each line.
fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_owned).collect()
}
