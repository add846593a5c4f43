//! Input data handling for cache simulation
//!
//! Reads request traces from CSV files with a `timestamp,key` header. A path
//! may name a single file or a directory, in which case every `.csv` file in
//! it is read in name order.

use crate::models::Request;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Returns the trace files at `path`, sorted by name.
pub fn trace_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("reading {}", path.display()))? {
        let file = entry?.path();
        if file.is_file() && file.extension().is_some_and(|ext| ext == "csv") {
            files.push(file);
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!("no .csv trace files in {}", path.display());
    }
    Ok(files)
}

/// Parses requests from any CSV reader.
pub fn parse_requests<R: Read>(reader: R) -> Result<Vec<Request>> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut requests = Vec::new();
    for (row, record) in csv.deserialize::<Request>().enumerate() {
        // Row numbers are 1-based and skip the header.
        let request = record.with_context(|| format!("invalid request on row {}", row + 2))?;
        requests.push(request);
    }
    Ok(requests)
}

/// Reads every request at `path`, ordered by timestamp.
///
/// Requests with equal timestamps keep their file order.
pub fn read_trace(path: &Path) -> Result<Vec<Request>> {
    let mut requests = Vec::new();
    for file in trace_files(path)? {
        let handle = fs::File::open(&file).with_context(|| format!("opening {}", file.display()))?;
        let parsed = parse_requests(handle).with_context(|| format!("parsing {}", file.display()))?;
        tracing::debug!("[input]: {} requests from {}", parsed.len(), file.display());
        requests.extend(parsed);
    }
    requests.sort_by_key(|request| request.timestamp);
    Ok(requests)
}
