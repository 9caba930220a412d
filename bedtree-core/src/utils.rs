use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::BedError;
use crate::models::Entry;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, BedError> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)
        .map_err(|e| BedError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Whether a line is a BED header (`track`, `browser`) or a comment.
pub fn is_header_line(line: &str) -> bool {
    line.starts_with("track") || line.starts_with("browser") || line.starts_with('#')
}

///
/// Parse one tab separated BED line into an [Entry]. Columns past the third
/// are kept verbatim as attributes.
///
/// # Arguments
/// - line: the raw line
/// - line_number: 1-based line number, used for error messages
///
pub fn parse_bed_line(line: &str, line_number: usize) -> Result<Entry, BedError> {
    let mut fields = line.split('\t');

    let parse_error = |message: String| BedError::ParseError {
        line: line_number,
        message,
    };

    let chromosome = fields
        .next()
        .filter(|chr| !chr.is_empty())
        .ok_or_else(|| parse_error("missing chromosome field".to_string()))?;
    let start_str = fields
        .next()
        .ok_or_else(|| parse_error("missing start field".to_string()))?;
    let end_str = fields
        .next()
        .ok_or_else(|| parse_error("missing end field".to_string()))?;

    let start = start_str
        .trim()
        .parse::<u32>()
        .map_err(|e| parse_error(format!("invalid start '{}': {}", start_str, e)))?;
    let end = end_str
        .trim()
        .parse::<u32>()
        .map_err(|e| parse_error(format!("invalid end '{}': {}", end_str, e)))?;

    Ok(Entry {
        chromosome: chromosome.to_string(),
        start,
        end,
        attributes: fields.map(|s| s.to_string()).collect(),
    })
}

///
/// Read all entries from a BED-like stream, skipping header lines and blank lines.
///
pub fn read_bed_from<R: BufRead>(reader: R) -> Result<Vec<Entry>, BedError> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() || is_header_line(line) {
            continue;
        }

        entries.push(parse_bed_line(line, idx + 1)?);
    }

    Ok(entries)
}

///
/// Read all entries of a (optionally gzip'd) BED file, in file order.
///
pub fn read_bed<P: AsRef<Path>>(path: P) -> Result<Vec<Entry>, BedError> {
    let reader = get_dynamic_reader(path.as_ref())?;
    read_bed_from(reader)
}
