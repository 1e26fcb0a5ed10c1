//! Reading and writing populations in the MATSim `population_v6` XML format.
//!
//! Files whose name ends in `.gz` are gzip-compressed on write and decompressed on read.
mod reader;
mod writer;

use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::PlansError;

pub use reader::read_population;
pub use writer::write_population;

pub(crate) const POPULATION_DTD: &str = "http://www.matsim.org/files/dtd/population_v6.dtd";
pub(crate) const CRS_ATTRIBUTE: &str = "coordinateReferenceSystem";
pub(crate) const STRING_CLASS: &str = "java.lang.String";

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(OsStr::to_str) == Some("gz")
}

/// A file being written, compressed or not.
enum Output {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Output {
    /// Creates the file and all of its parent directories.
    fn create(path: &Path) -> Result<Output, PlansError> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        let file = BufWriter::new(File::create(path)?);
        if is_gzip(path) {
            Ok(Output::Gzip(GzEncoder::new(file, Compression::default())))
        } else {
            Ok(Output::Plain(file))
        }
    }

    /// Flushes everything, including the gzip trailer, surfacing any error.
    fn finish(self) -> io::Result<()> {
        match self {
            Output::Plain(mut file) => file.flush(),
            Output::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Plain(file) => file.write(buf),
            Output::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Plain(file) => file.flush(),
            Output::Gzip(encoder) => encoder.flush(),
        }
    }
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, PlansError> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Renders seconds since midnight as `HH:MM:SS`, truncating fractions of a second. Hours are not
/// wrapped at midnight and negative times get a leading `-`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(seconds: f64) -> String {
    if seconds < 0.0 {
        return format!("-{}", format_time(-seconds));
    }
    let total = seconds.trunc() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Parses `HH:MM:SS` or `HH:MM`, optionally preceded by `-`, into seconds since midnight.
///
/// # Errors
///
/// Returns `PlansError::PopulationFormat` if `value` is not a time of day.
pub fn parse_time(value: &str) -> Result<f64, PlansError> {
    let invalid = || PlansError::PopulationFormat(format!("invalid time of day '{value}'"));
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, value),
    };

    let parts = unsigned
        .split(':')
        .map(|part| part.trim().parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    let (hours, minutes, seconds) = match parts[..] {
        [hours, minutes] => (hours, minutes, 0),
        [hours, minutes, seconds] => (hours, minutes, seconds),
        _ => return Err(invalid()),
    };
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }
    Ok(sign * (f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + f64::from(seconds)))
}
