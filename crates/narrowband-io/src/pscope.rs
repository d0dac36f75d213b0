//! PScope `.adc` / `.fft` container.
//!
//! Both files are line-oriented text. A short header is followed by one row
//! per sample (or per frequency bin) holding one value per channel, channels
//! separated by `", ,"`, and a final `End` line.
//!
//! ```text
//! Version,115
//! Retainers,0,<channels>,<samples>,1024,0,<rate MHz>,1,1
//! Placement,44,0,1,-1,-1,-1,-1,10,10,1031,734
//! DemoID,<board>,<device>,0
//! RawData,<ch>,<samples>,<bits>,<min>,<max>,<rate MHz>,<min %e>,<max %e>
//! 12, ,-40
//! ...
//! End
//! ```
//!
//! `.fft` files replace everything after `Version` with a single
//! `FFTMagnitude,<channels>,<samples/2>,<rate MHz>` line and hold
//! `samples/2 + 1` dBFS rows.

use crate::{Error, Result};
use narrowband_core::{AdcConfig, Capture, linspace};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Largest channel count PScope accepts.
pub const MAX_CHANNELS: usize = 16;

const VERSION_LINE: &str = "Version,115";
const PLACEMENT_LINE: &str = "Placement,44,0,1,-1,-1,-1,-1,10,10,1031,734";
const SEPARATOR: &str = ", ,";
const END: &str = "End";

/// Which container a path holds, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Raw ADC codes (`.adc`, and any unrecognised extension).
    Adc,
    /// dBFS magnitude spectra (`.fft`).
    Fft,
}

impl FileKind {
    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("fft") => FileKind::Fft,
            _ => FileKind::Adc,
        }
    }

    /// Number of header lines before the first data row.
    fn header_len(self, lines: &[&str]) -> Result<usize> {
        match self {
            FileKind::Fft => {
                if lines.get(1).is_some_and(|l| l.starts_with("FFTMagnitude")) {
                    Ok(2)
                } else {
                    Err(Error::MissingHeader("FFTMagnitude"))
                }
            }
            FileKind::Adc => {
                let raw = lines
                    .iter()
                    .skip(4)
                    .take_while(|l| l.starts_with("RawData"))
                    .count();
                if raw == 0 {
                    Err(Error::MissingHeader("RawData"))
                } else {
                    Ok(4 + raw)
                }
            }
        }
    }
}

/// Sibling `.fft` path for an `.adc` capture.
pub fn fft_path_for(adc_path: &Path) -> PathBuf {
    adc_path.with_extension("fft")
}

fn check_channels(num_channels: usize) -> Result<()> {
    if (1..=MAX_CHANNELS).contains(&num_channels) {
        Ok(())
    } else {
        Err(Error::InvalidChannelCount(num_channels))
    }
}

/// Format like C's `%e`: six fractional digits and a signed exponent of at
/// least two digits (`-8.192000e+03`).
fn c_exp(value: f64) -> String {
    let formatted = format!("{value:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
            }
            Err(_) => formatted,
        },
        None => formatted,
    }
}

fn write_body<W: Write, T: Display>(out: &mut W, columns: &[&[T]], num_rows: usize) -> Result<()> {
    for i in 0..num_rows {
        for (ch, column) in columns.iter().enumerate() {
            if ch > 0 {
                out.write_all(SEPARATOR.as_bytes())?;
            }
            write!(out, "{}", column[i])?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{END}")?;
    out.flush()?;
    Ok(())
}

/// Write a capture as a PScope `.adc` file.
///
/// The channel count, sample count and ADC description are checked before
/// the file is created, so an invalid capture never leaves a partial file
/// behind.
pub fn write_adc<P: AsRef<Path>>(path: P, capture: &Capture, config: &AdcConfig) -> Result<()> {
    let path = path.as_ref();
    let num_channels = capture.num_channels();
    check_channels(num_channels)?;
    let num_samples = capture.num_samples();
    if num_samples == 0 {
        return Err(Error::EmptyCapture);
    }
    config.validate()?;

    let rate = config.sample_rate_mhz;
    let (min_code, max_code) = (config.min_code(), config.max_code());

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{VERSION_LINE}")?;
    writeln!(
        out,
        "Retainers,0,{num_channels},{num_samples},1024,0,{rate:.15},1,1"
    )?;
    writeln!(out, "{PLACEMENT_LINE}")?;
    writeln!(out, "DemoID,{},{},0", config.demo_board, config.device)?;
    for ch in 1..=num_channels {
        writeln!(
            out,
            "RawData,{ch},{num_samples},{},{min_code},{max_code},{rate:.15},{},{}",
            config.bits,
            c_exp(min_code as f64),
            c_exp(max_code as f64)
        )?;
    }

    let columns: Vec<&[i32]> = capture.channels().iter().map(Vec::as_slice).collect();
    write_body(&mut out, &columns, num_samples)?;

    tracing::debug!(
        path = %path.display(),
        channels = num_channels,
        samples = num_samples,
        "wrote .adc"
    );
    Ok(())
}

/// Write per-channel dBFS spectra as a PScope `.fft` file.
///
/// Every spectrum must hold `num_samples/2 + 1` bins. Non-finite values are
/// written as `-inf` / `inf` / `NaN`.
pub fn write_fft<P: AsRef<Path>>(
    path: P,
    spectra: &[Vec<f64>],
    num_samples: usize,
    sample_rate_mhz: f64,
) -> Result<()> {
    let path = path.as_ref();
    check_channels(spectra.len())?;
    let expected = num_samples / 2 + 1;
    for (channel, spectrum) in spectra.iter().enumerate() {
        if spectrum.len() != expected {
            return Err(Error::SpectrumLength {
                channel,
                expected,
                found: spectrum.len(),
            });
        }
    }
    if !sample_rate_mhz.is_finite() || sample_rate_mhz <= 0.0 {
        return Err(narrowband_core::Error::InvalidSampleRate(sample_rate_mhz).into());
    }

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{VERSION_LINE}")?;
    writeln!(
        out,
        "FFTMagnitude,{},{},{sample_rate_mhz:.15}",
        spectra.len(),
        num_samples / 2
    )?;

    let columns: Vec<&[f64]> = spectra.iter().map(Vec::as_slice).collect();
    write_body(&mut out, &columns, expected)?;

    tracing::debug!(
        path = %path.display(),
        channels = spectra.len(),
        bins = expected,
        "wrote .fft"
    );
    Ok(())
}

/// Sample (or bin) matrix read back from a PScope file, one column per channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PscopeData {
    columns: Vec<Vec<f64>>,
}

impl PscopeData {
    /// Number of channel columns.
    pub fn num_channels(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Values of one channel.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// All channel columns.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// One row across all channels.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[index]).collect())
    }

    /// Convert `.adc` values back into an integer capture.
    pub fn to_capture(&self) -> Result<Capture> {
        let mut channels = Vec::with_capacity(self.columns.len());
        for (channel, column) in self.columns.iter().enumerate() {
            let mut codes = Vec::with_capacity(column.len());
            for (index, &value) in column.iter().enumerate() {
                let integral = value.is_finite()
                    && value.fract() == 0.0
                    && value >= f64::from(i32::MIN)
                    && value <= f64::from(i32::MAX);
                if !integral {
                    return Err(Error::NonIntegralSample {
                        channel,
                        index,
                        value,
                    });
                }
                codes.push(value as i32);
            }
            channels.push(codes);
        }
        Ok(Capture::new(channels)?)
    }

    fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for row in rows {
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Self { columns }
    }
}

/// Parsed header block.
#[derive(Debug, Clone, PartialEq)]
pub struct PscopeHeader {
    /// Container kind.
    pub kind: FileKind,
    /// Channel count.
    pub num_channels: usize,
    /// Count field as written: samples for `.adc`, samples/2 for `.fft`.
    pub count: usize,
    /// Sample rate in MHz.
    pub sample_rate_mhz: f64,
    /// ADC resolution (`.adc` only).
    pub bits: Option<u32>,
    /// Lowest code (`.adc` only).
    pub min_code: Option<i64>,
    /// Exclusive upper code bound (`.adc` only).
    pub max_code: Option<i64>,
    /// Demo board identifier (`.adc` only).
    pub demo_board: Option<String>,
    /// Device identifier (`.adc` only).
    pub device: Option<String>,
}

impl PscopeHeader {
    /// Sample rate in Hz.
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_mhz * 1e6
    }

    /// Length of the time-domain record the file describes.
    pub fn num_samples(&self) -> usize {
        match self.kind {
            FileKind::Adc => self.count,
            FileKind::Fft => self.count * 2,
        }
    }

    fn parse(kind: FileKind, lines: &[&str]) -> Result<Self> {
        match kind {
            FileKind::Fft => {
                let (line, fields) =
                    find_row(lines, "FFTMagnitude").ok_or(Error::MissingHeader("FFTMagnitude"))?;
                Ok(Self {
                    kind,
                    num_channels: field(&fields, 1, line, lines)?,
                    count: field(&fields, 2, line, lines)?,
                    sample_rate_mhz: field(&fields, 3, line, lines)?,
                    bits: None,
                    min_code: None,
                    max_code: None,
                    demo_board: None,
                    device: None,
                })
            }
            FileKind::Adc => {
                let (line, fields) =
                    find_row(lines, "RawData").ok_or(Error::MissingHeader("RawData"))?;
                let num_channels = match find_row(lines, "Retainers") {
                    Some((l, f)) => field(&f, 2, l, lines)?,
                    None => lines.iter().filter(|l| l.starts_with("RawData")).count(),
                };
                let demo = find_row(lines, "DemoID");
                Ok(Self {
                    kind,
                    num_channels,
                    count: field(&fields, 2, line, lines)?,
                    sample_rate_mhz: field(&fields, 6, line, lines)?,
                    bits: Some(field(&fields, 3, line, lines)?),
                    min_code: Some(field(&fields, 4, line, lines)?),
                    max_code: Some(field(&fields, 5, line, lines)?),
                    demo_board: demo.as_ref().and_then(|(_, f)| f.get(1)).map(|s| s.to_string()),
                    device: demo.as_ref().and_then(|(_, f)| f.get(2)).map(|s| s.to_string()),
                })
            }
        }
    }
}

/// First line starting with `tag`, as (index, comma-split fields).
fn find_row<'a>(lines: &[&'a str], tag: &str) -> Option<(usize, Vec<&'a str>)> {
    lines
        .iter()
        .position(|l| l.split(',').next() == Some(tag))
        .map(|i| (i, lines[i].split(',').map(str::trim).collect()))
}

fn field<T: std::str::FromStr>(fields: &[&str], index: usize, line: usize, lines: &[&str]) -> Result<T> {
    fields
        .get(index)
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| Error::MalformedRecord {
            line: line + 1,
            content: lines[line].to_string(),
        })
}

/// Time or frequency coordinate of each data row.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    /// Seconds from the first sample (`.adc`).
    Time(Vec<f64>),
    /// Hz from DC to Nyquist (`.fft`).
    Frequency(Vec<f64>),
}

impl Axis {
    /// The coordinate values.
    pub fn values(&self) -> &[f64] {
        match self {
            Axis::Time(v) | Axis::Frequency(v) => v,
        }
    }
}

/// Data, header and axis of a PScope file.
#[derive(Debug, Clone, PartialEq)]
pub struct PscopeRecord {
    /// Parsed header.
    pub header: PscopeHeader,
    /// Sample or bin matrix.
    pub data: PscopeData,
    /// Coordinate of each row.
    pub axis: Axis,
}

/// Read the value matrix of an `.adc` or `.fft` file.
///
/// Rows are first split strictly on `", ,"`. If any row fails, the whole body
/// is re-parsed tolerantly (comma-split, trimmed, empty fields skipped); only
/// a failure of that second pass is returned.
pub fn read_data<P: AsRef<Path>>(path: P) -> Result<PscopeData> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let lines: Vec<&str> = text.lines().collect();
    parse_data(path, FileKind::from_path(path), &lines)
}

/// Read a file's matrix together with its header and time/frequency axis.
pub fn read_record<P: AsRef<Path>>(path: P) -> Result<PscopeRecord> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let lines: Vec<&str> = text.lines().collect();
    let kind = FileKind::from_path(path);

    let header_len = kind.header_len(&lines)?;
    let header = PscopeHeader::parse(kind, &lines[..header_len])?;
    let data = parse_data(path, kind, &lines)?;

    let len = data.num_rows();
    let rate_hz = header.sample_rate_hz();
    let axis = match kind {
        FileKind::Adc => Axis::Time(linspace(0.0, len as f64 / rate_hz, len)),
        FileKind::Fft => Axis::Frequency(linspace(0.0, rate_hz / 2.0, len)),
    };

    Ok(PscopeRecord { header, data, axis })
}

/// Read only the header block of a file.
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<PscopeHeader> {
    let path = path.as_ref();
    let kind = FileKind::from_path(path);
    let reader = BufReader::new(File::open(path)?);

    let mut owned = Vec::new();
    for line in reader.lines().take(4 + MAX_CHANNELS + 1) {
        owned.push(line?);
    }
    let lines: Vec<&str> = owned.iter().map(String::as_str).collect();
    let header_len = kind.header_len(&lines)?;
    PscopeHeader::parse(kind, &lines[..header_len])
}

fn parse_data(path: &Path, kind: FileKind, lines: &[&str]) -> Result<PscopeData> {
    let skip = kind.header_len(lines)?;
    let mut body = &lines[skip..];
    while let Some((last, rest)) = body.split_last() {
        if last.trim().is_empty() {
            body = rest;
        } else {
            if last.trim() == END {
                body = rest;
            }
            break;
        }
    }

    let rows = match parse_rows(body, skip, split_strict) {
        Ok(rows) => rows,
        Err(err @ Error::MalformedRecord { .. }) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "strict parse failed, retrying with tolerant parser"
            );
            parse_rows(body, skip, split_tolerant)?
        }
        Err(e) => return Err(e),
    };

    let data = PscopeData::from_rows(rows);
    tracing::debug!(
        path = %path.display(),
        channels = data.num_channels(),
        rows = data.num_rows(),
        "read PScope data"
    );
    Ok(data)
}

fn split_strict(line: &str) -> Option<Vec<f64>> {
    line.split(SEPARATOR).map(|f| f.parse().ok()).collect()
}

fn split_tolerant(line: &str) -> Option<Vec<f64>> {
    line.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| f.parse().ok())
        .collect()
}

fn parse_rows(
    body: &[&str],
    offset: usize,
    split: fn(&str) -> Option<Vec<f64>>,
) -> Result<Vec<Vec<f64>>> {
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(body.len());
    for (i, line) in body.iter().enumerate() {
        let malformed = || Error::MalformedRecord {
            line: offset + i + 1,
            content: line.to_string(),
        };
        let row = split(line).ok_or_else(malformed)?;
        if row.is_empty() {
            continue;
        }
        if rows.first().is_some_and(|first| first.len() != row.len()) {
            return Err(malformed());
        }
        rows.push(row);
    }
    Ok(rows)
}
