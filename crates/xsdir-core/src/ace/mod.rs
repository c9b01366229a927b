//! Minimal reader for the text header of an ACE table.
//!
//! Only what is needed to discover the ZAIDs that an S(alpha,beta) table
//! applies to is parsed. Both the legacy header and the 2.0.x header are
//! understood.

use crate::domain::{XsdirError, XsdirResult, Zaid};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

const IZAW_LINE_COUNT: usize = 4;
const IZAW_PAIRS_PER_LINE: usize = 4;
const MAX_LEGACY_LINES_BEFORE_IZAW: usize = 2;

/// Resolves the ZAIDs covered by a thermal scattering table.
pub trait ThermalZaidResolver {
    fn resolve(
        &self,
        table_file_path: &Path,
        table_name: &str,
        file_start_line: usize,
    ) -> XsdirResult<BTreeSet<Zaid>>;
}

/// Reads thermal table ZAIDs from the text header of an ACE file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AceTextHeaderReader;

impl ThermalZaidResolver for AceTextHeaderReader {
    fn resolve(
        &self,
        table_file_path: &Path,
        table_name: &str,
        file_start_line: usize,
    ) -> XsdirResult<BTreeSet<Zaid>> {
        let header = read_ace_table_header(table_file_path, table_name, file_start_line)?;
        Ok(header.zaids())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AceTableHeader {
    pub table_name: String,
    pub atomic_weight_ratio: f64,
    pub evaluation_temp_in_mev: f64,
    pub date: String,
    pub format_version: Option<String>,
    pub zaid_awr_pairs: Vec<(i64, f64)>,
}

impl AceTableHeader {
    /// Non-zero IZ entries of the IZ/AW array.
    pub fn zaids(&self) -> BTreeSet<Zaid> {
        self.zaid_awr_pairs
            .iter()
            .filter(|(raw_zaid, _)| *raw_zaid > 0)
            .filter_map(|(raw_zaid, _)| u32::try_from(*raw_zaid).ok().map(Zaid::new))
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AceHeaderError {
    #[error("failed to open ACE table file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read ACE table file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ACE table '{table_name}' in '{}' ends before its header is complete", path.display())]
    Truncated { path: PathBuf, table_name: String },
    #[error("ACE table header at line {start_line} of '{}' names '{found}' instead of '{table_name}'", path.display())]
    NameMismatch {
        path: PathBuf,
        table_name: String,
        found: String,
        start_line: usize,
    },
    #[error("ACE table '{table_name}' has an invalid header line: '{line}'")]
    InvalidLine { table_name: String, line: String },
    #[error("the S(alpha,beta) table '{table_name}' header could not be parsed: it lists no zaids")]
    EmptyZaidSet { table_name: String },
}

impl From<AceHeaderError> for XsdirError {
    fn from(error: AceHeaderError) -> Self {
        match error {
            AceHeaderError::Open { .. } | AceHeaderError::Read { .. } => {
                XsdirError::io_system("IO.ACE_TABLE_READ", error.to_string())
            }
            _ => XsdirError::format("FORMAT.ACE_HEADER", error.to_string()),
        }
    }
}

/// Reads the header of the table that begins at the 1-based `file_start_line`.
pub fn read_ace_table_header(
    table_file_path: &Path,
    table_name: &str,
    file_start_line: usize,
) -> Result<AceTableHeader, AceHeaderError> {
    let file = File::open(table_file_path).map_err(|source| AceHeaderError::Open {
        path: table_file_path.to_path_buf(),
        source,
    })?;
    let mut lines = HeaderLines {
        lines: BufReader::new(file).lines(),
        path: table_file_path,
        table_name,
    };

    for _ in 1..file_start_line.max(1) {
        lines.next_line()?;
    }

    let first = lines.next_line()?;
    let first_tokens: Vec<&str> = first.split_whitespace().collect();
    let header = if first_tokens
        .first()
        .is_some_and(|token| token.starts_with("2.0"))
    {
        read_versioned_header(&mut lines, &first_tokens, file_start_line)?
    } else {
        read_legacy_header(&mut lines, &first_tokens, file_start_line)?
    };

    if header.zaids().is_empty() {
        return Err(AceHeaderError::EmptyZaidSet {
            table_name: table_name.to_string(),
        });
    }
    Ok(header)
}

fn read_legacy_header(
    lines: &mut HeaderLines<'_, '_>,
    first_tokens: &[&str],
    file_start_line: usize,
) -> Result<AceTableHeader, AceHeaderError> {
    let found = first_tokens.first().copied().unwrap_or_default();
    lines.check_name(found, file_start_line)?;
    let atomic_weight_ratio = lines.parse_field(first_tokens, 1)?;
    let evaluation_temp_in_mev = lines.parse_field(first_tokens, 2)?;
    let date = first_tokens.get(3).copied().unwrap_or_default().to_string();

    // Comment and material line.
    lines.next_line()?;

    let zaid_awr_pairs = lines.read_izaw_pairs(0)?;
    Ok(AceTableHeader {
        table_name: found.to_string(),
        atomic_weight_ratio,
        evaluation_temp_in_mev,
        date,
        format_version: None,
        zaid_awr_pairs,
    })
}

fn read_versioned_header(
    lines: &mut HeaderLines<'_, '_>,
    first_tokens: &[&str],
    file_start_line: usize,
) -> Result<AceTableHeader, AceHeaderError> {
    let found = first_tokens.get(1).copied().unwrap_or_default();
    lines.check_name(found, file_start_line)?;

    let second = lines.next_line()?;
    let second_tokens: Vec<&str> = second.split_whitespace().collect();
    let atomic_weight_ratio = lines.parse_field(&second_tokens, 0)?;
    let evaluation_temp_in_mev = lines.parse_field(&second_tokens, 1)?;
    let date = second_tokens.get(2).copied().unwrap_or_default().to_string();
    let comment_lines: usize = lines.parse_field(&second_tokens, 3)?;

    for _ in 0..comment_lines {
        lines.next_line()?;
    }

    let zaid_awr_pairs = lines.read_izaw_pairs(MAX_LEGACY_LINES_BEFORE_IZAW)?;
    Ok(AceTableHeader {
        table_name: found.to_string(),
        atomic_weight_ratio,
        evaluation_temp_in_mev,
        date,
        format_version: first_tokens.first().map(|token| token.to_string()),
        zaid_awr_pairs,
    })
}

struct HeaderLines<'p, 'n> {
    lines: Lines<BufReader<File>>,
    path: &'p Path,
    table_name: &'n str,
}

impl HeaderLines<'_, '_> {
    fn next_line(&mut self) -> Result<String, AceHeaderError> {
        match self.lines.next() {
            Some(Ok(line)) => Ok(line),
            Some(Err(source)) => Err(AceHeaderError::Read {
                path: self.path.to_path_buf(),
                source,
            }),
            None => Err(AceHeaderError::Truncated {
                path: self.path.to_path_buf(),
                table_name: self.table_name.to_string(),
            }),
        }
    }

    fn check_name(&self, found: &str, start_line: usize) -> Result<(), AceHeaderError> {
        if found == self.table_name {
            return Ok(());
        }
        Err(AceHeaderError::NameMismatch {
            path: self.path.to_path_buf(),
            table_name: self.table_name.to_string(),
            found: found.to_string(),
            start_line,
        })
    }

    fn parse_field<T: std::str::FromStr>(
        &self,
        tokens: &[&str],
        index: usize,
    ) -> Result<T, AceHeaderError> {
        tokens
            .get(index)
            .and_then(|token| token.parse::<T>().ok())
            .ok_or_else(|| AceHeaderError::InvalidLine {
                table_name: self.table_name.to_string(),
                line: tokens.join(" "),
            })
    }

    /// Reads the four IZ/AW lines, skipping up to `max_skipped` lines that
    /// precede them.
    fn read_izaw_pairs(&mut self, max_skipped: usize) -> Result<Vec<(i64, f64)>, AceHeaderError> {
        let mut skipped = 0;
        let mut pairs = loop {
            let line = self.next_line()?;
            match parse_izaw_line(&line) {
                Some(pairs) => break pairs,
                None if skipped < max_skipped => skipped += 1,
                None => {
                    return Err(AceHeaderError::InvalidLine {
                        table_name: self.table_name.to_string(),
                        line,
                    });
                }
            }
        };

        for _ in 1..IZAW_LINE_COUNT {
            let line = self.next_line()?;
            let line_pairs = parse_izaw_line(&line).ok_or_else(|| AceHeaderError::InvalidLine {
                table_name: self.table_name.to_string(),
                line: line.clone(),
            })?;
            pairs.extend(line_pairs);
        }
        Ok(pairs)
    }
}

fn parse_izaw_line(line: &str) -> Option<Vec<(i64, f64)>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 2 * IZAW_PAIRS_PER_LINE {
        return None;
    }
    tokens
        .chunks_exact(2)
        .map(|pair| Some((pair[0].parse::<i64>().ok()?, pair[1].parse::<f64>().ok()?)))
        .collect()
}
