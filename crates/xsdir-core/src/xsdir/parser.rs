use crate::common::constants::{AWR_ENTRY_MAX_EXCLUSIVE_ZAID, AWR_ENTRY_MIN_EXCLUSIVE_ZAID};
use crate::domain::{ParserResult, TableName, XsdirError, Zaid};
use std::path::{Path, PathBuf};

const TABLE_NAME_TOKEN: usize = 0;
const ATOMIC_WEIGHT_RATIO_TOKEN: usize = 1;
const FILE_NAME_TOKEN: usize = 2;
const ACCESS_ROUTE_TOKEN: usize = 3;
const FILE_TYPE_TOKEN: usize = 4;
const START_LINE_TOKEN: usize = 5;
const TABLE_LENGTH_TOKEN: usize = 6;
const EVALUATION_TEMP_TOKEN: usize = 9;

/// Splits a directory line into whitespace separated tokens. Leading and
/// repeated separators never produce empty tokens.
pub fn split_line_into_entry_tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

pub fn is_line_awr_entry(entry_tokens: &[&str]) -> bool {
    let Some(first) = entry_tokens.first() else {
        return false;
    };
    if !first.bytes().all(|byte| byte.is_ascii_digit()) {
        return false;
    }
    match first.parse::<u64>() {
        Ok(value) => {
            value > u64::from(AWR_ENTRY_MIN_EXCLUSIVE_ZAID)
                && value < u64::from(AWR_ENTRY_MAX_EXCLUSIVE_ZAID)
        }
        Err(_) => false,
    }
}

pub fn is_line_table_entry(entry_tokens: &[&str]) -> bool {
    entry_tokens
        .first()
        .is_some_and(|first| first.contains('.'))
}

pub fn is_table_human_readable(entry_tokens: &[&str]) -> ParserResult<bool> {
    require_table_entry(entry_tokens)?;
    let flag = require_token(entry_tokens, FILE_TYPE_TOKEN, "file type flag")?;
    Ok(flag == "1")
}

/// Unchecked variant used while filtering, where short or malformed lines
/// simply fail the test.
pub(crate) fn is_table_human_readable_quick(entry_tokens: &[&str]) -> bool {
    entry_tokens.get(FILE_TYPE_TOKEN) == Some(&"1")
}

/// True when the table name carries one of the five supported type keys.
pub fn is_table_type_supported(entry_tokens: &[&str]) -> ParserResult<bool> {
    Ok(extract_table_name_components(entry_tokens)?.kind().is_some())
}

pub fn extract_table_name<'a>(entry_tokens: &[&'a str]) -> ParserResult<&'a str> {
    require_table_entry(entry_tokens)?;
    Ok(entry_tokens[TABLE_NAME_TOKEN])
}

pub fn extract_table_name_components(entry_tokens: &[&str]) -> ParserResult<TableName> {
    TableName::parse(extract_table_name(entry_tokens)?)
}

pub fn extract_atomic_weight_ratio(entry_tokens: &[&str]) -> ParserResult<f64> {
    require_table_entry(entry_tokens)?;
    parse_token(entry_tokens, ATOMIC_WEIGHT_RATIO_TOKEN, "atomic weight ratio")
}

/// Relative table file path; the access route, when not `0`, is a directory
/// prefix.
pub fn extract_path(entry_tokens: &[&str]) -> ParserResult<PathBuf> {
    require_table_entry(entry_tokens)?;
    let file_name = require_token(entry_tokens, FILE_NAME_TOKEN, "file name")?;
    let access_route = require_token(entry_tokens, ACCESS_ROUTE_TOKEN, "access route")?;

    if access_route == "0" {
        Ok(preferred_path(file_name))
    } else {
        Ok(preferred_path(access_route).join(preferred_path(file_name)))
    }
}

pub fn extract_file_start_line(entry_tokens: &[&str]) -> ParserResult<usize> {
    if !is_table_human_readable(entry_tokens)? {
        return Err(XsdirError::format(
            "FORMAT.BINARY_START_LINE",
            format!(
                "binary table entry has no text start line: '{}'",
                entry_tokens.join(" ")
            ),
        ));
    }
    parse_token(entry_tokens, START_LINE_TOKEN, "file start line")
}

pub fn extract_table_length(entry_tokens: &[&str]) -> ParserResult<usize> {
    require_table_entry(entry_tokens)?;
    if entry_tokens.len() <= TABLE_LENGTH_TOKEN {
        return Ok(0);
    }
    parse_token(entry_tokens, TABLE_LENGTH_TOKEN, "table length")
}

/// Evaluation temperature in MeV, zero when the entry omits it.
pub fn extract_evaluation_temperature(entry_tokens: &[&str]) -> ParserResult<f64> {
    require_table_entry(entry_tokens)?;
    if entry_tokens.len() <= EVALUATION_TEMP_TOKEN {
        return Ok(0.0);
    }
    parse_token(entry_tokens, EVALUATION_TEMP_TOKEN, "evaluation temperature")
}

/// Pairs of (zaid, atomic weight ratio) declared on an atomic weight ratio
/// line.
pub fn extract_zaids_and_atomic_weight_ratios(
    entry_tokens: &[&str],
) -> ParserResult<Vec<(Zaid, f64)>> {
    if !is_line_awr_entry(entry_tokens) {
        return Err(XsdirError::format(
            "FORMAT.AWR_ENTRY",
            format!(
                "line is not an atomic weight ratio entry: '{}'",
                entry_tokens.join(" ")
            ),
        ));
    }
    if entry_tokens.len() % 2 != 0 {
        return Err(XsdirError::format(
            "FORMAT.AWR_ENTRY",
            format!(
                "atomic weight ratio entry has an odd number of tokens ({}): '{}'",
                entry_tokens.len(),
                entry_tokens.join(" ")
            ),
        ));
    }

    entry_tokens
        .chunks_exact(2)
        .map(|pair| {
            let zaid = Zaid::from_basic_name(pair[0]).ok_or_else(|| {
                awr_token_error(entry_tokens, pair[0], "zaid")
            })?;
            let atomic_weight_ratio = pair[1]
                .parse::<f64>()
                .map_err(|_| awr_token_error(entry_tokens, pair[1], "atomic weight ratio"))?;
            Ok((zaid, atomic_weight_ratio))
        })
        .collect()
}

/// Joins a table path to the directory that holds the xsdir file.
pub fn construct_complete_table_file_path(xsdir_path: &Path, relative_path: &Path) -> PathBuf {
    match xsdir_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(relative_path),
        _ => relative_path.to_path_buf(),
    }
}

/// Fields of one table entry, extracted in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub table_name: TableName,
    pub atomic_weight_ratio: f64,
    pub relative_path: PathBuf,
    pub file_start_line: usize,
    pub table_length: usize,
    pub evaluation_temp_in_mev: f64,
}

impl TableEntry {
    pub fn from_tokens(entry_tokens: &[&str]) -> ParserResult<Self> {
        Ok(Self {
            table_name: extract_table_name_components(entry_tokens)?,
            atomic_weight_ratio: extract_atomic_weight_ratio(entry_tokens)?,
            relative_path: extract_path(entry_tokens)?,
            file_start_line: extract_file_start_line(entry_tokens)?,
            table_length: extract_table_length(entry_tokens)?,
            evaluation_temp_in_mev: extract_evaluation_temperature(entry_tokens)?,
        })
    }
}

fn preferred_path(raw: &str) -> PathBuf {
    let mut path = PathBuf::new();
    if raw.starts_with('/') {
        path.push(std::path::MAIN_SEPARATOR_STR);
    }
    for component in raw.split(['/', '\\']).filter(|component| !component.is_empty()) {
        path.push(component);
    }
    path
}

fn require_table_entry(entry_tokens: &[&str]) -> ParserResult<()> {
    if is_line_table_entry(entry_tokens) {
        Ok(())
    } else {
        Err(XsdirError::format(
            "FORMAT.TABLE_ENTRY",
            format!(
                "line does not have table data: '{}'",
                entry_tokens.join(" ")
            ),
        ))
    }
}

fn require_token<'a>(
    entry_tokens: &[&'a str],
    index: usize,
    field: &str,
) -> ParserResult<&'a str> {
    entry_tokens.get(index).copied().ok_or_else(|| {
        XsdirError::format(
            "FORMAT.TABLE_ENTRY",
            format!(
                "table entry is missing the {} (token {}): '{}'",
                field,
                index,
                entry_tokens.join(" ")
            ),
        )
    })
}

fn parse_token<T: std::str::FromStr>(
    entry_tokens: &[&str],
    index: usize,
    field: &str,
) -> ParserResult<T> {
    let token = require_token(entry_tokens, index, field)?;
    token.parse::<T>().map_err(|_| {
        XsdirError::format(
            "FORMAT.TABLE_ENTRY",
            format!(
                "invalid {} '{}' in table entry: '{}'",
                field,
                token,
                entry_tokens.join(" ")
            ),
        )
    })
}

fn awr_token_error(entry_tokens: &[&str], token: &str, field: &str) -> XsdirError {
    XsdirError::format(
        "FORMAT.AWR_ENTRY",
        format!(
            "invalid {} '{}' in atomic weight ratio entry: '{}'",
            field,
            token,
            entry_tokens.join(" ")
        ),
    )
}
