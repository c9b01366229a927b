use super::parser::{
    extract_table_name, is_line_awr_entry, is_line_table_entry, is_table_human_readable_quick,
    split_line_into_entry_tokens,
};
use crate::domain::{XsdirError, XsdirResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Decides whether a tokenized directory line is handed to a processor.
pub trait LineFilter {
    fn accept(&self, entry_tokens: &[&str]) -> XsdirResult<bool>;
}

impl<F> LineFilter for F
where
    F: Fn(&[&str]) -> XsdirResult<bool>,
{
    fn accept(&self, entry_tokens: &[&str]) -> XsdirResult<bool> {
        self(entry_tokens)
    }
}

/// Consumes an admitted line along with its raw bytes, without the line
/// terminator.
pub trait LineProcessor {
    fn process(&mut self, entry_tokens: &[&str], line: &[u8]) -> XsdirResult<()>;
}

impl<F> LineProcessor for F
where
    F: FnMut(&[&str], &[u8]) -> XsdirResult<()>,
{
    fn process(&mut self, entry_tokens: &[&str], line: &[u8]) -> XsdirResult<()> {
        self(entry_tokens, line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseFilter {
    AwrEntries,
    TableEntries { human_readable_only: bool },
}

/// Base line filter combined with any number of secondary predicates. A line
/// is admitted only when all of them pass.
pub struct EntryFilter<'a> {
    base: BaseFilter,
    partial_filters: Vec<Box<dyn LineFilter + 'a>>,
    log_rejections: bool,
}

impl<'a> EntryFilter<'a> {
    pub fn awr_entries() -> Self {
        Self::new(BaseFilter::AwrEntries)
    }

    pub fn table_entries(human_readable_only: bool) -> Self {
        Self::new(BaseFilter::TableEntries {
            human_readable_only,
        })
    }

    fn new(base: BaseFilter) -> Self {
        Self {
            base,
            partial_filters: Vec::new(),
            log_rejections: false,
        }
    }

    pub fn with(mut self, filter: impl LineFilter + 'a) -> Self {
        self.partial_filters.push(Box::new(filter));
        self
    }

    pub fn log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }

    fn accept_base(&self, entry_tokens: &[&str]) -> XsdirResult<bool> {
        match self.base {
            BaseFilter::AwrEntries => Ok(is_line_awr_entry(entry_tokens)),
            BaseFilter::TableEntries {
                human_readable_only,
            } => {
                if !is_line_table_entry(entry_tokens) {
                    return Ok(false);
                }
                if human_readable_only && !is_table_human_readable_quick(entry_tokens) {
                    self.log_rejection(entry_tokens, "binary table");
                    return Ok(false);
                }
                Ok(true)
            }
        }
    }

    fn log_rejection(&self, entry_tokens: &[&str], reason: &str) {
        if !self.log_rejections {
            return;
        }
        let entry = extract_table_name(entry_tokens).unwrap_or_else(|_| {
            entry_tokens.first().copied().unwrap_or_default()
        });
        info!(entry = entry, reason = reason, "ignoring xsdir entry");
    }
}

impl LineFilter for EntryFilter<'_> {
    fn accept(&self, entry_tokens: &[&str]) -> XsdirResult<bool> {
        if !self.accept_base(entry_tokens)? {
            return Ok(false);
        }
        for filter in &self.partial_filters {
            if !filter.accept(entry_tokens)? {
                self.log_rejection(entry_tokens, "filtered");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Streams `xsdir_path` line by line, passing every admitted line to the
/// processor. The first filter or processor error stops the scan.
pub fn scan<F, P>(xsdir_path: &Path, filter: &F, processor: &mut P) -> XsdirResult<()>
where
    F: LineFilter + ?Sized,
    P: LineProcessor + ?Sized,
{
    let file = File::open(xsdir_path).map_err(|source| {
        XsdirError::io_system(
            "IO.XSDIR_OPEN",
            format!(
                "failed to open xsdir file '{}': {}",
                xsdir_path.display(),
                source
            ),
        )
    })?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let bytes_read = reader.read_until(b'\n', &mut buffer).map_err(|source| {
            XsdirError::io_system(
                "IO.XSDIR_READ",
                format!(
                    "failed to read xsdir file '{}': {}",
                    xsdir_path.display(),
                    source
                ),
            )
        })?;
        if bytes_read == 0 {
            return Ok(());
        }

        let line = buffer.strip_suffix(b"\n").unwrap_or(&buffer[..]);
        // Tokens come from a lossy view; processors still see the raw bytes.
        let text = String::from_utf8_lossy(line);
        let entry_tokens = split_line_into_entry_tokens(&text);

        if filter.accept(&entry_tokens)? {
            processor.process(&entry_tokens, line)?;
        }
    }
}
