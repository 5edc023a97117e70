//! Bulk TLD import.
//!
//! Reads TLDs from a delimited file, one per line, with an optional
//! description:
//!
//! ```text
//! com,Commercial
//! org
//! co.uk,"United Kingdom, commercial"
//! ```
//!
//! Lines that cannot be imported do not stop the import. Each one is
//! reported as `<Error> --> <line>`, where `<Error>` is one of:
//!
//! | Error                | Cause                                      |
//! |----------------------|--------------------------------------------|
//! | `DuplicateTLD`       | The TLD already exists                     |
//! | `InvalidTLD`         | The name is not a valid TLD name           |
//! | `InvalidDescription` | The description exceeds 160 characters     |
//! | `InvalidLine`        | The line has more than two fields          |

use crate::error::{ImportError, ImportResult};
use crate::record::{render_list, split_record};
use designate_core::{is_tldname, DomainErrorKind, RequestContext, TldService, TldValues};
use std::path::Path;
use std::sync::Arc;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 160;

/// Why a line was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineError {
    /// The TLD already exists.
    DuplicateTld,
    /// The name is not a valid TLD name.
    InvalidTld,
    /// The description is too long.
    InvalidDescription,
    /// The line has more than two fields.
    InvalidLine,
}

impl LineError {
    /// Returns the name used in the report.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateTld => "DuplicateTLD",
            Self::InvalidTld => "InvalidTLD",
            Self::InvalidDescription => "InvalidDescription",
            Self::InvalidLine => "InvalidLine",
        }
    }
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TldLine {
    /// First field.
    pub name: String,
    /// Second field, if the line has one.
    pub description: Option<String>,
    /// Fields past the second.
    pub extra_fields: Vec<String>,
}

impl TldLine {
    /// Parses a line.
    #[must_use]
    pub fn parse(line: &str, delimiter: char) -> Self {
        let mut fields = split_record(line, delimiter).into_iter();
        Self {
            name: fields.next().unwrap_or_default(),
            description: fields.next(),
            extra_fields: fields.collect(),
        }
    }

    /// Renders the line for the error report. Empty values are left out.
    ///
    /// ```
    /// use designate_manage::tlds::TldLine;
    ///
    /// let line = TldLine::parse("com,Commercial,extra", ',');
    /// assert_eq!(
    ///     line.describe(),
    ///     "{'name': 'com', 'description': 'Commercial', 'extra_fields': '['extra']'}"
    /// );
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        let extra = (!self.extra_fields.is_empty()).then(|| render_list(&self.extra_fields));
        let entries: Vec<String> = [
            ("name", Some(self.name.as_str())),
            ("description", self.description.as_deref()),
            ("extra_fields", extra.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| format!("'{key}': '{v}'"))
        })
        .collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn check(&self) -> Option<LineError> {
        if !self.extra_fields.is_empty() {
            Some(LineError::InvalidLine)
        } else if !is_tldname(&self.name) {
            Some(LineError::InvalidTld)
        } else if self
            .description
            .as_deref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            Some(LineError::InvalidDescription)
        } else {
            None
        }
    }

    fn values(&self) -> TldValues {
        let values = TldValues::new(self.name.clone());
        match &self.description {
            Some(description) => values.with_description(description.clone()),
            None => values,
        }
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of TLDs created.
    pub added: usize,
    /// Report lines for every line not imported, sorted.
    pub error_lines: Vec<String>,
}

impl ImportReport {
    /// Returns the number of lines not imported.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_lines.len()
    }

    /// Writes the summary to the log.
    pub fn log(&self) {
        tracing::info!("Number of tlds added: {}", self.added);
        if !self.error_lines.is_empty() {
            tracing::error!("Number of errors: {}", self.error_count());
            tracing::error!("Error Lines:\n{}", self.error_lines.join("\n"));
        }
    }

    fn record(&mut self, error: LineError, line: &TldLine) {
        self.error_lines
            .push(format!("{error} --> {}", line.describe()));
    }
}

/// The `import-tlds` command.
pub struct ImportTlds<S: TldService + ?Sized> {
    service: Arc<S>,
    context: RequestContext,
    delimiter: char,
}

impl<S: TldService + ?Sized> ImportTlds<S> {
    /// Creates the command. TLDs are created as `context`.
    pub fn new(service: Arc<S>, context: RequestContext) -> Self {
        Self {
            service,
            context,
            delimiter: ',',
        }
    }

    /// Sets the field delimiter (default `,`).
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Imports every TLD in `path` and logs the summary.
    pub async fn import_file(&self, path: &Path) -> ImportResult<ImportReport> {
        if !path.exists() {
            return Err(ImportError::InputNotFound(path.to_path_buf()));
        }

        tracing::info!("Importing TLDs from {}", path.display());
        let input = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ImportError::read(path, e))?;

        let report = self.import_str(&input).await?;
        report.log();
        Ok(report)
    }

    /// Imports every TLD in `input`. Blank lines are skipped.
    pub async fn import_str(&self, input: &str) -> ImportResult<ImportReport> {
        let mut report = ImportReport::default();

        for raw in input.lines().filter(|l| !l.is_empty()) {
            let line = TldLine::parse(raw, self.delimiter);
            if let Some(error) = line.check() {
                report.record(error, &line);
                continue;
            }

            match self.service.create_tld(&self.context, line.values()).await {
                Ok(tld) => {
                    tracing::debug!(id = %tld.id, name = %tld.name, "Created TLD");
                    report.added += 1;
                }
                Err(e) if e.domain_kind() == Some(DomainErrorKind::DuplicateTld) => {
                    report.record(LineError::DuplicateTld, &line);
                }
                Err(e) => return Err(ImportError::Service(e)),
            }
        }

        report.error_lines.sort();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let line = TldLine::parse("com", ',');
        assert_eq!(line.name, "com");
        assert_eq!(line.description, None);
        assert!(line.extra_fields.is_empty());

        let line = TldLine::parse("com,Commercial,x,y", ',');
        assert_eq!(line.description.as_deref(), Some("Commercial"));
        assert_eq!(line.extra_fields, vec!["x", "y"]);
    }

    #[test]
    fn test_describe_omits_empty_values() {
        assert_eq!(TldLine::parse("com", ',').describe(), "{'name': 'com'}");
        assert_eq!(TldLine::parse("com,", ',').describe(), "{'name': 'com'}");
        assert_eq!(
            TldLine::parse("-bad,Nope", ',').describe(),
            "{'name': '-bad', 'description': 'Nope'}"
        );
    }

    #[test]
    fn test_check() {
        assert_eq!(TldLine::parse("com,ok", ',').check(), None);
        assert_eq!(TldLine::parse("a,b,c", ',').check(), Some(LineError::InvalidLine));
        assert_eq!(TldLine::parse("bad..name", ',').check(), Some(LineError::InvalidTld));

        let long = format!("com,{}", "d".repeat(MAX_DESCRIPTION_LEN + 1));
        assert_eq!(TldLine::parse(&long, ',').check(), Some(LineError::InvalidDescription));

        let limit = format!("com,{}", "d".repeat(MAX_DESCRIPTION_LEN));
        assert_eq!(TldLine::parse(&limit, ',').check(), None);
    }

    #[test]
    fn test_line_error_names() {
        assert_eq!(LineError::DuplicateTld.to_string(), "DuplicateTLD");
        assert_eq!(LineError::InvalidTld.to_string(), "InvalidTLD");
        assert_eq!(LineError::InvalidDescription.to_string(), "InvalidDescription");
    }
}
