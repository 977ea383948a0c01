// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for filter construction and snapshot import.

use std::fmt;

/// ErrorKind is all kinds of Error of sketchfilters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The parameters used to construct a filter are invalid.
    ConfigInvalid,
    /// The snapshot being imported has the wrong type tag or is malformed.
    FormatMismatch,
    /// A bulk build could not place every element.
    FilterFull,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::FormatMismatch => "FormatMismatch",
            ErrorKind::FilterFull => "FilterFull",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all fallible sketchfilters functions.
///
/// # Examples
///
/// ```
/// # use sketchfilters::error::Error;
/// # use sketchfilters::error::ErrorKind;
/// let err = Error::new(ErrorKind::ConfigInvalid, "bad input");
/// assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
/// assert_eq!(err.message(), "bad input");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use sketchfilters::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::FormatMismatch, "failed to import filter");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::new(std::io::ErrorKind::Other, "IO error"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenient constructors used within the crate.
impl Error {
    pub(crate) fn config_invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, msg)
    }

    pub(crate) fn format_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::FormatMismatch, msg)
    }

    pub(crate) fn insufficient_data(field: &'static str) -> Self {
        Self::format_mismatch(format!("insufficient data: {field}"))
    }

    pub(crate) fn invalid_family(expected: u8, actual: u8, name: &'static str) -> Self {
        Self::format_mismatch(format!(
            "invalid family: expected {expected} ({name}), got {actual}"
        ))
    }

    pub(crate) fn unsupported_serial_version(expected: u8, actual: u8) -> Self {
        Self::format_mismatch(format!(
            "unsupported serial version: expected {expected}, got {actual}"
        ))
    }

    pub(crate) fn invalid_preamble_longs(expected: u8, actual: u8) -> Self {
        Self::format_mismatch(format!(
            "invalid preamble longs: expected {expected}, got {actual}"
        ))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}: {v}")?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_format_consistency() {
        let err = Error::new(ErrorKind::ConfigInvalid, "capacity must be greater than 0");
        assert_snapshot!(err, @"ConfigInvalid => capacity must be greater than 0");
    }

    #[test]
    fn test_format_with_multiple_contexts() {
        let err = Error::new(ErrorKind::FormatMismatch, "bucket overflow")
            .with_context("bucket", 42)
            .with_context("length", 9);
        assert_snapshot!(err, @"FormatMismatch, context: { bucket: 42, length: 9 } => bucket overflow");
    }

    #[test]
    fn test_format_with_source() {
        let err = Error::insufficient_data("bucket_count")
            .set_source(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"));
        assert_snapshot!(err, @"FormatMismatch => insufficient data: bucket_count, source: eof");
    }

    #[test]
    fn test_invalid_family_message() {
        let err = Error::invalid_family(25, 24, "CUCKOO");
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
        assert_eq!(err.message(), "invalid family: expected 25 (CUCKOO), got 24");
    }
}
