// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types and reporting for the assembler.
//!
//! The first error encountered anywhere in a run aborts it; errors carry
//! an optional source location so the report can name the file and line
//! they were raised at (or, for undefined labels, first referenced at).

use std::fmt;

/// Categories of assembler errors, one per process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmErrorKind {
    Cli,
    Io,
    Syntax,
}

/// A source position used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoc {
    pub file: String,
    pub line: u32,
}

impl SourceLoc {
    pub fn new(file: &str, line: u32) -> Self {
        Self {
            file: file.to_string(),
            line,
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// An assembler error with a kind, message and optional location.
#[derive(Debug, Clone)]
pub struct AsmError {
    kind: AsmErrorKind,
    message: String,
    location: Option<SourceLoc>,
}

impl AsmError {
    pub fn new(kind: AsmErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLoc) -> Self {
        self.location = Some(location);
        self
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&SourceLoc> {
        self.location.as_ref()
    }

    /// Process exit status for this error class.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            AsmErrorKind::Cli => 1,
            AsmErrorKind::Io => 2,
            AsmErrorKind::Syntax => 3,
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: error: {}", self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

impl std::error::Error for AsmError {}

/// Format an error message with an optional offending token.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg} '{p}'"),
        None => msg.to_string(),
    }
}
