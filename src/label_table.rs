// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Label table with forward-reference bookkeeping.

use crate::error::SourceLoc;

/// How a reference site is patched in pass 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Two placeholder bytes, patched with the definition offset
    /// little-endian.
    Absolute16,
    /// One placeholder byte, patched with the signed displacement
    /// `definition - site - 1`.
    Relative8,
}

/// A byte offset in the image holding placeholder bytes for a label.
#[derive(Debug, Clone, Copy)]
pub struct LabelRef {
    pub offset: u32,
    pub kind: RefKind,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub name: String,
    pub definition: Option<u32>,
    pub refs: Vec<LabelRef>,
    /// Retained only for the undefined-label diagnostic.
    pub first_ref: Option<SourceLoc>,
}

/// Labels keyed by upper-cased name, in order of first mention.
///
/// Find-or-create is the only lookup primitive; redefining a name
/// overwrites its definition offset (last write wins).
#[derive(Debug, Default)]
pub struct LabelTable {
    entries: Vec<Label>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn find_or_create(&mut self, name: &str) -> &mut Label {
        let name = name.to_ascii_uppercase();
        if let Some(ix) = self.entries.iter().position(|entry| entry.name == name) {
            return &mut self.entries[ix];
        }
        self.entries.push(Label {
            name,
            definition: None,
            refs: Vec::new(),
            first_ref: None,
        });
        self.entries.last_mut().unwrap()
    }

    /// Record a label definition at `offset`.
    pub fn define(&mut self, name: &str, offset: u32) {
        self.find_or_create(name).definition = Some(offset);
    }

    /// Record a reference site awaiting resolution. The location of the
    /// first reference is kept for error reporting.
    pub fn reference(&mut self, name: &str, offset: u32, kind: RefKind, loc: &SourceLoc) {
        let entry = self.find_or_create(name);
        entry.refs.push(LabelRef { offset, kind });
        if entry.first_ref.is_none() {
            entry.first_ref = Some(loc.clone());
        }
    }

    pub fn entries(&self) -> &[Label] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&Label> {
        let name = name.to_ascii_uppercase();
        self.entries.iter().find(|entry| entry.name == name)
    }
}
