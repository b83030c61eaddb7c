// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Pass 1: read source files line by line, emit bytes and record label
//! sites.
//!
//! Each line is classified in a fixed order: comment or blank, directive
//! (`.include`, `.data`, `.align`), label definition (a `:` anywhere in
//! the line), and otherwise an instruction handed to the encoder.
//! Includes are assembled in place, so all files share one image cursor
//! and one label table.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::encoder::{self, parse_hex};
use crate::error::{AsmError, AsmErrorKind, SourceLoc};
use crate::imagestore::ImageStore;
use crate::label_table::LabelTable;

/// Maximum include nesting, guarding against include cycles.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Assemble one source file into the image. `depth` is the current
/// include nesting level, 0 for the top-level file.
pub fn parse_file(
    path: &str,
    image: &mut ImageStore,
    labels: &mut LabelTable,
    depth: usize,
) -> Result<(), AsmError> {
    let file = File::open(path)
        .map_err(|_| AsmError::new(AsmErrorKind::Io, "Unable to open", Some(path)))?;
    let reader = BufReader::new(file);

    let mut line_no: u32 = 0;
    for line in reader.lines() {
        line_no += 1;
        let line = line.map_err(|err| {
            AsmError::new(AsmErrorKind::Io, &err.to_string(), None)
                .with_location(SourceLoc::new(path, line_no))
        })?;
        process_line(&line, path, line_no, image, labels, depth)?;
    }
    Ok(())
}

fn process_line(
    raw: &str,
    file: &str,
    line_no: u32,
    image: &mut ImageStore,
    labels: &mut LabelTable,
    depth: usize,
) -> Result<(), AsmError> {
    let loc = SourceLoc::new(file, line_no);
    let stmt = raw.trim_end_matches('\r').trim_start_matches([' ', '\t']);

    if stmt.is_empty() || stmt.starts_with('#') {
        return Ok(());
    }
    if let Some(rest) = stmt.strip_prefix(".include") {
        return include_file(rest, image, labels, depth, &loc);
    }
    if let Some(rest) = stmt.strip_prefix(".data") {
        return directive_data(rest, image, &loc);
    }
    if let Some(rest) = stmt.strip_prefix(".align") {
        return directive_align(rest, image, &loc);
    }
    if let Some(colon) = stmt.find(':') {
        return define_label(&stmt[..colon], image, labels, &loc);
    }
    encoder::encode_line(stmt, image, labels, &loc)
}

fn include_file(
    rest: &str,
    image: &mut ImageStore,
    labels: &mut LabelTable,
    depth: usize,
    loc: &SourceLoc,
) -> Result<(), AsmError> {
    let open = rest.find('"');
    let close = rest.rfind('"');
    let (Some(open), Some(close)) = (open, close) else {
        return Err(syntax_at(loc, "quoted filename expected near", rest.trim()));
    };
    if close == open {
        return Err(syntax_at(loc, "quoted filename expected near", rest.trim()));
    }
    let filename = &rest[open + 1..close];

    if depth >= MAX_INCLUDE_DEPTH {
        return Err(syntax_at(loc, "include depth exceeded near", filename));
    }
    parse_file(filename, image, labels, depth + 1).map_err(|err| {
        // Attribute a failed include open to the line naming it.
        if err.location().is_none() {
            err.with_location(loc.clone())
        } else {
            err
        }
    })
}

/// `.data` emits raw bytes: either a double-quoted string copied verbatim
/// (no escapes, case preserved) or a comma/whitespace separated list of
/// hex byte constants.
fn directive_data(rest: &str, image: &mut ImageStore, loc: &SourceLoc) -> Result<(), AsmError> {
    let rest = rest.trim_start_matches([' ', '\t']);
    if let Some(lit) = rest.strip_prefix('"') {
        // Until the closing quote or end of line, whichever comes first.
        let end = lit.find('"').unwrap_or(lit.len());
        image.emit_slice(&lit.as_bytes()[..end]);
        return Ok(());
    }
    if rest.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
        for token in rest.split([',', ' ', '\t']) {
            if token.is_empty() {
                continue;
            }
            if token.starts_with('#') {
                break;
            }
            let val = parse_hex(token)
                .ok_or_else(|| syntax_at(loc, "number constant expected near", token))?;
            image.emit((val & 0xff) as u8);
        }
        return Ok(());
    }
    Err(syntax_at(loc, "string or number constant expected near", rest))
}

/// `.align n` emits n zero bytes. The operand is a count, not a target
/// address; digit-leading labels are the way to pad to an address.
fn directive_align(rest: &str, image: &mut ImageStore, loc: &SourceLoc) -> Result<(), AsmError> {
    let token = rest
        .split([',', ' ', '\t'])
        .find(|token| !token.is_empty());
    let Some(token) = token else {
        return Err(syntax_at(loc, "number constant expected near", rest.trim()));
    };
    let val =
        parse_hex(token).ok_or_else(|| syntax_at(loc, "number constant expected near", token))?;
    for _ in 0..val {
        image.emit(0x00);
    }
    Ok(())
}

/// A label line. Digit-leading labels force the cursor to that address by
/// zero-padding; named labels record the current cursor as the
/// definition.
fn define_label(
    text: &str,
    image: &mut ImageStore,
    labels: &mut LabelTable,
    loc: &SourceLoc,
) -> Result<(), AsmError> {
    if text.is_empty() {
        return Err(syntax_at(loc, "label expected near", ":"));
    }
    if text.as_bytes()[0].is_ascii_digit() {
        let target = parse_hex(text)
            .ok_or_else(|| syntax_at(loc, "number constant expected near", text))?;
        if image.position() > target {
            let msg = format!(
                "Cannot align to byte address 0x{target:X}, assembled binary size is already 0x{:X}",
                image.position()
            );
            return Err(AsmError::new(AsmErrorKind::Syntax, &msg, None).with_location(loc.clone()));
        }
        image.pad_to(target);
        return Ok(());
    }
    labels.define(text, image.position());
    Ok(())
}

fn syntax_at(loc: &SourceLoc, msg: &str, param: &str) -> AsmError {
    AsmError::new(AsmErrorKind::Syntax, msg, Some(param)).with_location(loc.clone())
}

#[cfg(test)]
mod tests {
    use super::process_line;
    use crate::error::AsmErrorKind;
    use crate::imagestore::ImageStore;
    use crate::label_table::LabelTable;

    fn run_lines(lines: &[&str]) -> (ImageStore, LabelTable) {
        let mut image = ImageStore::new();
        let mut labels = LabelTable::new();
        for (ix, line) in lines.iter().enumerate() {
            process_line(line, "test.asm", ix as u32 + 1, &mut image, &mut labels, 0)
                .unwrap_or_else(|err| panic!("line {}: {err}", ix + 1));
        }
        (image, labels)
    }

    fn run_lines_err(lines: &[&str]) -> crate::error::AsmError {
        let mut image = ImageStore::new();
        let mut labels = LabelTable::new();
        let mut result = Ok(());
        for (ix, line) in lines.iter().enumerate() {
            result = process_line(line, "test.asm", ix as u32 + 1, &mut image, &mut labels, 0);
            if result.is_err() {
                break;
            }
        }
        result.expect_err("expected error")
    }

    #[test]
    fn blank_and_comment_lines_emit_nothing() {
        let (image, _) = run_lines(&["", "   ", "# comment", "  \t# indented comment", "\r"]);
        assert_eq!(image.position(), 0);
    }

    #[test]
    fn data_directive_emits_hex_bytes() {
        let (image, _) = run_lines(&[".data 1, 2, 0xFF"]);
        assert_eq!(image.bytes(), &[0x01, 0x02, 0xff]);
    }

    #[test]
    fn data_directive_emits_string_bytes() {
        let (image, _) = run_lines(&[".data \"AB\""]);
        assert_eq!(image.bytes(), &[0x41, 0x42]);
    }

    #[test]
    fn data_string_keeps_case_and_stops_at_quote() {
        let (image, _) = run_lines(&[".data \"Hi\" # title"]);
        assert_eq!(image.bytes(), b"Hi");
    }

    #[test]
    fn data_unterminated_string_runs_to_end_of_line() {
        let (image, _) = run_lines(&[".data \"AB"]);
        assert_eq!(image.bytes(), b"AB");
    }

    #[test]
    fn data_rejects_malformed_number() {
        let err = run_lines_err(&[".data 1, XY"]);
        assert_eq!(err.kind(), AsmErrorKind::Syntax);
        assert_eq!(err.location().map(|l| l.line), Some(1));
    }

    #[test]
    fn data_requires_a_payload() {
        let err = run_lines_err(&[".data"]);
        assert_eq!(err.kind(), AsmErrorKind::Syntax);
    }

    #[test]
    fn align_emits_zero_bytes() {
        let (image, _) = run_lines(&["NOP", ".align 3"]);
        assert_eq!(image.bytes(), &[0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn align_rejects_missing_count() {
        let err = run_lines_err(&[".align foo"]);
        assert_eq!(err.kind(), AsmErrorKind::Syntax);
    }

    #[test]
    fn named_label_records_cursor() {
        let (image, labels) = run_lines(&["NOP", "start:", "NOP"]);
        assert_eq!(image.position(), 2);
        assert_eq!(labels.entry("START").expect("entry").definition, Some(1));
    }

    #[test]
    fn numeric_label_pads_to_address() {
        let (image, labels) = run_lines(&["NOP", "0x10:", "entry:"]);
        assert_eq!(image.position(), 0x10);
        assert!(image.bytes()[1..].iter().all(|b| *b == 0));
        assert_eq!(labels.entry("entry").expect("entry").definition, Some(0x10));
    }

    #[test]
    fn numeric_label_at_current_address_is_a_noop() {
        let (image, _) = run_lines(&["NOP", "1:"]);
        assert_eq!(image.position(), 1);
    }

    #[test]
    fn numeric_label_behind_cursor_is_an_error() {
        let err = run_lines_err(&["NOP", "NOP", "1:"]);
        assert_eq!(err.kind(), AsmErrorKind::Syntax);
        assert!(err.message().contains("already"), "{}", err.message());
        assert_eq!(err.location().map(|l| l.line), Some(3));
    }

    #[test]
    fn include_requires_quoted_filename() {
        let err = run_lines_err(&[".include noquotes.asm"]);
        assert_eq!(err.kind(), AsmErrorKind::Syntax);
    }

    #[test]
    fn include_of_missing_file_is_an_io_error() {
        let err = run_lines_err(&[".include \"/nonexistent/include.asm\""]);
        assert_eq!(err.kind(), AsmErrorKind::Io);
        assert_eq!(err.location().map(|l| l.line), Some(1));
    }

    #[test]
    fn instruction_lines_reach_the_encoder() {
        let (image, _) = run_lines(&["  LD A, B", "halt"]);
        assert_eq!(image.bytes(), &[0x78, 0x76]);
    }
}
