// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! End-to-end tests: assemble source files from disk and check the
//! produced images.

use std::fs;
use std::path::PathBuf;

use gbforge::assembler::assemble;
use gbforge::error::AsmErrorKind;

fn temp_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("it")
        .join(name);
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn assemble_source(name: &str, source: &str) -> (u8, Vec<u8>) {
    let dir = temp_dir(name);
    let input = dir.join("prog.asm");
    let output = dir.join("prog.gb");
    fs::write(&input, source).expect("write source");
    let checksum = assemble(&input, &output)
        .unwrap_or_else(|err| panic!("assemble {name}: {err}"));
    let image = fs::read(&output).expect("read image");
    (checksum, image)
}

fn assemble_source_err(name: &str, source: &str) -> gbforge::error::AsmError {
    let dir = temp_dir(name);
    let input = dir.join("prog.asm");
    let output = dir.join("prog.gb");
    fs::write(&input, source).expect("write source");
    assemble(&input, &output).expect_err("expected error")
}

#[test]
fn assembles_a_minimal_program() {
    let (checksum, image) = assemble_source("minimal", "NOP\nJP 0x150\n");
    assert_eq!(image, vec![0x00, 0xc3, 0x50, 0x01]);
    // No bytes inside the header region.
    assert_eq!(checksum, 0x00);
}

#[test]
fn resolves_forward_and_backward_references() {
    let source = "\
start:
JR next
NOP
next:
JP start
";
    let (_, image) = assemble_source("fwd_back", source);
    assert_eq!(image, vec![0x18, 0x01, 0x00, 0xc3, 0x00, 0x00]);
}

#[test]
fn includes_share_the_image_and_label_table() {
    let dir = temp_dir("includes");
    let lib = dir.join("lib.asm");
    fs::write(&lib, "helper:\nLD A, 1\nRET\n").expect("write lib");

    let input = dir.join("main.asm");
    let output = dir.join("main.gb");
    let source = format!("CALL helper\nHALT\n.include \"{}\"\n", lib.display());
    fs::write(&input, source).expect("write main");

    assemble(&input, &output).expect("assemble");
    let image = fs::read(&output).expect("read image");
    assert_eq!(image, vec![0xcd, 0x04, 0x00, 0x76, 0x3e, 0x01, 0xc9]);
}

#[test]
fn include_of_missing_file_reports_the_include_line() {
    let source = "NOP\n.include \"/nonexistent/lib.asm\"\n";
    let err = assemble_source_err("include_missing", source);
    assert_eq!(err.kind(), AsmErrorKind::Io);
    assert_eq!(err.exit_code(), 2);
    let loc = err.location().expect("location");
    assert!(loc.file.ends_with("prog.asm"), "{}", loc.file);
    assert_eq!(loc.line, 2);
}

#[test]
fn self_including_file_hits_the_depth_limit() {
    let dir = temp_dir("include_cycle");
    let input = dir.join("prog.asm");
    let output = dir.join("prog.gb");
    fs::write(&input, format!(".include \"{}\"\n", input.display())).expect("write source");

    let err = assemble(&input, &output).expect_err("expected error");
    assert_eq!(err.kind(), AsmErrorKind::Syntax);
    assert!(err.message().contains("depth"), "{}", err.message());
}

#[test]
fn relative_jump_to_the_next_byte_is_zero() {
    // Target right after the operand byte: displacement 0.
    let (_, image) = assemble_source("rel_zero", "JR here\nhere:\nNOP\n");
    assert_eq!(image, vec![0x18, 0x00, 0x00]);
}

#[test]
fn relative_jump_reaches_the_positive_limit() {
    // Operand at offset 1, target at 0x81: displacement 127.
    let source = "JR target\n.align 7F\ntarget:\nNOP\n";
    let (_, image) = assemble_source("rel_max_fwd", source);
    assert_eq!(image[1], 0x7f);
    assert_eq!(image.len(), 0x82);
}

#[test]
fn relative_jump_reaches_the_negative_limit() {
    // Target at 0, operand at 0x7F: displacement -128.
    let source = "back:\n.align 7E\nJR back\n";
    let (_, image) = assemble_source("rel_max_back", source);
    assert_eq!(image[0x7f], 0x80);
    assert_eq!(image.len(), 0x80);
}

#[test]
fn relative_jump_past_the_limit_is_an_error() {
    let source = "JR target\n.align 80\ntarget:\nNOP\n";
    let err = assemble_source_err("rel_overflow", source);
    assert_eq!(err.kind(), AsmErrorKind::Syntax);
    assert_eq!(err.exit_code(), 3);
    assert!(err.message().contains("out of range"), "{}", err.message());
    assert_eq!(err.location().map(|l| l.line), Some(1));
}

#[test]
fn undefined_label_names_the_referencing_line() {
    let err = assemble_source_err("undefined", "NOP\nCALL missing\n");
    assert_eq!(err.kind(), AsmErrorKind::Syntax);
    assert!(err.message().contains("MISSING"), "{}", err.message());
    assert_eq!(err.location().map(|l| l.line), Some(2));
}

#[test]
fn ld_r8_label_resolves_as_a_relative_displacement() {
    // The operand byte holds a displacement to the label, not its
    // address.
    let (_, image) = assemble_source("ld_r8_label", "LD A, spot\nspot:\nNOP\n");
    assert_eq!(image, vec![0x3e, 0x00, 0x00]);
}

#[test]
fn data_align_and_code_share_one_cursor() {
    let source = ".data 1, 2, 0xFF\n.align 2\nLD A, B\n";
    let (_, image) = assemble_source("data_align", source);
    assert_eq!(image, vec![0x01, 0x02, 0xff, 0x00, 0x00, 0x78]);
}

#[test]
fn header_bytes_drive_the_checksum() {
    // Pad into the header region, place a title, pad past it.
    let source = "0x134:\n.data \"ABC\"\n0x150:\n";
    let (checksum, image) = assemble_source("header", source);
    assert_eq!(image.len(), 0x150);
    assert_eq!(&image[0x134..0x137], b"ABC");
    assert_eq!(checksum, 0x21);
}

#[test]
fn assembly_is_deterministic() {
    let source = "start:\nLD HL, msg\nJR start\nmsg:\n.data \"HELLO\"\n";
    let (sum_a, image_a) = assemble_source("determ_a", source);
    let (sum_b, image_b) = assemble_source("determ_b", source);
    assert_eq!(image_a, image_b);
    assert_eq!(sum_a, sum_b);
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = temp_dir("missing_input");
    let err = assemble(&dir.join("absent.asm"), &dir.join("out.gb")).expect_err("expected error");
    assert_eq!(err.kind(), AsmErrorKind::Io);
    assert_eq!(err.exit_code(), 2);
    assert!(err.message().contains("Unable to open"), "{}", err.message());
}

#[test]
fn syntax_error_reports_file_and_line() {
    let err = assemble_source_err("syntax", "NOP\nNOP\nBOGUS A, B\n");
    assert_eq!(err.kind(), AsmErrorKind::Syntax);
    assert_eq!(err.exit_code(), 3);
    assert_eq!(err.location().map(|l| l.line), Some(3));
}
