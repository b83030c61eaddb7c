// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembler driver: the two passes and the output stage.
//!
//! Pass 1 (preprocess + encoder) appends bytes to the image and records
//! label definitions and reference sites. Pass 2 walks the label table
//! and patches every site in place. The header checksum is computed over
//! the finished image and returned for the success report.

use std::fs::File;
use std::path::Path;

use clap::error::ErrorKind;
use clap::Parser;

use crate::checksum;
use crate::cli::Cli;
use crate::error::{AsmError, AsmErrorKind};
use crate::imagestore::ImageStore;
use crate::label_table::{LabelTable, RefKind};
use crate::preprocess;

/// Parse the command line and assemble. Returns the header checksum of
/// the written image.
pub fn run() -> Result<u8, AsmError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                std::process::exit(0);
            }
            _ => {
                return Err(AsmError::new(AsmErrorKind::Cli, &err.to_string(), None));
            }
        },
    };
    assemble(&cli.input, &cli.output)
}

/// Assemble `input` into a flat binary at `output`.
pub fn assemble(input: &Path, output: &Path) -> Result<u8, AsmError> {
    let mut image = ImageStore::new();
    let mut labels = LabelTable::new();

    let input_name = input.to_string_lossy();
    preprocess::parse_file(&input_name, &mut image, &mut labels, 0)?;

    resolve_labels(&labels, &mut image)?;

    let checksum = checksum::header_checksum(image.bytes());

    let out_file = File::create(output).map_err(|_| {
        AsmError::new(
            AsmErrorKind::Io,
            "Unable to create",
            Some(&output.to_string_lossy()),
        )
    })?;
    image
        .write_bin_file(out_file)
        .map_err(|err| AsmError::new(AsmErrorKind::Io, &err.to_string(), None))?;

    Ok(checksum)
}

/// Pass 2: patch every reference site with its label's definition.
pub fn resolve_labels(labels: &LabelTable, image: &mut ImageStore) -> Result<(), AsmError> {
    for label in labels.entries() {
        let Some(def) = label.definition else {
            let err = AsmError::new(
                AsmErrorKind::Syntax,
                "Undefined label referenced:",
                Some(&label.name),
            );
            return Err(match &label.first_ref {
                Some(loc) => err.with_location(loc.clone()),
                None => err,
            });
        };
        for site in &label.refs {
            match site.kind {
                RefKind::Absolute16 => {
                    image.patch(site.offset, &[(def & 0xff) as u8, ((def >> 8) & 0xff) as u8]);
                }
                RefKind::Relative8 => {
                    // Displacement is relative to the byte after the
                    // operand (site + 1).
                    let disp = i64::from(def) - i64::from(site.offset) - 1;
                    if !(-128..=127).contains(&disp) {
                        let err = AsmError::new(
                            AsmErrorKind::Syntax,
                            "Relative jump out of range to label",
                            Some(&label.name),
                        );
                        return Err(match &label.first_ref {
                            Some(loc) => err.with_location(loc.clone()),
                            None => err,
                        });
                    }
                    image.patch(site.offset, &[disp as i8 as u8]);
                }
            }
        }
    }
    Ok(())
}
