// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command line interface definition.

use clap::Parser;
use std::path::PathBuf;

pub const VERSION: &str = "1.0";

#[derive(Parser, Debug)]
#[command(
    name = "gbForge",
    version = VERSION,
    about = "Game Boy assembler producing flat ROM images with a header checksum"
)]
pub struct Cli {
    /// Assembly source file.
    pub input: PathBuf,
    /// Output ROM image.
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_input_and_output() {
        let cli = Cli::parse_from(["gbForge", "game.asm", "game.gb"]);
        assert_eq!(cli.input, PathBuf::from("game.asm"));
        assert_eq!(cli.output, PathBuf::from("game.gb"));
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["gbForge"]).is_err());
        assert!(Cli::try_parse_from(["gbForge", "game.asm"]).is_err());
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["gbForge", "a.asm", "a.gb", "extra"]).is_err());
    }
}
