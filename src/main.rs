// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for gbForge.

fn main() {
    match gbforge::assembler::run() {
        Ok(checksum) => {
            println!("Assembling completed. Header checksum: 0x{checksum:X}");
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    }
}
