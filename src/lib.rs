// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Library entry exposing assembler modules.
pub mod assembler;
pub mod checksum;
pub mod cli;
pub mod encoder;
pub mod error;
pub mod imagestore;
pub mod label_table;
pub mod preprocess;
