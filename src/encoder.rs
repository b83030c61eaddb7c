// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction encoder for the Game Boy CPU (LR35902).
//!
//! One source line is tokenized into a mnemonic plus 0-4 operand tokens
//! and matched against a static rule table keyed by mnemonic, operand
//! arity and operand shape. The first matching rule wins and drives a
//! small list of byte-emission steps. Label operands write placeholder
//! zeros and record a reference site for the second pass.

use crate::error::{AsmError, AsmErrorKind, SourceLoc};
use crate::imagestore::ImageStore;
use crate::label_table::{LabelTable, RefKind};

pub const MAX_OPERANDS: usize = 4;

/// Operand shape recognized by one rule pattern slot.
#[derive(Debug, Clone, Copy)]
enum Pat {
    /// Exact upper-cased token, e.g. "A", "(HL)", "NZ".
    Lit(&'static str),
    /// 8-bit register or (HL): B C D E H L (HL) A, index 0-7.
    R8,
    /// Register pair BC DE HL SP, index 0-3.
    Pair,
    /// Stack pair BC DE HL AF, index 0-3.
    StackPair,
    /// Condition NZ Z NC C, index 0-3.
    Cond,
    /// Bit index, a numeric token in 0-7.
    Bit,
    /// Numeric literal (leading digit, hex, optional 0x prefix).
    Num,
    /// Numeric literal or label reference.
    NumOrLabel,
    /// High-page pointer "(...+n)"; the byte after '+' is encoded.
    HighPtr,
    /// Parenthesized numeric constant "(nn)".
    Ptr,
    /// Stack-relative "SP+n".
    SpPlus,
    /// Trailing "+n" or "n" token of a split "SP + n" spelling.
    PlusNum,
}

/// Byte-emission step of a matched rule.
#[derive(Debug, Clone, Copy)]
enum Emit {
    Fixed(u8),
    /// base + r8 index of operand `arg`.
    R8Add { base: u8, arg: u8 },
    /// base + 8 * r8 index of operand `arg`.
    R8Row { base: u8, arg: u8 },
    /// base + 8 * row + col, rows being r8 or bit indices, cols r8.
    Grid { base: u8, row: u8, col: u8 },
    /// base + 0x10 * pair index of operand `arg`.
    PairAdd { base: u8, arg: u8 },
    /// base + stride * condition index of operand `arg`.
    CondAdd { base: u8, stride: u8, arg: u8 },
    /// Restart: operand must be one of the eight fixed vectors.
    RstVector { arg: u8 },
    /// Numeric payload of operand `arg` as one byte.
    Imm8 { arg: u8 },
    /// Numeric payload of operand `arg` little-endian.
    Imm16 { arg: u8 },
    /// Two bytes: numeric little-endian, or an Absolute16 site.
    Addr16 { arg: u8 },
    /// One byte: numeric verbatim, or a Relative8 site.
    Rel8 { arg: u8 },
}

struct Rule {
    mnemonic: &'static str,
    pats: &'static [Pat],
    emit: &'static [Emit],
}

/// Payload captured while matching one operand against its pattern slot.
#[derive(Debug, Clone)]
enum Arg {
    None,
    Index(u8),
    Number(u32),
    Symbol,
}

enum RuleMatch {
    Matched(Vec<Arg>),
    /// Index of the first operand that did not fit.
    Mismatch(usize),
}

/// Parse a hexadecimal token, optional 0x prefix. The whole token must
/// be valid hex digits; a partially numeric token is rejected.
pub fn parse_hex(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

fn is_numeric(token: &str) -> bool {
    token.as_bytes().first().is_some_and(|b| b.is_ascii_digit())
}

fn is_label_token(token: &str) -> bool {
    token
        .as_bytes()
        .first()
        .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_')
}

fn r8_index(token: &str) -> Option<u8> {
    match token {
        "B" => Some(0),
        "C" => Some(1),
        "D" => Some(2),
        "E" => Some(3),
        "H" => Some(4),
        "L" => Some(5),
        "(HL)" => Some(6),
        "A" => Some(7),
        _ => None,
    }
}

fn pair_index(token: &str) -> Option<u8> {
    match token {
        "BC" => Some(0),
        "DE" => Some(1),
        "HL" => Some(2),
        "SP" => Some(3),
        _ => None,
    }
}

fn stack_pair_index(token: &str) -> Option<u8> {
    match token {
        "BC" => Some(0),
        "DE" => Some(1),
        "HL" => Some(2),
        "AF" => Some(3),
        _ => None,
    }
}

fn cond_index(token: &str) -> Option<u8> {
    match token {
        "NZ" => Some(0),
        "Z" => Some(1),
        "NC" => Some(2),
        "C" => Some(3),
        _ => None,
    }
}

/// Inner text of a parenthesized token, if it is one.
fn paren_inner(token: &str) -> Option<&str> {
    let rest = token.strip_prefix('(')?;
    rest.strip_suffix(')')
}

fn syntax_error(msg: &str, param: &str) -> AsmError {
    AsmError::new(AsmErrorKind::Syntax, msg, Some(param))
}

/// Match one operand token against a pattern slot. `Ok(None)` means the
/// slot does not fit and the next rule should be tried; `Err` aborts the
/// line (e.g. a malformed number or out-of-range bit index).
fn match_pat(pat: Pat, token: &str) -> Result<Option<Arg>, AsmError> {
    match pat {
        Pat::Lit(lit) => Ok((token == lit).then_some(Arg::None)),
        Pat::R8 => Ok(r8_index(token).map(Arg::Index)),
        Pat::Pair => Ok(pair_index(token).map(Arg::Index)),
        Pat::StackPair => Ok(stack_pair_index(token).map(Arg::Index)),
        Pat::Cond => Ok(cond_index(token).map(Arg::Index)),
        Pat::Bit => {
            if !is_numeric(token) {
                return Ok(None);
            }
            let val = parse_hex(token)
                .ok_or_else(|| syntax_error("number constant expected near", token))?;
            if val > 7 {
                return Err(syntax_error("value between 0 and 7 expected near", token));
            }
            Ok(Some(Arg::Index(val as u8)))
        }
        Pat::Num => {
            if !is_numeric(token) {
                return Ok(None);
            }
            let val = parse_hex(token)
                .ok_or_else(|| syntax_error("number constant expected near", token))?;
            Ok(Some(Arg::Number(val)))
        }
        Pat::NumOrLabel => {
            if is_numeric(token) {
                let val = parse_hex(token)
                    .ok_or_else(|| syntax_error("number constant expected near", token))?;
                return Ok(Some(Arg::Number(val)));
            }
            Ok(is_label_token(token).then_some(Arg::Symbol))
        }
        Pat::HighPtr => {
            let Some(inner) = paren_inner(token) else {
                return Ok(None);
            };
            let Some((_, suffix)) = inner.split_once('+') else {
                return Ok(None);
            };
            let val = parse_hex(suffix)
                .ok_or_else(|| syntax_error("constant byte expected near", token))?;
            Ok(Some(Arg::Number(val)))
        }
        Pat::Ptr => {
            let Some(inner) = paren_inner(token) else {
                return Ok(None);
            };
            if !is_numeric(inner) {
                return Ok(None);
            }
            let val = parse_hex(inner)
                .ok_or_else(|| syntax_error("constant pointer expected near", token))?;
            Ok(Some(Arg::Number(val)))
        }
        Pat::SpPlus => {
            let Some(suffix) = token.strip_prefix("SP+") else {
                return Ok(None);
            };
            let val = parse_hex(suffix)
                .ok_or_else(|| syntax_error("constant byte expected near", token))?;
            Ok(Some(Arg::Number(val)))
        }
        Pat::PlusNum => {
            let digits = token.strip_prefix('+').unwrap_or(token);
            if !is_numeric(digits) {
                return Ok(None);
            }
            let val = parse_hex(digits)
                .ok_or_else(|| syntax_error("constant byte expected near", token))?;
            Ok(Some(Arg::Number(val)))
        }
    }
}

fn match_rule(rule: &Rule, operands: &[&str]) -> Result<RuleMatch, AsmError> {
    let mut args = Vec::with_capacity(operands.len());
    for (ix, (pat, token)) in rule.pats.iter().zip(operands.iter()).enumerate() {
        match match_pat(*pat, token)? {
            Some(arg) => args.push(arg),
            None => return Ok(RuleMatch::Mismatch(ix)),
        }
    }
    Ok(RuleMatch::Matched(args))
}

// Table invariant: emission steps only name arg slots whose pattern
// produced the payload kind they read.
fn index_of(arg: &Arg) -> u8 {
    match arg {
        Arg::Index(val) => *val,
        _ => 0,
    }
}

fn number_of(arg: &Arg) -> u32 {
    match arg {
        Arg::Number(val) => *val,
        _ => 0,
    }
}

fn apply_rule(
    rule: &Rule,
    operands: &[&str],
    args: &[Arg],
    image: &mut ImageStore,
    labels: &mut LabelTable,
    loc: &SourceLoc,
) -> Result<(), AsmError> {
    for step in rule.emit {
        match *step {
            Emit::Fixed(val) => image.emit(val),
            Emit::R8Add { base, arg } => image.emit(base + index_of(&args[arg as usize])),
            Emit::R8Row { base, arg } => image.emit(base + 8 * index_of(&args[arg as usize])),
            Emit::Grid { base, row, col } => {
                let row_ix = index_of(&args[row as usize]);
                let col_ix = index_of(&args[col as usize]);
                // LD (HL),(HL) would collide with HALT; reject it.
                if rule.mnemonic == "LD" && row_ix == 6 && col_ix == 6 {
                    return Err(syntax_error("syntax error near", operands[col as usize])
                        .with_location(loc.clone()));
                }
                image.emit(base + 8 * row_ix + col_ix);
            }
            Emit::PairAdd { base, arg } => image.emit(base + 0x10 * index_of(&args[arg as usize])),
            Emit::CondAdd { base, stride, arg } => {
                image.emit(base + stride * index_of(&args[arg as usize]));
            }
            Emit::RstVector { arg } => {
                let val = number_of(&args[arg as usize]);
                if val > 0x38 || val % 8 != 0 {
                    return Err(
                        syntax_error("valid restart address expected near", operands[arg as usize])
                            .with_location(loc.clone()),
                    );
                }
                image.emit(0xc7 + val as u8);
            }
            Emit::Imm8 { arg } => image.emit((number_of(&args[arg as usize]) & 0xff) as u8),
            Emit::Imm16 { arg } => image.emit_word((number_of(&args[arg as usize]) & 0xffff) as u16),
            Emit::Addr16 { arg } => match &args[arg as usize] {
                Arg::Symbol => {
                    labels.reference(
                        operands[arg as usize],
                        image.position(),
                        RefKind::Absolute16,
                        loc,
                    );
                    image.emit_word(0);
                }
                other => image.emit_word((number_of(other) & 0xffff) as u16),
            },
            Emit::Rel8 { arg } => match &args[arg as usize] {
                Arg::Symbol => {
                    labels.reference(
                        operands[arg as usize],
                        image.position(),
                        RefKind::Relative8,
                        loc,
                    );
                    image.emit(0);
                }
                other => image.emit((number_of(other) & 0xff) as u8),
            },
        }
    }
    Ok(())
}

/// Encode one instruction line into the image.
pub fn encode_line(
    line: &str,
    image: &mut ImageStore,
    labels: &mut LabelTable,
    loc: &SourceLoc,
) -> Result<(), AsmError> {
    let upper = line.to_ascii_uppercase();
    let mut tokens: Vec<&str> = Vec::new();
    for token in upper.split([',', ' ', '\t']) {
        if token.is_empty() {
            continue;
        }
        if token.starts_with('#') {
            break;
        }
        tokens.push(token);
    }

    let Some((mnemonic, operands)) = tokens.split_first() else {
        return Err(syntax_error("syntax error near", line.trim()).with_location(loc.clone()));
    };
    if operands.len() > MAX_OPERANDS {
        return Err(syntax_error("syntax error near", mnemonic).with_location(loc.clone()));
    }

    // Track the deepest partial match so the report can name the operand
    // that actually failed instead of the mnemonic.
    let mut near: &str = mnemonic;
    let mut best_depth: isize = -1;
    for rule in RULES {
        if rule.mnemonic != *mnemonic || rule.pats.len() != operands.len() {
            continue;
        }
        match match_rule(rule, operands).map_err(|err| err.with_location(loc.clone()))? {
            RuleMatch::Matched(args) => {
                return apply_rule(rule, operands, &args, image, labels, loc);
            }
            RuleMatch::Mismatch(ix) => {
                if ix as isize > best_depth {
                    best_depth = ix as isize;
                    near = operands[ix];
                }
            }
        }
    }

    Err(syntax_error("syntax error near", near).with_location(loc.clone()))
}

/// Encoding rules, matched top-down within each mnemonic.
static RULES: &[Rule] = &[
    // ============================================================
    // No-operand instructions
    // ============================================================
    Rule { mnemonic: "CCF", pats: &[], emit: &[Emit::Fixed(0x3f)] },
    Rule { mnemonic: "CPL", pats: &[], emit: &[Emit::Fixed(0x2f)] },
    Rule { mnemonic: "DAA", pats: &[], emit: &[Emit::Fixed(0x27)] },
    Rule { mnemonic: "DI", pats: &[], emit: &[Emit::Fixed(0xf3)] },
    Rule { mnemonic: "EI", pats: &[], emit: &[Emit::Fixed(0xfb)] },
    Rule { mnemonic: "HALT", pats: &[], emit: &[Emit::Fixed(0x76)] },
    Rule { mnemonic: "NOP", pats: &[], emit: &[Emit::Fixed(0x00)] },
    Rule { mnemonic: "RET", pats: &[], emit: &[Emit::Fixed(0xc9)] },
    Rule { mnemonic: "RETI", pats: &[], emit: &[Emit::Fixed(0xd9)] },
    Rule { mnemonic: "RLA", pats: &[], emit: &[Emit::Fixed(0x17)] },
    Rule { mnemonic: "RLCA", pats: &[], emit: &[Emit::Fixed(0x07)] },
    Rule { mnemonic: "RRA", pats: &[], emit: &[Emit::Fixed(0x1f)] },
    Rule { mnemonic: "RRCA", pats: &[], emit: &[Emit::Fixed(0x0f)] },
    Rule { mnemonic: "SCF", pats: &[], emit: &[Emit::Fixed(0x37)] },
    Rule { mnemonic: "STOP", pats: &[], emit: &[Emit::Fixed(0x10), Emit::Fixed(0x00)] },
    // ============================================================
    // 8-bit ALU, with and without the explicit A destination
    // ============================================================
    Rule { mnemonic: "ADD", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0x80, arg: 0 }] },
    Rule { mnemonic: "ADD", pats: &[Pat::Num], emit: &[Emit::Fixed(0xc6), Emit::Imm8 { arg: 0 }] },
    Rule {
        mnemonic: "ADD",
        pats: &[Pat::Lit("A"), Pat::R8],
        emit: &[Emit::R8Add { base: 0x80, arg: 1 }],
    },
    Rule {
        mnemonic: "ADD",
        pats: &[Pat::Lit("A"), Pat::Num],
        emit: &[Emit::Fixed(0xc6), Emit::Imm8 { arg: 1 }],
    },
    Rule {
        mnemonic: "ADD",
        pats: &[Pat::Lit("HL"), Pat::Pair],
        emit: &[Emit::PairAdd { base: 0x09, arg: 1 }],
    },
    Rule {
        mnemonic: "ADD",
        pats: &[Pat::Lit("SP"), Pat::Num],
        emit: &[Emit::Fixed(0xe8), Emit::Imm8 { arg: 1 }],
    },
    Rule { mnemonic: "ADC", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0x88, arg: 0 }] },
    Rule { mnemonic: "ADC", pats: &[Pat::Num], emit: &[Emit::Fixed(0xce), Emit::Imm8 { arg: 0 }] },
    Rule {
        mnemonic: "ADC",
        pats: &[Pat::Lit("A"), Pat::R8],
        emit: &[Emit::R8Add { base: 0x88, arg: 1 }],
    },
    Rule {
        mnemonic: "ADC",
        pats: &[Pat::Lit("A"), Pat::Num],
        emit: &[Emit::Fixed(0xce), Emit::Imm8 { arg: 1 }],
    },
    Rule { mnemonic: "SUB", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0x90, arg: 0 }] },
    Rule { mnemonic: "SUB", pats: &[Pat::Num], emit: &[Emit::Fixed(0xd6), Emit::Imm8 { arg: 0 }] },
    Rule { mnemonic: "SBC", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0x98, arg: 0 }] },
    Rule { mnemonic: "SBC", pats: &[Pat::Num], emit: &[Emit::Fixed(0xde), Emit::Imm8 { arg: 0 }] },
    Rule {
        mnemonic: "SBC",
        pats: &[Pat::Lit("A"), Pat::R8],
        emit: &[Emit::R8Add { base: 0x98, arg: 1 }],
    },
    Rule {
        mnemonic: "SBC",
        pats: &[Pat::Lit("A"), Pat::Num],
        emit: &[Emit::Fixed(0xde), Emit::Imm8 { arg: 1 }],
    },
    Rule { mnemonic: "AND", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0xa0, arg: 0 }] },
    Rule { mnemonic: "AND", pats: &[Pat::Num], emit: &[Emit::Fixed(0xe6), Emit::Imm8 { arg: 0 }] },
    Rule { mnemonic: "XOR", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0xa8, arg: 0 }] },
    Rule { mnemonic: "XOR", pats: &[Pat::Num], emit: &[Emit::Fixed(0xee), Emit::Imm8 { arg: 0 }] },
    Rule { mnemonic: "OR", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0xb0, arg: 0 }] },
    Rule { mnemonic: "OR", pats: &[Pat::Num], emit: &[Emit::Fixed(0xf6), Emit::Imm8 { arg: 0 }] },
    Rule { mnemonic: "CP", pats: &[Pat::R8], emit: &[Emit::R8Add { base: 0xb8, arg: 0 }] },
    Rule { mnemonic: "CP", pats: &[Pat::Num], emit: &[Emit::Fixed(0xfe), Emit::Imm8 { arg: 0 }] },
    // ============================================================
    // Increment / decrement
    // ============================================================
    Rule { mnemonic: "INC", pats: &[Pat::R8], emit: &[Emit::R8Row { base: 0x04, arg: 0 }] },
    Rule { mnemonic: "INC", pats: &[Pat::Pair], emit: &[Emit::PairAdd { base: 0x03, arg: 0 }] },
    Rule { mnemonic: "DEC", pats: &[Pat::R8], emit: &[Emit::R8Row { base: 0x05, arg: 0 }] },
    Rule { mnemonic: "DEC", pats: &[Pat::Pair], emit: &[Emit::PairAdd { base: 0x0b, arg: 0 }] },
    // ============================================================
    // Rotate / shift / swap (CB prefix)
    // ============================================================
    Rule {
        mnemonic: "RLC",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x00, arg: 0 }],
    },
    Rule {
        mnemonic: "RRC",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x08, arg: 0 }],
    },
    Rule {
        mnemonic: "RL",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x10, arg: 0 }],
    },
    Rule {
        mnemonic: "RR",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x18, arg: 0 }],
    },
    Rule {
        mnemonic: "SLA",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x20, arg: 0 }],
    },
    Rule {
        mnemonic: "SRA",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x28, arg: 0 }],
    },
    Rule {
        mnemonic: "SWAP",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x30, arg: 0 }],
    },
    Rule {
        mnemonic: "SRL",
        pats: &[Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::R8Add { base: 0x38, arg: 0 }],
    },
    // ============================================================
    // Bit test / set / reset (CB prefix)
    // ============================================================
    Rule {
        mnemonic: "BIT",
        pats: &[Pat::Bit, Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::Grid { base: 0x40, row: 0, col: 1 }],
    },
    Rule {
        mnemonic: "RES",
        pats: &[Pat::Bit, Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::Grid { base: 0x80, row: 0, col: 1 }],
    },
    Rule {
        mnemonic: "SET",
        pats: &[Pat::Bit, Pat::R8],
        emit: &[Emit::Fixed(0xcb), Emit::Grid { base: 0xc0, row: 0, col: 1 }],
    },
    // ============================================================
    // Jumps, calls, returns, restarts
    // ============================================================
    Rule { mnemonic: "JP", pats: &[Pat::Lit("(HL)")], emit: &[Emit::Fixed(0xe9)] },
    Rule {
        mnemonic: "JP",
        pats: &[Pat::NumOrLabel],
        emit: &[Emit::Fixed(0xc3), Emit::Addr16 { arg: 0 }],
    },
    Rule {
        mnemonic: "JP",
        pats: &[Pat::Cond, Pat::NumOrLabel],
        emit: &[Emit::CondAdd { base: 0xc2, stride: 8, arg: 0 }, Emit::Addr16 { arg: 1 }],
    },
    Rule {
        mnemonic: "JR",
        pats: &[Pat::NumOrLabel],
        emit: &[Emit::Fixed(0x18), Emit::Rel8 { arg: 0 }],
    },
    Rule {
        mnemonic: "JR",
        pats: &[Pat::Cond, Pat::NumOrLabel],
        emit: &[Emit::CondAdd { base: 0x20, stride: 8, arg: 0 }, Emit::Rel8 { arg: 1 }],
    },
    Rule {
        mnemonic: "CALL",
        pats: &[Pat::NumOrLabel],
        emit: &[Emit::Fixed(0xcd), Emit::Addr16 { arg: 0 }],
    },
    Rule {
        mnemonic: "CALL",
        pats: &[Pat::Cond, Pat::NumOrLabel],
        emit: &[Emit::CondAdd { base: 0xc4, stride: 8, arg: 0 }, Emit::Addr16 { arg: 1 }],
    },
    Rule {
        mnemonic: "RET",
        pats: &[Pat::Cond],
        emit: &[Emit::CondAdd { base: 0xc0, stride: 8, arg: 0 }],
    },
    Rule { mnemonic: "RST", pats: &[Pat::Num], emit: &[Emit::RstVector { arg: 0 }] },
    // ============================================================
    // Stack
    // ============================================================
    Rule {
        mnemonic: "PUSH",
        pats: &[Pat::StackPair],
        emit: &[Emit::PairAdd { base: 0xc5, arg: 0 }],
    },
    Rule {
        mnemonic: "POP",
        pats: &[Pat::StackPair],
        emit: &[Emit::PairAdd { base: 0xc1, arg: 0 }],
    },
    // ============================================================
    // Loads. Dedicated forms first, then the generic register grid,
    // immediates and 16-bit pair loads.
    // ============================================================
    Rule { mnemonic: "LD", pats: &[Pat::Lit("(C)"), Pat::Lit("A")], emit: &[Emit::Fixed(0xe2)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("A"), Pat::Lit("(C)")], emit: &[Emit::Fixed(0xf2)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("(HL+)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x22)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("(HLI)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x22)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("(HL-)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x32)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("(HLD)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x32)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("A"), Pat::Lit("(HL+)")], emit: &[Emit::Fixed(0x2a)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("A"), Pat::Lit("(HLI)")], emit: &[Emit::Fixed(0x2a)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("A"), Pat::Lit("(HL-)")], emit: &[Emit::Fixed(0x3a)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("A"), Pat::Lit("(HLD)")], emit: &[Emit::Fixed(0x3a)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("A"), Pat::Lit("(BC)")], emit: &[Emit::Fixed(0x0a)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("A"), Pat::Lit("(DE)")], emit: &[Emit::Fixed(0x1a)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("(BC)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x02)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("(DE)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x12)] },
    Rule { mnemonic: "LD", pats: &[Pat::Lit("SP"), Pat::Lit("HL")], emit: &[Emit::Fixed(0xf9)] },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Lit("HL"), Pat::SpPlus],
        emit: &[Emit::Fixed(0xf8), Emit::Imm8 { arg: 1 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Lit("A"), Pat::HighPtr],
        emit: &[Emit::Fixed(0xf0), Emit::Imm8 { arg: 1 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Lit("A"), Pat::Ptr],
        emit: &[Emit::Fixed(0xfa), Emit::Imm16 { arg: 1 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::HighPtr, Pat::Lit("A")],
        emit: &[Emit::Fixed(0xe0), Emit::Imm8 { arg: 0 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Ptr, Pat::Lit("A")],
        emit: &[Emit::Fixed(0xea), Emit::Imm16 { arg: 0 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Ptr, Pat::Lit("SP")],
        emit: &[Emit::Fixed(0x08), Emit::Imm16 { arg: 0 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::R8, Pat::R8],
        emit: &[Emit::Grid { base: 0x40, row: 0, col: 1 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::R8, Pat::Num],
        emit: &[Emit::R8Row { base: 0x06, arg: 0 }, Emit::Imm8 { arg: 1 }],
    },
    // LD r,label stores a one-byte relative displacement to the label,
    // not the label's address.
    Rule {
        mnemonic: "LD",
        pats: &[Pat::R8, Pat::NumOrLabel],
        emit: &[Emit::R8Row { base: 0x06, arg: 0 }, Emit::Rel8 { arg: 1 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Pair, Pat::NumOrLabel],
        emit: &[Emit::PairAdd { base: 0x01, arg: 0 }, Emit::Addr16 { arg: 1 }],
    },
    // Split spellings of LD HL,SP+n
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Lit("HL"), Pat::Lit("SP+"), Pat::PlusNum],
        emit: &[Emit::Fixed(0xf8), Emit::Imm8 { arg: 2 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Lit("HL"), Pat::Lit("SP"), Pat::PlusNum],
        emit: &[Emit::Fixed(0xf8), Emit::Imm8 { arg: 2 }],
    },
    Rule {
        mnemonic: "LD",
        pats: &[Pat::Lit("HL"), Pat::Lit("SP"), Pat::Lit("+"), Pat::PlusNum],
        emit: &[Emit::Fixed(0xf8), Emit::Imm8 { arg: 3 }],
    },
    Rule {
        mnemonic: "LDHL",
        pats: &[Pat::Lit("SP"), Pat::Num],
        emit: &[Emit::Fixed(0xf8), Emit::Imm8 { arg: 1 }],
    },
    // ============================================================
    // Post-increment/decrement aliases and high-page loads
    // ============================================================
    Rule { mnemonic: "LDI", pats: &[Pat::Lit("(HL)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x22)] },
    Rule { mnemonic: "LDI", pats: &[Pat::Lit("A"), Pat::Lit("(HL)")], emit: &[Emit::Fixed(0x2a)] },
    Rule { mnemonic: "LDD", pats: &[Pat::Lit("(HL)"), Pat::Lit("A")], emit: &[Emit::Fixed(0x32)] },
    Rule { mnemonic: "LDD", pats: &[Pat::Lit("A"), Pat::Lit("(HL)")], emit: &[Emit::Fixed(0x3a)] },
    Rule {
        mnemonic: "LDH",
        pats: &[Pat::Ptr, Pat::Lit("A")],
        emit: &[Emit::Fixed(0xe0), Emit::Imm8 { arg: 0 }],
    },
    Rule {
        mnemonic: "LDH",
        pats: &[Pat::Lit("A"), Pat::Ptr],
        emit: &[Emit::Fixed(0xf0), Emit::Imm8 { arg: 1 }],
    },
];
