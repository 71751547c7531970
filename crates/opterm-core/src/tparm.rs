#![forbid(unsafe_code)]

//! Parameterized capability templates (the terminfo `%` language).
//!
//! A capability such as `ESC [ 3 %p1 %d m` is a tiny postfix program: literal
//! bytes are copied to the output, `%` operators manipulate an integer stack
//! and append rendered numbers. This module evaluates such templates against
//! up to nine integer parameters.
//!
//! # Design
//!
//! The template is tokenized on the fly; there is no compiled form. Literal
//! runs are located with `memchr` so the common case (a mostly literal escape
//! sequence) is a handful of `extend_from_slice` calls.
//!
//! Conditionals are evaluated lazily: when a `%t` test fails the evaluator
//! skips forward to the matching `%e` or `%;`, and when a taken branch reaches
//! `%e` it skips to the matching `%;`. Skipped branches are tokenized (so an
//! escaped `%` inside them is not mistaken for an operator) but never run.
//!
//! ## Invariants
//!
//! 1. Literal bytes, including `$<n>` delay markers, are copied verbatim and in
//!    order. Delays are never executed here.
//! 2. Exactly one branch of a conditional contributes output.
//! 3. Popping an empty stack yields `0`; missing parameters read as `0`.
//! 4. Arithmetic wraps on 32-bit overflow; division and modulo by zero yield
//!    `0`.
//!
//! ## Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Unknown operator | `%` followed by an unsupported byte | [`TemplateError::UnknownOperator`] |
//! | Bad parameter | `%p0` or `%p` not followed by `1`-`9` | [`TemplateError::BadParameter`] |
//! | Unterminated literal | `%{12` or `%'a` at end of input | [`TemplateError::Unterminated`] |
//! | Unbalanced conditional | stray `%t`/`%e`/`%;` or unclosed `%?` | [`TemplateError::UnbalancedConditional`] |
//!
//! Profiles are trusted static data, so [`evaluate`] reports a defect through
//! the log and treats the capability as unsupported rather than panicking.
//! [`try_evaluate`] and [`validate`] surface the error for callers that check
//! profiles up front.
//!
//! # Example
//!
//! ```
//! use opterm_core::tparm;
//!
//! let setaf = "\x1b[%?%p1%{8}%<%t3%p1%d%e38;5;%p1%d%;m";
//! assert_eq!(tparm::evaluate(Some(setaf), &[4]).unwrap(), b"\x1b[34m");
//! assert_eq!(tparm::evaluate(Some(setaf), &[42]).unwrap(), b"\x1b[38;5;42m");
//! assert_eq!(tparm::evaluate(None, &[4]), None);
//! ```

use std::fmt::Write as _;

/// Number of parameters a template can address (`%p1` through `%p9`).
pub const MAX_PARAMS: usize = 9;

/// Upper bound for printf width and precision.
const MAX_FIELD_WIDTH: usize = 1024;

/// Defect found in a capability template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// `%` followed by a byte that is not a known operator.
    #[error("unknown operator `%{op}` at byte {offset}")]
    UnknownOperator {
        /// The offending operator byte.
        op: char,
        /// Byte offset of the `%`.
        offset: usize,
    },
    /// `%p` not followed by a digit in `1..=9`.
    #[error("invalid parameter reference at byte {offset}")]
    BadParameter {
        /// Byte offset of the `%`.
        offset: usize,
    },
    /// Integer literal, character constant or escape cut off by end of input.
    #[error("unterminated escape starting at byte {offset}")]
    Unterminated {
        /// Byte offset of the `%`.
        offset: usize,
    },
    /// `%t`, `%e` or `%;` without an open `%?`, or a `%?` never closed.
    #[error("unbalanced conditional at byte {offset}")]
    UnbalancedConditional {
        /// Byte offset of the offending token (template length if unclosed).
        offset: usize,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate an optional template.
///
/// `None` means the terminal lacks the capability and yields `None`. A
/// malformed template is logged and also yields `None`.
#[must_use]
pub fn evaluate(template: Option<&str>, params: &[i32]) -> Option<Vec<u8>> {
    let template = template?;
    match try_evaluate(template, params) {
        Ok(out) => Some(out),
        Err(_err) => {
            crate::warn!(template = ?template, error = %_err, "malformed capability template");
            None
        }
    }
}

/// Evaluate a template, reporting defects instead of swallowing them.
pub fn try_evaluate(template: &str, params: &[i32]) -> Result<Vec<u8>, TemplateError> {
    let mut machine = Machine::new(template.as_bytes(), params);
    machine.run()?;
    Ok(machine.out)
}

/// Check a template for defects without producing output.
pub fn validate(template: &str) -> Result<(), TemplateError> {
    let bytes = template.as_bytes();
    let mut pos = 0;
    let mut depth = 0usize;
    while pos < bytes.len() {
        let start = pos;
        let (token, next) = next_token(bytes, pos)?;
        pos = next;
        match token {
            Token::If => depth += 1,
            Token::Then | Token::Else if depth == 0 => {
                return Err(TemplateError::UnbalancedConditional { offset: start });
            }
            Token::EndIf => {
                if depth == 0 {
                    return Err(TemplateError::UnbalancedConditional { offset: start });
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(TemplateError::UnbalancedConditional { offset: bytes.len() });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Gt,
    Lt,
    LogicalAnd,
    LogicalOr,
    BitAnd,
    BitOr,
    BitXor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Decimal,
    Octal,
    HexLower,
    HexUpper,
}

/// printf-style conversion (`%d`, `%02d`, `%:-3x`, `%2.2X`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FormatSpec {
    conversion: Conversion,
    width: usize,
    precision: Option<usize>,
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    space_sign: bool,
    alternate: bool,
}

impl FormatSpec {
    const fn plain(conversion: Conversion) -> Self {
        Self {
            conversion,
            width: 0,
            precision: None,
            left_align: false,
            zero_pad: false,
            plus_sign: false,
            space_sign: false,
            alternate: false,
        }
    }

    fn render(&self, value: i32, out: &mut Vec<u8>) {
        let negative = value < 0 && self.conversion == Conversion::Decimal;
        let mut digits = String::new();
        // Non-decimal conversions print the two's complement bit pattern.
        let _ = match self.conversion {
            Conversion::Decimal => write!(digits, "{}", value.unsigned_abs()),
            Conversion::Octal => write!(digits, "{:o}", value as u32),
            Conversion::HexLower => write!(digits, "{:x}", value as u32),
            Conversion::HexUpper => write!(digits, "{:X}", value as u32),
        };
        if let Some(precision) = self.precision {
            while digits.len() < precision {
                digits.insert(0, '0');
            }
        }

        let mut prefix = String::new();
        if negative {
            prefix.push('-');
        } else if self.conversion == Conversion::Decimal && self.plus_sign {
            prefix.push('+');
        } else if self.conversion == Conversion::Decimal && self.space_sign {
            prefix.push(' ');
        }
        if self.alternate && value != 0 {
            match self.conversion {
                Conversion::Octal if !digits.starts_with('0') => prefix.push('0'),
                Conversion::HexLower => prefix.push_str("0x"),
                Conversion::HexUpper => prefix.push_str("0X"),
                _ => {}
            }
        }

        let len = prefix.len() + digits.len();
        let pad = self.width.saturating_sub(len);
        if self.left_align {
            out.extend_from_slice(prefix.as_bytes());
            out.extend_from_slice(digits.as_bytes());
            out.extend(std::iter::repeat_n(b' ', pad));
        } else if self.zero_pad && self.precision.is_none() {
            out.extend_from_slice(prefix.as_bytes());
            out.extend(std::iter::repeat_n(b'0', pad));
            out.extend_from_slice(digits.as_bytes());
        } else {
            out.extend(std::iter::repeat_n(b' ', pad));
            out.extend_from_slice(prefix.as_bytes());
            out.extend_from_slice(digits.as_bytes());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// Literal byte range `[start, end)` of the template.
    Literal(usize, usize),
    /// `%%`
    Percent,
    PushParam(usize),
    PushInt(i32),
    /// `%c`
    EmitChar,
    Format(FormatSpec),
    Binary(BinaryOp),
    /// `%!`
    LogicalNot,
    /// `%~`
    BitNot,
    /// `%i`
    Increment,
    /// `%P[a-zA-Z]`
    SetVar(usize),
    /// `%g[a-zA-Z]`
    GetVar(usize),
    If,
    Then,
    Else,
    EndIf,
}

fn variable_slot(byte: u8) -> Option<usize> {
    match byte {
        b'a'..=b'z' => Some(usize::from(byte - b'a')),
        b'A'..=b'Z' => Some(26 + usize::from(byte - b'A')),
        _ => None,
    }
}

/// Read the token at `pos`, returning it and the position after it.
fn next_token(bytes: &[u8], pos: usize) -> Result<(Token, usize), TemplateError> {
    if bytes[pos] != b'%' {
        let end = memchr::memchr(b'%', &bytes[pos..]).map_or(bytes.len(), |i| pos + i);
        return Ok((Token::Literal(pos, end), end));
    }

    let offset = pos;
    let unterminated = TemplateError::Unterminated { offset };
    let op = *bytes.get(pos + 1).ok_or(unterminated.clone())?;
    let simple = |token: Token| -> Result<(Token, usize), TemplateError> { Ok((token, pos + 2)) };

    match op {
        b'%' => simple(Token::Percent),
        b'c' => simple(Token::EmitChar),
        b'd' | b's' => simple(Token::Format(FormatSpec::plain(Conversion::Decimal))),
        b'o' => simple(Token::Format(FormatSpec::plain(Conversion::Octal))),
        b'x' => simple(Token::Format(FormatSpec::plain(Conversion::HexLower))),
        b'X' => simple(Token::Format(FormatSpec::plain(Conversion::HexUpper))),
        b'+' => simple(Token::Binary(BinaryOp::Add)),
        b'-' => simple(Token::Binary(BinaryOp::Sub)),
        b'*' => simple(Token::Binary(BinaryOp::Mul)),
        b'/' => simple(Token::Binary(BinaryOp::Div)),
        b'm' => simple(Token::Binary(BinaryOp::Mod)),
        b'=' => simple(Token::Binary(BinaryOp::Eq)),
        b'>' => simple(Token::Binary(BinaryOp::Gt)),
        b'<' => simple(Token::Binary(BinaryOp::Lt)),
        b'A' => simple(Token::Binary(BinaryOp::LogicalAnd)),
        b'O' => simple(Token::Binary(BinaryOp::LogicalOr)),
        b'&' => simple(Token::Binary(BinaryOp::BitAnd)),
        b'|' => simple(Token::Binary(BinaryOp::BitOr)),
        b'^' => simple(Token::Binary(BinaryOp::BitXor)),
        b'!' => simple(Token::LogicalNot),
        b'~' => simple(Token::BitNot),
        b'i' => simple(Token::Increment),
        b'?' => simple(Token::If),
        b't' => simple(Token::Then),
        b'e' => simple(Token::Else),
        b';' => simple(Token::EndIf),
        b'p' => match bytes.get(pos + 2) {
            Some(digit @ b'1'..=b'9') => Ok((Token::PushParam(usize::from(digit - b'1')), pos + 3)),
            Some(_) => Err(TemplateError::BadParameter { offset }),
            None => Err(unterminated),
        },
        b'P' | b'g' => {
            let name = *bytes.get(pos + 2).ok_or(unterminated)?;
            let slot = variable_slot(name).ok_or(TemplateError::UnknownOperator {
                op: char::from(name),
                offset,
            })?;
            let token = if op == b'P' {
                Token::SetVar(slot)
            } else {
                Token::GetVar(slot)
            };
            Ok((token, pos + 3))
        }
        b'{' => {
            let close = memchr::memchr(b'}', &bytes[pos + 2..]).ok_or(unterminated.clone())?;
            let digits = &bytes[pos + 2..pos + 2 + close];
            let text = std::str::from_utf8(digits).map_err(|_| unterminated.clone())?;
            let value = parse_literal(text).ok_or(unterminated)?;
            Ok((Token::PushInt(value), pos + 3 + close))
        }
        b'\'' => {
            let ch = *bytes.get(pos + 2).ok_or(unterminated.clone())?;
            if bytes.get(pos + 3) != Some(&b'\'') {
                return Err(unterminated);
            }
            Ok((Token::PushInt(i32::from(ch)), pos + 4))
        }
        b':' | b'#' | b' ' | b'.' | b'0'..=b'9' => parse_format(bytes, pos),
        other => Err(TemplateError::UnknownOperator {
            op: char::from(other),
            offset,
        }),
    }
}

fn parse_literal(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    // Integer literals wrap like every other value in the machine.
    text.parse::<i64>().ok().map(|v| v as i32)
}

/// Parse `%[[:]flags][width[.precision]][doxXs]`.
fn parse_format(bytes: &[u8], pos: usize) -> Result<(Token, usize), TemplateError> {
    let offset = pos;
    let mut i = pos + 1;
    let mut spec = FormatSpec::plain(Conversion::Decimal);

    if bytes.get(i) == Some(&b':') {
        i += 1;
    }
    while let Some(&flag) = bytes.get(i) {
        match flag {
            b'-' => spec.left_align = true,
            b'+' => spec.plus_sign = true,
            b' ' => spec.space_sign = true,
            b'#' => spec.alternate = true,
            b'0' => spec.zero_pad = true,
            _ => break,
        }
        i += 1;
    }
    while let Some(&digit @ b'0'..=b'9') = bytes.get(i) {
        spec.width = spec
            .width
            .saturating_mul(10)
            .saturating_add(usize::from(digit - b'0'))
            .min(MAX_FIELD_WIDTH);
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let mut precision = 0usize;
        while let Some(&digit @ b'0'..=b'9') = bytes.get(i) {
            precision = precision
                .saturating_mul(10)
                .saturating_add(usize::from(digit - b'0'))
                .min(MAX_FIELD_WIDTH);
            i += 1;
        }
        spec.precision = Some(precision);
    }

    spec.conversion = match bytes.get(i) {
        Some(b'd' | b's') => Conversion::Decimal,
        Some(b'o') => Conversion::Octal,
        Some(b'x') => Conversion::HexLower,
        Some(b'X') => Conversion::HexUpper,
        Some(&other) => {
            return Err(TemplateError::UnknownOperator {
                op: char::from(other),
                offset,
            });
        }
        None => return Err(TemplateError::Unterminated { offset }),
    };
    Ok((Token::Format(spec), i + 1))
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Where a skip should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipTarget {
    /// After `%e` or `%;` at the current nesting level (failed `%t`).
    ElseOrEnd,
    /// After `%;` at the current nesting level (end of a taken branch).
    End,
}

struct Machine<'a> {
    bytes: &'a [u8],
    pos: usize,
    params: [i32; MAX_PARAMS],
    stack: Vec<i32>,
    vars: [i32; 52],
    depth: usize,
    out: Vec<u8>,
}

impl<'a> Machine<'a> {
    fn new(bytes: &'a [u8], params: &[i32]) -> Self {
        let mut fixed = [0; MAX_PARAMS];
        for (slot, value) in fixed.iter_mut().zip(params) {
            *slot = *value;
        }
        Self {
            bytes,
            pos: 0,
            params: fixed,
            stack: Vec::with_capacity(8),
            vars: [0; 52],
            depth: 0,
            out: Vec::with_capacity(bytes.len() + 8),
        }
    }

    fn pop(&mut self) -> i32 {
        self.stack.pop().unwrap_or(0)
    }

    fn run(&mut self) -> Result<(), TemplateError> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let (token, next) = next_token(self.bytes, self.pos)?;
            self.pos = next;
            self.step(token, start)?;
        }
        if self.depth > 0 {
            return Err(TemplateError::UnbalancedConditional {
                offset: self.bytes.len(),
            });
        }
        Ok(())
    }

    fn step(&mut self, token: Token, start: usize) -> Result<(), TemplateError> {
        match token {
            Token::Literal(from, to) => self.out.extend_from_slice(&self.bytes[from..to]),
            Token::Percent => self.out.push(b'%'),
            Token::PushParam(index) => self.stack.push(self.params[index]),
            Token::PushInt(value) => self.stack.push(value),
            Token::EmitChar => {
                let value = self.pop();
                self.out.push(value as u8);
            }
            Token::Format(spec) => {
                let value = self.pop();
                spec.render(value, &mut self.out);
            }
            Token::Binary(op) => {
                let rhs = self.pop();
                let lhs = self.pop();
                self.stack.push(apply_binary(op, lhs, rhs));
            }
            Token::LogicalNot => {
                let value = self.pop();
                self.stack.push(i32::from(value == 0));
            }
            Token::BitNot => {
                let value = self.pop();
                self.stack.push(!value);
            }
            Token::Increment => {
                self.params[0] = self.params[0].wrapping_add(1);
                self.params[1] = self.params[1].wrapping_add(1);
            }
            Token::SetVar(slot) => self.vars[slot] = self.pop(),
            Token::GetVar(slot) => self.stack.push(self.vars[slot]),
            Token::If => self.depth += 1,
            Token::Then => {
                if self.depth == 0 {
                    return Err(TemplateError::UnbalancedConditional { offset: start });
                }
                if self.pop() == 0 {
                    self.skip(SkipTarget::ElseOrEnd)?;
                }
            }
            Token::Else => {
                if self.depth == 0 {
                    return Err(TemplateError::UnbalancedConditional { offset: start });
                }
                self.skip(SkipTarget::End)?;
            }
            Token::EndIf => {
                if self.depth == 0 {
                    return Err(TemplateError::UnbalancedConditional { offset: start });
                }
                self.depth -= 1;
            }
        }
        Ok(())
    }

    /// Advance past the tokens of an untaken branch.
    fn skip(&mut self, target: SkipTarget) -> Result<(), TemplateError> {
        let mut nested = 0usize;
        while self.pos < self.bytes.len() {
            let (token, next) = next_token(self.bytes, self.pos)?;
            self.pos = next;
            match token {
                Token::If => nested += 1,
                Token::EndIf if nested > 0 => nested -= 1,
                Token::EndIf => {
                    self.depth -= 1;
                    return Ok(());
                }
                Token::Else if nested == 0 && target == SkipTarget::ElseOrEnd => return Ok(()),
                _ => {}
            }
        }
        Err(TemplateError::UnbalancedConditional {
            offset: self.bytes.len(),
        })
    }
}

fn apply_binary(op: BinaryOp, lhs: i32, rhs: i32) -> i32 {
    match op {
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Sub => lhs.wrapping_sub(rhs),
        BinaryOp::Mul => lhs.wrapping_mul(rhs),
        BinaryOp::Div => lhs.checked_div(rhs).unwrap_or(0),
        BinaryOp::Mod => lhs.checked_rem(rhs).unwrap_or(0),
        BinaryOp::Eq => i32::from(lhs == rhs),
        BinaryOp::Gt => i32::from(lhs > rhs),
        BinaryOp::Lt => i32::from(lhs < rhs),
        BinaryOp::LogicalAnd => i32::from(lhs != 0 && rhs != 0),
        BinaryOp::LogicalOr => i32::from(lhs != 0 || rhs != 0),
        BinaryOp::BitAnd => lhs & rhs,
        BinaryOp::BitOr => lhs | rhs,
        BinaryOp::BitXor => lhs ^ rhs,
    }
}
