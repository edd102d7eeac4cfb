//! The textual idset grammar: `decode`/`encode` and `format_first`.
//!
//! Implemented as a small hand-rolled scanner rather than a regex, since
//! the grammar is LL(1) over a five-character alphabet (`digit , - [ ]`),
//! and a regex dependency buys nothing a dozen lines of `match` don't
//! already give us. This mirrors `idset_decode` in the historical C
//! implementation, which is a hand-rolled scanner for the same reason.

use std::fmt::Write as _;

use crate::bittree::INVALID_ID;
use crate::error::{invalid, IdsetError, Result};
use crate::set::{Idset, IdsetFlags};

/// Parses a single `lo` or `lo-hi` term. Returns `(lo, hi)` with `lo ==
/// hi` for a bare id. Enforces the "no leading zeros" rule on each bound.
fn parse_term(term: &str) -> Result<(u32, u32)> {
    if term.is_empty() {
        return Err(invalid("empty term in idset"));
    }
    match term.find('-') {
        None => {
            let id = parse_uint_token(term)?;
            Ok((id, id))
        }
        Some(pos) => {
            if pos == 0 || pos == term.len() - 1 {
                return Err(invalid(format!("dangling '-' in term '{term}'")));
            }
            let (lo_str, rest) = term.split_at(pos);
            let hi_str = &rest[1..];
            if hi_str.contains('-') {
                return Err(invalid(format!("too many '-' in term '{term}'")));
            }
            let lo = parse_uint_token(lo_str)?;
            let hi = parse_uint_token(hi_str)?;
            if lo > hi {
                return Err(invalid(format!("range '{term}' has lo > hi")));
            }
            Ok((lo, hi))
        }
    }
}

fn parse_uint_token(tok: &str) -> Result<u32> {
    if tok.is_empty() || !tok.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("'{tok}' is not a decimal id")));
    }
    if tok.len() > 1 && tok.as_bytes()[0] == b'0' {
        return Err(invalid(format!("'{tok}' has a leading zero")));
    }
    let id = tok
        .parse::<u32>()
        .map_err(|_| invalid(format!("'{tok}' does not fit in a u32 id")))?;
    if id == INVALID_ID {
        return Err(invalid(format!("'{tok}' is the reserved invalid sentinel")));
    }
    Ok(id)
}

/// Strips a single balanced pair of wrapping brackets, if present.
/// Rejects unbalanced or doubled brackets anywhere in the input.
fn unwrap_brackets(s: &str) -> Result<&str> {
    let opens = s.matches('[').count();
    let closes = s.matches(']').count();
    if opens > 1 || closes > 1 || opens != closes {
        return Err(invalid("unbalanced or doubled brackets"));
    }
    if opens == 0 {
        return Ok(s);
    }
    let bytes = s.as_bytes();
    if bytes[0] != b'[' || bytes[bytes.len() - 1] != b']' {
        return Err(invalid("brackets must wrap the entire input"));
    }
    Ok(&s[1..s.len() - 1])
}

/// Decodes the idset textual grammar described in the module docs.
/// Ids must appear in strictly ascending order with no duplicates;
/// failure never leaves a partially constructed idset behind.
pub fn decode(s: &str) -> Result<Idset> {
    let body = unwrap_brackets(s)?;

    if body.is_empty() {
        return Idset::create(0, IdsetFlags::empty());
    }

    let mut ranges: Vec<(u32, u32)> = Vec::new();
    let mut last_max: Option<u32> = None;
    for term in body.split(',') {
        let (lo, hi) = parse_term(term)?;
        if let Some(prev_max) = last_max {
            if lo <= prev_max {
                return Err(invalid(format!(
                    "'{term}' is not strictly greater than the previous id {prev_max}"
                )));
            }
        }
        last_max = Some(hi);
        ranges.push((lo, hi));
    }

    let capacity = last_max.map(|m| m + 1).unwrap_or(0);
    let mut idset = Idset::create(capacity, IdsetFlags::empty())?;
    for (lo, hi) in ranges {
        idset.range_insert(lo, hi)?;
    }
    Ok(idset)
}

/// Encodes an idset per the grammar. `flags` may contain [`IdsetFlags::RANGE`]
/// and/or [`IdsetFlags::BRACKETS`]; [`IdsetFlags::AUTOGROW`] is create-only
/// and rejected here.
pub fn encode(idset: &Idset, flags: IdsetFlags) -> Result<String> {
    if flags.contains(IdsetFlags::AUTOGROW) {
        return Err(invalid("AUTOGROW is not a valid encode flag"));
    }

    let mut body = String::new();
    if flags.contains(IdsetFlags::RANGE) {
        let mut id = idset.first();
        while id != INVALID_ID {
            let run_start = id;
            let mut run_end = id;
            loop {
                let nxt = idset.next(run_end);
                if nxt == run_end + 1 {
                    run_end = nxt;
                } else {
                    break;
                }
            }
            if !body.is_empty() {
                body.push(',');
            }
            if run_start == run_end {
                write!(body, "{run_start}").expect("String writes never fail");
            } else {
                write!(body, "{run_start}-{run_end}").expect("String writes never fail");
            }
            id = idset.next(run_end);
        }
    } else {
        let mut id = idset.first();
        while id != INVALID_ID {
            if !body.is_empty() {
                body.push(',');
            }
            write!(body, "{id}").expect("String writes never fail");
            id = idset.next(id);
        }
    }

    if body.is_empty() {
        return Ok(body);
    }
    if flags.contains(IdsetFlags::BRACKETS) {
        let mut wrapped = String::with_capacity(body.len() + 2);
        wrapped.push('[');
        wrapped.push_str(&body);
        wrapped.push(']');
        Ok(wrapped)
    } else {
        Ok(body)
    }
}

/// Replaces the first `[]` occurrence in `template` with the decimal
/// form of `id`. Unbounded: the returned `String` grows to fit.
pub fn format_first(template: &str, id: u32) -> Result<String> {
    match template.find("[]") {
        Some(pos) => {
            let mut out = String::with_capacity(template.len() + 10);
            out.push_str(&template[..pos]);
            write!(out, "{id}").expect("String writes never fail");
            out.push_str(&template[pos + 2..]);
            Ok(out)
        }
        None => Err(invalid(format!(
            "template '{template}' has no [] placeholder (missing, unmatched, or reversed brackets)"
        ))),
    }
}

/// [`format_first`], but fails with [`IdsetError::Overflow`] instead of
/// returning a string longer than `capacity`. Mirrors the historical
/// fixed-buffer API for callers that still need a bounded destination.
pub fn format_first_into(template: &str, id: u32, capacity: usize) -> Result<String> {
    let s = format_first(template, id)?;
    if s.len() >= capacity {
        Err(IdsetError::Overflow)
    } else {
        Ok(s)
    }
}
