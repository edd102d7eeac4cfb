//! Brace expansion: turn a pattern with embedded `[idset]` groups into
//! the Cartesian product of literal strings.
//!
//! Implemented as a two-pass routine: [`tokenize`]
//! splits the pattern into literal and group segments up front, then
//! [`format_map`] odometer-iterates over the groups. Keeping these
//! separate makes the row-major ordering and the `stop`/error
//! short-circuiting easy to verify by inspection, rather than folding
//! everything into one recursive descent.

use crate::bittree::INVALID_ID;
use crate::set::Idset;

enum Segment {
    Literal(String),
    Group(Idset),
}

/// A `[...]` pair counts as a group only if it is a simple, unnested
/// pair (no `[` or `]` between the brackets). Anything else, a
/// dangling `[`, a stray `]`, or `][`, is left as literal text, and a
/// simple pair whose contents fail to decode as an idset is a hard
/// error (it was correctly bracketed, just ill-formed).
fn tokenize(pattern: &str) -> crate::error::Result<Vec<Segment>> {
    let bytes = pattern.as_bytes();
    let n = bytes.len();
    let mut i = 0;
    let mut literal_start = 0;
    let mut segments = Vec::new();

    while i < n {
        if bytes[i] == b'[' {
            let mut j = i + 1;
            let mut nested_open = false;
            while j < n && bytes[j] != b']' {
                if bytes[j] == b'[' {
                    nested_open = true;
                }
                j += 1;
            }
            if j < n && !nested_open {
                if literal_start < i {
                    segments.push(Segment::Literal(pattern[literal_start..i].to_string()));
                }
                let inner = &pattern[i + 1..j];
                let idset = crate::codec::decode(inner)?;
                segments.push(Segment::Group(idset));
                i = j + 1;
                literal_start = i;
                continue;
            }
        }
        i += 1;
    }
    if literal_start < n {
        segments.push(Segment::Literal(pattern[literal_start..].to_string()));
    }
    Ok(segments)
}

/// Advances `ids` to the next combination in row-major order (rightmost
/// group fastest). Returns `false` once every combination has been
/// visited.
fn odometer_increment(ids: &mut [u32], groups: &[&Idset]) -> bool {
    for k in (0..groups.len()).rev() {
        let nxt = groups[k].next(ids[k]);
        if nxt != INVALID_ID {
            ids[k] = nxt;
            return true;
        }
        ids[k] = groups[k].first();
    }
    false
}

fn render(segments: &[Segment], ids: &[u32]) -> String {
    let mut out = String::new();
    let mut gi = 0;
    for seg in segments {
        match seg {
            Segment::Literal(l) => out.push_str(l),
            Segment::Group(_) => {
                out.push_str(&ids[gi].to_string());
                gi += 1;
            }
        }
    }
    out
}

/// For every combination of choices across the pattern's bracket
/// groups (Cartesian product, row-major, ascending within each group),
/// materializes the literal string and invokes `f(literal, &mut stop)`.
///
/// - `f` returning `Err` halts iteration and propagates the error.
/// - `f` setting `*stop = true` halts iteration cleanly after that call.
/// - A pattern with no groups is emitted once, unchanged.
/// - Any group that decodes to the empty idset makes the whole pattern
///   contribute zero invocations.
///
/// Returns the number of successful invocations.
pub fn format_map<F>(pattern: &str, mut f: F) -> anyhow::Result<usize>
where
    F: FnMut(&str, &mut bool) -> anyhow::Result<()>,
{
    let segments = tokenize(pattern)?;
    let groups: Vec<&Idset> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Group(idset) => Some(idset),
            Segment::Literal(_) => None,
        })
        .collect();

    if groups.is_empty() {
        let literal = render(&segments, &[]);
        let mut stop = false;
        f(&literal, &mut stop)?;
        return Ok(1);
    }

    if groups.iter().any(|g| g.count() == 0) {
        return Ok(0);
    }

    let mut ids: Vec<u32> = groups.iter().map(|g| g.first()).collect();
    let mut count = 0usize;
    let mut stop = false;
    loop {
        let literal = render(&segments, &ids);
        f(&literal, &mut stop)?;
        count += 1;
        if stop || !odometer_increment(&mut ids, &groups) {
            break;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pattern: &str) -> Vec<String> {
        let mut out = Vec::new();
        format_map(pattern, |s, _stop| {
            out.push(s.to_string());
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn no_brackets_emitted_once() {
        assert_eq!(collect("foo"), vec!["foo"]);
        assert_eq!(collect(""), vec![""]);
    }

    #[test]
    fn unmatched_brackets_are_literal() {
        assert_eq!(collect("foo["), vec!["foo["]);
        assert_eq!(collect("foo]"), vec!["foo]"]);
        assert_eq!(collect("foo]["), vec!["foo]["]);
    }

    #[test]
    fn empty_group_yields_zero_invocations() {
        assert_eq!(collect("foo[]"), Vec::<String>::new());
    }

    #[test]
    fn malformed_group_is_a_hard_error() {
        let mut calls = 0;
        let result = format_map("[foo]", |_s, _stop| {
            calls += 1;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn single_group_expansion() {
        assert_eq!(collect("n[0-3]"), vec!["n0", "n1", "n2", "n3"]);
    }

    #[test]
    fn two_group_cartesian_product_is_row_major() {
        assert_eq!(
            collect("r[0-1]n[0-1]"),
            vec!["r0n0", "r0n1", "r1n0", "r1n1"]
        );
    }

    #[test]
    fn three_group_cartesian_product() {
        assert_eq!(
            collect("[0-1][0-1][0-2]"),
            vec![
                "000", "001", "002", "010", "011", "012", "100", "101", "102", "110", "111", "112"
            ]
        );
    }

    #[test]
    fn discontiguous_group_choices() {
        assert_eq!(collect("n[0,99-100]x"), vec!["n0x", "n99x", "n100x"]);
    }

    #[test]
    fn stop_flag_halts_after_third_invocation() {
        let mut seen = Vec::new();
        let count = format_map("h[0-15]", |s, stop| {
            seen.push(s.to_string());
            if seen.len() == 3 {
                *stop = true;
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 3);
        assert_eq!(seen, vec!["h0", "h1", "h2"]);
    }

    #[test]
    fn callback_error_propagates_and_stops_iteration() {
        let mut seen = Vec::new();
        let result = format_map("h[0-15]", |s, _stop| {
            if seen.len() == 3 {
                anyhow::bail!("synthetic failure");
            }
            seen.push(s.to_string());
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn nested_brackets_fall_back_to_literal_outer() {
        assert_eq!(collect("[[0]]"), vec!["[0]"]);
    }
}
