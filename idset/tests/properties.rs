//! Property-based checks of the idset engine's universal invariants,
//! driven with `#[quickcheck_macros::quickcheck]`: generate arbitrary
//! small id sets, then assert the laws hold for every sample instead of
//! a fixed table.

use std::collections::BTreeSet;

use idset::{decode, encode, Idset, IdsetFlags};
use quickcheck_macros::quickcheck;

/// Builds an `Idset` from an arbitrary, deduplicated `BTreeSet<u16>` of
/// ids so every generated sample is automatically sorted and unique,
/// exactly what the codec's ascending-order rule requires upstream.
fn idset_from(ids: &BTreeSet<u16>) -> Idset {
    let cap = ids.iter().next_back().map(|&m| m as u32 + 1).unwrap_or(0);
    let mut s = Idset::create(cap, IdsetFlags::empty()).unwrap();
    for &id in ids {
        s.insert(id as u32).unwrap();
    }
    s
}

#[quickcheck]
fn count_law(ids: BTreeSet<u16>) -> bool {
    let s = idset_from(&ids);
    s.count() as usize == ids.len()
}

#[quickcheck]
fn iteration_law_is_strictly_ascending_and_exhaustive(ids: BTreeSet<u16>) -> bool {
    let s = idset_from(&ids);
    let collected: Vec<u32> = s.iter().collect();
    let expected: Vec<u32> = ids.iter().map(|&x| x as u32).collect();
    collected == expected && collected.windows(2).all(|w| w[0] < w[1])
}

#[quickcheck]
fn copy_independence(ids: BTreeSet<u16>) -> bool {
    let Some(&victim) = ids.iter().next() else {
        return true;
    };
    let victim = victim as u32;
    let s = idset_from(&ids);
    let mut copy = s.clone();
    copy.remove(victim).unwrap();
    s.contains(victim) && !copy.contains(victim)
}

#[quickcheck]
fn equal_idsets_encode_identically_under_equal_flags(ids: BTreeSet<u16>) -> bool {
    let a = idset_from(&ids);
    // Built through a separate, autogrowing capacity so the two sides
    // differ in underlying capacity but hold the same members.
    let mut b = Idset::create(0, IdsetFlags::AUTOGROW).unwrap();
    for &id in &ids {
        b.insert(id as u32).unwrap();
    }
    a == b && a.encode(IdsetFlags::RANGE).unwrap() == b.encode(IdsetFlags::RANGE).unwrap()
}

#[quickcheck]
fn round_trip_through_the_textual_codec(ids: BTreeSet<u16>) -> bool {
    let s = idset_from(&ids);
    for flags in [
        IdsetFlags::empty(),
        IdsetFlags::RANGE,
        IdsetFlags::BRACKETS,
        IdsetFlags::RANGE | IdsetFlags::BRACKETS,
    ] {
        let text = encode(&s, flags).unwrap();
        let back = decode(&text).unwrap();
        if back != s {
            return false;
        }
    }
    true
}

#[test]
fn manual_round_trip_spot_check() {
    let s = decode("1-3,7-9,14,16").unwrap();
    assert_eq!(
        encode(&s, IdsetFlags::RANGE | IdsetFlags::BRACKETS).unwrap(),
        "[1-3,7-9,14,16]"
    );
}
