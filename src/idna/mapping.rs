//! The IDNA character mapping table.
//!
//! Built once per process: every scalar's status is derived (exact UTS #46
//! rows for ASCII, character properties elsewhere), accumulated through a
//! [`SegmentedLine`], deduplicated, then packed into 64-bit entries over a
//! shared replacements arena and indexed for lookup.  Read-only after build.
//!
//! Packed entry layout, low to high:
//! - bits 0..21   range lower code point
//! - bits 21..37  range length minus one
//! - bits 37..40  status
//! - bits 40..42  replacement kind (none, single scalar, rebased, arena)
//! - bits 42..63  scalar or rebase origin; for arena entries bits 42..58 are
//!   the arena offset and bits 58..64 the length.

use crate::indexed_table::IndexedTable;
use crate::segmented_line::SegmentedLine;
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::{is_nfkc_quick, IsNormalized, UnicodeNormalization};

const CODE_POINT_BITS: u32 = 21;
const MAX_RANGE_LEN: u32 = 1 << 16;
const KIND_NONE: u64 = 0;
const KIND_SINGLE: u64 = 1;
const KIND_REBASED: u64 = 2;
const KIND_ARENA: u64 = 3;

/// What the mapping table says to do with one code point.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum Status {
    Valid,
    Ignored,
    Mapped,
    Deviation,
    Disallowed,
    DisallowedStd3Valid,
    DisallowedStd3Mapped,
}
impl Status {
    fn to_bits(self) -> u64 {
        match self {
            Status::Valid => 0,
            Status::Ignored => 1,
            Status::Mapped => 2,
            Status::Deviation => 3,
            Status::Disallowed => 4,
            Status::DisallowedStd3Valid => 5,
            Status::DisallowedStd3Mapped => 6,
        }
    }

    fn from_bits(bits: u64) -> Status {
        match bits {
            0 => Status::Valid,
            1 => Status::Ignored,
            2 => Status::Mapped,
            3 => Status::Deviation,
            4 => Status::Disallowed,
            5 => Status::DisallowedStd3Valid,
            _ => Status::DisallowedStd3Mapped,
        }
    }
}

/// A resolved lookup: the status plus the replacement for this code point.
#[derive(Copy, Clone, Debug)]
pub struct Mapping {
    status: Status,
    replacement: ReplacementRef,
}
#[derive(Copy, Clone, Debug)]
enum ReplacementRef {
    None,
    Single(char),
    Span(&'static [char]),
}
impl Mapping {
    #[must_use]
    pub fn status(self) -> Status {
        self.status
    }

    /// The replacement sequence, when the status carries one.
    #[must_use]
    pub fn replacement(self) -> Option<String> {
        match self.replacement {
            ReplacementRef::None => None,
            ReplacementRef::Single(c) => Some(c.to_string()),
            ReplacementRef::Span(span) => Some(span.iter().collect()),
        }
    }

    pub(crate) fn append_replacement_to(self, out: &mut String) {
        match self.replacement {
            ReplacementRef::None => {}
            ReplacementRef::Single(c) => out.push(c),
            ReplacementRef::Span(span) => out.extend(span.iter().copied()),
        }
    }
}

/// One table row, exposed for coverage checks and data tooling.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableEntry {
    pub range: core::ops::Range<u32>,
    pub status: Status,
}

struct MappingTable {
    entries: Vec<u64>,
    index: IndexedTable<u32>,
    replacements: Vec<char>,
}

static TABLE: LazyLock<MappingTable> = LazyLock::new(build_table);

/// Look up the mapping for one scalar.
#[must_use]
pub fn lookup(c: char) -> Mapping {
    let table: &'static MappingTable = &TABLE;
    let cp = u32::from(c);
    let position = table.index.position_of_last_le(cp).unwrap_or(0);
    let entry = table.entries[position];
    let lower = (entry & ((1 << CODE_POINT_BITS) - 1)) as u32;
    debug_assert!(cp >= lower && cp - lower <= ((entry >> 21) & 0xFFFF) as u32);
    let status = Status::from_bits((entry >> 37) & 0b111);
    let payload = entry >> 42;
    let replacement = match (entry >> 40) & 0b11 {
        KIND_SINGLE => match char::from_u32(payload as u32) {
            Some(c) => ReplacementRef::Single(c),
            None => ReplacementRef::None,
        },
        KIND_REBASED => match char::from_u32(payload as u32 + (cp - lower)) {
            Some(c) => ReplacementRef::Single(c),
            None => ReplacementRef::None,
        },
        KIND_ARENA => {
            let offset = (payload & 0xFFFF) as usize;
            let length = (payload >> 16) as usize;
            debug_assert!(offset + length <= table.replacements.len());
            ReplacementRef::Span(&table.replacements[offset..offset + length])
        }
        _ => ReplacementRef::None,
    };
    Mapping {
        status,
        replacement,
    }
}

/// All table rows in code-point order.  The rows tile `[0, 0x110000)`.
pub fn entries() -> impl Iterator<Item = TableEntry> {
    let table: &'static MappingTable = &TABLE;
    table.entries.iter().map(|&entry| {
        let lower = (entry & ((1 << CODE_POINT_BITS) - 1)) as u32;
        let length = ((entry >> 21) & 0xFFFF) as u32 + 1;
        TableEntry {
            range: lower..lower + length,
            status: Status::from_bits((entry >> 37) & 0b111),
        }
    })
}

/// The value a scalar is mapped through during table construction.
#[derive(Clone, Debug, Eq, PartialEq)]
struct BuildValue {
    status: Status,
    replacement: Option<String>,
}
impl BuildValue {
    fn plain(status: Status) -> Self {
        Self {
            status,
            replacement: None,
        }
    }

    fn mapped(replacement: &str) -> Self {
        Self {
            status: Status::Mapped,
            replacement: Some(replacement.to_string()),
        }
    }

    fn deviation(replacement: &str) -> Self {
        Self {
            status: Status::Deviation,
            replacement: Some(replacement.to_string()),
        }
    }
}

fn build_table() -> MappingTable {
    let mut line: SegmentedLine<u32, BuildValue> = SegmentedLine::new(
        0..0x11_0000,
        BuildValue::plain(Status::Disallowed),
    );

    // ASCII rows are the exact UTS #46 table.
    line.set(0x00..0x2D, BuildValue::plain(Status::DisallowedStd3Valid));
    line.set(0x2D..0x2F, BuildValue::plain(Status::Valid)); // '-' '.'
    line.set(0x2F..0x30, BuildValue::plain(Status::DisallowedStd3Valid));
    line.set(0x30..0x3A, BuildValue::plain(Status::Valid)); // digits
    line.set(0x3A..0x41, BuildValue::plain(Status::DisallowedStd3Valid));
    for upper in 0x41_u32..0x5B {
        let lower_case = char::from_u32(upper + 0x20).unwrap_or('a');
        line.set(
            upper..upper + 1,
            BuildValue::mapped(&lower_case.to_string()),
        );
    }
    line.set(0x5B..0x61, BuildValue::plain(Status::DisallowedStd3Valid));
    line.set(0x61..0x7B, BuildValue::plain(Status::Valid));
    line.set(0x7B..0x80, BuildValue::plain(Status::DisallowedStd3Valid));

    // Everything else is classified from character properties, accumulated
    // as runs of equal values.
    let mut run_start = 0x80_u32;
    let mut run_value = classify_code_point(0x80);
    for cp in 0x81_u32..0x11_0000 {
        let value = classify_code_point(cp);
        if value != run_value {
            line.set(run_start..cp, run_value);
            run_start = cp;
            run_value = value;
        }
    }
    line.set(run_start..0x11_0000, run_value);

    line.combine_segments(|a, b| a == b);
    pack(&line)
}

fn classify_code_point(cp: u32) -> BuildValue {
    let Some(c) = char::from_u32(cp) else {
        // Surrogates.
        return BuildValue::plain(Status::Disallowed);
    };
    match c {
        '\u{DF}' => BuildValue::deviation("ss"),
        '\u{3C2}' => BuildValue::deviation("\u{3C3}"),
        '\u{200C}' | '\u{200D}' => BuildValue::deviation(""),
        '\u{AD}'
        | '\u{34F}'
        | '\u{180B}'..='\u{180D}'
        | '\u{200B}'
        | '\u{2060}'
        | '\u{2064}'
        | '\u{FE00}'..='\u{FE0F}'
        | '\u{FEFF}'
        | '\u{1BCA0}'..='\u{1BCA3}'
        | '\u{E0100}'..='\u{E01EF}' => BuildValue::plain(Status::Ignored),
        '\u{80}'..='\u{9F}'
        | '\u{61C}'
        | '\u{200E}'
        | '\u{200F}'
        | '\u{2028}'
        | '\u{2029}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2066}'..='\u{2069}'
        | '\u{FDD0}'..='\u{FDEF}'
        | '\u{FFF9}'..='\u{FFFD}'
        | '\u{E000}'..='\u{F8FF}'
        | '\u{E0000}'..='\u{E0FFF}'
        | '\u{F0000}'..='\u{FFFFF}'
        | '\u{100000}'..='\u{10FFFF}' => BuildValue::plain(Status::Disallowed),
        _ if (cp & 0xFFFE) == 0xFFFE => BuildValue::plain(Status::Disallowed),
        '\u{3002}' | '\u{FF0E}' | '\u{FF61}' => BuildValue::mapped("."),
        _ => classify_by_properties(c),
    }
}

fn classify_by_properties(c: char) -> BuildValue {
    let lowercase_identity = {
        let mut it = c.to_lowercase();
        it.next() == Some(c) && it.next().is_none()
    };
    if lowercase_identity && is_nfkc_quick(core::iter::once(c)) == IsNormalized::Yes {
        return BuildValue::plain(Status::Valid);
    }
    let mapped = case_fold_nfkc_fixpoint(c);
    if mapped.chars().eq(core::iter::once(c)) {
        return BuildValue::plain(Status::Valid);
    }
    // Mappings that introduce ASCII outside the host-safe set only apply
    // when STD3 rules are off.
    let std3_unsafe = mapped
        .chars()
        .any(|m| m.is_ascii() && !matches!(m, 'a'..='z' | '0'..='9' | '-' | '.'));
    if std3_unsafe {
        BuildValue {
            status: Status::DisallowedStd3Mapped,
            replacement: Some(mapped),
        }
    } else {
        BuildValue {
            status: Status::Mapped,
            replacement: Some(mapped),
        }
    }
}

/// Lowercase then compatibility-normalize until stable.  Approximates the
/// UTS #46 mapping for scalars with no explicit row above.
fn case_fold_nfkc_fixpoint(c: char) -> String {
    let mut current: String = c.to_string();
    for _ in 0..3 {
        let lowered: String = current.chars().flat_map(char::to_lowercase).collect();
        let normalized: String = lowered.nfkc().collect();
        if normalized == current {
            break;
        }
        current = normalized;
    }
    current
}

fn pack(line: &SegmentedLine<u32, BuildValue>) -> MappingTable {
    let segments: Vec<(core::ops::Range<u32>, BuildValue)> = line
        .iter()
        .map(|(range, value)| (range, value.clone()))
        .collect();
    let mut entries: Vec<u64> = Vec::with_capacity(segments.len());
    let mut lowers: Vec<u32> = Vec::with_capacity(segments.len());
    let mut replacements: Vec<char> = Vec::new();
    let mut arena_offsets: HashMap<Vec<char>, u32> = HashMap::new();

    let single_scalar = |value: &BuildValue| -> Option<char> {
        let replacement = value.replacement.as_deref()?;
        let mut chars = replacement.chars();
        let first = chars.next()?;
        chars.next().is_none().then_some(first)
    };

    let mut position = 0_usize;
    while position < segments.len() {
        let (range, value) = &segments[position];

        // Collapse runs of adjacent one-scalar mappings with a constant
        // offset (e.g. an uppercase alphabet) into one rebased entry.
        if value.status == Status::Mapped && range.len() == 1 {
            if let Some(origin) = single_scalar(value) {
                let delta = i64::from(u32::from(origin)) - i64::from(range.start);
                let mut end = position + 1;
                let mut upper = range.end;
                while let Some((next_range, next_value)) = segments.get(end) {
                    let extends = next_range.start == upper
                        && next_range.len() == 1
                        && next_value.status == Status::Mapped
                        && single_scalar(next_value).is_some_and(|s| {
                            i64::from(u32::from(s)) - i64::from(next_range.start) == delta
                        });
                    if !extends {
                        break;
                    }
                    upper = next_range.end;
                    end += 1;
                }
                if end - position >= 2 {
                    lowers.push(range.start);
                    entries.push(pack_entry(
                        range.start,
                        upper - range.start,
                        Status::Mapped,
                        KIND_REBASED,
                        u64::from(u32::from(origin)),
                    ));
                    position = end;
                    continue;
                }
            }
        }

        let (kind, payload) = match &value.replacement {
            None => (KIND_NONE, 0_u64),
            Some(replacement) if replacement.is_empty() => (KIND_NONE, 0_u64),
            Some(_) => match single_scalar(value) {
                Some(scalar) => (KIND_SINGLE, u64::from(u32::from(scalar))),
                None => {
                    let chars: Vec<char> =
                        value.replacement.as_deref().unwrap_or_default().chars().collect();
                    assert!(chars.len() < 64, "replacement too long");
                    let offset = *arena_offsets.entry(chars.clone()).or_insert_with(|| {
                        let offset = replacements.len() as u32;
                        replacements.extend(chars.iter().copied());
                        offset
                    });
                    assert!(offset < 1 << 16, "replacements arena overflow");
                    (KIND_ARENA, u64::from(offset) | ((chars.len() as u64) << 16))
                }
            },
        };

        // Ranges longer than the delta field splits into chunks.
        let mut lower = range.start;
        while lower < range.end {
            let length = (range.end - lower).min(MAX_RANGE_LEN);
            lowers.push(lower);
            entries.push(pack_entry(lower, length, value.status, kind, payload));
            lower += length;
        }
        position += 1;
    }

    let index = IndexedTable::new(lowers, CODE_POINT_BITS);
    MappingTable {
        entries,
        index,
        replacements,
    }
}

fn pack_entry(lower: u32, length: u32, status: Status, kind: u64, payload: u64) -> u64 {
    debug_assert!(length >= 1 && length <= MAX_RANGE_LEN);
    u64::from(lower)
        | (u64::from(length - 1) << 21)
        | (status.to_bits() << 37)
        | (kind << 40)
        | (payload << 42)
}
