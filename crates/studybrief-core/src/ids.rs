//! Identifier list parsing
//!
//! Plan rows reference objectives and resources as free-form, comma-separated
//! lists. Contiguous runs may be written in range shorthand:
//!
//! - `P-ENTRA-01..04` (end given as bare digits)
//! - `P-ENTRA-01..P-ENTRA-04` (end repeats the prefix verbatim)
//!
//! Both expand inclusively and keep the zero padding of the start number.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// `<prefix><digits>..<digits>`
static SHORT_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)([0-9]+)\.\.([0-9]+)$").expect("valid short range regex"));

/// `<prefix><digits>..<prefix><digits>`, prefixes compared after matching
static FULL_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)([0-9]+)\.\.(.+?)([0-9]+)$").expect("valid full range regex"));

/// Largest number of identifiers a single range token may produce.
/// Wider tokens are kept verbatim instead of being expanded, as are tokens
/// whose numbers do not fit in a `u64`. Only ASCII digits form ranges.
pub const MAX_RANGE_SPAN: u64 = 10_000;

/// Parse a comma-separated identifier list, expanding range tokens.
///
/// Returns a deduplicated, sorted list. Empty input yields an empty list.
///
/// # Examples
///
/// ```
/// use studybrief_core::ids::expand_ids;
///
/// assert_eq!(
///     expand_ids("P-ENTRA-01..03, SOLO"),
///     vec!["P-ENTRA-01", "P-ENTRA-02", "P-ENTRA-03", "SOLO"]
/// );
/// assert!(expand_ids("X-9..7").is_empty());
/// ```
pub fn expand_ids(raw: &str) -> Vec<String> {
    let mut ids = BTreeSet::new();
    collect_into(raw, &mut ids);
    ids.into_iter().collect()
}

/// Expand several raw lists into one deduplicated, sorted list.
pub fn expand_all<'a, I>(raws: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids = BTreeSet::new();
    for raw in raws {
        collect_into(raw, &mut ids);
    }
    ids.into_iter().collect()
}

fn collect_into(raw: &str, ids: &mut BTreeSet<String>) {
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_range(token) {
            Some(range) => ids.extend(range.iter()),
            None => {
                ids.insert(token.to_string());
            }
        }
    }
}

/// A parsed range token. `start > end` is valid and expands to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IdRange<'a> {
    prefix: &'a str,
    start: u64,
    end: u64,
    width: usize,
}

impl IdRange<'_> {
    fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (self.start..=self.end).map(move |n| format!("{}{:0width$}", self.prefix, n, width = self.width))
    }
}

fn parse_range(token: &str) -> Option<IdRange<'_>> {
    let (prefix, start, end) = if let Some(caps) = SHORT_RANGE.captures(token) {
        let (_, [prefix, start, end]) = caps.extract();
        (prefix, start, end)
    } else {
        let caps = FULL_RANGE.captures(token)?;
        let (_, [prefix, start, end_prefix, end]) = caps.extract();
        if prefix != end_prefix {
            return None;
        }
        (prefix, start, end)
    };

    let range = IdRange {
        prefix,
        start: start.parse().ok()?,
        end: end.parse().ok()?,
        width: start.len(),
    };

    if range.end >= range.start && range.end - range.start >= MAX_RANGE_SPAN {
        tracing::warn!(token, "Range token too wide, keeping it verbatim");
        return None;
    }

    Some(range)
}
