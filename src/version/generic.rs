//! Generic Maven-style version ordering.
//!
//! A version string is split into items at `.` and `-` and at every switch between digits
//! and letters, so `1.0-rc2` becomes `[1, 0, rc, 2]`. Items compare pairwise:
//!
//! - numbers compare numerically (any length, no overflow)
//! - a number beats a qualifier at the same position (`1.0.1` > `1.0-rc1`)
//! - well-known qualifiers order as `alpha < beta < milestone < rc < snapshot`
//! - other qualifiers sort lexically (case-insensitive) after `snapshot`
//! - the release (no qualifier, `ga`, `final`, `release`) beats every qualifier
//!
//! Zeros and release markers at the end of a run of same-kind items are insignificant:
//! `1`, `1.0`, `1.0.0` and `1-ga` are all equal, and so are `1.0-rc1` and `1-rc1`. A
//! version that runs out of items is padded with the release marker, which makes
//! `1.0-SNAPSHOT` < `1.0` < `1.0.1`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Digits with leading zeros stripped, compared by length then lexically.
    Number(String),
    /// Lower-cased qualifier, with aliases folded (`a` → `alpha`, `cr` → `rc`, ...).
    Qualifier(String),
}

impl Item {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Self::Number(trimmed.to_string())
    }

    fn qualifier(text: &str, followed_by_digit: bool) -> Self {
        let lower = text.to_ascii_lowercase();
        let folded = match lower.as_str() {
            "a" if followed_by_digit => "alpha",
            "b" if followed_by_digit => "beta",
            "m" if followed_by_digit => "milestone",
            "cr" => "rc",
            "ga" | "final" | "release" => "",
            other => other,
        };
        Self::Qualifier(folded.to_string())
    }

    fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Whether the item equals the padding of a shorter version.
    fn is_null(&self) -> bool {
        match self {
            Self::Number(digits) => digits.is_empty(),
            Self::Qualifier(text) => text.is_empty(),
        }
    }

    fn qualifier_rank(text: &str) -> u8 {
        match text {
            "alpha" => 0,
            "beta" => 1,
            "milestone" => 2,
            "rc" => 3,
            "snapshot" => 4,
            "" => 6,
            // unknown qualifiers sit between snapshot and release
            _ => 5,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Number(_), Self::Qualifier(_)) => Ordering::Greater,
            (Self::Qualifier(_), Self::Number(_)) => Ordering::Less,
            (Self::Qualifier(a), Self::Qualifier(b)) => Self::qualifier_rank(a)
                .cmp(&Self::qualifier_rank(b))
                .then_with(|| a.cmp(b)),
        }
    }

    /// Compare against the implicit padding of a shorter version.
    fn compare_padding(&self) -> Ordering {
        match self {
            Self::Number(digits) if digits.is_empty() => Ordering::Equal,
            Self::Number(_) => Ordering::Greater,
            Self::Qualifier(text) => {
                Self::qualifier_rank(text).cmp(&Self::qualifier_rank(""))
            }
        }
    }
}

/// A parsed version with a total order.
///
/// Parsing never fails: every string is a valid generic version, which is what makes
/// highest-version-wins conflict resolution total.
#[derive(Debug, Clone)]
pub struct GenericVersion {
    original: String,
    items: Vec<Item>,
}

impl GenericVersion {
    pub fn parse(version: &str) -> Self {
        let mut items = Vec::new();
        let chars: Vec<char> = version.trim().chars().collect();
        let mut start = 0;

        while start < chars.len() {
            let c = chars[start];
            if c == '.' || c == '-' || c == '_' {
                start += 1;
                continue;
            }
            let digit = c.is_ascii_digit();
            let mut end = start;
            while end < chars.len()
                && chars[end] != '.'
                && chars[end] != '-'
                && chars[end] != '_'
                && chars[end].is_ascii_digit() == digit
            {
                end += 1;
            }
            let token: String = chars[start..end].iter().collect();
            if digit {
                items.push(Item::number(&token));
            } else {
                let followed_by_digit = chars.get(end).is_some_and(char::is_ascii_digit);
                items.push(Item::qualifier(&token, followed_by_digit));
            }
            start = end;
        }

        trim_padding(&mut items);

        Self {
            original: version.to_string(),
            items,
        }
    }

    /// The string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

/// Drop null items at the end of every run of numbers or qualifiers.
///
/// The first item is always kept. A null item is only dropped when it ends the version or
/// follows an item of the same kind, so `1-ga-1` keeps its empty qualifier.
fn trim_padding(items: &mut Vec<Item>) {
    let mut kind = None;
    let mut end = items.len();
    let mut index = items.len();
    while index > 1 {
        index -= 1;
        let is_number = items[index].is_number();
        if kind != Some(is_number) {
            end = index;
            kind = Some(is_number);
        }
        let last = index == items.len() - 1;
        if end == index
            && (last || items[index - 1].is_number() == is_number)
            && items[index].is_null()
        {
            items.remove(index);
            end -= 1;
        }
    }
}

impl Ord for GenericVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        for index in 0..len {
            let ordering = match (self.items.get(index), other.items.get(index)) {
                (Some(a), Some(b)) => a.compare(b),
                (Some(a), None) => a.compare_padding(),
                (None, Some(b)) => b.compare_padding().reverse(),
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for GenericVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GenericVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GenericVersion {}

impl FromStr for GenericVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for GenericVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
