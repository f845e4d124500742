//! Candidate character sets and the range specs used to edit them.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

/// Printable ASCII, selected by the `all` spec
const ALL: RangeInclusive<char> = ' '..='~';

/// Distinct characters iterated in code-point order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    chars: BTreeSet<char>,
}

impl CharSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits `0`-`9`
    pub fn digits() -> Self {
        ('0'..='9').collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn insert(&mut self, ch: char) -> bool {
        self.chars.insert(ch)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn add_range(&mut self, range: RangeInclusive<char>) {
        self.chars.extend(range);
    }

    pub fn remove_range(&mut self, range: RangeInclusive<char>) {
        for ch in range {
            self.chars.remove(&ch);
        }
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self { chars: iter.into_iter().collect() }
    }
}

impl fmt::Display for CharSet {
    /// Space separated
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ch) in self.chars.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Parse a range spec: `all`, `space`, a single character, or `a-z` (either
/// bound order). Returns `None` for anything else.
pub fn parse_range(spec: &str) -> Option<RangeInclusive<char>> {
    match spec {
        "all" => return Some(ALL),
        "space" => return Some(' '..=' '),
        _ => {}
    }
    let chars: Vec<char> = spec.chars().collect();
    match chars.as_slice() {
        [c] => Some(*c..=*c),
        [a, '-', b] => Some(*a.min(b)..=*a.max(b)),
        _ => None,
    }
}

/// Turn a list of one-character strings into characters, keeping order.
/// Returns the index of the first entry that is not exactly one character.
pub fn single_chars<S: AsRef<str>>(entries: &[S]) -> Result<Vec<char>, usize> {
    entries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut chars = s.as_ref().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(i),
            }
        })
        .collect()
}
