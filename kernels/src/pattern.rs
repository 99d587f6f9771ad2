//! Parsing of motif descriptions such as `A[CG].T[^A]` into element sequences.
//!
//! A motif is built from three kinds of elements:
//! * a character of the motif alphabet, matching itself,
//! * the wildcard `.`, matching any character,
//! * a substitution group in brackets (`[CT]`), matching any member, or with a leading
//!   `^` (`[^CT]`) any alphabet character that is not a member.
//!
//! Unless an alphabet is given explicitly it is inferred from the motif itself, so a
//! negated group only ranges over characters the motif mentions somewhere.
use log::warn;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Eq)]
/// Single position of a pattern
pub enum Element {
    /// Matches exactly this character
    Literal(u8),
    /// Matches any character
    Wildcard,
    /// Matches one of `members`.  Negated groups are stored already complemented
    /// against the alphabet, `negate` only records how the group was written.
    Class {
        /// Characters matched
        members: BTreeSet<u8>,
        /// Group was written as `[^...]`
        negate: bool,
    },
}

impl Element {
    /// Whether `symbol` is accepted at this position
    pub fn matches(&self, symbol: u8) -> bool {
        match self {
            Element::Literal(c) => *c == symbol,
            Element::Wildcard => true,
            Element::Class { members, .. } => members.contains(&symbol),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Literal(a), Element::Literal(b)) => a == b,
            (Element::Wildcard, Element::Wildcard) => true,
            (Element::Class { members: a, .. }, Element::Class { members: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Literal(c) => write!(f, "{}", *c as char),
            Element::Wildcard => f.write_str("."),
            Element::Class { members, .. } => {
                f.write_str("[")?;
                for c in members {
                    write!(f, "{}", *c as char)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Debug, Default)]
struct OpenClass {
    members: BTreeSet<u8>,
    negate: bool,
}

impl OpenClass {
    fn is_fresh(&self) -> bool {
        self.members.is_empty() && !self.negate
    }

    fn close(self, alphabet: &BTreeSet<u8>) -> Element {
        let members = if self.negate {
            alphabet.difference(&self.members).copied().collect()
        } else {
            self.members
        };
        Element::Class {
            members,
            negate: self.negate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed motif.  Immutable once built.
pub struct Pattern {
    motif: String,
    elements: Vec<Element>,
    alphabet: BTreeSet<u8>,
    dropped: Vec<(usize, char)>,
}

impl Pattern {
    /// Parses `motif` with the alphabet inferred from its own characters
    pub fn parse(motif: &str) -> Self {
        let alphabet = motif
            .bytes()
            .filter(|c| !matches!(c, b'[' | b']' | b'^' | b'.'))
            .collect();
        Self::parse_against(motif, alphabet)
    }

    /// Parses `motif` against an explicit alphabet, characters outside of it are dropped
    pub fn parse_with_alphabet(motif: &str, alphabet: &[u8]) -> Self {
        Self::parse_against(motif, alphabet.iter().copied().collect())
    }

    fn parse_against(motif: &str, alphabet: BTreeSet<u8>) -> Self {
        let mut elements = Vec::with_capacity(motif.len());
        let mut dropped = Vec::new();
        let mut open: Option<OpenClass> = None;
        let mut open_at = 0;

        for (i, c) in motif.bytes().enumerate() {
            if c == b']' && open.is_some() {
                if let Some(group) = open.take() {
                    elements.push(group.close(&alphabet));
                }
                continue;
            }

            let accepted = match open.as_mut() {
                Some(group) if c == b'^' && group.is_fresh() => {
                    group.negate = true;
                    true
                }
                Some(group) if alphabet.contains(&c) || c == b'.' => {
                    group.members.insert(c);
                    true
                }
                Some(_) => false,
                None => match c {
                    b'.' => {
                        elements.push(Element::Wildcard);
                        true
                    }
                    b'[' => {
                        open = Some(OpenClass::default());
                        open_at = i;
                        true
                    }
                    c if alphabet.contains(&c) => {
                        elements.push(Element::Literal(c));
                        true
                    }
                    _ => false,
                },
            };

            if !accepted {
                warn!(
                    "Motif `{}` does not satisfy the format requirements, dropping `{}` at position {}",
                    motif, c as char, i
                );
                dropped.push((i, c as char));
            }
        }

        if open.is_some() {
            warn!(
                "Motif `{}` has an unterminated group starting at position {}, dropping it",
                motif, open_at
            );
            dropped.push((open_at, '['));
        }

        Self {
            motif: motif.to_string(),
            elements,
            alphabet,
            dropped,
        }
    }

    /// The motif string this pattern was parsed from
    pub fn motif(&self) -> &str {
        &self.motif
    }

    /// Parsed elements in order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements, brackets count as one
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when nothing survived parsing
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Alphabet the pattern was parsed against
    pub fn alphabet(&self) -> &BTreeSet<u8> {
        &self.alphabet
    }

    /// Characters (with their positions) that were reported and skipped
    pub fn dropped(&self) -> &[(usize, char)] {
        &self.dropped
    }

    /// Whether the pattern matches `seq` starting at `start`
    pub fn matches_at(&self, seq: &[u8], start: usize) -> bool {
        !self.is_empty()
            && start + self.len() <= seq.len()
            && self
                .elements
                .iter()
                .zip(&seq[start..])
                .all(|(element, symbol)| element.matches(*symbol))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.motif)
    }
}
