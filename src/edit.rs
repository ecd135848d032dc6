use serde::{Deserialize, Serialize};

/// Shape of an elementary allele edit relative to the reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    /// Replaces a non-empty reference interval with a non-empty allele.
    Substitution,
    /// Adds sequence between two reference bases.
    Insertion,
    /// Removes a non-empty reference interval.
    Deletion,
}

/// A single allele edit: replace reference `[start, end)` with `alt`.
/// `start == end` is a pure insertion, an empty `alt` a pure deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleEdit {
    pub start: usize,
    pub end: usize,
    pub alt: Vec<u8>,
}

impl AlleleEdit {
    pub fn new(start: usize, end: usize, alt: &[u8]) -> Self {
        AlleleEdit {
            start,
            end,
            alt: alt.to_vec(),
        }
    }

    pub fn substitution(start: usize, end: usize, alt: &[u8]) -> Self {
        Self::new(start, end, alt)
    }

    pub fn insertion(position: usize, alt: &[u8]) -> Self {
        Self::new(position, position, alt)
    }

    pub fn deletion(start: usize, end: usize) -> Self {
        Self::new(start, end, b"")
    }

    /// Length of the replaced reference interval.
    pub fn ref_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// `None` for an edit that changes nothing (empty interval, empty allele).
    pub fn kind(&self) -> Option<EditKind> {
        match (self.ref_len() > 0, !self.alt.is_empty()) {
            (true, true) => Some(EditKind::Substitution),
            (false, true) => Some(EditKind::Insertion),
            (true, false) => Some(EditKind::Deletion),
            (false, false) => None,
        }
    }
}
