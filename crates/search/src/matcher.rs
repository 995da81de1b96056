use std::ops::Range;

/// Half-open byte range of a match in the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// The current-match move produced by a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentChange {
    pub previous: usize,
    pub current: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    matches: Vec<MatchSpan>,
    current_index: usize,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: Vec<MatchSpan>) -> Self {
        Self {
            matches,
            current_index: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    /// Always 0 when there are no matches.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&MatchSpan> {
        self.matches.get(self.current_index)
    }

    /// One-based position and total, for "N of M" readouts.
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.matches.is_empty() {
            None
        } else {
            Some((self.current_index + 1, self.matches.len()))
        }
    }

    /// Moves the current match to `index`, wrapping in both directions
    /// (`-1` is the last match, `count()` is the first).
    pub fn set_current(&mut self, index: isize) -> Option<CurrentChange> {
        if self.matches.is_empty() {
            return None;
        }

        let len = self.matches.len() as isize;
        let previous = self.current_index;
        self.current_index = index.rem_euclid(len) as usize;
        Some(CurrentChange {
            previous,
            current: self.current_index,
        })
    }

    /// Moves `delta` matches from the current one, wrapping; any `delta` is
    /// accepted.
    pub fn step(&mut self, delta: isize) -> Option<CurrentChange> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let offset = delta.rem_euclid(len as isize) as usize;
        self.set_current(((self.current_index + offset) % len) as isize)
    }

    pub fn next(&mut self) -> Option<CurrentChange> {
        self.step(1)
    }

    pub fn previous(&mut self) -> Option<CurrentChange> {
        self.step(-1)
    }

    /// Jumps without wrapping; out-of-range indices clamp to the last match.
    pub fn jump_to(&mut self, index: usize) -> Option<&MatchSpan> {
        let last = self.matches.len().checked_sub(1)?;
        self.current_index = index.min(last);
        self.matches.get(self.current_index)
    }

    pub fn match_at(&self, offset: usize) -> Option<usize> {
        self.matches.iter().position(|m| m.contains(offset))
    }
}
