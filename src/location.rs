use core::fmt::{Debug, Formatter};

/// Location holds the position of an element in the source text.
///
/// Both line and column are zero-based. The column is advanced on every
/// consumed code point and reset to zero by a newline, so the first code
/// point of a line sits at column 1.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    line: u32,
    column: u32,
}

impl Location {
    /// Create a new Location
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Advances the location over a single consumed code point.
    pub(crate) fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut loc = Location::default();
        assert_eq!(loc, Location::new(0, 0));

        loc.advance('a');
        assert_eq!(loc, Location::new(0, 1));
        loc.advance('b');
        assert_eq!(loc, Location::new(0, 2));
        loc.advance('\n');
        assert_eq!(loc, Location::new(1, 0));
        loc.advance('c');
        assert_eq!(loc, Location::new(1, 1));
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Location::new(3, 14)), "(3:14)");
    }
}
