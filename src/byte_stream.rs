use crate::location::Location;
use std::io::Read;
use std::{fmt, io};

/// Defines a single element in the stream: either a code point or the
/// end-of-input sentinel. Once the stream runs out, every further read
/// keeps returning `Eof`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Character {
    /// A preprocessed code point
    Ch(char),
    /// End of input
    Eof,
}

use Character::*;

impl Character {
    pub fn is_eof(&self) -> bool {
        matches!(self, Eof)
    }
}

/// Converts the given character to a char. Eof is converted to 0x0000.
impl From<Character> for char {
    fn from(c: Character) -> Self {
        match c {
            Ch(c) => c,
            Eof => 0x0000 as char,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ch(ch) => write!(f, "{ch}"),
            Eof => write!(f, "EOF"),
        }
    }
}

/// Size of the pushback buffer. No tokenization decision needs more than
/// 3 code points of lookahead, plus one slot for the current character.
const LOOKAHEAD_SLOTS: usize = 4;

/// ByteStream delivers preprocessed code points with position tracking and
/// bounded pushback.
///
/// Preprocessing happens when the input is loaded: FF, CR and CRLF are
/// normalized to LF, and NUL is replaced with U+FFFD. After that, `read`
/// walks the code points one at a time while a small circular buffer of
/// `(character, location)` pairs services `unread`.
pub struct ByteStream {
    /// Preprocessed code points of the whole input
    buffer: Vec<char>,
    /// Next unconsumed index into `buffer`
    buffer_pos: usize,
    /// Position tracker for the next code point pulled from `buffer`
    position: Location,
    /// Circular buffer of recently read characters and their positions
    lookahead: [(Character, Location); LOOKAHEAD_SLOTS],
    /// Index of the current (most recently read) slot
    bufi: usize,
    /// Number of pushed-back entries
    bufn: usize,
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStream {
    /// Create a new empty input stream
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            buffer_pos: 0,
            position: Location::default(),
            lookahead: [(Eof, Location::default()); LOOKAHEAD_SLOTS],
            bufi: 0,
            bufn: 0,
        }
    }

    /// Populates the stream with the contents of the given string
    pub fn read_from_str(&mut self, s: &str) {
        self.buffer = preprocess(s);
        self.reset();
    }

    /// Populates the stream directly from bytes. Ill-formed UTF-8 sequences
    /// surface as U+FFFD.
    pub fn read_from_bytes(&mut self, bytes: &[u8]) {
        self.buffer = preprocess(&String::from_utf8_lossy(bytes));
        self.reset();
    }

    /// Populates the stream with the contents of the given reader
    pub fn read_from_file(&mut self, mut f: impl Read) -> io::Result<()> {
        let mut data = Vec::new();
        f.read_to_end(&mut data)?;
        self.read_from_bytes(&data);
        Ok(())
    }

    fn reset(&mut self) {
        self.buffer_pos = 0;
        self.position = Location::default();
        self.lookahead = [(Eof, Location::default()); LOOKAHEAD_SLOTS];
        self.bufi = 0;
        self.bufn = 0;
    }

    /// Returns true when all code points have been consumed
    pub fn eof(&self) -> bool {
        self.bufn == 0 && self.buffer_pos >= self.buffer.len()
    }

    /// Reads the next code point and advances the position. At the end of
    /// the input this returns `Eof` and the position stops advancing.
    pub fn read(&mut self) -> Character {
        // Pushed-back characters are replayed first.
        if self.bufn > 0 {
            self.bufi = (self.bufi + 1) % LOOKAHEAD_SLOTS;
            self.bufn -= 1;
            return self.lookahead[self.bufi].0;
        }

        let ch = if self.buffer_pos < self.buffer.len() {
            let c = self.buffer[self.buffer_pos];
            self.buffer_pos += 1;
            self.position.advance(c);
            Ch(c)
        } else {
            Eof
        };

        self.bufi = (self.bufi + 1) % LOOKAHEAD_SLOTS;
        self.lookahead[self.bufi] = (ch, self.position);
        ch
    }

    /// Restores the previous `n` code points. At most 3 may be outstanding
    /// at any time.
    pub fn unread(&mut self, n: usize) {
        for _ in 0..n {
            self.bufi = (self.bufi + LOOKAHEAD_SLOTS - 1) % LOOKAHEAD_SLOTS;
            self.bufn += 1;
        }
    }

    /// Returns the most recently read character without advancing
    pub fn current(&self) -> Character {
        self.lookahead[self.bufi].0
    }

    /// Returns the source position of the current character
    pub fn location(&self) -> Location {
        self.lookahead[self.bufi].1
    }
}

/// Applies the character-level preprocessing: CRLF, CR and FF become LF,
/// and NUL becomes U+FFFD.
fn preprocess(s: &str) -> Vec<char> {
    s.replace("\u{000D}\u{000A}", "\u{000A}")
        .replace('\u{000D}', "\u{000A}")
        .replace('\u{000C}', "\u{000A}")
        .replace('\u{0000}', "\u{FFFD}")
        .chars()
        .collect()
}
