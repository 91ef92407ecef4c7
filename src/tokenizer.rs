use crate::byte_stream::{ByteStream, Character, Character::Ch};
use crate::errors::{ErrorList, SyntaxError};
use crate::location::Location;
use crate::tokens::{HashKind, NumberKind, Token, TokenKind};
use log::trace;

/// CSS tokenizer according to the [w3 specification](https://www.w3.org/TR/css-syntax-3/#tokenization).
///
/// The tokenizer pulls preprocessed code points from a [`ByteStream`] and
/// emits [`Token`]s one at a time, ending with an endless run of `Eof`.
/// Malformed input never fails a scan: it produces `BadString`, `BadUrl`
/// or a delim token and records the problem on `errors`.
pub struct Tokenizer<'stream> {
    stream: &'stream mut ByteStream,
    /// Non-fatal errors recorded while scanning.
    pub errors: ErrorList,
    /// Last token handed out, replayed after `unscan`.
    current: Token,
    pushback: bool,
}

impl<'stream> Tokenizer<'stream> {
    pub fn new(stream: &'stream mut ByteStream) -> Tokenizer<'stream> {
        Tokenizer {
            stream,
            errors: ErrorList::new(),
            current: Token::new(TokenKind::Eof, Location::default()),
            pushback: false,
        }
    }

    /// Returns the next token. After `unscan` the previous token is
    /// handed out once more.
    pub fn scan(&mut self) -> Token {
        if self.pushback {
            self.pushback = false;
            return self.current.clone();
        }

        let token = self.next_token();
        self.current = token.clone();
        token
    }

    /// Pushes the last scanned token back onto the stream.
    pub fn unscan(&mut self) {
        self.pushback = true;
    }

    /// Returns the last scanned token.
    pub fn current(&self) -> Token {
        self.current.clone()
    }

    /// 4.3.1. [Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn next_token(&mut self) -> Token {
        loop {
            let ch = self.stream.read();
            let pos = self.stream.location();

            return match ch {
                Character::Eof => Token::new(TokenKind::Eof, pos),
                ch if is_whitespace(ch) => self.scan_whitespace(),
                Ch('"' | '\'') => self.scan_string(),
                Ch('#') => self.scan_hash(),
                Ch('$') => {
                    if self.stream.read() == Ch('=') {
                        return Token::new(TokenKind::SuffixMatch, pos);
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('$'), pos)
                }
                Ch('*') => {
                    if self.stream.read() == Ch('=') {
                        return Token::new(TokenKind::SubstringMatch, pos);
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('*'), pos)
                }
                Ch('^') => {
                    if self.stream.read() == Ch('=') {
                        return Token::new(TokenKind::PrefixMatch, pos);
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('^'), pos)
                }
                Ch('~') => {
                    if self.stream.read() == Ch('=') {
                        return Token::new(TokenKind::IncludeMatch, pos);
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('~'), pos)
                }
                Ch(',') => Token::new(TokenKind::Comma, pos),
                Ch('-') => {
                    // Two code points of lookahead decide between a number,
                    // an identifier, a CDC and a lone delim.
                    let (ch1, ch2) = (self.stream.read(), self.stream.read());
                    self.stream.unread(2);

                    if is_digit(ch1) || (ch1 == Ch('.') && is_digit(ch2)) {
                        self.stream.unread(1);
                        self.scan_numeric(pos)
                    } else if self.peek_ident() {
                        self.scan_ident()
                    } else if ch1 == Ch('-') && ch2 == Ch('>') {
                        self.stream.read();
                        self.stream.read();
                        Token::new(TokenKind::Cdc, pos)
                    } else {
                        Token::new(TokenKind::Delim('-'), pos)
                    }
                }
                Ch('/') => {
                    // Comments are skipped by the tokenizer, so restart the
                    // dispatch after the closing "*/".
                    if self.stream.read() == Ch('*') {
                        self.scan_comment();
                        continue;
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('/'), pos)
                }
                Ch(':') => Token::new(TokenKind::Colon, pos),
                Ch(';') => Token::new(TokenKind::Semicolon, pos),
                Ch('<') => {
                    // Attempt to read a comment open ("<!--"), rolling back
                    // to a plain delim when it does not pan out.
                    if self.stream.read() == Ch('!') {
                        if self.stream.read() == Ch('-') {
                            if self.stream.read() == Ch('-') {
                                return Token::new(TokenKind::Cdo, pos);
                            }
                            self.stream.unread(1);
                        }
                        self.stream.unread(1);
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('<'), pos)
                }
                Ch('@') => {
                    // An at-keyword requires an identifier to follow.
                    self.stream.read();
                    if self.peek_ident() {
                        return Token::new(TokenKind::AtKeyword(self.scan_name()), pos);
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('@'), pos)
                }
                Ch('(') => Token::new(TokenKind::LParen, pos),
                Ch(')') => Token::new(TokenKind::RParen, pos),
                Ch('[') => Token::new(TokenKind::LBracket, pos),
                Ch(']') => Token::new(TokenKind::RBracket, pos),
                Ch('{') => Token::new(TokenKind::LCurly, pos),
                Ch('}') => Token::new(TokenKind::RCurly, pos),
                Ch('\\') => {
                    if self.peek_escape() {
                        return self.scan_ident();
                    }
                    self.errors.push(SyntaxError::new("unescaped \\", pos));
                    Token::new(TokenKind::Delim('\\'), pos)
                }
                Ch(c @ ('+' | '.')) => {
                    let (ch1, ch2) = (self.stream.read(), self.stream.read());
                    self.stream.unread(2);

                    if is_digit(ch1) || (c == '+' && ch1 == Ch('.') && is_digit(ch2)) {
                        self.stream.unread(1);
                        return self.scan_numeric(pos);
                    }
                    Token::new(TokenKind::Delim(c), pos)
                }
                ch if is_digit(ch) => {
                    self.stream.unread(1);
                    self.scan_numeric(pos)
                }
                Ch('u' | 'U') => {
                    // Peek "+" followed by a hex digit or "?"; anything else
                    // is reconsumed as an identifier.
                    let (ch1, ch2) = (self.stream.read(), self.stream.read());
                    if ch1 == Ch('+') && (is_hex_digit(ch2) || ch2 == Ch('?')) {
                        self.stream.unread(1);
                        return self.scan_unicode_range(pos);
                    }
                    self.stream.unread(2);
                    self.scan_ident()
                }
                ch if is_name_start(ch) => self.scan_ident(),
                Ch('|') => {
                    let ch1 = self.stream.read();
                    if ch1 == Ch('=') {
                        return Token::new(TokenKind::DashMatch, pos);
                    } else if ch1 == Ch('|') {
                        return Token::new(TokenKind::Column, pos);
                    }
                    self.stream.unread(1);
                    Token::new(TokenKind::Delim('|'), pos)
                }
                Ch(c) => Token::new(TokenKind::Delim(c), pos),
            };
        }
    }

    /// Consumes the current code point and all subsequent whitespace.
    fn scan_whitespace(&mut self) -> Token {
        let pos = self.stream.location();
        let mut value = String::new();
        value.push(self.stream.current().into());

        loop {
            let ch = self.stream.read();
            if ch.is_eof() {
                break;
            } else if !is_whitespace(ch) {
                self.stream.unread(1);
                break;
            }
            value.push(ch.into());
        }

        Token::new(TokenKind::Whitespace(value), pos)
    }

    /// 4.3.5. [Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Consumes code points and escapes up to a matching unescaped ending
    /// quote. EOF closes the string without an error; a bare newline closes
    /// it as a `BadString` and is left unread.
    fn scan_string(&mut self) -> Token {
        let pos = self.stream.location();
        let ending: char = self.stream.current().into();
        let mut value = String::new();

        loop {
            match self.stream.read() {
                Character::Eof => return Token::new(TokenKind::QuotedString { value, ending }, pos),
                Ch(c) if c == ending => {
                    return Token::new(TokenKind::QuotedString { value, ending }, pos)
                }
                Ch('\n') => {
                    self.stream.unread(1);
                    return Token::new(TokenKind::BadString, pos);
                }
                Ch('\\') => match self.stream.read() {
                    // A backslash at the very end of the input is dropped.
                    Character::Eof => {}
                    Ch('\n') => value.push('\n'),
                    _ => {
                        self.stream.unread(1);
                        value.push(self.scan_escape());
                    }
                },
                Ch(c) => value.push(c),
            }
        }
    }

    /// 4.3.3. [Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    ///
    /// Returns a `Number`, `Percentage` or `Dimension` token. The caller
    /// has already unread the code point that triggered the scan.
    fn scan_numeric(&mut self, pos: Location) -> Token {
        let (value, kind, repr) = self.scan_number();

        // A trailing identifier turns the number into a dimension.
        self.stream.read();
        if self.peek_ident() {
            let unit = self.scan_name();
            let repr = repr + &unit;
            return Token::new(
                TokenKind::Dimension {
                    value,
                    repr,
                    unit,
                    kind,
                },
                pos,
            );
        }
        self.stream.unread(1);

        if self.stream.read() == Ch('%') {
            return Token::new(
                TokenKind::Percentage {
                    value,
                    repr: repr + "%",
                    kind,
                },
                pos,
            );
        }
        self.stream.unread(1);

        Token::new(TokenKind::Number { value, repr, kind }, pos)
    }

    /// 4.3.12. [Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// A partial exponent ("100E", "100E+") is not part of the number; its
    /// code points are left in the stream and end up as a dimension unit.
    fn scan_number(&mut self) -> (f64, NumberKind, String) {
        let mut repr = String::new();
        let mut kind = NumberKind::Integer;

        let ch = self.stream.read();
        if ch == Ch('+') || ch == Ch('-') {
            repr.push(ch.into());
        } else {
            self.stream.unread(1);
        }

        repr.push_str(&self.scan_digits());

        // A full stop only belongs to the number when a digit follows.
        let ch0 = self.stream.read();
        if ch0 == Ch('.') {
            let ch1 = self.stream.read();
            if is_digit(ch1) {
                kind = NumberKind::Number;
                repr.push('.');
                repr.push(ch1.into());
                repr.push_str(&self.scan_digits());
            } else {
                self.stream.unread(2);
            }
        } else {
            self.stream.unread(1);
        }

        // Scientific notation (e0, e+0, e-0, E0, E+0, E-0).
        let ch0 = self.stream.read();
        if ch0 == Ch('e') || ch0 == Ch('E') {
            let ch1 = self.stream.read();
            if ch1 == Ch('+') || ch1 == Ch('-') {
                let ch2 = self.stream.read();
                if is_digit(ch2) {
                    kind = NumberKind::Number;
                    repr.push(ch0.into());
                    repr.push(ch1.into());
                    repr.push(ch2.into());
                    repr.push_str(&self.scan_digits());
                } else {
                    self.stream.unread(3);
                }
            } else if is_digit(ch1) {
                kind = NumberKind::Number;
                repr.push(ch0.into());
                repr.push(ch1.into());
                repr.push_str(&self.scan_digits());
            } else {
                self.stream.unread(2);
            }
        } else {
            self.stream.unread(1);
        }

        let value = repr.parse().unwrap_or(0.0);
        (value, kind, repr)
    }

    /// Consumes a contiguous run of digits.
    fn scan_digits(&mut self) -> String {
        let mut digits = String::new();
        loop {
            let ch = self.stream.read();
            if is_digit(ch) {
                digits.push(ch.into());
            } else {
                self.stream.unread(1);
                return digits;
            }
        }
    }

    /// 4.3.2. [Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Consumes everything up to and including "*/"; an unclosed comment
    /// runs to EOF.
    fn scan_comment(&mut self) {
        loop {
            let ch = self.stream.read();
            if ch.is_eof() {
                return;
            }
            if ch == Ch('*') {
                if self.stream.read() == Ch('/') {
                    return;
                }
                self.stream.unread(1);
            }
        }
    }

    /// Consumes a hash token.
    ///
    /// A name or valid escape after the `#` makes a hash token, anything
    /// else a delim. The kind flag is `Id` when the name forms a proper
    /// identifier.
    fn scan_hash(&mut self) -> Token {
        let pos = self.stream.location();

        let ch = self.stream.read();
        if is_name(ch) || self.peek_escape() {
            let kind = if self.peek_ident() {
                HashKind::Id
            } else {
                HashKind::Unrestricted
            };
            return Token::new(
                TokenKind::Hash {
                    value: self.scan_name(),
                    kind,
                },
                pos,
            );
        }
        self.stream.unread(1);

        Token::new(TokenKind::Delim('#'), pos)
    }

    /// 4.3.11. [Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Consumes contiguous name code points and escapes. The caller sits
    /// on the first code point of the name.
    fn scan_name(&mut self) -> String {
        let mut value = String::new();
        self.stream.unread(1);
        loop {
            let ch = self.stream.read();
            if is_name(ch) {
                value.push(ch.into());
            } else if self.peek_escape() {
                value.push(self.scan_escape());
            } else {
                self.stream.unread(1);
                return value;
            }
        }
    }

    /// 4.3.4. [Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// Returns an `Ident`, `Function`, `Url` or `BadUrl` token.
    fn scan_ident(&mut self) -> Token {
        let pos = self.stream.location();
        let value = self.scan_name();

        if value.eq_ignore_ascii_case("url") {
            if self.stream.read() == Ch('(') {
                return self.scan_url(pos);
            }
            self.stream.unread(1);
        } else if self.stream.read() == Ch('(') {
            return Token::new(TokenKind::Function(value), pos);
        } else {
            self.stream.unread(1);
        }

        Token::new(TokenKind::Ident(value), pos)
    }

    /// 4.3.6. [Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// The "url(" has just been consumed. A quoted body takes its value
    /// from a string token; an unquoted body accumulates printable code
    /// points and escapes until the closing parenthesis.
    fn scan_url(&mut self, pos: Location) -> Token {
        // Whitespace after the "(" is not part of the value.
        if is_whitespace(self.stream.read()) {
            self.scan_whitespace();
        } else {
            self.stream.unread(1);
        }

        let ch = self.stream.read();
        if ch.is_eof() {
            return Token::new(TokenKind::Url(String::new()), pos);
        }
        if ch == Ch('"') || ch == Ch('\'') {
            let value = match self.scan_string().kind {
                TokenKind::QuotedString { value, .. } => value,
                // A bad string spoils the whole url.
                _ => {
                    self.scan_bad_url();
                    return Token::new(TokenKind::BadUrl, pos);
                }
            };

            // Optional whitespace, then the required closing parenthesis.
            if is_whitespace(self.stream.read()) {
                self.scan_whitespace();
            } else {
                self.stream.unread(1);
            }

            let ch = self.stream.read();
            if ch != Ch(')') && !ch.is_eof() {
                self.scan_bad_url();
                return Token::new(TokenKind::BadUrl, pos);
            }
            return Token::new(TokenKind::Url(value), pos);
        }
        self.stream.unread(1);

        let mut value = String::new();
        loop {
            let ch = self.stream.read();
            match ch {
                Ch(')') | Character::Eof => return Token::new(TokenKind::Url(value), pos),
                ch if is_whitespace(ch) => {
                    // Whitespace ends the value when ")" or EOF follows.
                    self.scan_whitespace();
                    let ch0 = self.stream.read();
                    if ch0 == Ch(')') || ch0.is_eof() {
                        return Token::new(TokenKind::Url(value), pos);
                    }
                    self.scan_bad_url();
                    return Token::new(TokenKind::BadUrl, pos);
                }
                Ch('\\') => {
                    if self.peek_escape() {
                        value.push(self.scan_escape());
                    } else {
                        self.errors.push(SyntaxError::new(
                            "unescaped \\ in url",
                            self.stream.location(),
                        ));
                        self.scan_bad_url();
                        return Token::new(TokenKind::BadUrl, pos);
                    }
                }
                Ch(c) if c == '"' || c == '\'' || c == '(' || is_non_printable(ch) => {
                    self.errors.push(SyntaxError::new(
                        format!("invalid url code point: {} (U+{:04X})", c, c as u32),
                        pos,
                    ));
                    self.scan_bad_url();
                    return Token::new(TokenKind::BadUrl, pos);
                }
                Ch(c) => value.push(c),
            }
        }
    }

    /// 4.3.14. [Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    ///
    /// Consumes up to the recovery point where normal tokenizing resumes.
    /// Escapes are resolved so an escaped ")" does not end the recovery.
    fn scan_bad_url(&mut self) {
        trace!("bad url recovery at {:?}", self.stream.location());
        loop {
            let ch = self.stream.read();
            if ch == Ch(')') || ch.is_eof() {
                return;
            }
            if self.peek_escape() {
                self.scan_escape();
            }
        }
    }

    /// Consumes a unicode-range token. The "u+" has been consumed; `pos`
    /// is the position of the leading "u".
    fn scan_unicode_range(&mut self, pos: Location) -> Token {
        // Up to 6 hex digits first.
        let mut digits = String::new();
        for _ in 0..6 {
            let ch = self.stream.read();
            if is_hex_digit(ch) {
                digits.push(ch.into());
            } else {
                self.stream.unread(1);
                break;
            }
        }

        // Question marks may pad the first group to 6 characters.
        let n = digits.len();
        for _ in 0..6 - n {
            let ch = self.stream.read();
            if ch == Ch('?') {
                digits.push('?');
            } else {
                self.stream.unread(1);
                break;
            }
        }

        // Wildcards expand to the smallest and largest code points they
        // cover: "?" becomes "0" for the start and "F" for the end.
        if digits.len() > n {
            let start = u32::from_str_radix(&digits.replace('?', "0"), 16).unwrap_or(0);
            let end = u32::from_str_radix(&digits.replace('?', "F"), 16).unwrap_or(0);
            return Token::new(TokenKind::UnicodeRange { start, end }, pos);
        }

        let start = u32::from_str_radix(&digits, 16).unwrap_or(0);

        // A "-" followed by a hex digit introduces the end of the range.
        let (ch1, ch2) = (self.stream.read(), self.stream.read());
        if ch1 == Ch('-') && is_hex_digit(ch2) {
            self.stream.unread(1);

            let mut digits = String::new();
            for _ in 0..6 {
                let ch = self.stream.read();
                if is_hex_digit(ch) {
                    digits.push(ch.into());
                } else {
                    self.stream.unread(1);
                    break;
                }
            }
            let end = u32::from_str_radix(&digits, 16).unwrap_or(0);
            return Token::new(TokenKind::UnicodeRange { start, end }, pos);
        }
        self.stream.unread(2);

        Token::new(TokenKind::UnicodeRange { start, end: start }, pos)
    }

    /// 4.3.7. [Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// The backslash has been consumed. One to six hex digits name a code
    /// point (one trailing whitespace is consumed along with them); any
    /// other code point is taken literally. A backslash at EOF yields
    /// U+FFFD.
    fn scan_escape(&mut self) -> char {
        let ch = self.stream.read();
        if is_hex_digit(ch) {
            let mut digits = String::new();
            digits.push(ch.into());
            while digits.len() < 6 {
                let next = self.stream.read();
                if is_hex_digit(next) {
                    digits.push(next.into());
                } else {
                    self.stream.unread(1);
                    break;
                }
            }
            if !is_whitespace(self.stream.read()) {
                self.stream.unread(1);
            }

            let value = u32::from_str_radix(&digits, 16).unwrap_or(0);
            return match char::from_u32(value) {
                Some(c) if value != 0 => c,
                // NUL, surrogates and out-of-range values are sanitized.
                _ => '\u{FFFD}',
            };
        }
        if ch.is_eof() {
            return '\u{FFFD}';
        }
        ch.into()
    }

    /// 4.3.8. [Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    ///
    /// The current code point must be a backslash not followed by a
    /// newline.
    fn peek_escape(&mut self) -> bool {
        if self.stream.current() != Ch('\\') {
            return false;
        }

        let next = self.stream.read();
        self.stream.unread(1);
        next != Ch('\n')
    }

    /// 4.3.9. [Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// Checks whether the current code point begins an identifier.
    fn peek_ident(&mut self) -> bool {
        match self.stream.current() {
            Ch('-') => {
                let ch = self.stream.read();
                let ok = is_name_start(ch) || self.peek_escape();
                self.stream.unread(1);
                ok
            }
            Ch('\\') => self.peek_escape(),
            ch => is_name_start(ch),
        }
    }
}

/// Returns true for a space, tab or newline.
fn is_whitespace(ch: Character) -> bool {
    matches!(ch, Ch(' ' | '\t' | '\n'))
}

fn is_digit(ch: Character) -> bool {
    matches!(ch, Ch(c) if c.is_ascii_digit())
}

fn is_hex_digit(ch: Character) -> bool {
    matches!(ch, Ch(c) if c.is_ascii_hexdigit())
}

/// Returns true for a letter, a non-ASCII code point or an underscore.
fn is_name_start(ch: Character) -> bool {
    matches!(ch, Ch(c) if c.is_ascii_alphabetic() || !c.is_ascii() || c == '_')
}

/// Returns true for a name code point.
fn is_name(ch: Character) -> bool {
    is_name_start(ch) || is_digit(ch) || ch == Ch('-')
}

/// Returns true for the non-printable code points that spoil an unquoted
/// url body.
fn is_non_printable(ch: Character) -> bool {
    matches!(
        ch,
        Ch('\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000E}'..='\u{001F}' | '\u{007F}')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_first(input: &str) -> (Token, ErrorList) {
        let mut stream = ByteStream::new();
        stream.read_from_str(input);
        let mut tokenizer = Tokenizer::new(&mut stream);
        let token = tokenizer.scan();
        (token, tokenizer.errors.clone())
    }

    fn scan_all(input: &str) -> Vec<TokenKind> {
        let mut stream = ByteStream::new();
        stream.read_from_str(input);
        let mut tokenizer = Tokenizer::new(&mut stream);
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.scan();
            let eof = token.is_eof();
            kinds.push(token.kind);
            if eof {
                return kinds;
            }
        }
    }

    use HashKind::{Id, Unrestricted};
    use NumberKind::{Integer, Number};
    use TokenKind::*;

    fn string(value: &str, ending: char) -> TokenKind {
        QuotedString {
            value: value.to_string(),
            ending,
        }
    }

    fn number(value: f64, repr: &str, kind: NumberKind) -> TokenKind {
        TokenKind::Number {
            value,
            repr: repr.to_string(),
            kind,
        }
    }

    fn percentage(value: f64, repr: &str, kind: NumberKind) -> TokenKind {
        TokenKind::Percentage {
            value,
            repr: repr.to_string(),
            kind,
        }
    }

    fn dimension(value: f64, repr: &str, unit: &str, kind: NumberKind) -> TokenKind {
        TokenKind::Dimension {
            value,
            repr: repr.to_string(),
            unit: unit.to_string(),
            kind,
        }
    }

    fn hash(value: &str, kind: HashKind) -> TokenKind {
        TokenKind::Hash {
            value: value.to_string(),
            kind,
        }
    }

    #[test]
    fn scan_simple_tokens() {
        let tests = vec![
            ("", Eof),
            ("   ", Whitespace("   ".to_string())),
            ("\t\n ", Whitespace("\t\n ".to_string())),
            (",", Comma),
            (":", Colon),
            (";", Semicolon),
            ("(", LParen),
            (")", RParen),
            ("[", LBracket),
            ("]", RBracket),
            ("{", LCurly),
            ("}", RCurly),
            ("$=", SuffixMatch),
            ("$X", Delim('$')),
            ("$", Delim('$')),
            ("*=", SubstringMatch),
            ("*X", Delim('*')),
            ("*", Delim('*')),
            ("^=", PrefixMatch),
            ("^X", Delim('^')),
            ("^", Delim('^')),
            ("~=", IncludeMatch),
            ("~X", Delim('~')),
            ("~", Delim('~')),
            ("|=", DashMatch),
            ("||", Column),
            ("|X", Delim('|')),
            ("|", Delim('|')),
            ("<", Delim('<')),
            ("<!", Delim('<')),
            ("<!-", Delim('<')),
            ("<!--", Cdo),
            ("-->", Cdc),
            ("/", Delim('/')),
            ("=", Delim('=')),
        ];

        for (input, expected) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
            assert!(errors.is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn scan_strings() {
        let tests = vec![
            (r#""""#, string("", '"')),
            (r#"""#, string("", '"')),
            (r#""foo"#, string("foo", '"')),
            (r#""hello world""#, string("hello world", '"')),
            ("'hello world'", string("hello world", '\'')),
            ("'foo\\\nbar'", string("foo\nbar", '\'')),
            (r"'foo\ bar'", string("foo bar", '\'')),
            (r"'foo\\bar'", string("foo\\bar", '\'')),
            (r"'frosty the \2603'", string("frosty the \u{2603}", '\'')),
            ("'foo\nbar'", BadString),
            // a backslash at the end of the input is dropped
            ("\"foo\\", string("foo", '"')),
        ];

        for (input, expected) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
            assert!(errors.is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn bad_string_leaves_newline_unread() {
        let kinds = scan_all("'foo\nbar'");
        assert_eq!(
            kinds,
            vec![
                BadString,
                Whitespace("\n".to_string()),
                Ident("bar".to_string()),
                string("", '\''),
                Eof,
            ]
        );
    }

    #[test]
    fn scan_numbers() {
        let tests = vec![
            ("0", number(0.0, "0", Integer)),
            ("1.0", number(1.0, "1.0", Number)),
            ("1.123", number(1.123, "1.123", Number)),
            (".001", number(0.001, ".001", Number)),
            ("-.001", number(-0.001, "-.001", Number)),
            ("10000", number(10000.0, "10000", Integer)),
            ("10000.", number(10000.0, "10000", Integer)),
            ("100E", dimension(100.0, "100E", "E", Integer)),
            ("100E+", dimension(100.0, "100E", "E", Integer)),
            ("100E-", dimension(100.0, "100E-", "E-", Integer)),
            ("1E2", number(100.0, "1E2", Number)),
            ("1e10", number(1e10, "1e10", Number)),
            ("1.5E2", number(150.0, "1.5E2", Number)),
            ("1.5E+2", number(150.0, "1.5E+2", Number)),
            ("1.5E-2", number(0.015, "1.5E-2", Number)),
            ("1.5E-25", number(1.5e-25, "1.5E-25", Number)),
            ("+100", number(100.0, "+100", Integer)),
            ("+1.0", number(1.0, "+1.0", Number)),
            ("+.5", number(0.5, "+.5", Number)),
            ("-100", number(-100.0, "-100", Integer)),
            ("-1.0", number(-1.0, "-1.0", Number)),
            ("-", Delim('-')),
            ("-.x", Delim('-')),
            (".x", Delim('.')),
            ("+x", Delim('+')),
            ("100em", dimension(100.0, "100em", "em", Integer)),
            ("-1.2in", dimension(-1.2, "-1.2in", "in", Number)),
            ("100%", percentage(100.0, "100%", Integer)),
            ("-0.2%", percentage(-0.2, "-0.2%", Number)),
        ];

        for (input, expected) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
            assert!(errors.is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn scan_idents() {
        let tests = vec![
            ("url", Ident("url".to_string())),
            ("myIdent", Ident("myIdent".to_string())),
            ("-x", Ident("-x".to_string())),
            ("--", Delim('-')),
            (r"my\2603", Ident("my\u{2603}".to_string())),
            (r"\2603", Ident("\u{2603}".to_string())),
            (r"\", Ident("\u{FFFD}".to_string())),
            (r"\ ", Ident(" ".to_string())),
            ("myFunc(", Function("myFunc".to_string())),
            ("rotateX(", Function("rotateX".to_string())),
        ];

        for (input, expected) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
            assert!(errors.is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn unescaped_backslash_is_an_error() {
        let (token, errors) = scan_first("\\\n");
        assert_eq!(token.kind, Delim('\\'));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().unwrap().message, "unescaped \\");
    }

    #[test]
    fn scan_urls() {
        let tests = vec![
            ("url(", Url("".to_string())),
            ("url(foo", Url("foo".to_string())),
            (
                "url(http://foo.com#bar?baz=bat)",
                Url("http://foo.com#bar?baz=bat".to_string()),
            ),
            ("url(  foo", Url("foo".to_string())),
            ("url(  foo  ", Url("foo".to_string())),
            (r"url(  \2603  )", Url("\u{2603}".to_string())),
            (r"url(  \2603  ", Url("\u{2603}".to_string())),
            ("url(foo)", Url("foo".to_string())),
            ("URL(foo)", Url("foo".to_string())),
            (
                r#"url("http://foo.com#bar?baz=bat")"#,
                Url("http://foo.com#bar?baz=bat".to_string()),
            ),
            (r#"url(  "foo"  "#, Url("foo".to_string())),
            (r#"url("foo"  "#, Url("foo".to_string())),
            (r#"url("foo")"#, Url("foo".to_string())),
            (r#"url("foo"  )"#, Url("foo".to_string())),
            (r#"url("foo"x"#, BadUrl),
            (r#"url("foo" x"#, BadUrl),
        ];

        for (input, expected) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
            assert!(errors.is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn scan_bad_urls() {
        let tests = vec![
            (r#"url(foo""#, "invalid url code point: \" (U+0022)"),
            ("url(foo'", "invalid url code point: ' (U+0027)"),
            ("url(foo(", "invalid url code point: ( (U+0028)"),
            ("url(foo\u{1}", "invalid url code point: \u{1} (U+0001)"),
            ("url(foo\\\n", "unescaped \\ in url"),
        ];

        for (input, message) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, BadUrl, "input: {:?}", input);
            assert_eq!(errors.len(), 1, "input: {:?}", input);
            assert_eq!(errors.first().unwrap().message, message, "input: {:?}", input);
        }
    }

    #[test]
    fn bad_url_recovery_resumes_after_paren() {
        // The escaped ")" must not end the recovery; the bare one does.
        let kinds = scan_all("url(foo(\\))x");
        assert_eq!(kinds, vec![BadUrl, Ident("x".to_string()), Eof]);
    }

    #[test]
    fn scan_unicode_ranges() {
        let tests = vec![
            ("u+A", UnicodeRange { start: 10, end: 10 }),
            ("u+00000A", UnicodeRange { start: 10, end: 10 }),
            ("u+000000A", UnicodeRange { start: 0, end: 0 }),
            ("u+1?", UnicodeRange { start: 16, end: 31 }),
            ("u+1?F", UnicodeRange { start: 16, end: 31 }),
            ("U+0-7F", UnicodeRange { start: 0, end: 127 }),
            ("u+02-04", UnicodeRange { start: 2, end: 4 }),
            ("u+02-04?", UnicodeRange { start: 2, end: 4 }),
            ("u+02-0000004", UnicodeRange { start: 2, end: 0 }),
            (
                "u+??????",
                UnicodeRange {
                    start: 0,
                    end: 0xFFFFFF,
                },
            ),
            // not a range at all
            ("u", Ident("u".to_string())),
            ("user", Ident("user".to_string())),
            ("u+x", Ident("u".to_string())),
        ];

        for (input, expected) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
            assert!(errors.is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn scan_hashes() {
        let tests = vec![
            ("#foo", hash("foo", Id)),
            (r"#foo\2603 bar", hash("foo\u{2603}bar", Id)),
            ("#-x", hash("-x", Id)),
            ("#_x", hash("_x", Id)),
            ("#18273", hash("18273", Unrestricted)),
            ("#", Delim('#')),
        ];

        for (input, expected) in tests {
            let (token, errors) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
            assert!(errors.is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn scan_at_keywords() {
        let tests = vec![
            ("@", Delim('@')),
            ("@foo", AtKeyword("foo".to_string())),
            ("@media", AtKeyword("media".to_string())),
            ("@-x", AtKeyword("-x".to_string())),
            ("@1", Delim('@')),
        ];

        for (input, expected) in tests {
            let (token, _) = scan_first(input);
            assert_eq!(token.kind, expected, "input: {:?}", input);
        }
    }

    #[test]
    fn comments_are_skipped() {
        let (token, errors) = scan_first("/* this is * a comment */#");
        assert_eq!(token.kind, Delim('#'));
        assert_eq!(token.location, Location::new(0, 26));
        assert!(errors.is_empty());

        // unterminated comments run to EOF
        let (token, _) = scan_first("/* no end");
        assert_eq!(token.kind, Eof);

        let kinds = scan_all("a/*x*//*y*/b");
        assert_eq!(
            kinds,
            vec![Ident("a".to_string()), Ident("b".to_string()), Eof]
        );
    }

    #[test]
    fn token_positions() {
        let mut stream = ByteStream::new();
        stream.read_from_str("foo bar\nbaz");
        let mut tokenizer = Tokenizer::new(&mut stream);

        let tok = tokenizer.scan();
        assert_eq!(tok.location, Location::new(0, 1));
        let tok = tokenizer.scan();
        assert_eq!(tok.kind, Whitespace(" ".to_string()));
        assert_eq!(tok.location, Location::new(0, 4));
        let tok = tokenizer.scan();
        assert_eq!(tok.kind, Ident("bar".to_string()));
        assert_eq!(tok.location, Location::new(0, 5));
        let tok = tokenizer.scan();
        assert_eq!(tok.kind, Whitespace("\n".to_string()));
        let tok = tokenizer.scan();
        assert_eq!(tok.kind, Ident("baz".to_string()));
        assert_eq!(tok.location, Location::new(1, 1));
    }

    #[test]
    fn unicode_range_position_points_at_leading_u() {
        let mut stream = ByteStream::new();
        stream.read_from_str(" u+1?");
        let mut tokenizer = Tokenizer::new(&mut stream);

        tokenizer.scan(); // whitespace
        let tok = tokenizer.scan();
        assert_eq!(tok.kind, UnicodeRange { start: 16, end: 31 });
        assert_eq!(tok.location, Location::new(0, 2));
    }

    #[test]
    fn unscan_replays_the_last_token() {
        let mut stream = ByteStream::new();
        stream.read_from_str("a b");
        let mut tokenizer = Tokenizer::new(&mut stream);

        let first = tokenizer.scan();
        tokenizer.unscan();
        assert_eq!(tokenizer.scan(), first);
        assert_eq!(tokenizer.current(), first);
        assert_eq!(tokenizer.scan().kind, Whitespace(" ".to_string()));
        assert_eq!(tokenizer.scan().kind, Ident("b".to_string()));
        assert_eq!(tokenizer.scan().kind, Eof);
        assert_eq!(tokenizer.scan().kind, Eof);
    }

    #[test]
    fn scan_token_sequence() {
        let kinds = scan_all("foo { padding: 10px; }");
        assert_eq!(
            kinds,
            vec![
                Ident("foo".to_string()),
                Whitespace(" ".to_string()),
                LCurly,
                Whitespace(" ".to_string()),
                Ident("padding".to_string()),
                Colon,
                Whitespace(" ".to_string()),
                dimension(10.0, "10px", "px", Integer),
                Semicolon,
                Whitespace(" ".to_string()),
                RCurly,
                Eof,
            ]
        );
    }

    #[test]
    fn class_selectors_tokenize() {
        let kinds = scan_all(".nav");
        assert_eq!(kinds, vec![Delim('.'), Ident("nav".to_string()), Eof]);
    }

    #[test]
    fn whitespace_only_input() {
        let kinds = scan_all(" \t\n ");
        assert_eq!(kinds, vec![Whitespace(" \t\n ".to_string()), Eof]);
    }
}
