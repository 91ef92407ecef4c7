use crate::ast::{
    AtRule, ComponentValue, Declaration, DeclarationListItem, Function, QualifiedRule, Rule,
    SimpleBlock, Stylesheet,
};
use crate::errors::{ErrorList, SyntaxError};
use crate::location::Location;
use crate::tokenizer::Tokenizer;
use crate::tokens::{Token, TokenKind};
use log::{debug, trace};

/// A source of component values with one element of pushback.
///
/// Two realizations exist: the tokenizer itself (every token is promoted
/// to a preserved-token component value) and [`ComponentValueStream`],
/// which replays an in-memory list, e.g. a declaration sliced out of a
/// block.
pub trait ComponentValueScanner {
    /// Returns the most recently scanned component value.
    fn current(&self) -> ComponentValue;
    /// Returns the next component value.
    fn scan(&mut self) -> ComponentValue;
    /// Moves back one component value.
    fn unscan(&mut self);
}

impl ComponentValueScanner for Tokenizer<'_> {
    fn current(&self) -> ComponentValue {
        ComponentValue::PreservedToken(Tokenizer::current(self))
    }

    fn scan(&mut self) -> ComponentValue {
        ComponentValue::PreservedToken(Tokenizer::scan(self))
    }

    fn unscan(&mut self) {
        Tokenizer::unscan(self)
    }
}

/// Replays a fixed list of component values.
pub struct ComponentValueStream {
    values: Vec<ComponentValue>,
    /// Count of scanned values; the current value sits at `index - 1`.
    index: usize,
}

impl ComponentValueStream {
    pub fn new(values: Vec<ComponentValue>) -> ComponentValueStream {
        ComponentValueStream { values, index: 0 }
    }

    fn eof(&self) -> ComponentValue {
        let location = self.values.last().map(|v| v.location()).unwrap_or_default();
        ComponentValue::PreservedToken(Token::new(TokenKind::Eof, location))
    }
}

impl ComponentValueScanner for ComponentValueStream {
    fn current(&self) -> ComponentValue {
        if self.index == 0 || self.index > self.values.len() {
            return self.eof();
        }
        self.values[self.index - 1].clone()
    }

    fn scan(&mut self) -> ComponentValue {
        if self.index <= self.values.len() {
            self.index += 1;
        }
        self.current()
    }

    fn unscan(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }
}

/// CSS parser, driving a component-value source through the algorithms of
/// [CSS Syntax §5.4](https://www.w3.org/TR/css-syntax-3/#parser-algorithms).
///
/// Errors are accumulated on `errors` and never abort parsing; an entry
/// point that cannot produce a node returns `None` with the failure
/// recorded.
#[derive(Default)]
pub struct Parser {
    pub errors: ErrorList,
}

impl Parser {
    pub fn new() -> Parser {
        Parser {
            errors: ErrorList::new(),
        }
    }

    /// Parses a complete stylesheet: a top-level list of rules.
    pub fn parse_stylesheet(&mut self, s: &mut dyn ComponentValueScanner) -> Stylesheet {
        debug!("parse_stylesheet()");
        Stylesheet {
            rules: self.consume_rules(s, true),
        }
    }

    /// Parses a non-top-level list of rules.
    pub fn parse_rules(&mut self, s: &mut dyn ComponentValueScanner) -> Vec<Rule> {
        debug!("parse_rules()");
        self.consume_rules(s, false)
    }

    /// Parses exactly one rule. The stream must reach EOF after the rule.
    pub fn parse_rule(&mut self, s: &mut dyn ComponentValueScanner) -> Option<Rule> {
        self.skip_whitespace(s);

        let rule = match s.scan() {
            v if v.is_eof() => {
                self.errors
                    .push(SyntaxError::new("unexpected EOF", v.location()));
                return None;
            }
            ComponentValue::PreservedToken(Token {
                kind: TokenKind::AtKeyword(name),
                location,
            }) => Rule::AtRule(self.consume_at_rule(s, name, location)),
            _ => {
                s.unscan();
                Rule::QualifiedRule(self.consume_qualified_rule(s)?)
            }
        };

        self.skip_whitespace(s);

        let residue = s.scan();
        if !residue.is_eof() {
            self.errors.push(SyntaxError::new(
                format!("expected EOF, got {residue}"),
                residue.location(),
            ));
            return None;
        }

        Some(rule)
    }

    /// Parses a single name/value declaration, which must start with an
    /// identifier.
    pub fn parse_declaration(&mut self, s: &mut dyn ComponentValueScanner) -> Option<Declaration> {
        self.skip_whitespace(s);

        let v = s.scan();
        if !matches!(
            v,
            ComponentValue::PreservedToken(Token {
                kind: TokenKind::Ident(_),
                ..
            })
        ) {
            self.errors.push(SyntaxError::new(
                format!("expected ident, got {v}"),
                v.location(),
            ));
            return None;
        }
        s.unscan();

        self.consume_declaration(s)
    }

    /// Parses a list of declarations and at-rules.
    pub fn parse_declarations(
        &mut self,
        s: &mut dyn ComponentValueScanner,
    ) -> Vec<DeclarationListItem> {
        debug!("parse_declarations()");
        self.consume_declarations(s)
    }

    /// Parses a single component value. The stream must reach EOF after
    /// the value.
    pub fn parse_component_value(
        &mut self,
        s: &mut dyn ComponentValueScanner,
    ) -> Option<ComponentValue> {
        self.skip_whitespace(s);

        let v = s.scan();
        if v.is_eof() {
            self.errors
                .push(SyntaxError::new("unexpected EOF", v.location()));
            return None;
        }
        s.unscan();

        let value = self.consume_component_value(s);

        self.skip_whitespace(s);

        let residue = s.scan();
        if !residue.is_eof() {
            s.unscan();
            self.errors.push(SyntaxError::new(
                format!("expected EOF, got {residue}"),
                residue.location(),
            ));
            return None;
        }

        Some(value)
    }

    /// Parses a list of component values up to EOF.
    pub fn parse_component_values(
        &mut self,
        s: &mut dyn ComponentValueScanner,
    ) -> Vec<ComponentValue> {
        let mut values = Vec::new();
        loop {
            let value = self.consume_component_value(s);
            if value.is_eof() {
                return values;
            }
            values.push(value);
        }
    }

    /// 5.4.1. [Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_rules(&mut self, s: &mut dyn ComponentValueScanner, top_level: bool) -> Vec<Rule> {
        let mut rules = Vec::new();

        loop {
            match s.scan() {
                v if v.is_whitespace() => continue,
                v if v.is_eof() => return rules,
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::Cdo | TokenKind::Cdc,
                    ..
                }) => {
                    // CDO and CDC wrap a top-level stylesheet in an HTML
                    // comment and are skipped there; anywhere else they
                    // start a qualified rule.
                    if top_level {
                        continue;
                    }
                    s.unscan();
                    if let Some(rule) = self.consume_qualified_rule(s) {
                        rules.push(Rule::QualifiedRule(rule));
                    }
                }
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::AtKeyword(name),
                    location,
                }) => {
                    rules.push(Rule::AtRule(self.consume_at_rule(s, name, location)));
                }
                _ => {
                    s.unscan();
                    if let Some(rule) = self.consume_qualified_rule(s) {
                        rules.push(Rule::QualifiedRule(rule));
                    }
                }
            }
        }
    }

    /// 5.4.2. [Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// The at-keyword has already been scanned; the rule ends at a
    /// semicolon, EOF or a `{}`-block.
    fn consume_at_rule(
        &mut self,
        s: &mut dyn ComponentValueScanner,
        name: String,
        location: Location,
    ) -> AtRule {
        trace!("consume_at_rule(@{name})");
        let mut rule = AtRule {
            name,
            prelude: Vec::new(),
            block: None,
            location,
        };

        loop {
            match s.scan() {
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::Semicolon | TokenKind::Eof,
                    ..
                }) => return rule,
                ComponentValue::PreservedToken(
                    token @ Token {
                        kind: TokenKind::LCurly,
                        ..
                    },
                ) => {
                    rule.block = Some(self.consume_simple_block(s, token));
                    return rule;
                }
                // A block assembled by an earlier pass ends the rule as
                // well, so the algorithm runs over replayed values too.
                ComponentValue::SimpleBlock(block) if block.is_brace() => {
                    rule.block = Some(block);
                    return rule;
                }
                _ => {
                    s.unscan();
                    let value = self.consume_component_value(s);
                    rule.prelude.push(value);
                }
            }
        }
    }

    /// 5.4.3. [Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// EOF before the block is an error and yields nothing.
    fn consume_qualified_rule(&mut self, s: &mut dyn ComponentValueScanner) -> Option<QualifiedRule> {
        let mut location: Option<Location> = None;
        let mut prelude = Vec::new();

        loop {
            match s.scan() {
                v if v.is_eof() => {
                    self.errors
                        .push(SyntaxError::new("unexpected EOF", v.location()));
                    return None;
                }
                ComponentValue::PreservedToken(
                    token @ Token {
                        kind: TokenKind::LCurly,
                        ..
                    },
                ) => {
                    let block = self.consume_simple_block(s, token);
                    return Some(QualifiedRule {
                        location: location.unwrap_or(block.associated_token.location),
                        prelude,
                        block,
                    });
                }
                ComponentValue::SimpleBlock(block) if block.is_brace() => {
                    return Some(QualifiedRule {
                        location: location.unwrap_or(block.associated_token.location),
                        prelude,
                        block,
                    });
                }
                _ => {
                    s.unscan();
                    let value = self.consume_component_value(s);
                    if location.is_none() {
                        location = Some(value.location());
                    }
                    prelude.push(value);
                }
            }
        }
    }

    /// 5.4.4. [Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Whitespace and stray semicolons are skipped, at-keywords introduce
    /// nested at-rules and identifiers introduce declarations. Anything
    /// else is an error that skips ahead to the next top-level semicolon.
    fn consume_declarations(&mut self, s: &mut dyn ComponentValueScanner) -> Vec<DeclarationListItem> {
        let mut items = Vec::new();

        loop {
            match s.scan() {
                v if v.is_whitespace() => continue,
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::Semicolon,
                    ..
                }) => continue,
                v if v.is_eof() => return items,
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::AtKeyword(name),
                    location,
                }) => {
                    items.push(DeclarationListItem::AtRule(
                        self.consume_at_rule(s, name, location),
                    ));
                }
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::Ident(_),
                    ..
                }) => {
                    // Slice every component value up to the next top-level
                    // semicolon, then replay the slice as one declaration.
                    s.unscan();
                    let values = self.consume_declaration_values(s);
                    let mut replay = ComponentValueStream::new(values);
                    if let Some(declaration) = self.consume_declaration(&mut replay) {
                        items.push(DeclarationListItem::Declaration(declaration));
                    }
                }
                v => {
                    self.errors
                        .push(SyntaxError::new(format!("unexpected {v}"), v.location()));
                    self.skip_component_values(s);
                }
            }
        }
    }

    /// 5.4.5. [Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// The name comes from the leading identifier, a colon must follow,
    /// and the remainder of the stream becomes the value. A trailing
    /// `!important` (any case) is stripped into the `important` flag.
    fn consume_declaration(&mut self, s: &mut dyn ComponentValueScanner) -> Option<Declaration> {
        let (name, location) = match s.scan() {
            ComponentValue::PreservedToken(Token {
                kind: TokenKind::Ident(name),
                location,
            }) => (name, location),
            _ => return None,
        };

        self.skip_whitespace(s);

        let v = s.scan();
        if !matches!(
            v,
            ComponentValue::PreservedToken(Token {
                kind: TokenKind::Colon,
                ..
            })
        ) {
            self.errors.push(SyntaxError::new(
                format!("expected colon, got {v}"),
                v.location(),
            ));
            return None;
        }

        let mut values = Vec::new();
        loop {
            let v = s.scan();
            if v.is_eof() {
                break;
            }
            s.unscan();
            values.push(self.consume_component_value(s));
        }

        let important = clean_important_flag(&mut values);

        Some(Declaration {
            name,
            values,
            important,
            location,
        })
    }

    /// 5.4.6. [Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self, s: &mut dyn ComponentValueScanner) -> ComponentValue {
        match s.scan() {
            ComponentValue::PreservedToken(
                token @ Token {
                    kind: TokenKind::LCurly | TokenKind::LBracket | TokenKind::LParen,
                    ..
                },
            ) => ComponentValue::SimpleBlock(self.consume_simple_block(s, token)),
            ComponentValue::PreservedToken(Token {
                kind: TokenKind::Function(name),
                location,
            }) => ComponentValue::Function(self.consume_function(s, name, location)),
            v => v,
        }
    }

    /// 5.4.7. [Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// The block ends at the mirror of its opening bracket or at EOF; in
    /// both cases it is complete.
    fn consume_simple_block(&mut self, s: &mut dyn ComponentValueScanner, opener: Token) -> SimpleBlock {
        let mirror = match opener.kind {
            TokenKind::LCurly => TokenKind::RCurly,
            TokenKind::LBracket => TokenKind::RBracket,
            _ => TokenKind::RParen,
        };

        let mut block = SimpleBlock::new(opener);
        loop {
            match s.scan() {
                v if v.is_eof() => return block,
                ComponentValue::PreservedToken(token) if token.kind == mirror => return block,
                _ => {
                    s.unscan();
                    let value = self.consume_component_value(s);
                    block.values.push(value);
                }
            }
        }
    }

    /// 5.4.8. [Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    fn consume_function(
        &mut self,
        s: &mut dyn ComponentValueScanner,
        name: String,
        location: Location,
    ) -> Function {
        let mut function = Function::new(name, location);
        loop {
            match s.scan() {
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::Eof | TokenKind::RParen,
                    ..
                }) => return function,
                _ => {
                    s.unscan();
                    let value = self.consume_component_value(s);
                    function.values.push(value);
                }
            }
        }
    }

    /// Collects the component values of one declaration, up to (but not
    /// including) the next semicolon at this nesting level, or EOF.
    fn consume_declaration_values(&mut self, s: &mut dyn ComponentValueScanner) -> Vec<ComponentValue> {
        let mut values = Vec::new();
        loop {
            match s.scan() {
                ComponentValue::PreservedToken(Token {
                    kind: TokenKind::Semicolon | TokenKind::Eof,
                    ..
                }) => {
                    s.unscan();
                    return values;
                }
                _ => {
                    s.unscan();
                    values.push(self.consume_component_value(s));
                }
            }
        }
    }

    /// Skips component values until a semicolon or EOF at this nesting
    /// level; used to resynchronize after a declaration error.
    fn skip_component_values(&mut self, s: &mut dyn ComponentValueScanner) {
        loop {
            let v = self.consume_component_value(s);
            if let ComponentValue::PreservedToken(Token {
                kind: TokenKind::Semicolon | TokenKind::Eof,
                ..
            }) = v
            {
                return;
            }
        }
    }

    /// Skips a contiguous run of whitespace tokens.
    fn skip_whitespace(&mut self, s: &mut dyn ComponentValueScanner) {
        loop {
            let v = s.scan();
            if !v.is_whitespace() {
                s.unscan();
                return;
            }
        }
    }
}

/// Checks whether the last two non-whitespace values are a `!` delim
/// followed by an `important` identifier (any case). If so, both are
/// removed together with the whitespace between and after them, and true
/// is returned.
fn clean_important_flag(values: &mut Vec<ComponentValue>) -> bool {
    let nonwhitespace: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_whitespace())
        .map(|(i, _)| i)
        .collect();
    if nonwhitespace.len() < 2 {
        return false;
    }

    let bang = nonwhitespace[nonwhitespace.len() - 2];
    let ident = nonwhitespace[nonwhitespace.len() - 1];

    if !matches!(
        &values[bang],
        ComponentValue::PreservedToken(Token {
            kind: TokenKind::Delim('!'),
            ..
        })
    ) {
        return false;
    }
    match &values[ident] {
        ComponentValue::PreservedToken(Token {
            kind: TokenKind::Ident(v),
            ..
        }) if v.eq_ignore_ascii_case("important") => {}
        _ => return false,
    }

    // Drop the "!important" and the whitespace clinging to it.
    values.truncate(bang);
    while values.last().is_some_and(|v| v.is_whitespace()) {
        values.pop();
    }
    true
}
