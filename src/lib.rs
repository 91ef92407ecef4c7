//! A CSS Syntax Module Level 3 compliant tokenizer and parser.
//!
//! Parsing happens in two steps. The tokenizer breaks a stream of
//! preprocessed code points into tokens, the most basic units of the
//! syntax: identifiers, strings, numbers, brackets. The parser then feeds
//! those tokens through the algorithms of
//! [CSS Syntax §5.4](https://www.w3.org/TR/css-syntax-3/#parser-algorithms)
//! to build the abstract syntax tree: a stylesheet of rules, which own
//! preludes, blocks and declarations made of component values.
//!
//! Unlike most language parsers, the syntax tree keeps the original tokens
//! around so they can be re-parsed at different levels. An `@media` rule,
//! for example, stores the raw component values of its `{}`-block; replay
//! them through [`Parser::parse_rules`] with a [`ComponentValueStream`] to
//! get at the rules inside. What a particular at-rule means is left to the
//! caller; `@charset` gets no special treatment either.
//!
//! Errors never abort a parse. Both the tokenizer and the parser append to
//! an [`ErrorList`] and keep going, so malformed input yields whatever
//! partial tree could be built plus the list of everything that went
//! wrong.
//!
//! ```
//! use css_syntax::parse_stylesheet;
//!
//! let (stylesheet, errors) = parse_stylesheet("a { color: red; }");
//! assert!(errors.is_empty());
//! assert_eq!(stylesheet.rules.len(), 1);
//! ```

pub mod ast;
pub mod byte_stream;
pub mod errors;
pub mod location;
pub mod parser;
pub mod printer;
pub mod tokenizer;
pub mod tokens;

pub use ast::{
    AtRule, ComponentValue, Declaration, DeclarationListItem, Function, QualifiedRule, Rule,
    SimpleBlock, Stylesheet,
};
pub use byte_stream::{ByteStream, Character};
pub use errors::{ErrorList, SyntaxError};
pub use location::Location;
pub use parser::{ComponentValueScanner, ComponentValueStream, Parser};
pub use tokenizer::Tokenizer;
pub use tokens::{HashKind, NumberKind, Token, TokenKind};

/// Parses a complete stylesheet out of a string, returning the stylesheet
/// together with every error the tokenizer and parser recorded.
pub fn parse_stylesheet(input: &str) -> (Stylesheet, ErrorList) {
    let mut stream = ByteStream::new();
    stream.read_from_str(input);
    let mut tokenizer = Tokenizer::new(&mut stream);
    let mut parser = Parser::new();
    let stylesheet = parser.parse_stylesheet(&mut tokenizer);

    let mut errors = tokenizer.errors.clone();
    errors.extend(parser.errors);
    (stylesheet, errors)
}
