use crate::location::Location;
use crate::tokens::{Token, TokenKind};

/// A component value is the parser-level atom: a preserved token, a simple
/// block or a function call.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentValue {
    PreservedToken(Token),
    SimpleBlock(SimpleBlock),
    Function(Function),
}

impl ComponentValue {
    /// Returns the source position of the value's first character.
    pub fn location(&self) -> Location {
        match self {
            ComponentValue::PreservedToken(token) => token.location,
            ComponentValue::SimpleBlock(block) => block.associated_token.location,
            ComponentValue::Function(function) => function.location,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(
            self,
            ComponentValue::PreservedToken(Token {
                kind: TokenKind::Whitespace(_),
                ..
            })
        )
    }

    pub fn is_eof(&self) -> bool {
        matches!(
            self,
            ComponentValue::PreservedToken(Token {
                kind: TokenKind::Eof,
                ..
            })
        )
    }
}

/// A balanced `{}`, `[]` or `()` group of component values. The associated
/// token is the opening bracket; an unclosed block simply ends at EOF and
/// is still considered complete.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleBlock {
    pub associated_token: Token,
    pub values: Vec<ComponentValue>,
}

impl SimpleBlock {
    pub fn new(associated_token: Token) -> SimpleBlock {
        SimpleBlock {
            associated_token,
            values: Vec::new(),
        }
    }

    /// Returns true when this is a `{}`-block.
    pub fn is_brace(&self) -> bool {
        self.associated_token.kind == TokenKind::LCurly
    }
}

/// A function call: a name immediately followed by a parenthesized list of
/// component values, ending at the matching `)` or EOF.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub values: Vec<ComponentValue>,
    pub location: Location,
}

impl Function {
    pub fn new(name: String, location: Location) -> Function {
        Function {
            name,
            values: Vec::new(),
            location,
        }
    }
}

/// A rule is either an at-rule or a qualified rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    AtRule(AtRule),
    QualifiedRule(QualifiedRule),
}

impl Rule {
    pub fn location(&self) -> Location {
        match self {
            Rule::AtRule(rule) => rule.location,
            Rule::QualifiedRule(rule) => rule.location,
        }
    }
}

/// A rule introduced by an `@`-keyword. The block is absent when the rule
/// was terminated by a semicolon or EOF.
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub prelude: Vec<ComponentValue>,
    pub block: Option<SimpleBlock>,
    pub location: Location,
}

/// An unnamed rule: a prelude followed by a `{}`-block.
#[derive(Clone, Debug, PartialEq)]
pub struct QualifiedRule {
    pub prelude: Vec<ComponentValue>,
    pub block: SimpleBlock,
    pub location: Location,
}

/// A name/value pair. The `important` flag is set when the declaration
/// ended with `!important`; those trailing tokens are stripped from the
/// stored values.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub values: Vec<ComponentValue>,
    pub important: bool,
    pub location: Location,
}

/// An entry of a declaration list. Despite the name, at-rules may appear
/// between declarations inside a block.
#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationListItem {
    Declaration(Declaration),
    AtRule(AtRule),
}

/// A top-level stylesheet: an ordered list of rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}
