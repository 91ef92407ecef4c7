//! Structural serialization of tokens and syntax-tree nodes.
//!
//! Printing is lossless for everything that keeps its source text: numeric
//! tokens re-emit their exact `repr`, strings keep their original quote
//! character, and whitespace tokens keep their exact run. `BadString` and
//! `BadUrl` have lost their content and print as `''` and `url()`.

use crate::ast::{
    AtRule, ComponentValue, Declaration, DeclarationListItem, Function, QualifiedRule, Rule,
    SimpleBlock, Stylesheet,
};
use crate::tokens::{Token, TokenKind};
use std::fmt::{self, Display, Formatter};

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(value) => write!(f, "{value}"),
            TokenKind::Function(value) => write!(f, "{value}("),
            TokenKind::AtKeyword(value) => write!(f, "@{value}"),
            TokenKind::Hash { value, .. } => write!(f, "#{value}"),
            TokenKind::QuotedString { value, ending } => write!(f, "{ending}{value}{ending}"),
            TokenKind::BadString => write!(f, "''"),
            TokenKind::Url(value) => write!(f, "url({value})"),
            TokenKind::BadUrl => write!(f, "url()"),
            TokenKind::Delim(value) => write!(f, "{value}"),
            TokenKind::Number { repr, .. } => write!(f, "{repr}"),
            TokenKind::Percentage { repr, .. } => write!(f, "{repr}"),
            TokenKind::Dimension { repr, .. } => write!(f, "{repr}"),
            TokenKind::UnicodeRange { start, end } => {
                write!(f, "U+{start:06x}")?;
                if start != end {
                    write!(f, "-U+{end:06x}")?;
                }
                Ok(())
            }
            TokenKind::IncludeMatch => write!(f, "~="),
            TokenKind::DashMatch => write!(f, "|="),
            TokenKind::PrefixMatch => write!(f, "^="),
            TokenKind::SuffixMatch => write!(f, "$="),
            TokenKind::SubstringMatch => write!(f, "*="),
            TokenKind::Column => write!(f, "||"),
            TokenKind::Whitespace(value) => write!(f, "{value}"),
            TokenKind::Cdo => write!(f, "<!--"),
            TokenKind::Cdc => write!(f, "-->"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LCurly => write!(f, "{{"),
            TokenKind::RCurly => write!(f, "}}"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

impl Display for ComponentValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ComponentValue::PreservedToken(token) => token.fmt(f),
            ComponentValue::SimpleBlock(block) => block.fmt(f),
            ComponentValue::Function(function) => function.fmt(f),
        }
    }
}

impl Display for SimpleBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (open, close) = match self.associated_token.kind {
            TokenKind::LBracket => ('[', ']'),
            TokenKind::LParen => ('(', ')'),
            _ => ('{', '}'),
        };

        write!(f, "{open}")?;
        for value in &self.values {
            value.fmt(f)?;
        }
        write!(f, "{close}")
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for value in &self.values {
            value.fmt(f)?;
        }
        write!(f, ")")
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for value in &self.values {
            value.fmt(f)?;
        }
        if self.important {
            write!(f, " !important")?;
        }
        Ok(())
    }
}

impl Display for AtRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        for value in &self.prelude {
            value.fmt(f)?;
        }
        match &self.block {
            Some(block) => block.fmt(f),
            None => write!(f, ";"),
        }
    }
}

impl Display for QualifiedRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for value in &self.prelude {
            value.fmt(f)?;
        }
        self.block.fmt(f)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Rule::AtRule(rule) => rule.fmt(f),
            Rule::QualifiedRule(rule) => rule.fmt(f),
        }
    }
}

impl Display for DeclarationListItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationListItem::Declaration(declaration) => declaration.fmt(f),
            DeclarationListItem::AtRule(rule) => rule.fmt(f),
        }
    }
}

impl Display for Stylesheet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            rule.fmt(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
