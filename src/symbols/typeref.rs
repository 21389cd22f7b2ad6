//! Textual type references and their canonical form.
//!
//! Snapshots carry types as Rust type text. Two references name the same type when
//! their token streams agree, so everything is lexed once and re-rendered with one
//! spacing convention before any comparison or emission happens.

use std::fmt;

use logos::Logos;
use serde::{Deserialize, Serialize};

use crate::diagnostics::GenError;
use crate::span::{Span, Spanned};

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TypeToken {
    #[token("mut")]
    Mut,
    #[token("dyn")]
    Dyn,
    #[token("const")]
    Const,
    #[token("impl")]
    Impl,
    #[token("fn")]
    Fn,
    #[token("unsafe")]
    Unsafe,

    #[token("::")]
    PathSep,
    #[token("->")]
    Arrow,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("&")]
    Amp,
    #[token("*")]
    Star,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("+")]
    Plus,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,

    #[regex(r"'[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Lifetime(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().to_string())]
    IntLit(String),
}

impl TypeToken {
    fn text(&self) -> &str {
        match self {
            TypeToken::Mut => "mut",
            TypeToken::Dyn => "dyn",
            TypeToken::Const => "const",
            TypeToken::Impl => "impl",
            TypeToken::Fn => "fn",
            TypeToken::Unsafe => "unsafe",
            TypeToken::PathSep => "::",
            TypeToken::Arrow => "->",
            TypeToken::Lt => "<",
            TypeToken::Gt => ">",
            TypeToken::Comma => ",",
            TypeToken::Semi => ";",
            TypeToken::Amp => "&",
            TypeToken::Star => "*",
            TypeToken::LParen => "(",
            TypeToken::RParen => ")",
            TypeToken::LBracket => "[",
            TypeToken::RBracket => "]",
            TypeToken::Plus => "+",
            TypeToken::Eq => "=",
            TypeToken::Bang => "!",
            TypeToken::Question => "?",
            TypeToken::Lifetime(s) | TypeToken::Ident(s) | TypeToken::IntLit(s) => s,
        }
    }

    fn is_word_keyword(&self) -> bool {
        matches!(
            self,
            TypeToken::Mut | TypeToken::Dyn | TypeToken::Const | TypeToken::Impl | TypeToken::Unsafe
        )
    }

    fn closes(&self) -> bool {
        matches!(
            self,
            TypeToken::Gt | TypeToken::Comma | TypeToken::Plus | TypeToken::RParen | TypeToken::RBracket | TypeToken::Semi
        )
    }
}

pub fn lex_type(text: &str) -> Result<Vec<Spanned<TypeToken>>, GenError> {
    let mut tokens = Vec::new();
    let mut lexer = TypeToken::lexer(text);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(tok) => tokens.push(Spanned::new(tok, Span::new(span.start, span.end))),
            Err(()) => {
                return Err(GenError::type_ref(
                    format!("unexpected character '{}'", &text[span.start..span.end]),
                    text,
                    Span::new(span.start, span.end),
                ));
            }
        }
    }

    if tokens.is_empty() {
        return Err(GenError::type_ref("empty type reference", text, Span::new(0, text.len())));
    }

    Ok(tokens)
}

fn needs_space(prev: &TypeToken, next: &TypeToken) -> bool {
    match (prev, next) {
        (TypeToken::Comma | TypeToken::Semi, _) => true,
        (TypeToken::Plus | TypeToken::Arrow | TypeToken::Eq, _) => true,
        (_, TypeToken::Plus | TypeToken::Arrow | TypeToken::Eq) => true,
        (p, _) if p.is_word_keyword() => true,
        (TypeToken::Lifetime(_), n) => !n.closes(),
        (
            TypeToken::Ident(_) | TypeToken::IntLit(_) | TypeToken::RParen | TypeToken::RBracket,
            TypeToken::Ident(_),
        ) => true,
        (TypeToken::Ident(_), n) => n.is_word_keyword() || *n == TypeToken::Fn,
        (TypeToken::Gt, n) => {
            n.is_word_keyword() || matches!(n, TypeToken::Fn | TypeToken::Ident(_))
        }
        _ => false,
    }
}

fn render(tokens: &[Spanned<TypeToken>]) -> String {
    let mut out = String::new();
    let mut prev: Option<&TypeToken> = None;
    for tok in tokens {
        if let Some(p) = prev {
            if needs_space(p, &tok.node) {
                out.push(' ');
            }
        }
        out.push_str(tok.node.text());
        prev = Some(&tok.node);
    }
    out
}

/// A Rust type as written in the snapshot.
///
/// Equality is textual; call [`TypeRef::normalized`] first to compare by tokens.
/// The symbol index normalizes every reference it stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unit(&self) -> bool {
        self.0 == "()"
    }

    pub fn normalized(&self) -> Result<TypeRef, GenError> {
        let tokens = lex_type(&self.0)?;
        Ok(TypeRef(render(&tokens)))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
