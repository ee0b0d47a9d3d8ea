//! Lexer for the header of a Go source file.
//!
//! Only the tokens that can appear in a package clause and import
//! declarations are recognized. Anything else lexes as an error, which is
//! fine: the header parser stops pulling tokens once the imports end, so the
//! body of the file is never tokenized.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[token("package")]
    Package,

    #[token("import")]
    Import,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(";")]
    Semicolon,

    /// Dot import: `import . "fmt"`
    #[token(".")]
    Dot,

    /// Identifier, including the blank identifier `_`.
    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    InterpretedString,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }
}

/// A non-trivia token, or `None` as the kind for an unrecognized character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: Option<TokenKind>,
    pub span: Range<usize>,
}

/// Lazily yields non-trivia tokens. Stops at end of input.
pub struct HeaderLexer<'s> {
    inner: logos::Lexer<'s, TokenKind>,
}

impl<'s> HeaderLexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }
}

impl Iterator for HeaderLexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let kind = match self.inner.next()? {
                Ok(kind) if kind.is_trivia() => continue,
                Ok(kind) => Some(kind),
                Err(()) => None,
            };
            return Some(Token {
                kind,
                span: self.inner.span(),
            });
        }
    }
}

/// Decodes a Go string literal used as an import path.
///
/// Import paths may not contain backslashes or control characters, so the
/// only escape accepted inside an interpreted string is `\"`.
pub fn unquote(literal: &str) -> Result<String, String> {
    if let Some(raw) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Ok(raw.to_owned());
    }
    let Some(inner) = literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return Err(format!("invalid string literal {literal}"));
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some(other) => return Err(format!("invalid escape \\{other} in import path")),
            None => return Err("unterminated escape in import path".to_owned()),
        }
    }
    Ok(out)
}
