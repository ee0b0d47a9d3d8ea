//! Imports-only parser for Go source files.
//!
//! Reads `package <name>` followed by any number of import declarations,
//! single or parenthesized, and stops at the first token that cannot start
//! another import declaration. Semicolons are optional everywhere because
//! newlines are trivia here.

use indexmap::IndexSet;

use super::lexer::{HeaderLexer, Token, TokenKind, unquote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub package: String,
    /// Imported paths in first-occurrence order.
    pub imports: IndexSet<String>,
}

pub fn parse_header(source: &str) -> Result<Header, String> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut parser = HeaderParser {
        source,
        tokens: HeaderLexer::new(source).peekable(),
    };
    parser.header()
}

struct HeaderParser<'s> {
    source: &'s str,
    tokens: std::iter::Peekable<HeaderLexer<'s>>,
}

impl HeaderParser<'_> {
    fn header(&mut self) -> Result<Header, String> {
        self.expect(TokenKind::Package, "package clause")?;
        let name = self.expect(TokenKind::Ident, "package name")?;
        let package = self.text(&name).to_owned();
        if package == "_" {
            return Err(self.error_at(&name, "invalid package name _"));
        }
        self.eat(TokenKind::Semicolon);

        let mut imports = IndexSet::new();
        while self.eat(TokenKind::Import).is_some() {
            if self.eat(TokenKind::ParenOpen).is_some() {
                while self.eat(TokenKind::ParenClose).is_none() {
                    imports.insert(self.import_spec()?);
                    self.eat(TokenKind::Semicolon);
                }
            } else {
                imports.insert(self.import_spec()?);
            }
            self.eat(TokenKind::Semicolon);
        }

        Ok(Header { package, imports })
    }

    fn import_spec(&mut self) -> Result<String, String> {
        if self.eat(TokenKind::Ident).is_none() {
            self.eat(TokenKind::Dot);
        }
        let token = match self.tokens.next() {
            Some(token)
                if matches!(
                    token.kind,
                    Some(TokenKind::InterpretedString | TokenKind::RawString)
                ) =>
            {
                token
            }
            Some(token) => return Err(self.unexpected(&token, "import path")),
            None => return Err("unexpected end of file, expected import path".to_owned()),
        };

        let path = unquote(self.text(&token)).map_err(|msg| self.error_at(&token, &msg))?;
        if path.is_empty() {
            return Err(self.error_at(&token, "empty import path"));
        }
        Ok(path)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.tokens.next_if(|t| t.kind == Some(kind))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, String> {
        match self.tokens.next() {
            Some(token) if token.kind == Some(kind) => Ok(token),
            Some(token) => Err(self.unexpected(&token, what)),
            None => Err(format!("unexpected end of file, expected {what}")),
        }
    }

    fn text(&self, token: &Token) -> &str {
        &self.source[token.span.clone()]
    }

    fn unexpected(&self, token: &Token, what: &str) -> String {
        let found = match token.kind {
            Some(_) => format!("{:?}", self.text(token)),
            None => "invalid character or unterminated literal".to_owned(),
        };
        self.error_at(token, &format!("expected {what}, found {found}"))
    }

    fn error_at(&self, token: &Token, msg: &str) -> String {
        let line = self.source[..token.span.start].matches('\n').count() + 1;
        format!("line {line}: {msg}")
    }
}
