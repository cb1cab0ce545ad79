//! Hand-written lexer. Each token allocates one record in the token-type
//! arena, one in the token-data arena, and one in the source-location
//! arena (spec §2/§4.C), at the same index in all three — the three
//! arenas are always advanced together, never independently.

use crate::arena::Handle;
use crate::ast::SourceLoc;
use crate::context::GlobalContext;
use crate::intern::Symbol;
use crate::token::{TokenData, TokenKind};

pub type TokenId = Handle<TokenKind>;

pub struct TokenStream {
    pub ids: Vec<TokenId>,
}

impl TokenStream {
    pub fn kind(&self, ctx: &GlobalContext, i: usize) -> TokenKind {
        *ctx.token_type_arena.deref(self.ids[i])
    }

    pub fn data(&self, ctx: &GlobalContext, i: usize) -> TokenData {
        *ctx.token_data_arena.deref(Handle::from_raw(self.ids[i].index()))
    }

    pub fn loc(&self, ctx: &GlobalContext, i: usize) -> SourceLoc {
        ctx.source_loc_arena
            .deref(Handle::from_raw(self.ids[i].index()))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    file: Symbol,
}

impl Lexer {
    pub fn new(ctx: &mut GlobalContext, file_path: &str, source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            file: ctx.interner.intern(file_path),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn emit(
        &mut self,
        ctx: &mut GlobalContext,
        ids: &mut Vec<TokenId>,
        kind: TokenKind,
        data: TokenData,
        line: u32,
        column: u32,
    ) {
        let type_id = ctx.token_type_arena.alloc_zeroed();
        *ctx.token_type_arena.deref_mut(type_id) = kind;

        let data_id: Handle<TokenData> =
            Handle::from_raw(ctx.token_data_arena.alloc_zeroed().index());
        *ctx.token_data_arena.deref_mut(data_id) = data;

        let loc_id: Handle<SourceLoc> =
            Handle::from_raw(ctx.source_loc_arena.alloc_zeroed().index());
        *ctx.source_loc_arena.deref_mut(loc_id) = SourceLoc {
            file: self.file,
            line,
            column,
        };

        debug_assert_eq!(type_id.index(), data_id.index());
        debug_assert_eq!(type_id.index(), loc_id.index());
        ids.push(type_id);
    }

    /// Tokenize the whole source, terminating with a single `EOF` token.
    pub fn tokenize(&mut self, ctx: &mut GlobalContext) -> TokenStream {
        let mut ids = Vec::new();
        loop {
            self.skip_trivia();
            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek() else {
                self.emit(ctx, &mut ids, TokenKind::Eof, TokenData::None, line, column);
                break;
            };

            if c.is_ascii_digit() {
                let n = self.read_integer();
                self.emit(
                    ctx,
                    &mut ids,
                    TokenKind::Integer,
                    TokenData::Int(n),
                    line,
                    column,
                );
                continue;
            }
            if c.is_alphabetic() || c == '_' {
                let word = self.read_ident();
                let kind = keyword_kind(&word);
                let data = if kind == TokenKind::Ident {
                    TokenData::Ident(ctx.interner.intern(&word))
                } else {
                    TokenData::None
                };
                self.emit(ctx, &mut ids, kind, data, line, column);
                continue;
            }
            if c == '"' {
                let text = self.read_string();
                let data = TokenData::Str(ctx.interner.intern(&text));
                self.emit(ctx, &mut ids, TokenKind::Str, data, line, column);
                continue;
            }
            if c == '$' {
                self.advance();
                let word = self.read_ident();
                let kind = match word.as_str() {
                    "if" => TokenKind::DollarIf,
                    "else" => TokenKind::DollarElse,
                    "assert" => TokenKind::DollarAssert,
                    _ => TokenKind::Invalid,
                };
                self.emit(ctx, &mut ids, kind, TokenData::None, line, column);
                continue;
            }

            let kind = self.read_punct_or_op();
            self.emit(ctx, &mut ids, kind, TokenData::None, line, column);
        }
        TokenStream { ids }
    }

    fn read_integer(&mut self) -> i64 {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.source_slice(start, self.pos).parse().unwrap_or(0)
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        self.source_slice(start, self.pos)
    }

    fn read_string(&mut self) -> String {
        self.advance(); // opening quote
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '"' {
                self.advance();
                break;
            }
            out.push(c);
            self.advance();
        }
        out
    }

    fn source_slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn read_punct_or_op(&mut self) -> TokenKind {
        let c = self.advance().unwrap_or('\0');
        match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '&' if self.peek() == Some('&') => {
                self.advance();
                TokenKind::AndAnd
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                TokenKind::OrOr
            }
            _ => TokenKind::Invalid,
        }
    }
}

fn keyword_kind(word: &str) -> TokenKind {
    match word {
        "fn" => TokenKind::Fn,
        "module" => TokenKind::Module,
        "import" => TokenKind::Import,
        "pub" => TokenKind::Pub,
        "const" => TokenKind::Const,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "int" => TokenKind::Int,
        "bool" => TokenKind::Bool,
        "void" => TokenKind::Void,
        _ => TokenKind::Ident,
    }
}

/// Implements `--lex-only`: print `# <path>` followed by the
/// space-separated token kind names, then exit (spec §6/§8 seed test 2).
pub fn print_lex_only(ctx: &mut GlobalContext, path: &std::path::Path, source: &str) {
    // Spec §8 seed test 2 requires the absolute path; unlike the full
    // pipeline this entry point never goes through `SourceLoader`, so
    // canonicalize here the same way it does (falling back to the
    // as-given path if canonicalization fails).
    let abs_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    println!("# {}", abs_path.display());
    let mut lexer = Lexer::new(ctx, &abs_path.display().to_string(), source);
    let stream = lexer.tokenize(ctx);
    let names: Vec<String> = (0..stream.len())
        .map(|i| stream.kind(ctx, i).to_string())
        .collect();
    println!("{}", names.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_simple_main_to_expected_token_kinds() {
        let mut ctx = GlobalContext::init(None);
        let source = "fn int main() { return 0; }";
        let mut lexer = Lexer::new(&mut ctx, "a.c3", source);
        let stream = lexer.tokenize(&mut ctx);
        let kinds: Vec<TokenKind> = (0..stream.len()).map(|i| stream.kind(&ctx, i)).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Fn,
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::Integer,
                TokenKind::Semi,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn integer_literal_data_round_trips() {
        let mut ctx = GlobalContext::init(None);
        let mut lexer = Lexer::new(&mut ctx, "a.c3", "42");
        let stream = lexer.tokenize(&mut ctx);
        assert_eq!(stream.data(&ctx, 0), TokenData::Int(42));
    }

    #[test]
    fn dollar_directives_are_recognized() {
        let mut ctx = GlobalContext::init(None);
        let mut lexer = Lexer::new(&mut ctx, "a.c3", "$if $else $assert");
        let stream = lexer.tokenize(&mut ctx);
        let kinds: Vec<TokenKind> = (0..stream.len()).map(|i| stream.kind(&ctx, i)).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::DollarIf,
                TokenKind::DollarElse,
                TokenKind::DollarAssert,
                TokenKind::Eof,
            ]
        );
    }
}
