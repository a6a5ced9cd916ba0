//! Lexical analysis: convert contract source text into a stream of tokens.

use std::ops::Range;

/// A span in the source file, represented as a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { range: start..end }
    }
}

/// Reserved and contextual words of the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Class,
    Extends,
    Constructor,
    Return,
    If,
    Else,
    Const,
    Let,
    Var,
    While,
    For,
    Of,
    In,
    Do,
    Break,
    Continue,
    Throw,
    New,
    Delete,
    InstanceOf,
    Satisfies,
    This,
    Super,
    True,
    False,
    Null,
    Undefined,
    Import,
    Export,
    Default,
    From,
    As,
    Typeof,
    Void,
    Number,
    String,
    Boolean,
    Any,
    Public,
    Private,
    Protected,
    Static,
    Readonly,
    Abstract,
    Get,
    Set,
    Type,
    Interface,
    Function,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("class", Keyword::Class),
    ("extends", Keyword::Extends),
    ("constructor", Keyword::Constructor),
    ("return", Keyword::Return),
    ("if", Keyword::If),
    ("else", Keyword::Else),
    ("const", Keyword::Const),
    ("let", Keyword::Let),
    ("var", Keyword::Var),
    ("while", Keyword::While),
    ("for", Keyword::For),
    ("of", Keyword::Of),
    ("in", Keyword::In),
    ("do", Keyword::Do),
    ("break", Keyword::Break),
    ("continue", Keyword::Continue),
    ("throw", Keyword::Throw),
    ("new", Keyword::New),
    ("delete", Keyword::Delete),
    ("instanceof", Keyword::InstanceOf),
    ("satisfies", Keyword::Satisfies),
    ("this", Keyword::This),
    ("super", Keyword::Super),
    ("true", Keyword::True),
    ("false", Keyword::False),
    ("null", Keyword::Null),
    ("undefined", Keyword::Undefined),
    ("import", Keyword::Import),
    ("export", Keyword::Export),
    ("default", Keyword::Default),
    ("from", Keyword::From),
    ("as", Keyword::As),
    ("typeof", Keyword::Typeof),
    ("void", Keyword::Void),
    ("number", Keyword::Number),
    ("string", Keyword::String),
    ("boolean", Keyword::Boolean),
    ("any", Keyword::Any),
    ("public", Keyword::Public),
    ("private", Keyword::Private),
    ("protected", Keyword::Protected),
    ("static", Keyword::Static),
    ("readonly", Keyword::Readonly),
    ("abstract", Keyword::Abstract),
    ("get", Keyword::Get),
    ("set", Keyword::Set),
    ("type", Keyword::Type),
    ("interface", Keyword::Interface),
    ("function", Keyword::Function),
];

impl Keyword {
    /// Look up the keyword spelled by `text`, if any.
    pub fn from_text(text: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == text)
            .map(|(_, kw)| *kw)
    }

    /// The source spelling of this keyword.
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, kw)| *kw == self)
            .map(|(spelling, _)| *spelling)
            .unwrap_or("")
    }

    /// Contextual keywords may still be used as binding names.
    pub fn is_contextual(self) -> bool {
        matches!(
            self,
            Keyword::Of
                | Keyword::From
                | Keyword::As
                | Keyword::Satisfies
                | Keyword::Get
                | Keyword::Set
                | Keyword::Type
                | Keyword::Number
                | Keyword::String
                | Keyword::Boolean
                | Keyword::Any
                | Keyword::Constructor
                | Keyword::Readonly
                | Keyword::Abstract
                | Keyword::Public
                | Keyword::Private
                | Keyword::Protected
                | Keyword::Static
                | Keyword::Interface
        )
    }
}

/// Check if a string is a reserved word of the dialect.
pub fn is_keyword(name: &str) -> bool {
    Keyword::from_text(name).is_some()
}

/// A malformed token, reported alongside the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Token kinds produced by the lexer.
///
/// `>` is never combined with a following `>`: shift operators are
/// assembled by the parser from adjacent tokens so that nested type
/// arguments such as `Map<A, Map<B, C>>` close one level per token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// `#name`; the text keeps the leading marker.
    PrivateName(String),
    /// Raw numeric text, exactly as written.
    NumberLiteral(String),
    /// Cooked string contents without the quotes.
    StringLiteral(String),
    /// Raw body of a backtick literal.
    TemplateLiteral(String),
    Keyword(Keyword),
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Question,
    QuestionDot,        // ?.
    QuestionQuestion,   // ??
    QuestionQuestionEq, // ??=
    At,
    FatArrow, // =>
    Eq,       // =
    EqEq,     // ==
    EqEqEq,   // ===
    BangEq,   // !=
    BangEqEq, // !==
    Lt,
    Gt,
    Le,
    Ge,
    LtLt,   // <<
    LtLtEq, // <<=
    Plus,
    Minus,
    Star,
    StarStar,   // **
    StarStarEq, // **=
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    Amp,
    Pipe,
    Caret,
    AmpEq,
    PipeEq,
    CaretEq,
    Tilde,
    Bang,
    AndAnd,
    OrOr,
    AndAndEq,
    OrOrEq,
    /// A character the dialect has no use for.
    Unknown(char),
    // End of input
    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Simple lexer over a UTF-8 string.
pub struct Lexer<'src> {
    src: &'src str,
    chars: std::str::CharIndices<'src>,
    peeked: Option<(usize, char)>,
    end: usize,
    finished: bool,
    errors: Vec<LexError>,
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        let end = src.len();
        Self {
            src,
            chars: src.char_indices(),
            peeked: None,
            end,
            finished: false,
            errors: Vec::new(),
        }
    }

    /// Errors found in the tokens produced so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        let span = Span::new(start, self.offset());
        self.errors.push(LexError {
            message: message.into(),
            span,
        });
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        if let Some(p) = self.peeked.take() {
            Some(p)
        } else {
            self.chars.next()
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    /// The character after the peeked one.
    fn peek_second(&mut self) -> Option<char> {
        self.peek();
        self.chars.clone().next().map(|(_, ch)| ch)
    }

    /// Byte offset of the next unconsumed character.
    fn offset(&mut self) -> usize {
        self.peek().map(|(idx, _)| idx).unwrap_or(self.end)
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.peek() {
            Some((_, ch)) if ch == expected => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    fn consume_while<F>(&mut self, mut pred: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.consume_while(char::is_whitespace);
            match (self.peek(), self.peek_second()) {
                (Some((_, '/')), Some('/')) => {
                    self.consume_while(|ch| ch != '\n');
                }
                (Some((_, '/')), Some('*')) => {
                    self.bump();
                    self.bump();
                    let mut prev = '\0';
                    while let Some((_, ch)) = self.bump() {
                        if prev == '*' && ch == '/' {
                            break;
                        }
                        prev = ch;
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        self.consume_while(is_ident_continue);
        let end = self.offset();
        let text = &self.src[start..end];
        let kind = match Keyword::from_text(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(text.to_string()),
        };
        Token {
            kind,
            span: Span::new(start, end),
        }
    }

    fn lex_private_name(&mut self, start: usize) -> Token {
        match self.peek() {
            Some((_, ch)) if is_ident_start(ch) => {
                self.consume_while(is_ident_continue);
                let end = self.offset();
                Token {
                    kind: TokenKind::PrivateName(self.src[start..end].to_string()),
                    span: Span::new(start, end),
                }
            }
            _ => Token {
                kind: TokenKind::Unknown('#'),
                span: Span::new(start, start + 1),
            },
        }
    }

    fn lex_number(&mut self, start: usize, first: char) -> Token {
        let radix_prefix = first == '0'
            && matches!(
                self.peek(),
                Some((_, 'x' | 'X' | 'o' | 'O' | 'b' | 'B'))
            );
        if radix_prefix {
            self.bump();
            self.consume_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            let digits = |c: char| c.is_ascii_digit() || c == '_';
            if first != '.' {
                self.consume_while(digits);
                if let (Some((_, '.')), Some(next)) = (self.peek(), self.peek_second()) {
                    if next.is_ascii_digit() {
                        self.bump();
                        self.consume_while(digits);
                    }
                }
            } else {
                self.consume_while(digits);
            }
            if let Some((_, 'e' | 'E')) = self.peek() {
                let next = self.peek_second();
                if matches!(next, Some(c) if c.is_ascii_digit() || c == '+' || c == '-') {
                    self.bump();
                    self.bump();
                    self.consume_while(|c| c.is_ascii_digit());
                }
            }
        }
        // BigInt suffix.
        self.eat('n');
        let end = self.offset();
        Token {
            kind: TokenKind::NumberLiteral(self.src[start..end].to_string()),
            span: Span::new(start, end),
        }
    }

    fn lex_string(&mut self, start: usize, quote: char) -> Token {
        // Assumes the opening quote has already been consumed.
        let mut value = String::new();
        let mut terminated = false;
        while let Some((idx, ch)) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
            if ch == quote {
                terminated = true;
                break;
            }
            if ch == '\\' {
                self.lex_escape(idx, &mut value);
                continue;
            }
            value.push(ch);
        }
        if !terminated {
            self.error("unterminated string literal", start);
        }
        Token {
            kind: TokenKind::StringLiteral(value),
            span: Span::new(start, self.offset()),
        }
    }

    /// Cook one escape sequence; the backslash at `start` is already consumed.
    fn lex_escape(&mut self, start: usize, value: &mut String) {
        let Some((_, escaped)) = self.bump() else {
            return;
        };
        match escaped {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' => value.push('\0'),
            // Line continuations contribute nothing.
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                self.eat('\n');
            }
            'x' => match self.read_hex(2).and_then(char::from_u32) {
                Some(ch) => value.push(ch),
                None => self.error("invalid hexadecimal escape sequence", start),
            },
            'u' => match self.read_unicode_escape() {
                Some(ch) => value.push(ch),
                None => self.error("invalid unicode escape sequence", start),
            },
            other => value.push(other),
        }
    }

    /// The code point of `\uXXXX`, `\u{X...}` or a `\uXXXX\uXXXX` surrogate
    /// pair, after the `u`.
    fn read_unicode_escape(&mut self) -> Option<char> {
        if self.eat('{') {
            return self.read_braced_hex().and_then(char::from_u32);
        }
        let code = self.read_hex(4)?;
        if !(0xD800..0xDC00).contains(&code) {
            return char::from_u32(code);
        }
        if !(matches!(self.peek(), Some((_, '\\'))) && self.peek_second() == Some('u')) {
            return None;
        }
        self.bump();
        self.bump();
        let low = self.read_hex(4)?;
        if !(0xDC00..0xE000).contains(&low) {
            return None;
        }
        char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
    }

    /// Exactly `count` hex digits.
    fn read_hex(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for _ in 0..count {
            let digit = self.peek().and_then(|(_, ch)| ch.to_digit(16))?;
            self.bump();
            value = value * 16 + digit;
        }
        Some(value)
    }

    /// One or more hex digits up to a closing `}`.
    fn read_braced_hex(&mut self) -> Option<u32> {
        let mut value: u32 = 0;
        let mut digits = 0;
        while let Some((_, ch)) = self.peek() {
            if ch == '}' {
                self.bump();
                return (digits > 0).then_some(value);
            }
            let digit = ch.to_digit(16)?;
            self.bump();
            digits += 1;
            value = value.checked_mul(16)?.checked_add(digit)?;
            if value > 0x10FFFF {
                return None;
            }
        }
        None
    }

    fn lex_template(&mut self, start: usize) -> Token {
        let body_start = start + 1;
        let mut body_end = None;
        while let Some((idx, ch)) = self.bump() {
            if ch == '\\' {
                self.bump();
                continue;
            }
            if ch == '`' {
                body_end = Some(idx);
                break;
            }
        }
        let body_end = match body_end {
            Some(end) => end,
            None => {
                self.error("unterminated template literal", start);
                self.end
            }
        };
        Token {
            kind: TokenKind::TemplateLiteral(self.src[body_start..body_end].to_string()),
            span: Span::new(start, self.offset()),
        }
    }

    fn lex_punct(&mut self, start: usize, ch: char) -> Token {
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '@' => TokenKind::At,
            '~' => TokenKind::Tilde,
            '^' => {
                if self.eat('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }
            '?' => {
                if self.eat('?') {
                    if self.eat('=') {
                        TokenKind::QuestionQuestionEq
                    } else {
                        TokenKind::QuestionQuestion
                    }
                } else if matches!(self.peek(), Some((_, '.')))
                    && !matches!(self.peek_second(), Some(c) if c.is_ascii_digit())
                {
                    // `a?.5:1` is a conditional, not an optional chain.
                    self.bump();
                    TokenKind::QuestionDot
                } else {
                    TokenKind::Question
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else if self.eat('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::BangEqEq
                    } else {
                        TokenKind::BangEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::Le
                } else if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::LtLtEq
                    } else {
                        TokenKind::LtLt
                    }
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEq
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('*') {
                    if self.eat('=') {
                        TokenKind::StarStarEq
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            '&' => {
                if self.eat('&') {
                    if self.eat('=') {
                        TokenKind::AndAndEq
                    } else {
                        TokenKind::AndAnd
                    }
                } else if self.eat('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    if self.eat('=') {
                        TokenKind::OrOrEq
                    } else {
                        TokenKind::OrOr
                    }
                } else if self.eat('=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }
            other => TokenKind::Unknown(other),
        };
        Token {
            kind,
            span: Span::new(start, self.offset()),
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.skip_whitespace_and_comments();
        let (start, ch) = match self.bump() {
            Some(pair) => pair,
            None => {
                self.finished = true;
                return Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(self.end, self.end),
                });
            }
        };

        let token = match ch {
            c if is_ident_start(c) => self.lex_ident_or_keyword(start),
            c if c.is_ascii_digit() => self.lex_number(start, c),
            '.' if matches!(self.peek(), Some((_, c)) if c.is_ascii_digit()) => {
                self.lex_number(start, '.')
            }
            '#' => self.lex_private_name(start),
            '"' | '\'' => self.lex_string(start, ch),
            '`' => self.lex_template(start),
            _ => self.lex_punct(start, ch),
        };

        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_private_property_declaration() {
        assert_eq!(
            kinds("#balances: Map<ADDRESS, UNSIGNED_INT>;"),
            vec![
                TokenKind::PrivateName("#balances".into()),
                TokenKind::Colon,
                TokenKind::Ident("Map".into()),
                TokenKind::Lt,
                TokenKind::Ident("ADDRESS".into()),
                TokenKind::Comma,
                TokenKind::Ident("UNSIGNED_INT".into()),
                TokenKind::Gt,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keeps_numeric_text_verbatim() {
        assert_eq!(
            kinds("1_000 0xFF 1.5e18 10n .5"),
            vec![
                TokenKind::NumberLiteral("1_000".into()),
                TokenKind::NumberLiteral("0xFF".into()),
                TokenKind::NumberLiteral("1.5e18".into()),
                TokenKind::NumberLiteral("10n".into()),
                TokenKind::NumberLiteral(".5".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn member_access_on_number_is_not_a_fraction() {
        assert_eq!(
            kinds("a.b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Dot,
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let src = "/** doc */ owner // trailing\n /* inner * star */ ;";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::Ident("owner".into()),
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn cooks_string_escapes_for_both_quote_styles() {
        assert_eq!(
            kinds(r#"'it\'s' "a\"b\n""#),
            vec![
                TokenKind::StringLiteral("it's".into()),
                TokenKind::StringLiteral("a\"b\n".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_longest_operators() {
        assert_eq!(
            kinds("=== !== == != => -= += ** ?? && ||"),
            vec![
                TokenKind::EqEqEq,
                TokenKind::BangEqEq,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::FatArrow,
                TokenKind::MinusEq,
                TokenKind::PlusEq,
                TokenKind::StarStar,
                TokenKind::QuestionQuestion,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_shift_and_compound_assignment_operators() {
        assert_eq!(
            kinds("<< <<= &= |= ^= **= &&= ||= ??= ?."),
            vec![
                TokenKind::LtLt,
                TokenKind::LtLtEq,
                TokenKind::AmpEq,
                TokenKind::PipeEq,
                TokenKind::CaretEq,
                TokenKind::StarStarEq,
                TokenKind::AndAndEq,
                TokenKind::OrOrEq,
                TokenKind::QuestionQuestionEq,
                TokenKind::QuestionDot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn right_shift_stays_split_into_greater_than_tokens() {
        assert_eq!(
            kinds(">>>= >>"),
            vec![
                TokenKind::Gt,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn question_dot_before_digit_is_a_conditional() {
        assert_eq!(
            kinds("a?.5:1"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Question,
                TokenKind::NumberLiteral(".5".into()),
                TokenKind::Colon,
                TokenKind::NumberLiteral("1".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("a?.b")[1], TokenKind::QuestionDot);
    }

    #[test]
    fn decodes_hex_and_unicode_escapes() {
        assert_eq!(
            kinds(r#""caf\u00e9 \x41 \u{1F600} \uD83D\uDE00 \b\f\v""#),
            vec![
                TokenKind::StringLiteral("café A 😀 😀 \u{8}\u{c}\u{b}".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_continuation_contributes_nothing() {
        assert_eq!(
            kinds("'ab\\\ncd' 'x\\\r\ny'"),
            vec![
                TokenKind::StringLiteral("abcd".into()),
                TokenKind::StringLiteral("xy".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn malformed_escapes_are_reported() {
        let src = r#""\xZ1" "\u12" "\u{110000}" "\uD800x""#;
        let mut lexer = Lexer::new(src);
        let tokens: Vec<Token> = lexer.by_ref().collect();
        assert_eq!(tokens.len(), 5);
        let errors = lexer.into_errors();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "invalid hexadecimal escape sequence",
                "invalid unicode escape sequence",
                "invalid unicode escape sequence",
                "invalid unicode escape sequence",
            ]
        );
        assert_eq!(&src[errors[0].span.range.clone()], "\\x");
    }

    #[test]
    fn unterminated_string_is_reported() {
        let mut lexer = Lexer::new("'abc\nx");
        let tokens: Vec<Token> = lexer.by_ref().collect();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral("abc".into()));
        assert_eq!(lexer.errors()[0].message, "unterminated string literal");
    }

    #[test]
    fn classifies_keywords() {
        assert_eq!(
            kinds("class this constructor"),
            vec![
                TokenKind::Keyword(Keyword::Class),
                TokenKind::Keyword(Keyword::This),
                TokenKind::Keyword(Keyword::Constructor),
                TokenKind::Eof,
            ]
        );
        assert_eq!(Keyword::Readonly.as_str(), "readonly");
        assert!(is_keyword("super"));
        assert!(!is_keyword("ETH"));
    }

    #[test]
    fn spans_cover_token_text() {
        let src = "  owner = #x";
        let tokens: Vec<Token> = Lexer::new(src).collect();
        assert_eq!(&src[tokens[0].span.range.clone()], "owner");
        assert_eq!(&src[tokens[1].span.range.clone()], "=");
        assert_eq!(&src[tokens[2].span.range.clone()], "#x");
        assert_eq!(tokens[3].span.range, src.len()..src.len());
    }

    #[test]
    fn lexes_template_literal_as_one_token() {
        assert_eq!(
            kinds("`a ${b}`"),
            vec![TokenKind::TemplateLiteral("a ${b}".into()), TokenKind::Eof]
        );
    }
}
