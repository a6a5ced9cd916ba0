//! Parser: consume tokens and produce a syntax tree.
//!
//! This is a hand-written recursive-descent parser for the class-based
//! contract dialect. Top-level constructs other than imports and classes are
//! skipped as opaque items; everything inside a class is parsed fully.

use std::fmt;

use log::debug;
use tsol_ast::{
    AccessorKind, BinaryOp, Block, Class, ClassMember, ClassMemberKind, Decorator, Expr, ExprKind,
    File, Ident, Import, ImportSpecifier, Item, ItemKind, Literal, LiteralKind, Modifier,
    ObjectProp, Param, Span, Stmt, StmtKind, TypeExpr, TypeExprKind, TypeKeyword, UnaryOp,
    UpdateOp, VarDeclarator, VarKind,
};
use tsol_lexer::{Keyword, Lexer, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.message, self.span.range)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub struct ParseResult {
    pub file: Option<File>,
    pub errors: Vec<ParseError>,
}

/// Parse a source string into a syntax tree and a list of parse errors.
pub fn parse_str(source: &str) -> ParseResult {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    debug!("lexed {} tokens", tokens.len());
    let mut errors: Vec<ParseError> = lexer
        .into_errors()
        .into_iter()
        .map(|err| ParseError {
            message: err.message,
            span: Span {
                range: err.span.range,
            },
        })
        .collect();

    let mut parser = Parser::new(source, tokens);
    let file = parser.parse_file();
    errors.append(&mut parser.errors);
    errors.sort_by_key(|err| err.span.range.start);
    debug!(
        "parsed {} top-level item(s), {} error(s)",
        file.items.len(),
        errors.len()
    );
    ParseResult {
        file: Some(file),
        errors,
    }
}

/// Number of left-associative binary precedence levels, loosest first.
const BINARY_LEVELS: usize = 11;
const RELATIONAL_LEVEL: usize = 7;
const SHIFT_LEVEL: usize = 8;

fn binary_op(level: usize, kind: &TokenKind) -> Option<BinaryOp> {
    let op = match (level, kind) {
        (0, TokenKind::QuestionQuestion) => BinaryOp::Coalesce,
        (1, TokenKind::OrOr) => BinaryOp::Or,
        (2, TokenKind::AndAnd) => BinaryOp::And,
        (3, TokenKind::Pipe) => BinaryOp::BitOr,
        (4, TokenKind::Caret) => BinaryOp::BitXor,
        (5, TokenKind::Amp) => BinaryOp::BitAnd,
        (6, TokenKind::EqEq) => BinaryOp::Eq,
        (6, TokenKind::BangEq) => BinaryOp::NotEq,
        (6, TokenKind::EqEqEq) => BinaryOp::StrictEq,
        (6, TokenKind::BangEqEq) => BinaryOp::StrictNotEq,
        (7, TokenKind::Lt) => BinaryOp::Lt,
        (7, TokenKind::Gt) => BinaryOp::Gt,
        (7, TokenKind::Le) => BinaryOp::Le,
        (7, TokenKind::Ge) => BinaryOp::Ge,
        (7, TokenKind::Keyword(Keyword::In)) => BinaryOp::In,
        (7, TokenKind::Keyword(Keyword::InstanceOf)) => BinaryOp::InstanceOf,
        (8, TokenKind::LtLt) => BinaryOp::Shl,
        (9, TokenKind::Plus) => BinaryOp::Add,
        (9, TokenKind::Minus) => BinaryOp::Sub,
        (10, TokenKind::Star) => BinaryOp::Mul,
        (10, TokenKind::Slash) => BinaryOp::Div,
        (10, TokenKind::Percent) => BinaryOp::Rem,
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Assign),
        TokenKind::PlusEq => Some(BinaryOp::AddAssign),
        TokenKind::MinusEq => Some(BinaryOp::SubAssign),
        TokenKind::StarEq => Some(BinaryOp::MulAssign),
        TokenKind::SlashEq => Some(BinaryOp::DivAssign),
        TokenKind::PercentEq => Some(BinaryOp::RemAssign),
        TokenKind::StarStarEq => Some(BinaryOp::ExpAssign),
        TokenKind::LtLtEq => Some(BinaryOp::ShlAssign),
        TokenKind::AmpEq => Some(BinaryOp::BitAndAssign),
        TokenKind::PipeEq => Some(BinaryOp::BitOrAssign),
        TokenKind::CaretEq => Some(BinaryOp::BitXorAssign),
        TokenKind::AndAndEq => Some(BinaryOp::AndAssign),
        TokenKind::OrOrEq => Some(BinaryOp::OrAssign),
        TokenKind::QuestionQuestionEq => Some(BinaryOp::CoalesceAssign),
        _ => None,
    }
}

fn modifier(kw: Keyword) -> Option<Modifier> {
    match kw {
        Keyword::Public => Some(Modifier::Public),
        Keyword::Private => Some(Modifier::Private),
        Keyword::Protected => Some(Modifier::Protected),
        Keyword::Static => Some(Modifier::Static),
        Keyword::Readonly => Some(Modifier::Readonly),
        Keyword::Abstract => Some(Modifier::Abstract),
        _ => None,
    }
}

/// Text usable as a binding name: identifiers and contextual keywords.
fn binding_text(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Ident(name) => Some(name.clone()),
        TokenKind::Keyword(kw) if kw.is_contextual() => Some(kw.as_str().to_string()),
        _ => None,
    }
}

/// Text usable as a property or member name: any word, private names included.
fn member_text(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Ident(name) | TokenKind::PrivateName(name) => Some(name.clone()),
        TokenKind::Keyword(kw) => Some(kw.as_str().to_string()),
        _ => None,
    }
}

struct Parser {
    tokens: Vec<Token>,
    /// Whether a line break separates each token from the one before it.
    line_breaks: Vec<bool>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(source: &str, tokens: Vec<Token>) -> Self {
        let mut line_breaks = Vec::with_capacity(tokens.len());
        let mut prev_end = 0;
        for token in &tokens {
            let gap = source.get(prev_end..token.span.range.start).unwrap_or("");
            let line_break =
                gap.contains(|c: char| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'));
            line_breaks.push(line_break);
            prev_end = token.span.range.end;
        }
        Self {
            tokens,
            line_breaks,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("lexer always yields Eof"))
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn previous(&self) -> &Token {
        if self.pos == 0 {
            self.current()
        } else {
            &self.tokens[self.pos - 1]
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn line_break_before(&self) -> bool {
        self.line_breaks.get(self.pos).copied().unwrap_or(false)
    }

    /// Whether the token at `offset` ends exactly where the next one starts.
    fn joined(&self, offset: usize) -> bool {
        match (
            self.tokens.get(self.pos + offset),
            self.tokens.get(self.pos + offset + 1),
        ) {
            (Some(a), Some(b)) => a.span.range.end == b.span.range.start,
            _ => false,
        }
    }

    /// `>>`, `>>>`, `>>=` or `>>>=` spelled by adjacent `>` tokens, with the
    /// number of tokens it spans.
    fn right_shift_here(&self) -> Option<(BinaryOp, usize)> {
        if !self.check(&TokenKind::Gt) || !self.joined(0) {
            return None;
        }
        match self.peek_kind(1) {
            TokenKind::Ge => Some((BinaryOp::ShrAssign, 2)),
            TokenKind::Gt if self.joined(1) => match self.peek_kind(2) {
                TokenKind::Gt => Some((BinaryOp::UShr, 3)),
                TokenKind::Ge => Some((BinaryOp::UShrAssign, 3)),
                _ => Some((BinaryOp::Shr, 2)),
            },
            TokenKind::Gt => Some((BinaryOp::Shr, 2)),
            _ => None,
        }
    }

    /// The binary operator of `level` under the cursor, with its token count.
    fn binary_op_here(&self, level: usize) -> Option<(BinaryOp, usize)> {
        match self.right_shift_here() {
            Some((op, len)) if level == SHIFT_LEVEL && !op.is_assignment() => Some((op, len)),
            Some(_) => None,
            None => binary_op(level, &self.current().kind).map(|op| (op, 1)),
        }
    }

    fn assign_op_here(&self) -> Option<(BinaryOp, usize)> {
        match self.right_shift_here() {
            Some((op, len)) if op.is_assignment() => Some((op, len)),
            Some(_) => None,
            None => assign_op(&self.current().kind).map(|op| (op, 1)),
        }
    }

    /// End of a statement: `;`, or an implied one before `}`, the end of
    /// input or a line break.
    fn expect_terminator(&mut self) -> Option<()> {
        if self.matches_token(&TokenKind::Semicolon)
            || matches!(self.current().kind, TokenKind::RBrace | TokenKind::Eof)
            || self.line_break_before()
        {
            return Some(());
        }
        self.error_here("expected `;` after statement");
        None
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.current().kind, TokenKind::Keyword(k) if k == kw)
    }

    fn matches_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn matches_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Option<()> {
        if self.matches_token(kind) {
            Some(())
        } else {
            self.error_here(message);
            None
        }
    }

    fn ast_span_from(&self, span: &tsol_lexer::Span) -> Span {
        Span {
            range: span.range.clone(),
        }
    }

    fn current_span(&self) -> Span {
        self.ast_span_from(&self.current().span)
    }

    /// Span from `start` up to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        let end = self.previous().span.range.end.max(start);
        Span::new(start, end)
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.errors.push(ParseError {
            message: message.into(),
            span,
        });
    }

    fn parse_binding_ident(&mut self, msg: &str) -> Option<Ident> {
        let tok = self.current().clone();
        match binding_text(&tok.kind) {
            Some(name) => {
                self.advance();
                Some(Ident::new(name, self.ast_span_from(&tok.span)))
            }
            None => {
                self.error_here(msg);
                None
            }
        }
    }

    fn parse_member_ident(&mut self, msg: &str) -> Option<Ident> {
        let tok = self.current().clone();
        let name = match &tok.kind {
            TokenKind::StringLiteral(s) => Some(s.clone()),
            other => member_text(other),
        };
        match name {
            Some(name) => {
                self.advance();
                Some(Ident::new(name, self.ast_span_from(&tok.span)))
            }
            None => {
                self.error_here(msg);
                None
            }
        }
    }

    /// Skip a `<...>` type-parameter or type-argument list if one starts here.
    fn skip_angle_brackets(&mut self) {
        if !self.check(&TokenKind::Lt) {
            return;
        }
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.current().kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ---------------- Items ----------------

    fn parse_file(&mut self) -> File {
        let mut items = Vec::new();
        while !self.is_at_end() {
            if let Some(item) = self.parse_item() {
                items.push(item);
            } else {
                self.skip_other_item();
            }
        }
        File { items }
    }

    fn parse_item(&mut self) -> Option<Item> {
        let start = self.current().span.range.start;
        let decorators = self.parse_decorators();
        let exported = self.matches_keyword(Keyword::Export);
        if exported {
            self.matches_keyword(Keyword::Default);
        }

        let kind = match self.current().kind {
            TokenKind::Keyword(Keyword::Import) if !exported && decorators.is_empty() => {
                ItemKind::Import(self.parse_import()?)
            }
            TokenKind::Keyword(Keyword::Class) => ItemKind::Class(self.parse_class(
                decorators,
                false,
                start,
            )?),
            TokenKind::Keyword(Keyword::Abstract)
                if matches!(self.peek_kind(1), TokenKind::Keyword(Keyword::Class)) =>
            {
                self.advance();
                ItemKind::Class(self.parse_class(decorators, true, start)?)
            }
            _ => {
                self.skip_other_item();
                ItemKind::Other
            }
        };

        Some(Item {
            exported,
            kind,
            span: self.span_from(start),
        })
    }

    /// Skip an unsupported top-level construct by balanced-token scanning.
    fn skip_other_item(&mut self) {
        let mut depth = 0usize;
        let mut consumed = false;
        while !self.is_at_end() {
            let kind = self.current().kind.clone();
            let starts_item = matches!(
                kind,
                TokenKind::Keyword(
                    Keyword::Export | Keyword::Import | Keyword::Class | Keyword::Abstract
                ) | TokenKind::At
            );
            if consumed && depth == 0 && starts_item {
                return;
            }
            self.advance();
            consumed = true;
            match kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.matches_token(&TokenKind::Semicolon);
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 => return,
                _ => {}
            }
        }
    }

    fn parse_import(&mut self) -> Option<Import> {
        self.advance(); // consume `import`
        let mut import = Import {
            default: None,
            namespace: None,
            named: Vec::new(),
            source: String::new(),
        };

        // `import type { X }` imports nothing at runtime but still binds names.
        if self.check_keyword(Keyword::Type)
            && matches!(self.peek_kind(1), TokenKind::LBrace | TokenKind::Ident(_))
        {
            self.advance();
        }

        if let TokenKind::StringLiteral(source) = &self.current().kind {
            import.source = source.clone();
            self.advance();
            self.matches_token(&TokenKind::Semicolon);
            return Some(import);
        }

        if binding_text(&self.current().kind).is_some() {
            import.default = Some(self.parse_binding_ident("expected default import name")?);
            if !self.matches_token(&TokenKind::Comma) {
                return self.finish_import(import);
            }
        }

        if self.matches_token(&TokenKind::Star) {
            if !self.matches_keyword(Keyword::As) {
                self.error_here("expected `as` after `*` in import");
                return None;
            }
            import.namespace = Some(self.parse_binding_ident("expected namespace name")?);
        } else if self.matches_token(&TokenKind::LBrace) {
            while !self.matches_token(&TokenKind::RBrace) {
                let imported = self.parse_member_ident("expected imported name")?;
                let local = if self.matches_keyword(Keyword::As) {
                    self.parse_binding_ident("expected local name after `as`")?
                } else {
                    imported.clone()
                };
                import.named.push(ImportSpecifier { imported, local });
                if self.matches_token(&TokenKind::RBrace) {
                    break;
                }
                self.expect(&TokenKind::Comma, "expected `,` or `}` in import list")?;
            }
        }

        self.finish_import(import)
    }

    fn finish_import(&mut self, mut import: Import) -> Option<Import> {
        if !self.matches_keyword(Keyword::From) {
            self.error_here("expected `from` in import declaration");
            return None;
        }
        match &self.current().kind {
            TokenKind::StringLiteral(source) => {
                import.source = source.clone();
                self.advance();
            }
            _ => {
                self.error_here("expected module path string");
                return None;
            }
        }
        self.matches_token(&TokenKind::Semicolon);
        Some(import)
    }

    fn parse_decorators(&mut self) -> Vec<Decorator> {
        let mut decorators = Vec::new();
        while self.check(&TokenKind::At) {
            let start = self.current().span.range.start;
            self.advance();
            let name = match self.parse_member_ident("expected decorator name after `@`") {
                Some(name) => name,
                None => break,
            };
            let args = if self.matches_token(&TokenKind::LParen) {
                Some(self.parse_argument_list())
            } else {
                None
            };
            decorators.push(Decorator {
                name,
                args,
                span: self.span_from(start),
            });
        }
        decorators
    }

    fn parse_class(
        &mut self,
        decorators: Vec<Decorator>,
        is_abstract: bool,
        start: usize,
    ) -> Option<Class> {
        self.advance(); // consume `class`
        let name = self.parse_binding_ident("expected class name after `class`")?;
        self.skip_angle_brackets();

        let extends = if self.matches_keyword(Keyword::Extends) {
            let mut path = vec![self.parse_binding_ident("expected base class name")?];
            while self.matches_token(&TokenKind::Dot) {
                path.push(self.parse_member_ident("expected name after `.`")?);
            }
            self.skip_angle_brackets();
            Some(path)
        } else {
            None
        };

        // `implements` clauses carry no runtime meaning.
        while !self.is_at_end() && !self.check(&TokenKind::LBrace) {
            self.advance();
        }
        self.expect(&TokenKind::LBrace, "expected `{` to start class body")?;

        let mut members = Vec::new();
        while !self.is_at_end() && !self.matches_token(&TokenKind::RBrace) {
            if self.matches_token(&TokenKind::Semicolon) {
                continue;
            }
            match self.parse_class_member() {
                Some(member) => members.push(member),
                None => self.synchronize_member(),
            }
        }

        debug!("parsed class `{}` with {} member(s)", name.name, members.len());
        Some(Class {
            name,
            extends,
            decorators,
            is_abstract,
            members,
            span: self.span_from(start),
        })
    }

    /// Skip to the end of a malformed class member.
    fn synchronize_member(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.current().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Whether the keyword under the cursor is a modifier rather than the
    /// member's own name (`readonly: number` names a property `readonly`).
    fn at_modifier(&self) -> Option<Modifier> {
        let kw = match self.current().kind {
            TokenKind::Keyword(kw) => kw,
            _ => return None,
        };
        let m = modifier(kw)?;
        let names_member = matches!(
            self.peek_kind(1),
            TokenKind::LParen
                | TokenKind::Colon
                | TokenKind::Eq
                | TokenKind::Semicolon
                | TokenKind::Question
                | TokenKind::Bang
                | TokenKind::Lt
                | TokenKind::RBrace
        );
        if names_member {
            None
        } else {
            Some(m)
        }
    }

    fn parse_class_member(&mut self) -> Option<ClassMember> {
        let start = self.current().span.range.start;
        let decorators = self.parse_decorators();
        let mut modifiers = Vec::new();
        while let Some(m) = self.at_modifier() {
            modifiers.push(m);
            self.advance();
        }

        let kind = match self.current().kind.clone() {
            TokenKind::Keyword(kw @ (Keyword::Get | Keyword::Set))
                if member_text(self.peek_kind(1)).is_some()
                    || matches!(self.peek_kind(1), TokenKind::StringLiteral(_)) =>
            {
                self.advance();
                let name = self.parse_member_ident("expected accessor name")?;
                self.expect(&TokenKind::LParen, "expected `(` after accessor name")?;
                let params = self.parse_param_list()?;
                let ret_type = self.parse_optional_annotation()?;
                let body = self.parse_optional_body()?;
                let kind = if kw == Keyword::Get {
                    AccessorKind::Get
                } else {
                    AccessorKind::Set
                };
                ClassMemberKind::Accessor {
                    kind,
                    name,
                    params,
                    ret_type,
                    body,
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let key = self.parse_binding_ident("expected index signature key name")?;
                self.expect(&TokenKind::Colon, "expected `:` after index key")?;
                let key_ty = self.parse_type_expr()?;
                self.expect(&TokenKind::RBracket, "expected `]` in index signature")?;
                self.expect(&TokenKind::Colon, "expected `:` after index signature")?;
                let value_ty = self.parse_type_expr()?;
                self.matches_token(&TokenKind::Semicolon);
                ClassMemberKind::IndexSignature {
                    key,
                    key_ty,
                    value_ty,
                }
            }
            TokenKind::Keyword(Keyword::Constructor)
                if matches!(self.peek_kind(1), TokenKind::LParen) =>
            {
                self.advance();
                self.advance(); // `(`
                let params = self.parse_param_list()?;
                let body = self.parse_optional_body()?;
                ClassMemberKind::Constructor { params, body }
            }
            _ => {
                let name = self.parse_member_ident("expected class member")?;
                // Optional (`?`) and definite-assignment (`!`) markers.
                if !self.matches_token(&TokenKind::Question) {
                    self.matches_token(&TokenKind::Bang);
                }
                if self.check(&TokenKind::LParen) || self.check(&TokenKind::Lt) {
                    self.skip_angle_brackets();
                    self.expect(&TokenKind::LParen, "expected `(` after method name")?;
                    let params = self.parse_param_list()?;
                    let ret_type = self.parse_optional_annotation()?;
                    let body = self.parse_optional_body()?;
                    ClassMemberKind::Method {
                        name,
                        params,
                        ret_type,
                        body,
                    }
                } else {
                    let ty = self.parse_optional_annotation()?;
                    let init = if self.matches_token(&TokenKind::Eq) {
                        Some(self.parse_assignment_expr()?)
                    } else {
                        None
                    };
                    self.expect_terminator()?;
                    ClassMemberKind::Property { name, ty, init }
                }
            }
        };

        Some(ClassMember {
            decorators,
            modifiers,
            kind,
            span: self.span_from(start),
        })
    }

    fn parse_optional_annotation(&mut self) -> Option<Option<TypeExpr>> {
        if self.matches_token(&TokenKind::Colon) {
            Some(Some(self.parse_type_expr()?))
        } else {
            Some(None)
        }
    }

    /// A body block, or `;` for a signature without one.
    fn parse_optional_body(&mut self) -> Option<Option<Block>> {
        if self.check(&TokenKind::LBrace) {
            Some(Some(self.parse_block()?))
        } else {
            self.matches_token(&TokenKind::Semicolon);
            Some(None)
        }
    }

    /// Parameters after an already-consumed `(`, through the closing `)`.
    fn parse_param_list(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.matches_token(&TokenKind::RParen) {
            return Some(params);
        }
        loop {
            let start = self.current().span.range.start;
            let mut modifiers = Vec::new();
            while let Some(m) = self.at_modifier() {
                modifiers.push(m);
                self.advance();
            }
            let name = self.parse_binding_ident("expected parameter name")?;
            let optional = self.matches_token(&TokenKind::Question);
            let ty = self.parse_optional_annotation()?;
            let default = if self.matches_token(&TokenKind::Eq) {
                Some(self.parse_assignment_expr()?)
            } else {
                None
            };
            params.push(Param {
                name,
                ty,
                optional,
                default,
                modifiers,
                span: self.span_from(start),
            });

            if self.matches_token(&TokenKind::RParen) {
                break;
            }
            self.expect(&TokenKind::Comma, "expected `,` or `)` in parameter list")?;
            // Trailing comma.
            if self.matches_token(&TokenKind::RParen) {
                break;
            }
        }
        Some(params)
    }

    // ---------------- Types ----------------

    fn parse_type_expr(&mut self) -> Option<TypeExpr> {
        let start = self.current().span.range.start;
        // Leading `|` is allowed in unions.
        self.matches_token(&TokenKind::Pipe);
        let first = self.parse_array_type()?;
        if !self.check(&TokenKind::Pipe) {
            return Some(first);
        }
        let mut types = vec![first];
        while self.matches_token(&TokenKind::Pipe) {
            types.push(self.parse_array_type()?);
        }
        Some(TypeExpr {
            kind: TypeExprKind::Union(types),
            span: self.span_from(start),
        })
    }

    fn parse_array_type(&mut self) -> Option<TypeExpr> {
        let start = self.current().span.range.start;
        let mut ty = self.parse_primary_type()?;
        while self.check(&TokenKind::LBracket) && matches!(self.peek_kind(1), TokenKind::RBracket)
        {
            self.advance();
            self.advance();
            ty = TypeExpr {
                kind: TypeExprKind::Array(Box::new(ty)),
                span: self.span_from(start),
            };
        }
        Some(ty)
    }

    fn parse_primary_type(&mut self) -> Option<TypeExpr> {
        let tok = self.current().clone();
        let keyword = match tok.kind {
            TokenKind::Keyword(Keyword::Number) => Some(TypeKeyword::Number),
            TokenKind::Keyword(Keyword::String) => Some(TypeKeyword::String),
            TokenKind::Keyword(Keyword::Boolean) => Some(TypeKeyword::Boolean),
            TokenKind::Keyword(Keyword::Any) => Some(TypeKeyword::Any),
            TokenKind::Keyword(Keyword::Void) => Some(TypeKeyword::Void),
            _ => None,
        };
        if let Some(kw) = keyword {
            self.advance();
            return Some(TypeExpr {
                kind: TypeExprKind::Keyword(kw),
                span: self.ast_span_from(&tok.span),
            });
        }

        if self.matches_token(&TokenKind::LParen) {
            let inner = self.parse_type_expr()?;
            self.expect(&TokenKind::RParen, "expected `)` after type")?;
            return Some(inner);
        }

        let first = match &tok.kind {
            TokenKind::Keyword(Keyword::Null | Keyword::Undefined) => {
                self.advance();
                Ident::new(member_text(&tok.kind)?, self.ast_span_from(&tok.span))
            }
            _ => self.parse_binding_ident("expected type")?,
        };
        let start = first.span.range.start;
        let mut path = vec![first];
        while self.matches_token(&TokenKind::Dot) {
            path.push(self.parse_member_ident("expected type name after `.`")?);
        }

        let mut args = Vec::new();
        if self.matches_token(&TokenKind::Lt) {
            loop {
                args.push(self.parse_type_expr()?);
                if self.matches_token(&TokenKind::Gt) {
                    break;
                }
                self.expect(&TokenKind::Comma, "expected `,` or `>` in type arguments")?;
            }
        }

        Some(TypeExpr {
            kind: TypeExprKind::Named { path, args },
            span: self.span_from(start),
        })
    }

    // ---------------- Statements and blocks ----------------

    fn parse_block(&mut self) -> Option<Block> {
        let start = self.current().span.range.start;
        self.expect(&TokenKind::LBrace, "expected `{` to start block")?;

        let mut stmts = Vec::new();
        while !self.is_at_end() && !self.matches_token(&TokenKind::RBrace) {
            if let Some(stmt) = self.parse_stmt() {
                stmts.push(stmt);
            } else {
                // Attempt to recover by skipping to next semicolon or closing brace
                while !self.is_at_end() {
                    if matches!(
                        self.current().kind,
                        TokenKind::Semicolon | TokenKind::RBrace
                    ) {
                        break;
                    }
                    self.advance();
                }
                self.matches_token(&TokenKind::Semicolon);
            }
        }

        Some(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    fn parse_stmt(&mut self) -> Option<Stmt> {
        let start = self.current().span.range.start;
        let kind = match self.current().kind {
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Keyword(kw @ (Keyword::Const | Keyword::Let | Keyword::Var)) => {
                self.advance();
                let decls = self.parse_var_declarators()?;
                self.expect_terminator()?;
                StmtKind::Var {
                    kind: var_kind(kw),
                    decls,
                }
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.advance();
                let value = if self.line_break_before()
                    || matches!(
                        self.current().kind,
                        TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
                    ) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect_terminator()?;
                StmtKind::Return { value }
            }
            TokenKind::Keyword(Keyword::If) => {
                self.advance();
                let cond = self.parse_paren_condition("if")?;
                let then_branch = Box::new(self.parse_stmt()?);
                let else_branch = if self.matches_keyword(Keyword::Else) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                StmtKind::If {
                    cond,
                    then_branch,
                    else_branch,
                }
            }
            TokenKind::Keyword(Keyword::While) => {
                self.advance();
                let cond = self.parse_paren_condition("while")?;
                let body = Box::new(self.parse_stmt()?);
                StmtKind::While { cond, body }
            }
            TokenKind::Keyword(Keyword::Do) => {
                self.advance();
                let body = Box::new(self.parse_stmt()?);
                if !self.matches_keyword(Keyword::While) {
                    self.error_here("expected `while` after `do` body");
                    return None;
                }
                let cond = self.parse_paren_condition("do-while")?;
                self.matches_token(&TokenKind::Semicolon);
                StmtKind::DoWhile { body, cond }
            }
            TokenKind::Keyword(Keyword::For) => self.parse_for_stmt()?,
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                self.expect_terminator()?;
                StmtKind::Break
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance();
                self.expect_terminator()?;
                StmtKind::Continue
            }
            TokenKind::Keyword(Keyword::Throw) => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect_terminator()?;
                StmtKind::Throw(value)
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect_terminator()?;
                StmtKind::Expr(expr)
            }
        };
        Some(Stmt {
            kind,
            span: self.span_from(start),
        })
    }

    fn parse_paren_condition(&mut self, construct: &str) -> Option<Expr> {
        self.expect(
            &TokenKind::LParen,
            &format!("expected `(` after `{construct}`"),
        )?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "expected `)` after condition")?;
        Some(cond)
    }

    fn parse_var_declarators(&mut self) -> Option<Vec<VarDeclarator>> {
        let mut decls = Vec::new();
        loop {
            let start = self.current().span.range.start;
            if matches!(self.current().kind, TokenKind::LBrace | TokenKind::LBracket) {
                self.error_here("destructuring patterns are not supported");
                return None;
            }
            let name = self.parse_binding_ident("expected variable name")?;
            self.matches_token(&TokenKind::Bang);
            let ty = self.parse_optional_annotation()?;
            let init = if self.matches_token(&TokenKind::Eq) {
                Some(self.parse_assignment_expr()?)
            } else {
                None
            };
            decls.push(VarDeclarator {
                name,
                ty,
                init,
                span: self.span_from(start),
            });
            if !self.matches_token(&TokenKind::Comma) {
                break;
            }
        }
        Some(decls)
    }

    fn parse_for_stmt(&mut self) -> Option<StmtKind> {
        self.advance(); // consume `for`
        self.expect(&TokenKind::LParen, "expected `(` after `for`")?;

        let init = match self.current().kind {
            TokenKind::Semicolon => None,
            TokenKind::Keyword(kw @ (Keyword::Const | Keyword::Let | Keyword::Var)) => {
                let start = self.current().span.range.start;
                self.advance();
                let each = matches!(
                    self.peek_kind(1),
                    TokenKind::Keyword(Keyword::Of | Keyword::In)
                );
                if each {
                    let binding = self.parse_binding_ident("expected loop variable")?;
                    let of = self.matches_keyword(Keyword::Of);
                    if !of {
                        self.advance(); // `in`
                    }
                    let iterable = self.parse_expr()?;
                    self.expect(&TokenKind::RParen, "expected `)` after for-each header")?;
                    let body = Box::new(self.parse_stmt()?);
                    return Some(StmtKind::ForEach {
                        kind: var_kind(kw),
                        binding,
                        of,
                        iterable,
                        body,
                    });
                }
                let decls = self.parse_var_declarators()?;
                Some(Box::new(Stmt {
                    kind: StmtKind::Var {
                        kind: var_kind(kw),
                        decls,
                    },
                    span: self.span_from(start),
                }))
            }
            _ => {
                let expr = self.parse_expr()?;
                let span = expr.span.clone();
                Some(Box::new(Stmt {
                    kind: StmtKind::Expr(expr),
                    span,
                }))
            }
        };
        self.expect(&TokenKind::Semicolon, "expected `;` after for initializer")?;

        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon, "expected `;` after for condition")?;

        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RParen, "expected `)` after for header")?;

        let body = Box::new(self.parse_stmt()?);
        Some(StmtKind::For {
            init,
            test,
            update,
            body,
        })
    }

    // ---------------- Expressions ----------------

    fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_assignment_expr()
    }

    /// Parse assignment expressions (lowest precedence, right-associative).
    fn parse_assignment_expr(&mut self) -> Option<Expr> {
        let target = self.parse_conditional()?;
        match self.assign_op_here() {
            Some((op, len)) => {
                for _ in 0..len {
                    self.advance();
                }
                let value = self.parse_assignment_expr()?;
                let span = target.span.to(&value.span);
                Some(Expr {
                    kind: ExprKind::Binary {
                        op,
                        left: Box::new(target),
                        right: Box::new(value),
                    },
                    span,
                })
            }
            None => Some(target),
        }
    }

    fn parse_conditional(&mut self) -> Option<Expr> {
        let test = self.parse_binary(0)?;
        if !self.matches_token(&TokenKind::Question) {
            return Some(test);
        }
        let consequent = self.parse_assignment_expr()?;
        self.expect(&TokenKind::Colon, "expected `:` in conditional expression")?;
        let alternate = self.parse_assignment_expr()?;
        let span = test.span.to(&alternate.span);
        Some(Expr {
            kind: ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        })
    }

    fn parse_binary(&mut self, level: usize) -> Option<Expr> {
        if level == BINARY_LEVELS {
            return self.parse_exponent();
        }
        let mut left = self.parse_binary(level + 1)?;
        loop {
            if level == RELATIONAL_LEVEL && !self.line_break_before() {
                let cast = if self.check_keyword(Keyword::As) {
                    Some(true)
                } else if self.check_keyword(Keyword::Satisfies) {
                    Some(false)
                } else {
                    None
                };
                if let Some(is_as) = cast {
                    left = self.parse_type_assertion(left, is_as)?;
                    continue;
                }
            }
            let Some((op, len)) = self.binary_op_here(level) else {
                break;
            };
            for _ in 0..len {
                self.advance();
            }
            let right = self.parse_binary(level + 1)?;
            let span = left.span.to(&right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            };
        }
        Some(left)
    }

    /// `expr as T`, `expr as const` or `expr satisfies T`, after `expr`.
    fn parse_type_assertion(&mut self, expr: Expr, is_as: bool) -> Option<Expr> {
        self.advance(); // `as` or `satisfies`
        let ty = if is_as && self.check_keyword(Keyword::Const) {
            let ident = Ident::new("const", self.current_span());
            self.advance();
            TypeExpr {
                span: ident.span.clone(),
                kind: TypeExprKind::Named {
                    path: vec![ident],
                    args: Vec::new(),
                },
            }
        } else {
            self.parse_type_expr()?
        };
        let span = expr.span.to(&ty.span);
        let expr = Box::new(expr);
        let kind = if is_as {
            ExprKind::As { expr, ty }
        } else {
            ExprKind::Satisfies { expr, ty }
        };
        Some(Expr { kind, span })
    }

    fn parse_exponent(&mut self) -> Option<Expr> {
        let base = self.parse_unary()?;
        if !self.matches_token(&TokenKind::StarStar) {
            return Some(base);
        }
        let exponent = self.parse_exponent()?;
        let span = base.span.to(&exponent.span);
        Some(Expr {
            kind: ExprKind::Binary {
                op: BinaryOp::Exp,
                left: Box::new(base),
                right: Box::new(exponent),
            },
            span,
        })
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current().span.range.start;
        let op = match self.current().kind {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Keyword(Keyword::Typeof) => Some(UnaryOp::Typeof),
            TokenKind::Keyword(Keyword::Void) => Some(UnaryOp::Void),
            TokenKind::Keyword(Keyword::Delete) => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let expr = self.parse_unary()?;
            return Some(Expr {
                kind: ExprKind::Unary {
                    op,
                    expr: Box::new(expr),
                },
                span: self.span_from(start),
            });
        }

        let update = match self.current().kind {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let expr = self.parse_unary()?;
            return Some(Expr {
                kind: ExprKind::Update {
                    op,
                    prefix: true,
                    expr: Box::new(expr),
                },
                span: self.span_from(start),
            });
        }

        let expr = self.parse_postfix()?;
        let update = match self.current().kind {
            _ if self.line_break_before() => None,
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        match update {
            Some(op) => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::Update {
                        op,
                        prefix: false,
                        expr: Box::new(expr),
                    },
                    span: self.span_from(start),
                })
            }
            None => Some(expr),
        }
    }

    /// Calls, member and index accesses, `?.` links and non-null assertions.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check(&TokenKind::QuestionDot) {
                expr = self.parse_optional_link(expr)?;
            } else if self.check(&TokenKind::Bang) && !self.line_break_before() {
                self.advance();
                let span = self.span_from(expr.span.range.start);
                expr = Expr {
                    kind: ExprKind::NonNull(Box::new(expr)),
                    span,
                };
            } else if self.matches_token(&TokenKind::LParen) {
                let args = self.parse_argument_list();
                let span = self.span_from(expr.span.range.start);
                expr = Expr {
                    kind: ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                };
            } else if self.check(&TokenKind::Dot) {
                expr = self.parse_member_suffix(expr)?;
            } else if self.matches_token(&TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket, "expected `]` after index")?;
                let span = self.span_from(expr.span.range.start);
                expr = Expr {
                    kind: ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                };
            } else {
                break;
            }
        }
        Some(expr)
    }

    /// `?.name`, `?.[index]` or `?.(args)` applied to `object`.
    fn parse_optional_link(&mut self, object: Expr) -> Option<Expr> {
        let start = object.span.range.start;
        let link = if self.peek_kind(1) == &TokenKind::LParen {
            self.advance();
            self.advance();
            let args = self.parse_argument_list();
            Expr {
                kind: ExprKind::Call {
                    callee: Box::new(object),
                    args,
                },
                span: self.span_from(start),
            }
        } else if self.peek_kind(1) == &TokenKind::LBracket {
            self.advance();
            self.advance();
            let index = self.parse_expr()?;
            self.expect(&TokenKind::RBracket, "expected `]` after index")?;
            Expr {
                kind: ExprKind::Index {
                    object: Box::new(object),
                    index: Box::new(index),
                },
                span: self.span_from(start),
            }
        } else {
            self.parse_member_suffix(object)?
        };
        let span = link.span.clone();
        Some(Expr {
            kind: ExprKind::OptionalChain(Box::new(link)),
            span,
        })
    }

    fn parse_member_suffix(&mut self, object: Expr) -> Option<Expr> {
        self.advance(); // consume `.` or `?.`
        let tok = self.current().clone();
        let name = match member_text(&tok.kind) {
            Some(name) => name,
            None => {
                self.error_here("expected member name after `.`");
                return None;
            }
        };
        self.advance();
        let member = Ident::new(name, self.ast_span_from(&tok.span));
        let span = object.span.to(&member.span);
        Some(Expr {
            kind: ExprKind::Member {
                object: Box::new(object),
                member,
            },
            span,
        })
    }

    /// Arguments after an already-consumed `(`, through the closing `)`.
    fn parse_argument_list(&mut self) -> Vec<Expr> {
        let mut args = Vec::new();
        if self.matches_token(&TokenKind::RParen) {
            return args;
        }
        while let Some(arg) = self.parse_assignment_expr() {
            args.push(arg);
            if self.matches_token(&TokenKind::RParen) {
                break;
            }
            if !self.matches_token(&TokenKind::Comma) {
                self.error_here("expected `,` or `)` in argument list");
                break;
            }
            if self.matches_token(&TokenKind::RParen) {
                break;
            }
        }
        args
    }

    fn literal(&mut self, kind: LiteralKind) -> Expr {
        let span = self.current_span();
        self.advance();
        Expr {
            kind: ExprKind::Literal(Literal {
                kind,
                span: span.clone(),
            }),
            span,
        }
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let tok = self.current().clone();
        let span = self.ast_span_from(&tok.span);
        match tok.kind {
            TokenKind::NumberLiteral(raw) => Some(self.literal(LiteralKind::Number(raw))),
            TokenKind::StringLiteral(s) => Some(self.literal(LiteralKind::String(s))),
            TokenKind::TemplateLiteral(raw) => Some(self.literal(LiteralKind::Template(raw))),
            TokenKind::Keyword(Keyword::True) => Some(self.literal(LiteralKind::Bool(true))),
            TokenKind::Keyword(Keyword::False) => Some(self.literal(LiteralKind::Bool(false))),
            TokenKind::Keyword(Keyword::Null) => Some(self.literal(LiteralKind::Null)),
            TokenKind::Keyword(Keyword::Undefined) => Some(self.literal(LiteralKind::Undefined)),
            TokenKind::Keyword(Keyword::This) => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::This,
                    span,
                })
            }
            TokenKind::Keyword(Keyword::Super) => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::Super,
                    span,
                })
            }
            TokenKind::Keyword(Keyword::New) => self.parse_new_expr(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "expected `)` after expression")?;
                Some(Expr {
                    kind: ExprKind::Paren(Box::new(inner)),
                    span: self.span_from(span.range.start),
                })
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.matches_token(&TokenKind::RBracket) {
                    elements.push(self.parse_assignment_expr()?);
                    if self.matches_token(&TokenKind::RBracket) {
                        break;
                    }
                    self.expect(&TokenKind::Comma, "expected `,` or `]` in array literal")?;
                }
                Some(Expr {
                    kind: ExprKind::Array(elements),
                    span: self.span_from(span.range.start),
                })
            }
            TokenKind::LBrace => self.parse_object_literal(),
            ref other => match binding_text(other) {
                Some(name) => {
                    self.advance();
                    Some(Expr {
                        kind: ExprKind::Ident(Ident::new(name, span.clone())),
                        span,
                    })
                }
                None => {
                    self.error_here("expected expression");
                    None
                }
            },
        }
    }

    fn parse_new_expr(&mut self) -> Option<Expr> {
        let start = self.current().span.range.start;
        self.advance(); // consume `new`
        let mut callee = self.parse_primary()?;
        while self.check(&TokenKind::Dot) {
            callee = self.parse_member_suffix(callee)?;
        }
        self.skip_angle_brackets();
        let args = if self.matches_token(&TokenKind::LParen) {
            self.parse_argument_list()
        } else {
            Vec::new()
        };
        Some(Expr {
            kind: ExprKind::New {
                callee: Box::new(callee),
                args,
            },
            span: self.span_from(start),
        })
    }

    fn parse_object_literal(&mut self) -> Option<Expr> {
        let start = self.current().span.range.start;
        self.advance(); // consume `{`
        let mut props = Vec::new();
        while !self.matches_token(&TokenKind::RBrace) {
            let key = self.parse_member_ident("expected property name in object literal")?;
            let value = if self.matches_token(&TokenKind::Colon) {
                self.parse_assignment_expr()?
            } else {
                // Shorthand `{ sender }`.
                Expr {
                    kind: ExprKind::Ident(key.clone()),
                    span: key.span.clone(),
                }
            };
            props.push(ObjectProp { key, value });
            if self.matches_token(&TokenKind::RBrace) {
                break;
            }
            self.expect(&TokenKind::Comma, "expected `,` or `}` in object literal")?;
        }
        Some(Expr {
            kind: ExprKind::Object(props),
            span: self.span_from(start),
        })
    }
}

fn var_kind(kw: Keyword) -> VarKind {
    match kw {
        Keyword::Const => VarKind::Const,
        Keyword::Let => VarKind::Let,
        _ => VarKind::Var,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> File {
        let result = parse_str(src);
        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        result.file.expect("file")
    }

    fn only_class(file: &File) -> &Class {
        let classes: Vec<&Class> = file.classes().collect();
        assert_eq!(classes.len(), 1, "expected exactly one class");
        classes[0]
    }

    fn method_body<'a>(class: &'a Class, method: &str) -> &'a [Stmt] {
        for member in &class.members {
            if let ClassMemberKind::Method { name, body, .. } = &member.kind {
                if name.name == method {
                    return &body.as_ref().expect("method body").stmts;
                }
            }
        }
        panic!("method `{method}` not found");
    }

    #[test]
    fn parses_imports_with_aliases() {
        let file = parse_ok(r#"import { ETH, ADDRESS as Addr } from './eth';"#);
        let import = file.imports().next().expect("import");
        assert_eq!(import.source, "./eth");
        assert_eq!(import.named.len(), 2);
        assert_eq!(import.named[0].local.name, "ETH");
        assert_eq!(import.named[1].imported.name, "ADDRESS");
        assert_eq!(import.named[1].local.name, "Addr");
    }

    #[test]
    fn parses_class_members_in_order() {
        let src = r#"
            export class Bank extends Contract {
                #balances: Map<ADDRESS, UNSIGNED_INT>;
                owner: ADDRESS;
                constructor() { super(); }
                @ReadonlyView
                balance(): number { return this.#balances[this.sender]; }
                #audit(limit: number) {}
            }
        "#;
        let file = parse_ok(src);
        let class = only_class(&file);
        assert_eq!(class.name.name, "Bank");
        assert_eq!(class.extends.as_ref().map(|p| p[0].name.as_str()), Some("Contract"));
        let kinds: Vec<&str> = class.members.iter().map(|m| m.kind.kind_name()).collect();
        assert_eq!(
            kinds,
            vec!["Property", "Property", "Constructor", "Method", "Method"]
        );
        assert_eq!(class.members[3].decorators[0].name.name, "ReadonlyView");
        match &class.members[0].kind {
            ClassMemberKind::Property { name, ty, .. } => {
                assert_eq!(name.name, "#balances");
                assert_eq!(
                    ty.as_ref().map(|t| t.to_string()).as_deref(),
                    Some("Map<ADDRESS, UNSIGNED_INT>")
                );
            }
            other => panic!("unexpected member {other:?}"),
        }
    }

    #[test]
    fn modifier_keywords_can_name_members() {
        let file = parse_ok("class A { public static readonly: number; private x = 1; }");
        let class = only_class(&file);
        assert_eq!(class.members[0].modifiers, vec![Modifier::Public, Modifier::Static]);
        match &class.members[0].kind {
            ClassMemberKind::Property { name, .. } => assert_eq!(name.name, "readonly"),
            other => panic!("unexpected member {other:?}"),
        }
        assert_eq!(class.members[1].modifiers, vec![Modifier::Private]);
    }

    #[test]
    fn skips_unsupported_top_level_items() {
        let src = r#"
            export type UNSIGNED_INT = number;
            export interface Event { [key: string]: number; }
            export const ReadonlyView = <T>(a: Object, b: string) => {};
            function helper() { return 1; }
            class Kept { x: number; }
        "#;
        let file = parse_ok(src);
        let others = file
            .items
            .iter()
            .filter(|i| matches!(i.kind, ItemKind::Other))
            .count();
        assert_eq!(others, 4);
        assert_eq!(only_class(&file).name.name, "Kept");
    }

    #[test]
    fn binary_precedence_nests_tighter_operators() {
        let file = parse_ok("class A { f() { x = a + b * c <= d && e; } }");
        let body = method_body(only_class(&file), "f");
        let StmtKind::Expr(expr) = &body[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op, right, .. } = &expr.kind else {
            panic!("expected assignment");
        };
        assert_eq!(*op, BinaryOp::Assign);
        let ExprKind::Binary { op, left, .. } = &right.kind else {
            panic!("expected logical and");
        };
        assert_eq!(*op, BinaryOp::And);
        let ExprKind::Binary { op, left, .. } = &left.kind else {
            panic!("expected comparison");
        };
        assert_eq!(*op, BinaryOp::Le);
        let ExprKind::Binary { op, right, .. } = &left.kind else {
            panic!("expected addition");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(
            right.kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn parses_statement_forms() {
        let src = r#"
            class A {
                f(n: number): number {
                    const a = 1, b: number = 2;
                    let c;
                    if (a < b) { return a; } else return b;
                    while (n > 0) n -= 1;
                    for (let i = 0; i < n; i++) {}
                    for (const x of xs) {}
                    do { n++; } while (n < 3);
                    throw new Error("bad");
                }
            }
        "#;
        let file = parse_ok(src);
        let body = method_body(only_class(&file), "f");
        let kinds: Vec<&str> = body.iter().map(|s| s.kind.kind_name()).collect();
        assert_eq!(
            kinds,
            vec![
                "VariableStatement",
                "VariableStatement",
                "If",
                "While",
                "For",
                "ForOf",
                "DoWhile",
                "Throw"
            ]
        );
        match &body[0].kind {
            StmtKind::Var { kind, decls } => {
                assert_eq!(*kind, VarKind::Const);
                assert_eq!(decls.len(), 2);
                assert!(decls[0].ty.is_none());
                assert!(decls[1].ty.is_some());
            }
            other => panic!("unexpected statement {other:?}"),
        }
        match &body[1].kind {
            StmtKind::Var { decls, .. } => assert!(decls[0].init.is_none()),
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn parses_private_member_access_and_intrinsic_calls() {
        let file = parse_ok("class A { f() { ETH.assert(this.#balances[x] >= 0); } }");
        let body = method_body(only_class(&file), "f");
        let StmtKind::Expr(expr) = &body[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Call { callee, args } = &expr.kind else {
            panic!("expected call");
        };
        let ExprKind::Member { object, member } = &callee.kind else {
            panic!("expected member callee");
        };
        assert!(matches!(&object.kind, ExprKind::Ident(id) if id.name == "ETH"));
        assert_eq!(member.name, "assert");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn parses_type_forms() {
        let file = parse_ok(
            "class A { a: number[]; b: string | ADDRESS; c: Map<ADDRESS, Map<ADDRESS, number>>; d: ns.Point; }",
        );
        let rendered: Vec<String> = only_class(&file)
            .members
            .iter()
            .filter_map(|m| match &m.kind {
                ClassMemberKind::Property { ty: Some(ty), .. } => Some(ty.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                "number[]",
                "string | ADDRESS",
                "Map<ADDRESS, Map<ADDRESS, number>>",
                "ns.Point"
            ]
        );
    }

    #[test]
    fn reports_errors_with_spans() {
        let src = "class A { f() { const = 1; } }";
        let result = parse_str(src);
        assert!(!result.errors.is_empty());
        let err = &result.errors[0];
        assert_eq!(err.message, "expected variable name");
        assert_eq!(&src[err.span.range.clone()], "=");
    }

    fn statement_kinds(src: &str) -> Vec<&'static str> {
        let file = parse_ok(src);
        method_body(only_class(&file), "f")
            .iter()
            .map(|s| s.kind.kind_name())
            .collect()
    }

    /// The expression of the single statement in `f() { <stmt> }`.
    fn expr_of(stmt: &str) -> Expr {
        let file = parse_ok(&format!("class A {{ f() {{ {stmt} }} }}"));
        let body = method_body(only_class(&file), "f");
        assert_eq!(body.len(), 1, "expected one statement in {stmt:?}");
        match &body[0].kind {
            StmtKind::Expr(expr) => expr.clone(),
            other => panic!("unexpected statement {other:?}"),
        }
    }

    fn binary_parts(expr: &Expr) -> (BinaryOp, &Expr, &Expr) {
        match &expr.kind {
            ExprKind::Binary { op, left, right } => (*op, left, right),
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn statements_on_one_line_need_a_semicolon() {
        let result = parse_str("class A { f() { y = a b; } }");
        assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
        assert_eq!(result.errors[0].message, "expected `;` after statement");

        let result = parse_str("class A { f() { let x = 1 let y = 2; } }");
        assert_eq!(result.errors[0].message, "expected `;` after statement");

        let result = parse_str("class A { x: number y: number; }");
        assert_eq!(result.errors[0].message, "expected `;` after statement");
    }

    #[test]
    fn line_breaks_end_statements() {
        let src = "class A {\n  x = 1\n  f() {\n    x = 1\n    y = 2\n    return\n    z\n  }\n}\n";
        assert_eq!(
            statement_kinds(src),
            [
                "ExpressionStatement",
                "ExpressionStatement",
                "Return",
                "ExpressionStatement"
            ]
        );
        let file = parse_ok(src);
        let body = method_body(only_class(&file), "f");
        assert!(matches!(body[2].kind, StmtKind::Return { value: None }));
    }

    #[test]
    fn postfix_update_does_not_cross_a_line_break() {
        assert_eq!(
            statement_kinds("class A { f() {\n a\n ++b\n } }"),
            ["ExpressionStatement", "ExpressionStatement"]
        );
    }

    #[test]
    fn relational_keywords_are_binary_operators() {
        let expr = expr_of("y = a instanceof B;");
        let (_, _, value) = binary_parts(&expr);
        assert_eq!(binary_parts(value).0, BinaryOp::InstanceOf);

        let expr = expr_of("y = k in o && ok;");
        let (_, _, value) = binary_parts(&expr);
        let (op, left, _) = binary_parts(value);
        assert_eq!(op, BinaryOp::And);
        assert_eq!(binary_parts(left).0, BinaryOp::In);
    }

    #[test]
    fn parses_type_assertions_and_non_null() {
        let expr = expr_of("x = a + b as UNSIGNED_INT;");
        let (_, _, value) = binary_parts(&expr);
        let ExprKind::As { expr: inner, ty } = &value.kind else {
            panic!("expected `as` expression, got {value:?}");
        };
        assert_eq!(ty.to_string(), "UNSIGNED_INT");
        assert_eq!(binary_parts(inner).0, BinaryOp::Add);

        let expr = expr_of("x = [1] as const;");
        let (_, _, value) = binary_parts(&expr);
        assert!(matches!(&value.kind, ExprKind::As { ty, .. } if ty.to_string() == "const"));

        let expr = expr_of("x = cfg satisfies Config;");
        let (_, _, value) = binary_parts(&expr);
        assert_eq!(value.kind.kind_name(), "SatisfiesExpression");

        let expr = expr_of("this.owner!.balance = 1;");
        let (_, target, _) = binary_parts(&expr);
        let ExprKind::Member { object, .. } = &target.kind else {
            panic!("expected member target");
        };
        assert_eq!(object.kind.kind_name(), "NonNullExpression");
    }

    #[test]
    fn delete_and_void_are_unary_operators() {
        let expr = expr_of("delete this.names[a];");
        assert!(matches!(expr.kind, ExprKind::Unary { op: UnaryOp::Delete, .. }));
        let expr = expr_of("void 0;");
        assert!(matches!(expr.kind, ExprKind::Unary { op: UnaryOp::Void, .. }));
    }

    #[test]
    fn shift_operators_join_adjacent_greater_than_tokens() {
        let expr = expr_of("x = a >> 1 >>> b << c;");
        let (_, _, value) = binary_parts(&expr);
        let (op, left, _) = binary_parts(value);
        assert_eq!(op, BinaryOp::Shl);
        let (op, left, _) = binary_parts(left);
        assert_eq!(op, BinaryOp::UShr);
        assert_eq!(binary_parts(left).0, BinaryOp::Shr);

        let expr = expr_of("x = a + b >> c < d;");
        let (_, _, value) = binary_parts(&expr);
        let (op, left, _) = binary_parts(value);
        assert_eq!(op, BinaryOp::Lt);
        let (op, left, _) = binary_parts(left);
        assert_eq!(op, BinaryOp::Shr);
        assert_eq!(binary_parts(left).0, BinaryOp::Add);

        assert_eq!(binary_parts(&expr_of("x >>= 2;")).0, BinaryOp::ShrAssign);
        assert_eq!(binary_parts(&expr_of("x >>>= 2;")).0, BinaryOp::UShrAssign);

        let result = parse_str("class A { f() { x = a > > b; } }");
        assert!(!result.errors.is_empty());
    }

    #[test]
    fn parses_compound_assignments() {
        let stmts = [
            "x &&= y;", "x ||= y;", "x ??= y;", "x **= 2;", "x <<= 1;", "x &= 1;", "x |= 1;",
            "x ^= 1;",
        ];
        let ops: Vec<BinaryOp> = stmts
            .iter()
            .map(|stmt| binary_parts(&expr_of(stmt)).0)
            .collect();
        assert_eq!(
            ops,
            [
                BinaryOp::AndAssign,
                BinaryOp::OrAssign,
                BinaryOp::CoalesceAssign,
                BinaryOp::ExpAssign,
                BinaryOp::ShlAssign,
                BinaryOp::BitAndAssign,
                BinaryOp::BitOrAssign,
                BinaryOp::BitXorAssign,
            ]
        );
    }

    #[test]
    fn optional_chaining_wraps_each_link() {
        let expr = expr_of("a?.b?.[0]?.(1);");
        let ExprKind::OptionalChain(call) = &expr.kind else {
            panic!("expected optional call, got {expr:?}");
        };
        let ExprKind::Call { callee, args } = &call.kind else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 1);
        let ExprKind::OptionalChain(index) = &callee.kind else {
            panic!("expected optional index");
        };
        let ExprKind::Index { object, .. } = &index.kind else {
            panic!("expected index");
        };
        let ExprKind::OptionalChain(member) = &object.kind else {
            panic!("expected optional member");
        };
        assert!(matches!(&member.kind, ExprKind::Member { member, .. } if member.name == "b"));
    }

    #[test]
    fn lexer_errors_are_reported_as_parse_errors() {
        let src = r#"class A { s: string = "\x4"; }"#;
        let result = parse_str(src);
        assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
        assert_eq!(result.errors[0].message, "invalid hexadecimal escape sequence");
        assert_eq!(&src[result.errors[0].span.range.clone()], "\\x4");
    }

    #[test]
    fn keeps_numeric_literal_text() {
        let file = parse_ok("class A { x: number = 1_000_000; }");
        match &only_class(&file).members[0].kind {
            ClassMemberKind::Property {
                init: Some(expr), ..
            } => assert!(matches!(
                &expr.kind,
                ExprKind::Literal(Literal { kind: LiteralKind::Number(raw), .. }) if raw == "1_000_000"
            )),
            other => panic!("unexpected member {other:?}"),
        }
    }
}
