//! Syntax tree for the contract dialect.
//!
//! Every syntax category (expression, statement, class member, type
//! annotation) is one sum type, so each consumer can match it totally. The
//! tree is produced once by the parser and only read afterwards.

use std::fmt;
use std::ops::Range;

/// Leading sigil that marks a declared name as private.
pub const PRIVATE_MARKER: char = '#';

/// A span in the source file, represented as a byte range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub range: Range<usize>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { range: start..end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span::new(self.range.start, other.range.end.max(self.range.end))
    }
}

/// An identifier with its source span.
///
/// Private names keep their leading [`PRIVATE_MARKER`]; renderers strip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Whether the name carries the private-field marker.
    pub fn is_private(&self) -> bool {
        self.name.starts_with(PRIVATE_MARKER)
    }

    /// The name with any private-field marker removed.
    pub fn bare_name(&self) -> &str {
        strip_private_marker(&self.name)
    }
}

/// Remove a single leading private-field marker, if present.
pub fn strip_private_marker(name: &str) -> &str {
    name.strip_prefix(PRIVATE_MARKER).unwrap_or(name)
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    /// Numeric text exactly as written in the source.
    Number(String),
    String(String),
    Bool(bool),
    Null,
    Undefined,
    /// Raw body of a backtick literal.
    Template(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

/// Binary operators, assignments included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Coalesce,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    In,
    InstanceOf,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ExpAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    AndAssign,
    OrAssign,
    CoalesceAssign,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Coalesce => "??",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::RemAssign => "%=",
            BinaryOp::ExpAssign => "**=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::UShrAssign => ">>>=",
            BinaryOp::BitAndAssign => "&=",
            BinaryOp::BitOrAssign => "|=",
            BinaryOp::BitXorAssign => "^=",
            BinaryOp::AndAssign => "&&=",
            BinaryOp::OrAssign => "||=",
            BinaryOp::CoalesceAssign => "??=",
        }
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::RemAssign
                | BinaryOp::ExpAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
                | BinaryOp::UShrAssign
                | BinaryOp::BitAndAssign
                | BinaryOp::BitOrAssign
                | BinaryOp::BitXorAssign
                | BinaryOp::AndAssign
                | BinaryOp::OrAssign
                | BinaryOp::CoalesceAssign
        )
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,    // !
    Neg,    // -
    Plus,   // +
    BitNot, // ~
    Typeof,
    Void,
    Delete,
}

/// `++` / `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// One `key: value` entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProp {
    pub key: Ident,
    pub value: Expr,
}

/// Expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(Ident),
    This,
    Super,
    /// `object.member`; `member` may be a private name.
    Member {
        object: Box<Expr>,
        member: Ident,
    },
    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        expr: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Paren(Box<Expr>),
    Array(Vec<Expr>),
    Object(Vec<ObjectProp>),
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `expr as T`
    As {
        expr: Box<Expr>,
        ty: TypeExpr,
    },
    /// `expr satisfies T`
    Satisfies {
        expr: Box<Expr>,
        ty: TypeExpr,
    },
    /// `expr!`
    NonNull(Box<Expr>),
    /// One `?.` link: the wrapped member, index or call was reached optionally.
    OptionalChain(Box<Expr>),
}

impl ExprKind {
    /// Short name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprKind::Literal(lit) => match lit.kind {
                LiteralKind::Number(_) => "NumericLiteral",
                LiteralKind::String(_) => "StringLiteral",
                LiteralKind::Bool(_) => "BooleanLiteral",
                LiteralKind::Null => "NullLiteral",
                LiteralKind::Undefined => "Undefined",
                LiteralKind::Template(_) => "TemplateLiteral",
            },
            ExprKind::Ident(_) => "Identifier",
            ExprKind::This => "This",
            ExprKind::Super => "Super",
            ExprKind::Member { .. } => "MemberAccess",
            ExprKind::Index { .. } => "IndexAccess",
            ExprKind::Call { .. } => "Call",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Update { .. } => "Update",
            ExprKind::Conditional { .. } => "Conditional",
            ExprKind::Paren(_) => "Parenthesized",
            ExprKind::Array(_) => "ArrayLiteral",
            ExprKind::Object(_) => "ObjectLiteral",
            ExprKind::New { .. } => "New",
            ExprKind::As { .. } => "AsExpression",
            ExprKind::Satisfies { .. } => "SatisfiesExpression",
            ExprKind::NonNull(_) => "NonNullExpression",
            ExprKind::OptionalChain(_) => "OptionalChain",
        }
    }

    /// Direct subexpressions, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            ExprKind::Literal(_) | ExprKind::Ident(_) | ExprKind::This | ExprKind::Super => {
                Vec::new()
            }
            ExprKind::Member { object, .. } => vec![&**object],
            ExprKind::Index { object, index } => vec![&**object, &**index],
            ExprKind::Call { callee, args } | ExprKind::New { callee, args } => {
                std::iter::once(&**callee).chain(args).collect()
            }
            ExprKind::Binary { left, right, .. } => vec![&**left, &**right],
            ExprKind::Unary { expr, .. }
            | ExprKind::Update { expr, .. }
            | ExprKind::As { expr, .. }
            | ExprKind::Satisfies { expr, .. }
            | ExprKind::NonNull(expr)
            | ExprKind::OptionalChain(expr)
            | ExprKind::Paren(expr) => vec![&**expr],
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => vec![&**test, &**consequent, &**alternate],
            ExprKind::Array(elements) => elements.iter().collect(),
            ExprKind::Object(props) => props.iter().map(|prop| &prop.value).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// A block of statements delimited by `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Declaration keyword of a variable statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

/// One `name[: Type][ = init]` binding of a variable statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Var {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    Expr(Expr),
    Return {
        value: Option<Expr>,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        init: Option<Box<Stmt>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `for (const x of xs)` / `for (const k in obj)`.
    ForEach {
        kind: VarKind,
        binding: Ident,
        /// `true` for `of`, `false` for `in`.
        of: bool,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Break,
    Continue,
    Throw(Expr),
    Block(Block),
    Empty,
}

impl StmtKind {
    /// Short name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StmtKind::Var { .. } => "VariableStatement",
            StmtKind::Expr(_) => "ExpressionStatement",
            StmtKind::Return { .. } => "Return",
            StmtKind::If { .. } => "If",
            StmtKind::While { .. } => "While",
            StmtKind::DoWhile { .. } => "DoWhile",
            StmtKind::For { .. } => "For",
            StmtKind::ForEach { of: true, .. } => "ForOf",
            StmtKind::ForEach { of: false, .. } => "ForIn",
            StmtKind::Break => "Break",
            StmtKind::Continue => "Continue",
            StmtKind::Throw(_) => "Throw",
            StmtKind::Block(_) => "Block",
            StmtKind::Empty => "Empty",
        }
    }

    /// Expressions directly owned by this statement, in source order.
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            StmtKind::Var { decls, .. } => decls.iter().filter_map(|d| d.init.as_ref()).collect(),
            StmtKind::Expr(expr) | StmtKind::Throw(expr) => vec![expr],
            StmtKind::Return { value } => value.iter().collect(),
            StmtKind::If { cond, .. }
            | StmtKind::While { cond, .. }
            | StmtKind::DoWhile { cond, .. } => vec![cond],
            StmtKind::For { test, update, .. } => test.iter().chain(update).collect(),
            StmtKind::ForEach { iterable, .. } => vec![iterable],
            StmtKind::Break | StmtKind::Continue | StmtKind::Block(_) | StmtKind::Empty => {
                Vec::new()
            }
        }
    }

    /// Statements directly nested in this statement, in source order.
    pub fn stmts(&self) -> Vec<&Stmt> {
        match self {
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => std::iter::once(&**then_branch)
                .chain(else_branch.as_deref())
                .collect(),
            StmtKind::While { body, .. }
            | StmtKind::DoWhile { body, .. }
            | StmtKind::ForEach { body, .. } => vec![&**body],
            StmtKind::For { init, body, .. } => init
                .as_deref()
                .into_iter()
                .chain(std::iter::once(&**body))
                .collect(),
            StmtKind::Block(block) => block.stmts.iter().collect(),
            StmtKind::Var { .. }
            | StmtKind::Expr(_)
            | StmtKind::Return { .. }
            | StmtKind::Break
            | StmtKind::Continue
            | StmtKind::Throw(_)
            | StmtKind::Empty => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// Built-in type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Number,
    String,
    Boolean,
    Any,
    Void,
}

impl TypeKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKeyword::Number => "number",
            TypeKeyword::String => "string",
            TypeKeyword::Boolean => "boolean",
            TypeKeyword::Any => "any",
            TypeKeyword::Void => "void",
        }
    }
}

/// Type annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExprKind {
    Keyword(TypeKeyword),
    /// `Name`, `ns.Name`, `Name<A, B>`.
    Named { path: Vec<Ident>, args: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeExprKind::Keyword(TypeKeyword::Void))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Keyword(kw) => f.write_str(kw.as_str()),
            TypeExprKind::Named { path, args } => {
                for (i, seg) in path.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(&seg.name)?;
                }
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExprKind::Array(elem) => write!(f, "{elem}[]"),
            TypeExprKind::Union(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{ty}")?;
                }
                Ok(())
            }
        }
    }
}

/// TypeScript member/parameter modifiers. Parsed, never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Readonly,
    Abstract,
}

/// `@Name` or `@Name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub name: Ident,
    pub args: Option<Vec<Expr>>,
    pub span: Span,
}

/// Function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub optional: bool,
    pub default: Option<Expr>,
    pub modifiers: Vec<Modifier>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

/// Class members.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMemberKind {
    Property {
        name: Ident,
        ty: Option<TypeExpr>,
        init: Option<Expr>,
    },
    Constructor {
        params: Vec<Param>,
        body: Option<Block>,
    },
    Method {
        name: Ident,
        params: Vec<Param>,
        ret_type: Option<TypeExpr>,
        /// `None` for abstract or overload signatures.
        body: Option<Block>,
    },
    Accessor {
        kind: AccessorKind,
        name: Ident,
        params: Vec<Param>,
        ret_type: Option<TypeExpr>,
        body: Option<Block>,
    },
    /// `[key: K]: V;`
    IndexSignature {
        key: Ident,
        key_ty: TypeExpr,
        value_ty: TypeExpr,
    },
}

impl ClassMemberKind {
    /// Short name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ClassMemberKind::Property { .. } => "Property",
            ClassMemberKind::Constructor { .. } => "Constructor",
            ClassMemberKind::Method { .. } => "Method",
            ClassMemberKind::Accessor {
                kind: AccessorKind::Get,
                ..
            } => "GetAccessor",
            ClassMemberKind::Accessor {
                kind: AccessorKind::Set,
                ..
            } => "SetAccessor",
            ClassMemberKind::IndexSignature { .. } => "IndexSignature",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub decorators: Vec<Decorator>,
    pub modifiers: Vec<Modifier>,
    pub kind: ClassMemberKind,
    pub span: Span,
}

/// A class declaration; each one becomes a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Ident,
    /// Heritage clause, e.g. `extends Contract`.
    pub extends: Option<Vec<Ident>>,
    pub decorators: Vec<Decorator>,
    pub is_abstract: bool,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

/// `imported as local` inside an import's braces.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub imported: Ident,
    pub local: Ident,
}

/// `import x, { a, b as c } from "source";` / `import * as ns from "source";`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub default: Option<Ident>,
    pub namespace: Option<Ident>,
    pub named: Vec<ImportSpecifier>,
    pub source: String,
}

/// Top-level items.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Import(Import),
    Class(Class),
    /// Any other top-level construct (type aliases, interfaces, functions,
    /// variables). Kept only as a span.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub exported: bool,
    pub kind: ItemKind,
    pub span: Span,
}

/// A source file (compilation unit).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct File {
    pub items: Vec<Item>,
}

impl File {
    /// Top-level class declarations in source order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Class(class) => Some(class),
            _ => None,
        })
    }

    /// Top-level imports in source order.
    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Import(import) => Some(import),
            _ => None,
        })
    }
}
