//! Resolution of the privileged intrinsic receiver.
//!
//! A member access `<receiver>.<member>` is bound here, once, against a
//! closed capability table. The receiver is recognised by binding rather
//! than by spelling: it must be imported (or left ambient) and not shadowed
//! by a class, parameter, or local of the same name.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use log::debug;
use tsol_ast::{
    Block, ClassMemberKind, Expr, ExprKind, File, Param, Span, Stmt, StmtKind, VarDeclarator,
};

/// Name of the intrinsic receiver when none is configured.
pub const DEFAULT_RECEIVER: &str = "ETH";

/// The privileged operations exposed through the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    /// Runtime assertion.
    Assert,
    /// Event emission.
    Log,
    /// Send value to the caller.
    TransferToSender,
}

const CAPABILITIES: &[(&str, Intrinsic)] = &[
    ("assert", Intrinsic::Assert),
    ("log", Intrinsic::Log),
    ("transferToSenderWei", Intrinsic::TransferToSender),
];

impl Intrinsic {
    /// Every operation, in table order.
    pub fn all() -> impl Iterator<Item = Intrinsic> {
        CAPABILITIES.iter().map(|(_, intrinsic)| *intrinsic)
    }

    pub fn from_member(name: &str) -> Option<Intrinsic> {
        CAPABILITIES
            .iter()
            .find(|(member, _)| *member == name)
            .map(|(_, intrinsic)| *intrinsic)
    }

    /// Member name under which the receiver exposes this operation.
    pub fn member_name(self) -> &'static str {
        CAPABILITIES
            .iter()
            .find(|(_, intrinsic)| *intrinsic == self)
            .map(|(member, _)| *member)
            .unwrap_or("")
    }
}

/// What a member access against the receiver resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntrinsicRef {
    Known(Intrinsic),
    /// The receiver has no operation by this name.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOptions {
    /// Exported name of the receiver in its declaring module.
    pub receiver: String,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            receiver: DEFAULT_RECEIVER.to_string(),
        }
    }
}

/// Resolved receiver member accesses, keyed by the member expression's span.
#[derive(Debug, Default, Clone)]
pub struct IntrinsicBindings {
    by_span: HashMap<Range<usize>, IntrinsicRef>,
}

impl IntrinsicBindings {
    /// The binding for the member expression at `span`, if it targets the receiver.
    pub fn get(&self, span: &Span) -> Option<&IntrinsicRef> {
        self.by_span.get(&span.range)
    }

    pub fn len(&self) -> usize {
        self.by_span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_span.is_empty()
    }
}

/// Bind every receiver member access in `file`. Never fails; unknown
/// members are recorded as [`IntrinsicRef::Unknown`] for the renderer.
pub fn bind_intrinsics(file: &File, options: &BindingOptions) -> IntrinsicBindings {
    let mut receivers: HashSet<String> = file
        .imports()
        .flat_map(|import| import.named.iter())
        .filter(|spec| spec.imported.name == options.receiver)
        .map(|spec| spec.local.name.clone())
        .collect();
    if receivers.is_empty() {
        receivers.insert(options.receiver.clone());
    }
    let classes = crate::discover_classes(file);
    receivers.retain(|name| {
        let shadowed = classes.contains(name);
        if shadowed {
            debug!("class `{name}` shadows the intrinsic receiver");
        }
        !shadowed
    });

    let mut binder = Binder {
        receivers,
        scopes: Vec::new(),
        bindings: IntrinsicBindings::default(),
    };
    if binder.receivers.is_empty() {
        return binder.bindings;
    }

    for class in classes.iter() {
        for member in &class.members {
            binder.bind_member(&member.kind);
        }
    }
    debug!("bound {} intrinsic reference(s)", binder.bindings.len());
    binder.bindings
}

struct Binder {
    receivers: HashSet<String>,
    /// Names declared by enclosing parameter lists and blocks.
    scopes: Vec<HashSet<String>>,
    bindings: IntrinsicBindings,
}

impl Binder {
    fn is_receiver(&self, name: &str) -> bool {
        self.receivers.contains(name) && !self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn with_scope(&mut self, names: HashSet<String>, f: impl FnOnce(&mut Self)) {
        self.scopes.push(names);
        f(self);
        self.scopes.pop();
    }

    fn bind_member(&mut self, kind: &ClassMemberKind) {
        match kind {
            ClassMemberKind::Property { init, .. } => {
                if let Some(init) = init {
                    self.bind_expr(init);
                }
            }
            ClassMemberKind::Constructor { params, body }
            | ClassMemberKind::Method { params, body, .. }
            | ClassMemberKind::Accessor { params, body, .. } => {
                self.bind_callable(params, body.as_ref());
            }
            ClassMemberKind::IndexSignature { .. } => {}
        }
    }

    fn bind_callable(&mut self, params: &[Param], body: Option<&Block>) {
        for param in params {
            if let Some(default) = &param.default {
                self.bind_expr(default);
            }
        }
        let names = params.iter().map(|p| p.name.name.clone()).collect();
        self.with_scope(names, |binder| {
            if let Some(body) = body {
                binder.bind_block(body);
            }
        });
    }

    /// A declaration shadows the receiver for the whole enclosing block.
    fn bind_block(&mut self, block: &Block) {
        let names = block.stmts.iter().flat_map(declared_names).collect();
        self.with_scope(names, |binder| {
            for stmt in &block.stmts {
                binder.bind_stmt(stmt);
            }
        });
    }

    /// A statement in branch position keeps its declarations to itself.
    fn bind_nested(&mut self, stmt: &Stmt) {
        let names: HashSet<String> = declared_names(stmt).collect();
        if names.is_empty() {
            self.bind_stmt(stmt);
        } else {
            self.with_scope(names, |binder| binder.bind_stmt(stmt));
        }
    }

    fn bind_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Var { decls, .. } => {
                for decl in decls {
                    if let Some(init) = &decl.init {
                        self.bind_expr(init);
                    }
                }
            }
            StmtKind::Expr(expr) | StmtKind::Throw(expr) => self.bind_expr(expr),
            StmtKind::Return { value } => {
                if let Some(value) = value {
                    self.bind_expr(value);
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.bind_expr(cond);
                self.bind_nested(then_branch);
                if let Some(else_branch) = else_branch {
                    self.bind_nested(else_branch);
                }
            }
            StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
                self.bind_expr(cond);
                self.bind_nested(body);
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                let names: HashSet<String> = init
                    .as_deref()
                    .map(|s| declared_names(s).collect())
                    .unwrap_or_default();
                self.with_scope(names, |binder| {
                    if let Some(init) = init {
                        binder.bind_stmt(init);
                    }
                    if let Some(test) = test {
                        binder.bind_expr(test);
                    }
                    if let Some(update) = update {
                        binder.bind_expr(update);
                    }
                    binder.bind_nested(body);
                });
            }
            StmtKind::ForEach {
                binding,
                iterable,
                body,
                ..
            } => {
                self.bind_expr(iterable);
                let names = HashSet::from([binding.name.clone()]);
                self.with_scope(names, |binder| binder.bind_nested(body));
            }
            StmtKind::Block(block) => self.bind_block(block),
            StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
        }
    }

    fn bind_expr(&mut self, expr: &Expr) {
        if let ExprKind::Member { object, member } = &expr.kind {
            if let ExprKind::Ident(receiver) = &object.kind {
                if self.is_receiver(&receiver.name) {
                    let target = match Intrinsic::from_member(&member.name) {
                        Some(intrinsic) => IntrinsicRef::Known(intrinsic),
                        None => IntrinsicRef::Unknown(member.name.clone()),
                    };
                    debug!(
                        "bound `{}.{}` at {:?} to {:?}",
                        receiver.name, member.name, expr.span.range, target
                    );
                    self.bindings.by_span.insert(expr.span.range.clone(), target);
                }
            }
        }
        for child in expr.kind.children() {
            self.bind_expr(child);
        }
    }
}

/// Names a statement declares into its enclosing block.
fn declared_names(stmt: &Stmt) -> impl Iterator<Item = String> + '_ {
    let decls: &[VarDeclarator] = match &stmt.kind {
        StmtKind::Var { decls, .. } => decls.as_slice(),
        _ => &[],
    };
    decls.iter().map(|decl| decl.name.name.clone())
}
