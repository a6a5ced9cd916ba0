//! Statement rendering.
//!
//! Each statement is written onto the writer's current line; callers start
//! a fresh line first. Nested bodies put every statement on its own line.

use log::warn;
use tsol_ast::{Expr, Stmt, StmtKind, VarDeclarator};

use crate::contract::RenderContext;
use crate::error::CodegenError;
use crate::expr::{check_nested_intrinsics, render_expr};
use crate::line_writer::LineWriter;
use crate::types::map_type;

/// Type keyword used for locals declared without an annotation.
const UNTYPED_LOCAL: &str = "var";

/// Render each statement on its own line at the current depth.
pub(crate) fn render_stmts(
    stmts: &[Stmt],
    cx: &RenderContext<'_>,
    w: &mut LineWriter,
) -> Result<(), CodegenError> {
    for stmt in stmts {
        w.push_line("");
        render_stmt(stmt, cx, w)?;
    }
    Ok(())
}

/// A branch body: a block contributes its statements, anything else itself.
fn render_branch(
    stmt: &Stmt,
    cx: &RenderContext<'_>,
    w: &mut LineWriter,
) -> Result<(), CodegenError> {
    match &stmt.kind {
        StmtKind::Block(block) => render_stmts(&block.stmts, cx, w),
        _ => render_stmts(std::slice::from_ref(stmt), cx, w),
    }
}

pub(crate) fn render_stmt(
    stmt: &Stmt,
    cx: &RenderContext<'_>,
    w: &mut LineWriter,
) -> Result<(), CodegenError> {
    match &stmt.kind {
        StmtKind::Return { value } => {
            w.push("return");
            if let Some(value) = value {
                w.push(" ");
                push_expr(value, cx, w)?;
            }
            w.push(";");
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            w.push("if (");
            push_expr(cond, cx, w)?;
            w.push(") {");
            w.tabbed(|w| render_branch(then_branch, cx, w))?;
            w.push_line("}");
            if let Some(else_branch) = else_branch {
                // The else body stays at the `if`'s own depth.
                w.push_line("else {");
                render_branch(else_branch, cx, w)?;
                w.push_line("}");
            }
        }
        StmtKind::Var { decls, .. } => {
            for (i, decl) in decls.iter().enumerate() {
                if i > 0 {
                    w.push_line("");
                }
                render_declarator(decl, cx, w)?;
            }
        }
        StmtKind::Expr(expr) => {
            push_expr(expr, cx, w)?;
            w.push(";");
        }
        StmtKind::While { cond, body } => {
            w.push("while (");
            push_expr(cond, cx, w)?;
            w.push(") {");
            w.tabbed(|w| render_branch(body, cx, w))?;
            w.push_line("}");
        }
        StmtKind::DoWhile { .. }
        | StmtKind::For { .. }
        | StmtKind::ForEach { .. }
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Throw(_)
        | StmtKind::Block(_)
        | StmtKind::Empty => {
            check_nested_stmt(stmt, cx)?;
            let kind = stmt.kind.kind_name();
            warn!(
                "unsupported statement `{kind}` at {:?} rendered as a placeholder",
                stmt.span.range
            );
            w.push(&format!("/* <statement kind={kind} /> */"));
        }
    }
    Ok(())
}

/// Fail on an unknown receiver member anywhere inside a statement that is
/// written as a placeholder.
fn check_nested_stmt(stmt: &Stmt, cx: &RenderContext<'_>) -> Result<(), CodegenError> {
    for expr in stmt.kind.exprs() {
        check_nested_intrinsics(expr, cx)?;
    }
    for nested in stmt.kind.stmts() {
        check_nested_stmt(nested, cx)?;
    }
    Ok(())
}

fn render_declarator(
    decl: &VarDeclarator,
    cx: &RenderContext<'_>,
    w: &mut LineWriter,
) -> Result<(), CodegenError> {
    let init = decl
        .init
        .as_ref()
        .ok_or_else(|| CodegenError::MissingInitializer {
            name: decl.name.name.clone(),
            span: decl.span.clone(),
        })?;
    let ty = match &decl.ty {
        Some(ty) => map_type(ty)?,
        None => UNTYPED_LOCAL.to_string(),
    };
    w.push(&format!("{ty} {} = ", decl.name.name));
    push_expr(init, cx, w)?;
    w.push(";");
    Ok(())
}

fn push_expr(
    expr: &Expr,
    cx: &RenderContext<'_>,
    w: &mut LineWriter,
) -> Result<(), CodegenError> {
    let mut text = String::new();
    render_expr(expr, cx, &mut text)?;
    w.push(&text);
    Ok(())
}
