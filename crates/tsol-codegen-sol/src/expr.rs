//! Expression rendering.

use log::warn;
use tsol_ast::{BinaryOp, Expr, ExprKind, Ident, LiteralKind};
use tsol_semantic::{Intrinsic, IntrinsicRef};

use crate::contract::RenderContext;
use crate::error::CodegenError;

/// Solidity spelling of a binary operator, padded with spaces.
fn binary_op_token(op: BinaryOp) -> Option<&'static str> {
    let token = match op {
        BinaryOp::BitAnd => " & ",
        BinaryOp::BitOr => " | ",
        BinaryOp::BitXor => " ^ ",
        BinaryOp::And => " && ",
        BinaryOp::Or => " || ",
        BinaryOp::Add => " + ",
        BinaryOp::Sub => " - ",
        BinaryOp::SubAssign => " -= ",
        BinaryOp::Lt => " < ",
        BinaryOp::Gt => " > ",
        BinaryOp::Le => " <= ",
        BinaryOp::Ge => " >= ",
        BinaryOp::Eq | BinaryOp::StrictEq => " == ",
        BinaryOp::NotEq | BinaryOp::StrictNotEq => " != ",
        BinaryOp::Assign => " = ",
        _ => return None,
    };
    Some(token)
}

/// Text written in place of a call to the intrinsic.
fn intrinsic_prefix(intrinsic: Intrinsic) -> &'static str {
    match intrinsic {
        Intrinsic::Assert => "assert",
        Intrinsic::Log => "emit ",
        Intrinsic::TransferToSender => "msg.sender.transfer",
    }
}

pub(crate) fn expr_to_string(expr: &Expr, cx: &RenderContext<'_>) -> Result<String, CodegenError> {
    let mut out = String::new();
    render_expr(expr, cx, &mut out)?;
    Ok(out)
}

pub(crate) fn render_expr(
    expr: &Expr,
    cx: &RenderContext<'_>,
    out: &mut String,
) -> Result<(), CodegenError> {
    match &expr.kind {
        ExprKind::Literal(lit) => match &lit.kind {
            LiteralKind::Number(raw) => out.push_str(raw),
            LiteralKind::String(s) => write_string_literal(s, out),
            LiteralKind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            LiteralKind::Null | LiteralKind::Undefined | LiteralKind::Template(_) => {
                placeholder(expr, out)
            }
        },
        ExprKind::Ident(id) => out.push_str(&id.name),
        ExprKind::This => out.push_str("this"),
        ExprKind::Super => out.push_str("super"),
        ExprKind::Member { object, member } => {
            check_intrinsic(expr, object, member, cx)?;
            render_expr(object, cx, out)?;
            out.push('.');
            out.push_str(member.bare_name());
        }
        ExprKind::Index { object, index } => {
            render_expr(object, cx, out)?;
            out.push('[');
            render_expr(index, cx, out)?;
            out.push(']');
        }
        ExprKind::Binary { op, left, right } => {
            render_expr(left, cx, out)?;
            match binary_op_token(*op) {
                Some(token) => out.push_str(token),
                None => {
                    warn!("unsupported operator `{}` rendered as a placeholder", op.as_str());
                    out.push_str(&format!(" /* <token op={} /> */ ", op.as_str()));
                }
            }
            render_expr(right, cx, out)?;
        }
        ExprKind::Call { callee, args } => {
            match intrinsic_call(callee, cx)? {
                Some(intrinsic) => out.push_str(intrinsic_prefix(intrinsic)),
                None => render_expr(callee, cx, out)?,
            }
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_expr(arg, cx, out)?;
            }
            out.push(')');
        }
        ExprKind::Paren(inner) => {
            out.push('(');
            render_expr(inner, cx, out)?;
            out.push(')');
        }
        ExprKind::Unary { .. }
        | ExprKind::Update { .. }
        | ExprKind::Conditional { .. }
        | ExprKind::Array(_)
        | ExprKind::Object(_)
        | ExprKind::New { .. }
        | ExprKind::As { .. }
        | ExprKind::Satisfies { .. }
        | ExprKind::NonNull(_)
        | ExprKind::OptionalChain(_) => {
            check_nested_intrinsics(expr, cx)?;
            placeholder(expr, out);
        }
    }
    Ok(())
}

/// The intrinsic a call's callee resolves to, if any.
fn intrinsic_call(
    callee: &Expr,
    cx: &RenderContext<'_>,
) -> Result<Option<Intrinsic>, CodegenError> {
    match &callee.kind {
        ExprKind::Member { object, member } => {
            check_intrinsic(callee, object, member, cx)?;
            match cx.bindings.get(&callee.span) {
                Some(IntrinsicRef::Known(intrinsic)) => Ok(Some(*intrinsic)),
                _ => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

/// Fail on a member the intrinsic receiver does not provide.
fn check_intrinsic(
    member_expr: &Expr,
    object: &Expr,
    member: &Ident,
    cx: &RenderContext<'_>,
) -> Result<(), CodegenError> {
    if let Some(IntrinsicRef::Unknown(name)) = cx.bindings.get(&member_expr.span) {
        let receiver = match &object.kind {
            ExprKind::Ident(id) => id.name.clone(),
            _ => String::new(),
        };
        return Err(CodegenError::UnknownIntrinsic {
            receiver,
            member: name.clone(),
            span: member.span.clone(),
        });
    }
    Ok(())
}

/// Fail on an unknown receiver member anywhere inside `expr`, including
/// the parts a placeholder leaves unrendered.
pub(crate) fn check_nested_intrinsics(
    expr: &Expr,
    cx: &RenderContext<'_>,
) -> Result<(), CodegenError> {
    if let ExprKind::Member { object, member } = &expr.kind {
        check_intrinsic(expr, object, member, cx)?;
    }
    for child in expr.kind.children() {
        check_nested_intrinsics(child, cx)?;
    }
    Ok(())
}

fn placeholder(expr: &Expr, out: &mut String) {
    let kind = expr.kind.kind_name();
    warn!(
        "unsupported expression `{kind}` at {:?} rendered as a placeholder",
        expr.span.range
    );
    out.push_str(&format!("/* <expression kind={kind} /> */"));
}

fn write_string_literal(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
