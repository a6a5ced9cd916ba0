//! Class-to-contract rendering.

use std::fmt;

use log::{debug, warn};
use tsol_ast::{Class, ClassMember, ClassMemberKind};
use tsol_semantic::IntrinsicBindings;

use crate::error::CodegenError;
use crate::expr::expr_to_string;
use crate::line_writer::LineWriter;
use crate::member::render_callable;
use crate::types::map_type;

/// Read-only state shared by every renderer during one class.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// String written once per indentation level.
    pub indent: &'a str,
    pub bindings: &'a IntrinsicBindings,
}

/// The finished text of one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContract {
    pub name: String,
    pub lines: Vec<String>,
}

impl RenderedContract {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for RenderedContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Render one class as a `contract <Name> { ... }` block.
pub fn render_contract(
    class: &Class,
    cx: &RenderContext<'_>,
) -> Result<RenderedContract, CodegenError> {
    let name = class.name.name.clone();
    debug!("rendering contract `{name}`");

    let mut w = LineWriter::new(cx.indent);
    w.push_line(&format!("contract {name} {{"));
    w.tabbed(|w| {
        for member in &class.members {
            render_member(member, cx, w)?;
        }
        Ok(())
    })?;
    w.push_line("}");

    Ok(RenderedContract {
        name,
        lines: w.into_lines(),
    })
}

fn render_member(
    member: &ClassMember,
    cx: &RenderContext<'_>,
    w: &mut LineWriter,
) -> Result<(), CodegenError> {
    match &member.kind {
        ClassMemberKind::Property { name, ty, init } => {
            let ty = ty
                .as_ref()
                .ok_or_else(|| CodegenError::MissingTypeAnnotation {
                    name: name.name.clone(),
                    span: member.span.clone(),
                })?;
            let mut line = format!("{} {}", map_type(ty)?, name.bare_name());
            if let Some(init) = init {
                line.push_str(" = ");
                line.push_str(&expr_to_string(init, cx)?);
            }
            line.push(';');
            w.push_line(&line);
        }
        ClassMemberKind::Constructor { params, body } => {
            render_callable("constructor", params, None, body.as_ref(), cx, w)?;
        }
        ClassMemberKind::Method {
            name,
            params,
            ret_type,
            body,
        } => {
            render_callable(&name.name, params, ret_type.as_ref(), body.as_ref(), cx, w)?;
            w.push_line("");
        }
        ClassMemberKind::Accessor { .. } | ClassMemberKind::IndexSignature { .. } => {
            let kind = member.kind.kind_name();
            warn!(
                "unsupported class member `{kind}` at {:?} rendered as a placeholder",
                member.span.range
            );
            w.push_line(&format!("/* <member kind={kind} /> */"));
        }
    }
    Ok(())
}
