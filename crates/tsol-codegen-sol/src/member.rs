//! Function and constructor rendering.

use tsol_ast::{strip_private_marker, Block, Ident, Param, TypeExpr, PRIVATE_MARKER};

use crate::contract::RenderContext;
use crate::error::CodegenError;
use crate::line_writer::LineWriter;
use crate::stmt::render_stmts;
use crate::types::map_type;

const CONSTRUCTOR_NAME: &str = "constructor";

/// Render the opening line of a function or constructor, through `{`.
///
/// Visibility follows the private-field marker on `name`. The constructor
/// omits the `function` keyword and the return clause.
pub(crate) fn render_signature(
    name: &str,
    params: &[Param],
    ret_type: Option<&TypeExpr>,
) -> Result<String, CodegenError> {
    let visibility = if name.starts_with(PRIVATE_MARKER) {
        "private"
    } else {
        "public"
    };
    let name = strip_private_marker(name);
    let params = params
        .iter()
        .map(render_param)
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");

    if name == CONSTRUCTOR_NAME {
        return Ok(format!("{CONSTRUCTOR_NAME}({params}) {visibility} {{"));
    }

    let returns = match ret_type {
        Some(ty) if !ty.is_void() => format!(" returns ({})", map_type(ty)?),
        _ => String::new(),
    };
    Ok(format!("function {name}({params}) {visibility}{returns} {{"))
}

fn render_param(param: &Param) -> Result<String, CodegenError> {
    let ty = param
        .ty
        .as_ref()
        .ok_or_else(|| missing_type(&param.name))?;
    Ok(format!("{} {}", map_type(ty)?, param.name.name))
}

fn missing_type(name: &Ident) -> CodegenError {
    CodegenError::MissingTypeAnnotation {
        name: name.name.clone(),
        span: name.span.clone(),
    }
}

/// Render a signature line, its body one level deeper, and the closing `}`.
pub(crate) fn render_callable(
    name: &str,
    params: &[Param],
    ret_type: Option<&TypeExpr>,
    body: Option<&Block>,
    cx: &RenderContext<'_>,
    w: &mut LineWriter,
) -> Result<(), CodegenError> {
    let signature = render_signature(name, params, ret_type)?;
    w.push_line(&signature);
    if let Some(body) = body {
        w.tabbed(|w| render_stmts(&body.stmts, cx, w))?;
    }
    w.push_line("}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsol_ast::{ClassMember, ClassMemberKind, File};

    fn members(src: &str) -> Vec<ClassMember> {
        let result = tsol_parser::parse_str(src);
        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        let file: File = result.file.expect("file");
        let class = file.classes().next().expect("class").clone();
        class.members
    }

    fn signature_of(member: &ClassMember) -> Result<String, CodegenError> {
        match &member.kind {
            ClassMemberKind::Constructor { params, .. } => {
                render_signature(CONSTRUCTOR_NAME, params, None)
            }
            ClassMemberKind::Method {
                name,
                params,
                ret_type,
                ..
            } => render_signature(&name.name, params, ret_type.as_ref()),
            other => panic!("unexpected member {other:?}"),
        }
    }

    #[test]
    fn public_method_with_return_type() {
        let m = members("class A { balanceOf(who: ADDRESS, scale: number): UNSIGNED_INT {} }");
        assert_eq!(
            signature_of(&m[0]).unwrap(),
            "function balanceOf(address who, int256 scale) public returns (uint256) {"
        );
    }

    #[test]
    fn private_marker_sets_visibility() {
        let m = members("class A { #audit(): void {} }");
        assert_eq!(signature_of(&m[0]).unwrap(), "function audit() private {");
    }

    #[test]
    fn constructor_omits_function_keyword() {
        let m = members("class A { constructor(owner: ADDRESS) {} }");
        assert_eq!(
            signature_of(&m[0]).unwrap(),
            "constructor(address owner) public {"
        );
    }

    #[test]
    fn untyped_parameter_fails() {
        let m = members("class A { f(a: number, b) {} }");
        let err = signature_of(&m[0]).unwrap_err();
        assert!(matches!(err, CodegenError::MissingTypeAnnotation { name, .. } if name == "b"));
    }

    #[test]
    fn parameter_order_follows_declaration() {
        let m = members("class A { f(z: number, a: string, m: ADDRESS) {} }");
        assert_eq!(
            signature_of(&m[0]).unwrap(),
            "function f(int256 z, string a, address m) public {"
        );
    }
}
