//! Mapping from type annotations to Solidity type names.

use tsol_ast::{TypeExpr, TypeExprKind, TypeKeyword};

use crate::error::CodegenError;

/// Map a type annotation to its Solidity type name.
///
/// `number` is a signed 256-bit integer, `UNSIGNED_INT` and `ADDRESS` name
/// the unsigned integer and address types, and `Map<K, V>` becomes a
/// mapping. Any other single-segment name is assumed to be a struct or
/// contract type and passes through unchanged, type arguments dropped.
pub fn map_type(ty: &TypeExpr) -> Result<String, CodegenError> {
    match &ty.kind {
        TypeExprKind::Keyword(TypeKeyword::Number) => Ok("int256".to_string()),
        TypeExprKind::Keyword(TypeKeyword::String) => Ok("string".to_string()),
        TypeExprKind::Named { path, args } if path.len() == 1 => {
            match (path[0].name.as_str(), args.as_slice()) {
                ("UNSIGNED_INT", []) => Ok("uint256".to_string()),
                ("ADDRESS", []) => Ok("address".to_string()),
                ("Map", [key, value]) => Ok(format!(
                    "mapping({} => {})",
                    map_type(key)?,
                    map_type(value)?
                )),
                ("Map", _) => Err(unknown(ty)),
                (name, _) => Ok(name.to_string()),
            }
        }
        _ => Err(unknown(ty)),
    }
}

fn unknown(ty: &TypeExpr) -> CodegenError {
    CodegenError::UnknownType {
        ty: ty.to_string(),
        span: ty.span.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsol_ast::{ClassMemberKind, Span};

    /// Parse `ty` as the annotation of a property.
    fn annotation(ty: &str) -> TypeExpr {
        let src = format!("class A {{ x: {ty}; }}");
        let result = tsol_parser::parse_str(&src);
        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        let file = result.file.expect("file");
        let class = file.classes().next().expect("class");
        match &class.members[0].kind {
            ClassMemberKind::Property { ty: Some(ty), .. } => ty.clone(),
            other => panic!("unexpected member {other:?}"),
        }
    }

    #[test]
    fn maps_scalar_types() {
        assert_eq!(map_type(&annotation("number")).unwrap(), "int256");
        assert_eq!(map_type(&annotation("string")).unwrap(), "string");
        assert_eq!(map_type(&annotation("UNSIGNED_INT")).unwrap(), "uint256");
        assert_eq!(map_type(&annotation("ADDRESS")).unwrap(), "address");
    }

    #[test]
    fn maps_nested_maps() {
        assert_eq!(
            map_type(&annotation("Map<ADDRESS, UNSIGNED_INT>")).unwrap(),
            "mapping(address => uint256)"
        );
        assert_eq!(
            map_type(&annotation("Map<ADDRESS, Map<ADDRESS, number>>")).unwrap(),
            "mapping(address => mapping(address => int256))"
        );
    }

    #[test]
    fn mapping_is_stable_across_renders() {
        let ty = annotation("Map<ADDRESS, UNSIGNED_INT>");
        assert_eq!(map_type(&ty).unwrap(), map_type(&ty).unwrap());
    }

    #[test]
    fn other_names_pass_through() {
        assert_eq!(map_type(&annotation("Proposal")).unwrap(), "Proposal");
    }

    #[test]
    fn generic_names_pass_through_without_arguments() {
        assert_eq!(map_type(&annotation("Box<number>")).unwrap(), "Box");
        assert_eq!(map_type(&annotation("Pair<boolean, any>")).unwrap(), "Pair");
    }

    #[test]
    fn rejects_unmapped_forms() {
        for src in ["boolean", "any", "number[]", "string | number", "ns.Point", "Map<ADDRESS>"] {
            let ty = annotation(src);
            match map_type(&ty) {
                Err(CodegenError::UnknownType { ty: text, span }) => {
                    assert_eq!(text, src);
                    assert_ne!(span, Span::new(0, 0));
                }
                other => panic!("`{src}` mapped to {other:?}"),
            }
        }
    }

    #[test]
    fn error_names_the_innermost_unknown_type() {
        let err = map_type(&annotation("Map<ADDRESS, boolean>")).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownType { ty, .. } if ty == "boolean"));
    }
}
