//! Error types for code generation.

use std::io;

use thiserror::Error;
use tsol_ast::Span;

/// A hard failure while rendering one class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// A property or parameter was declared without a type.
    #[error("`{name}` must have a type annotation")]
    MissingTypeAnnotation { name: String, span: Span },

    /// A local variable was declared without an initializer.
    #[error("variable `{name}` must be initialized")]
    MissingInitializer { name: String, span: Span },

    /// A type annotation has no Solidity counterpart.
    #[error("unknown type `{ty}`")]
    UnknownType { ty: String, span: Span },

    /// The intrinsic receiver has no operation by this name.
    #[error("unknown intrinsic `{receiver}.{member}`")]
    UnknownIntrinsic {
        receiver: String,
        member: String,
        span: Span,
    },
}

impl CodegenError {
    pub fn span(&self) -> &Span {
        match self {
            CodegenError::MissingTypeAnnotation { span, .. }
            | CodegenError::MissingInitializer { span, .. }
            | CodegenError::UnknownType { span, .. }
            | CodegenError::UnknownIntrinsic { span, .. } => span,
        }
    }
}

/// Errors that abort a compilation run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("in contract `{class}`: {source}")]
    Codegen {
        class: String,
        #[source]
        source: CodegenError,
    },

    /// The output sink rejected a finished contract.
    #[error("failed to emit contract `{contract}`: {source}")]
    Emit {
        contract: String,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    /// Source location of the failure, when it has one.
    pub fn span(&self) -> Option<&Span> {
        match self {
            CompileError::Codegen { source, .. } => Some(source.span()),
            CompileError::Emit { .. } => None,
        }
    }
}
