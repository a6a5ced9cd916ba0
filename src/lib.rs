//! Compile class-based TypeScript contract descriptions into Solidity.
//!
//! The phases live in their own crates (lexer, parser, semantic binding,
//! Solidity rendering); this crate wires them together, loads `tsol.toml`,
//! provides the output sinks and renders diagnostics for the `tsolc` binary.

pub mod config;
pub mod diagnostic;
pub mod sink;

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use thiserror::Error;
use tsol_ast::File;
use tsol_parser::{parse_str, ParseError};

pub use tsol_codegen_sol::{
    compile_file, render_contract, CodegenError, CodegenOptions, CompileError, CompileSummary,
    ContractSink, RenderContext, RenderedContract,
};

/// A parsed source file, kept with its text for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub source: String,
    pub file: File,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("parse errors in {path}")]
    Parse {
        path: String,
        source_code: String,
        errors: Vec<ParseError>,
    },
}

/// Anything that can stop a compilation of one file.
#[derive(Debug, Error)]
pub enum TsolError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Parse `source`, reporting every parse error. A file with parse errors is
/// never handed to the compiler.
pub fn load_source(path: &str, source: String) -> Result<SourceFile, LoadError> {
    debug!("parsing {path}");
    let result = parse_str(&source);
    match result.file {
        Some(file) if result.errors.is_empty() => Ok(SourceFile {
            path: path.to_string(),
            source,
            file,
        }),
        _ => Err(LoadError::Parse {
            path: path.to_string(),
            source_code: source,
            errors: result.errors,
        }),
    }
}

/// Read and parse the file at `path`.
pub fn load_path(path: &Path) -> Result<SourceFile, LoadError> {
    let display = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    load_source(&display, source)
}

/// Compile source text, emitting each contract into `sink`.
pub fn compile_source(
    path: &str,
    source: &str,
    options: &CodegenOptions,
    sink: &mut dyn ContractSink,
) -> Result<CompileSummary, TsolError> {
    let loaded = load_source(path, source.to_string())?;
    Ok(compile_file(&loaded.file, options, sink)?)
}

/// Compile the file at `path`, emitting each contract into `sink`.
pub fn compile_path(
    path: &Path,
    options: &CodegenOptions,
    sink: &mut dyn ContractSink,
) -> Result<CompileSummary, TsolError> {
    let loaded = load_path(path)?;
    Ok(compile_file(&loaded.file, options, sink)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::VecSink;

    #[test]
    fn parse_errors_stop_before_compilation() {
        let mut sink = VecSink::default();
        let err = compile_source(
            "bad.ts",
            "class A { f() { let = 1; } }",
            &CodegenOptions::default(),
            &mut sink,
        )
        .unwrap_err();
        match err {
            TsolError::Load(LoadError::Parse { path, errors, .. }) => {
                assert_eq!(path, "bad.ts");
                assert!(!errors.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(sink.contracts.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_path(Path::new("does/not/exist.ts")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn compiles_source_text() {
        let mut sink = VecSink::default();
        let summary = compile_source(
            "ok.ts",
            "class Counter { count: UNSIGNED_INT; }",
            &CodegenOptions::default(),
            &mut sink,
        )
        .unwrap();
        assert_eq!(summary.contracts, ["Counter"]);
        assert_eq!(
            sink.contracts[0].text(),
            "contract Counter {\n   uint256 count;\n}"
        );
    }
}
