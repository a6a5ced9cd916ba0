//! Rich error reporting using codespan-reporting.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use tsol_codegen_sol::{CodegenError, CompileError};
use tsol_parser::ParseError;
use tsol_semantic::Intrinsic;

use crate::LoadError;

/// A source file database for codespan-reporting.
pub struct SourceDb {
    files: SimpleFiles<String, String>,
    file_id: usize,
}

impl SourceDb {
    /// Create a new source database with a single file.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(name.into(), source.into());
        Self { files, file_id }
    }

    pub fn parse_error(&self, err: &ParseError) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(&err.message)
            .with_labels(vec![
                Label::primary(self.file_id, err.span.range.clone()).with_message("error occurs here"),
            ])
    }

    pub fn compile_error(&self, err: &CompileError) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(err.to_string());
        let source = match err {
            CompileError::Codegen { source, .. } => source,
            CompileError::Emit { .. } => return diagnostic,
        };
        let label = match source {
            CodegenError::MissingTypeAnnotation { .. } => "declared without a type",
            CodegenError::MissingInitializer { .. } => "declared without an initializer",
            CodegenError::UnknownType { .. } => "no Solidity type for this annotation",
            CodegenError::UnknownIntrinsic { .. } => "not provided by the intrinsic receiver",
        };
        let notes = match source {
            CodegenError::UnknownType { .. } => vec![
                "supported types: number, string, UNSIGNED_INT, ADDRESS, Map<K, V>, or a struct name"
                    .to_string(),
            ],
            CodegenError::UnknownIntrinsic { .. } => {
                let names: Vec<&str> = Intrinsic::all().map(Intrinsic::member_name).collect();
                vec![format!("available intrinsics: {}", names.join(", "))]
            }
            _ => Vec::new(),
        };
        diagnostic
            .with_labels(vec![
                Label::primary(self.file_id, source.span().range.clone()).with_message(label),
            ])
            .with_notes(notes)
    }

    /// Write a diagnostic to `writer`.
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        diagnostic: &Diagnostic<usize>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, &self.files, diagnostic)
    }

    /// Write a diagnostic to stderr.
    pub fn report(&self, diagnostic: &Diagnostic<usize>, color: ColorChoice) {
        let writer = StandardStream::stderr(color);
        let _ = self.emit(&mut writer.lock(), diagnostic);
    }
}

/// Report a LoadError with pretty formatting for parse errors.
pub fn report_load_error(err: &LoadError, color: ColorChoice) {
    match err {
        LoadError::Parse {
            path,
            source_code,
            errors,
        } => {
            let db = SourceDb::new(path.clone(), source_code.clone());
            for e in errors {
                db.report(&db.parse_error(e), color);
            }
        }
        LoadError::Io { .. } => eprintln!("error: {err}"),
    }
}
