//! Solidity code generation for contract classes.
//!
//! Each top-level class of a parsed file becomes one `contract` block. The
//! renderers walk the tree once and write into a [`LineWriter`]; constructs
//! with no Solidity rendering are emitted as visible placeholder comments
//! rather than failing the run.

mod contract;
mod driver;
mod error;
mod expr;
mod line_writer;
mod member;
mod options;
mod stmt;
mod types;

pub use contract::{render_contract, RenderContext, RenderedContract};
pub use driver::{compile_file, CompileSummary, ContractSink};
pub use error::{CodegenError, CompileError};
pub use line_writer::LineWriter;
pub use options::{CodegenOptions, DEFAULT_INDENT};
pub use types::map_type;
