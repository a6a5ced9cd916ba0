//! Whole-file compilation: discover classes, render each, emit each.

use std::io;

use log::{debug, info};
use tsol_ast::File;
use tsol_semantic::{bind_intrinsics, discover_classes};

use crate::contract::{render_contract, RenderContext, RenderedContract};
use crate::error::CompileError;
use crate::options::CodegenOptions;

/// Receives each finished contract as one unit.
pub trait ContractSink {
    fn emit(&mut self, contract: &RenderedContract) -> io::Result<()>;
}

impl<S: ContractSink + ?Sized> ContractSink for &mut S {
    fn emit(&mut self, contract: &RenderedContract) -> io::Result<()> {
        (**self).emit(contract)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    /// Names of the emitted contracts, in emission order.
    pub contracts: Vec<String>,
}

/// Compile every top-level class of `file` into `sink`.
///
/// Classes render in discovery order. The first failure stops the run:
/// contracts already emitted stay emitted and the failing one is not.
pub fn compile_file(
    file: &File,
    options: &CodegenOptions,
    sink: &mut dyn ContractSink,
) -> Result<CompileSummary, CompileError> {
    let classes = discover_classes(file);
    debug!(
        "discovered {} class(es): {}",
        classes.len(),
        classes.names().collect::<Vec<_>>().join(", ")
    );
    let bindings = bind_intrinsics(file, &options.binding);
    let cx = RenderContext {
        indent: &options.indent,
        bindings: &bindings,
    };

    let mut summary = CompileSummary::default();
    for class in classes.iter() {
        let contract = render_contract(class, &cx).map_err(|source| CompileError::Codegen {
            class: class.name.name.clone(),
            source,
        })?;
        sink.emit(&contract).map_err(|source| CompileError::Emit {
            contract: contract.name.clone(),
            source,
        })?;
        info!("emitted contract `{}`", contract.name);
        summary.contracts.push(contract.name);
    }
    Ok(summary)
}
