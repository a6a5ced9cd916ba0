//! Code generation options.

use tsol_semantic::BindingOptions;

/// Indentation unit of rendered contracts.
pub const DEFAULT_INDENT: &str = "   ";

/// Configuration options for a compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// String written once per indentation level.
    pub indent: String,
    /// How the intrinsic receiver is recognised.
    pub binding: BindingOptions,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            binding: BindingOptions::default(),
        }
    }
}

impl CodegenOptions {
    /// Use a custom indentation unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Recognise the intrinsic receiver under another exported name.
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.binding.receiver = receiver.into();
        self
    }
}
