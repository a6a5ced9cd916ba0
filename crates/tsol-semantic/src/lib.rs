//! Name resolution and early semantic analysis for contract sources.
//!
//! This crate currently defines:
//! - A class table collected from the top level of a `tsol_ast::File`.
//! - Intrinsic binding, which resolves member accesses against the
//!   privileged receiver once, ahead of rendering.

mod intrinsics;

use indexmap::IndexMap;
use log::debug;
use tsol_ast::{Class, File};

pub use intrinsics::{
    bind_intrinsics, BindingOptions, Intrinsic, IntrinsicBindings, IntrinsicRef,
    DEFAULT_RECEIVER,
};

/// Top-level classes of one file, keyed by name, in discovery order.
///
/// A class declared twice keeps its first position but the later
/// declaration wins.
#[derive(Debug, Default)]
pub struct ClassTable<'a> {
    classes: IndexMap<String, &'a Class>,
}

impl<'a> ClassTable<'a> {
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Classes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Class> + '_ {
        self.classes.values().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Walk the top level once and record every class declaration by name.
///
/// Forward references between classes are neither resolved nor validated.
pub fn discover_classes(file: &File) -> ClassTable<'_> {
    let mut classes = IndexMap::new();
    for class in file.classes() {
        let name = class.name.name.clone();
        debug!("discovered class `{name}`");
        if classes.insert(name, class).is_some() {
            debug!(
                "class `{}` declared more than once; using the later declaration",
                class.name.name
            );
        }
    }
    ClassTable { classes }
}
