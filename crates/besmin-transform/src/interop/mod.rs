//! Module-interop adapters.
//!
//! The environment transform leaves module syntax alone; these adapters
//! rewrite a transformed ES module for a specific runtime loading
//! convention. Lowering happens in two steps: an AST pass strips
//! `import`/`export` syntax while collecting a [`ModuleSummary`]
//! ([`lower`]), then a per-format envelope wraps the generated body
//! ([`envelope`]).
//!
//! Imported bindings are captured at load time; live-binding emulation is
//! not attempted.

mod envelope;
mod lower;

pub use envelope::{wrap, Envelope};
pub use lower::lower_module;

/// Runtime loading convention an adapter targets.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ModuleInterop {
    /// require/module.exports
    CommonJs,
    /// define() with a simplified-CommonJS factory
    Amd,
    /// AMD/CommonJS/global dispatch wrapper
    Umd,
    /// System.register()
    SystemJs,
}

/// One binding introduced by an `import` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinding {
    /// `import { imported as local } from "..."`
    Named { imported: String, local: String },
    /// `import local from "..."`
    Default { local: String },
    /// `import * as local from "..."`
    Namespace { local: String },
}

/// One `import` declaration: a request for `source` plus its bindings.
///
/// A side-effect import (`import "..."`) has no bindings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRecord {
    pub source: String,
    pub bindings: Vec<ImportBinding>,
}

/// A locally defined export: `exported` name bound to the local `local`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub exported: String,
    pub local: String,
}

/// A named re-export: `export { imported as exported } from "source"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReexportRecord {
    pub source: String,
    /// (imported name, exported name) pairs
    pub names: Vec<(String, String)>,
}

/// Everything the envelope emitters need to know about a module's surface.
///
/// Collected by the lowering pass as it strips module syntax from the AST.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSummary {
    /// `import` declarations in source order
    pub imports: Vec<ImportRecord>,
    /// Locally defined exports in source order
    pub exports: Vec<ExportRecord>,
    /// Named re-exports in source order
    pub reexports: Vec<ReexportRecord>,
    /// `export * as name from "source"` as (source, exported name)
    pub namespace_reexports: Vec<(String, String)>,
    /// `export * from "source"` sources
    pub star_reexports: Vec<String>,
}

impl ModuleSummary {
    /// Whether the module has no imports or exports at all.
    pub fn is_plain(&self) -> bool {
        self.imports.is_empty()
            && self.exports.is_empty()
            && self.reexports.is_empty()
            && self.namespace_reexports.is_empty()
            && self.star_reexports.is_empty()
    }

    /// Every module request, in source order, imports before re-exports.
    pub fn requests(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = Vec::new();
        for import in &self.imports {
            sources.push(&import.source);
        }
        for reexport in &self.reexports {
            sources.push(&reexport.source);
        }
        for (source, _) in &self.namespace_reexports {
            sources.push(source);
        }
        for source in &self.star_reexports {
            sources.push(source);
        }
        sources
    }
}
