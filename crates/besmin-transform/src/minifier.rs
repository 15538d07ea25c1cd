//! Minify capability backed by `oxc_minifier`.

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use tracing::debug;

use crate::error::MinifyError;

/// Minified code plus its optional source map (serialized JSON).
///
/// The map traces to the code handed to the minifier, which for this
/// pipeline is the transformed intermediate, not the original source file.
#[derive(Debug, Clone)]
pub struct MinifyOutput {
    pub code: String,
    pub map: Option<String>,
}

/// Code minification.
pub trait Minify {
    /// Minify `code`, parsing it as an ES module when `module` is set and
    /// as a classic script otherwise.
    fn minify(
        &self,
        path: &Path,
        code: &str,
        module: bool,
        source_maps: bool,
    ) -> Result<MinifyOutput, MinifyError>;
}

/// The OXC-backed minifier: compress + mangle with engine defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcMinifier;

impl OxcMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Minify for OxcMinifier {
    fn minify(
        &self,
        path: &Path,
        code: &str,
        module: bool,
        source_maps: bool,
    ) -> Result<MinifyOutput, MinifyError> {
        let allocator = Allocator::default();
        let source_type = if module {
            SourceType::mjs()
        } else {
            SourceType::cjs()
        };
        let ret = Parser::new(&allocator, code, source_type).parse();
        if let Some(error) = ret.errors.first() {
            return Err(MinifyError::Parse {
                path: path.to_path_buf(),
                message: error.message.to_string(),
            });
        }
        let mut program = ret.program;

        let minified = Minifier::new(MinifierOptions::default()).minify(&allocator, &mut program);
        let options = CodegenOptions {
            minify: true,
            source_map_path: source_maps.then(|| PathBuf::from(path)),
            ..CodegenOptions::default()
        };
        let out = Codegen::new()
            .with_options(options)
            .with_scoping(minified.scoping)
            .build(&program);
        debug!(file = %path.display(), bytes = out.code.len(), "minified");
        Ok(MinifyOutput {
            code: out.code,
            map: out.map.map(|map| map.to_json_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minified_script_is_not_larger() {
        let code = "function add(first, second) {\n  return first + second;\n}\nconsole.log(add(40, 2));\n";
        let out = OxcMinifier::new()
            .minify(Path::new("out/a.js"), code, false, true)
            .unwrap();
        assert!(!out.code.is_empty());
        assert!(out.code.len() <= code.len());
        assert!(out.map.is_some());
    }

    #[test]
    fn test_module_syntax_survives_minification() {
        let code = "export const value = 1;\n";
        let out = OxcMinifier::new()
            .minify(Path::new("out/a.js"), code, true, false)
            .unwrap();
        assert!(out.code.contains("export"));
        assert!(out.map.is_none());
    }

    #[test]
    fn test_unparsable_input_is_a_typed_error() {
        let err = OxcMinifier::new()
            .minify(Path::new("out/a.js"), "var = ;", false, false)
            .unwrap_err();
        assert!(matches!(err, MinifyError::Parse { .. }));
    }
}
