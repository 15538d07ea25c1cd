//! Transform capability backed by the OXC toolchain.
//!
//! The pipeline talks to the [`Transform`] trait; [`OxcTransformer`] is the
//! production implementation: parse, semantic analysis, environment-targeted
//! downleveling, then the profile's module-interop adapter.

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::SemanticBuilder;
use oxc_sourcemap::SourceMap;
use oxc_span::SourceType;
use oxc_transformer::{EnvOptions, TransformOptions, Transformer};
use tracing::debug;

use crate::error::{SyntaxError, TransformError};
use crate::interop;
use crate::profile::FormatProfile;
use crate::sourcemap::offset_mappings;

/// Transformed code plus its optional source map (serialized JSON).
///
/// Never partially populated: a failed transform yields an error, not a
/// half-filled output.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Code in the profile's target format
    pub code: String,
    /// Source map pointing into the original file, when requested
    pub map: Option<String>,
}

/// Syntax checking and per-format transformation.
pub trait Transform {
    /// Parse `source` in syntax-check-only mode: no output, no interop.
    fn check(&self, path: &Path, source: &str) -> Result<(), SyntaxError>;

    /// Transform `source` into the profile's module format.
    fn transform(
        &self,
        path: &Path,
        source: &str,
        profile: &FormatProfile,
        source_maps: bool,
    ) -> Result<TransformOutput, TransformError>;
}

/// The OXC-backed transformer.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcTransformer;

impl OxcTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for OxcTransformer {
    fn check(&self, path: &Path, source: &str) -> Result<(), SyntaxError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type_for(path)).parse();
        match first_parse_error(&ret) {
            None => Ok(()),
            Some((message, offset)) => Err(syntax_error(path, source, message, offset)),
        }
    }

    fn transform(
        &self,
        path: &Path,
        source: &str,
        profile: &FormatProfile,
        source_maps: bool,
    ) -> Result<TransformOutput, TransformError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type_for(path)).parse();
        if let Some((message, offset)) = first_parse_error(&ret) {
            return Err(syntax_error(path, source, message, offset).into());
        }
        let mut program = ret.program;

        let scoping = SemanticBuilder::new()
            .build(&program)
            .semantic
            .into_scoping();
        let env = EnvOptions::from_browserslist_query(profile.targets).map_err(|e| {
            TransformError::Targets {
                query: profile.targets.to_string(),
                message: e.to_string(),
            }
        })?;
        let options = TransformOptions {
            env,
            ..TransformOptions::default()
        };
        let transformed = Transformer::new(&allocator, path, &options)
            .build_with_scoping(scoping, &mut program);
        if let Some(error) = transformed.errors.first() {
            return Err(TransformError::Transform {
                path: path.to_path_buf(),
                message: error.message.to_string(),
            });
        }
        debug!(file = %path.display(), format = %profile.format, "transformed");

        match profile.interop {
            None => {
                let (code, map) = codegen(&program, path, source_maps);
                Ok(TransformOutput {
                    code,
                    map: map.map(|map| map.to_json_string()),
                })
            }
            Some(adapter) => {
                let summary = interop::lower_module(&allocator, &mut program);
                let (body, map) = codegen(&program, path, source_maps);
                let envelope = interop::wrap(adapter, &summary, &body, &global_name(path));
                let map = map.map(|map| map.to_json_string());
                let map = match map {
                    Some(map) if envelope.body_line > 0 => {
                        Some(offset_mappings(&map, envelope.body_line).map_err(|e| {
                            TransformError::Transform {
                                path: path.to_path_buf(),
                                message: format!("source map adjustment failed: {e}"),
                            }
                        })?)
                    }
                    other => other,
                };
                Ok(TransformOutput {
                    code: envelope.code,
                    map,
                })
            }
        }
    }
}

/// TypeScript sources parse as TS modules, everything else as ES modules.
fn source_type_for(path: &Path) -> SourceType {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts") => SourceType::ts(),
        _ => SourceType::mjs(),
    }
}

/// First parse diagnostic as (message, byte offset), if any.
fn first_parse_error(ret: &ParserReturn<'_>) -> Option<(String, Option<usize>)> {
    if let Some(error) = ret.errors.first() {
        let offset = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset());
        return Some((error.message.to_string(), offset));
    }
    if ret.panicked {
        return Some(("unrecoverable parse error".to_string(), None));
    }
    None
}

fn syntax_error(path: &Path, source: &str, message: String, offset: Option<usize>) -> SyntaxError {
    let (line, column) = match offset {
        Some(offset) => offset_to_line_col(source, offset),
        None => (1, 1),
    };
    SyntaxError {
        path: path.to_path_buf(),
        message,
        line,
        column,
    }
}

/// Convert a byte offset into a 1-based (line, column) pair.
fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, c) in source.char_indices() {
        if index >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

fn codegen(program: &Program<'_>, path: &Path, source_maps: bool) -> (String, Option<SourceMap>) {
    let options = CodegenOptions {
        source_map_path: source_maps.then(|| PathBuf::from(path)),
        ..CodegenOptions::default()
    };
    let ret = Codegen::new().with_options(options).build(program);
    (ret.code, ret.map)
}

/// Global property name a UMD bundle registers under: the file stem with
/// anything that is not identifier-safe replaced by `_`.
fn global_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module");
    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
