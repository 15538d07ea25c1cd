//! AST lowering: strip module syntax, collect the module summary.
//!
//! Runs after the environment transform, so TypeScript-only constructs are
//! already gone. The pass only moves or removes existing nodes; the single
//! synthesized node is the `var` binding for an anonymous default export.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast::{AstBuilder, NONE};
use oxc_span::SPAN;

use super::{ExportRecord, ImportBinding, ImportRecord, ModuleSummary, ReexportRecord};

/// Local name bound to an anonymous `export default` value.
pub const DEFAULT_BINDING: &str = "_default";

/// Strip `import`/`export` syntax from `program`, returning what was
/// removed as a [`ModuleSummary`].
///
/// Exported declarations are unwrapped in place (`export const x = 1`
/// becomes `const x = 1`); import declarations and export lists disappear
/// entirely. Envelope emitters re-introduce the bindings around the
/// generated body.
pub fn lower_module<'a>(allocator: &'a Allocator, program: &mut Program<'a>) -> ModuleSummary {
    let ast = AstBuilder::new(allocator);
    let mut summary = ModuleSummary::default();

    let body = std::mem::replace(&mut program.body, ast.vec());
    let mut lowered: Vec<Statement<'a>> = Vec::with_capacity(body.len());

    for stmt in body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                let decl = decl.unbox();
                let mut record = ImportRecord {
                    source: decl.source.value.to_string(),
                    bindings: Vec::new(),
                };
                if let Some(specifiers) = decl.specifiers {
                    for specifier in specifiers {
                        record.bindings.push(import_binding(specifier));
                    }
                }
                summary.imports.push(record);
            }
            Statement::ExportNamedDeclaration(decl) => {
                let decl = decl.unbox();
                if let Some(inner) = decl.declaration {
                    for name in declared_names(&inner) {
                        summary.exports.push(ExportRecord {
                            exported: name.clone(),
                            local: name,
                        });
                    }
                    lowered.push(Statement::from(inner));
                } else if let Some(source) = &decl.source {
                    let names = decl
                        .specifiers
                        .iter()
                        .map(|s| (export_name(&s.local), export_name(&s.exported)))
                        .collect();
                    summary.reexports.push(ReexportRecord {
                        source: source.value.to_string(),
                        names,
                    });
                } else {
                    for specifier in &decl.specifiers {
                        summary.exports.push(ExportRecord {
                            exported: export_name(&specifier.exported),
                            local: export_name(&specifier.local),
                        });
                    }
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                let decl = decl.unbox();
                let local = lower_default(&ast, decl.declaration, &mut lowered);
                if let Some(local) = local {
                    summary.exports.push(ExportRecord {
                        exported: "default".to_string(),
                        local,
                    });
                }
            }
            Statement::ExportAllDeclaration(decl) => {
                let decl = decl.unbox();
                let source = decl.source.value.to_string();
                match &decl.exported {
                    Some(name) => summary
                        .namespace_reexports
                        .push((source, export_name(name))),
                    None => summary.star_reexports.push(source),
                }
            }
            other => lowered.push(other),
        }
    }

    program.body = ast.vec_from_iter(lowered);
    summary
}

/// The referenced name of an import/export specifier side.
fn export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

fn import_binding(specifier: ImportDeclarationSpecifier<'_>) -> ImportBinding {
    match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(s) => ImportBinding::Named {
            imported: export_name(&s.imported),
            local: s.local.name.to_string(),
        },
        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportBinding::Default {
            local: s.local.name.to_string(),
        },
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => ImportBinding::Namespace {
            local: s.local.name.to_string(),
        },
    }
}

/// Lower one `export default` declaration, returning the local name the
/// default value is bound to.
fn lower_default<'a>(
    ast: &AstBuilder<'a>,
    declaration: ExportDefaultDeclarationKind<'a>,
    lowered: &mut Vec<Statement<'a>>,
) -> Option<String> {
    match declaration {
        ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
            let name = func.id.as_ref().map(|id| id.name.to_string());
            match name {
                Some(name) => {
                    lowered.push(Statement::FunctionDeclaration(func));
                    Some(name)
                }
                None => {
                    let mut func = func;
                    func.r#type = FunctionType::FunctionExpression;
                    lowered.push(bind_default(ast, Expression::FunctionExpression(func)));
                    Some(DEFAULT_BINDING.to_string())
                }
            }
        }
        ExportDefaultDeclarationKind::ClassDeclaration(class) => {
            let name = class.id.as_ref().map(|id| id.name.to_string());
            match name {
                Some(name) => {
                    lowered.push(Statement::ClassDeclaration(class));
                    Some(name)
                }
                None => {
                    let mut class = class;
                    class.r#type = ClassType::ClassExpression;
                    lowered.push(bind_default(ast, Expression::ClassExpression(class)));
                    Some(DEFAULT_BINDING.to_string())
                }
            }
        }
        ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => None,
        expression => {
            lowered.push(bind_default(ast, expression.into_expression()));
            Some(DEFAULT_BINDING.to_string())
        }
    }
}

/// `var _default = <expr>;`
fn bind_default<'a>(ast: &AstBuilder<'a>, value: Expression<'a>) -> Statement<'a> {
    let kind = VariableDeclarationKind::Var;
    let pattern = ast.binding_pattern(
        ast.binding_pattern_kind_binding_identifier(SPAN, DEFAULT_BINDING),
        NONE,
        false,
    );
    let declarator = ast.variable_declarator(SPAN, kind, pattern, Some(value), false);
    let declaration = ast.declaration_variable(SPAN, kind, ast.vec1(declarator), false);
    Statement::from(declaration)
}

/// Names bound by a declaration, in source order.
fn declared_names(declaration: &Declaration<'_>) -> Vec<String> {
    let mut names = Vec::new();
    match declaration {
        Declaration::VariableDeclaration(var) => {
            for declarator in &var.declarations {
                collect_pattern_names(&declarator.id, &mut names);
            }
        }
        Declaration::FunctionDeclaration(func) => {
            if let Some(id) = &func.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                names.push(id.name.to_string());
            }
        }
        _ => {}
    }
    names
}

fn collect_pattern_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => names.push(id.name.to_string()),
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                collect_pattern_names(&property.value, names);
            }
            if let Some(rest) = &object.rest {
                collect_pattern_names(&rest.argument, names);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                collect_pattern_names(element, names);
            }
            if let Some(rest) = &array.rest {
                collect_pattern_names(&rest.argument, names);
            }
        }
        BindingPatternKind::AssignmentPattern(assignment) => {
            collect_pattern_names(&assignment.left, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_codegen::Codegen;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn lower(source: &str) -> (ModuleSummary, String) {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty(), "fixture must parse: {source}");
        let mut program = ret.program;
        let summary = lower_module(&allocator, &mut program);
        let code = Codegen::new().build(&program).code;
        (summary, code)
    }

    #[test]
    fn test_imports_are_stripped_and_recorded() {
        let (summary, code) = lower(
            "import fs from \"fs\";\nimport { join as j } from \"path\";\nimport * as os from \"os\";\nimport \"./side-effect.js\";\nj(fs, os);\n",
        );
        assert!(!code.contains("import"));
        assert_eq!(summary.imports.len(), 4);
        assert_eq!(
            summary.imports[0].bindings,
            vec![ImportBinding::Default {
                local: "fs".to_string()
            }]
        );
        assert_eq!(
            summary.imports[1].bindings,
            vec![ImportBinding::Named {
                imported: "join".to_string(),
                local: "j".to_string()
            }]
        );
        assert_eq!(
            summary.imports[2].bindings,
            vec![ImportBinding::Namespace {
                local: "os".to_string()
            }]
        );
        assert!(summary.imports[3].bindings.is_empty());
    }

    #[test]
    fn test_exported_declarations_are_unwrapped() {
        let (summary, code) = lower("export const x = 1;\nexport function f() {}\n");
        assert!(!code.contains("export"));
        assert!(code.contains("const x = 1"));
        assert!(code.contains("function f()"));
        let exported: Vec<_> = summary.exports.iter().map(|e| e.exported.as_str()).collect();
        assert_eq!(exported, vec!["x", "f"]);
    }

    #[test]
    fn test_destructured_export_names_are_collected() {
        let (summary, _) = lower("export const { a, b: [c, d] } = value();\n");
        let exported: Vec<_> = summary.exports.iter().map(|e| e.exported.as_str()).collect();
        assert_eq!(exported, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_export_list_is_recorded() {
        let (summary, code) = lower("const x = 1;\nexport { x as y, x as default };\n");
        assert!(!code.contains("export"));
        assert_eq!(summary.exports.len(), 2);
        assert_eq!(summary.exports[0].exported, "y");
        assert_eq!(summary.exports[0].local, "x");
        assert_eq!(summary.exports[1].exported, "default");
    }

    #[test]
    fn test_anonymous_default_is_bound() {
        let (summary, code) = lower("export default class {}\n");
        assert!(code.contains("var _default = class"));
        assert_eq!(summary.exports[0].exported, "default");
        assert_eq!(summary.exports[0].local, DEFAULT_BINDING);
    }

    #[test]
    fn test_named_default_function_keeps_its_name() {
        let (summary, code) = lower("export default function main() {}\n");
        assert!(code.contains("function main()"));
        assert_eq!(summary.exports[0].local, "main");
    }

    #[test]
    fn test_reexports_are_recorded() {
        let (summary, code) = lower(
            "export { a as b } from \"./a.js\";\nexport * from \"./all.js\";\nexport * as ns from \"./ns.js\";\n",
        );
        assert!(code.is_empty());
        assert_eq!(summary.reexports.len(), 1);
        assert_eq!(summary.reexports[0].source, "./a.js");
        assert_eq!(
            summary.reexports[0].names,
            vec![("a".to_string(), "b".to_string())]
        );
        assert_eq!(summary.star_reexports, vec!["./all.js".to_string()]);
        assert_eq!(
            summary.namespace_reexports,
            vec![("./ns.js".to_string(), "ns".to_string())]
        );
    }

    #[test]
    fn test_plain_script_is_untouched() {
        let (summary, code) = lower("const x = 1;\nconsole.log(x);\n");
        assert!(summary.is_plain());
        assert!(code.contains("const x = 1"));
        assert!(code.contains("console.log(x)"));
    }
}
