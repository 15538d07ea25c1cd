//! Format envelopes around lowered module bodies.
//!
//! Each emitter builds a text prelude/postlude from a [`ModuleSummary`] and
//! splices the generated body in between, untouched. Callers shift source
//! maps by [`Envelope::body_line`] so positions keep pointing into the body.

use super::{ImportBinding, ModuleInterop, ModuleSummary};

/// A wrapped module body.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Final code for the target loading convention
    pub code: String,
    /// Number of lines prepended before the body
    pub body_line: usize,
}

/// Wrap a lowered body for the given loading convention.
///
/// `global_name` is only used by the UMD envelope, as the property name the
/// module registers under when neither AMD nor CommonJS is present.
pub fn wrap(
    interop: ModuleInterop,
    summary: &ModuleSummary,
    body: &str,
    global_name: &str,
) -> Envelope {
    match interop {
        ModuleInterop::CommonJs => common_js(summary, body),
        ModuleInterop::Amd => amd(summary, body),
        ModuleInterop::Umd => umd(summary, body, global_name),
        ModuleInterop::SystemJs => system_js(summary, body),
    }
}

/// Unique module requests in first-appearance order, paired with their
/// generated local variable names.
fn request_vars(summary: &ModuleSummary) -> Vec<(String, String)> {
    let mut vars: Vec<(String, String)> = Vec::new();
    for source in summary.requests() {
        if !vars.iter().any(|(s, _)| s == source) {
            let var = format!("_m{}", vars.len());
            vars.push((source.to_string(), var));
        }
    }
    vars
}

fn var_for<'a>(vars: &'a [(String, String)], source: &str) -> &'a str {
    vars.iter()
        .find(|(s, _)| s == source)
        .map(|(_, v)| v.as_str())
        .unwrap_or("_m0")
}

fn common_js(summary: &ModuleSummary, body: &str) -> Envelope {
    let vars = request_vars(summary);
    let mut prelude = String::new();
    let mut line = |text: &str| {
        prelude.push_str(text);
        prelude.push('\n');
    };

    line("\"use strict\";");
    line("Object.defineProperty(exports, \"__esModule\", { value: true });");
    if summary
        .imports
        .iter()
        .any(|i| i.bindings.iter().any(|b| matches!(b, ImportBinding::Default { .. })))
    {
        line("function _interopDefault(m) { return m && m.__esModule ? m.default : m; }");
    }
    if !summary.star_reexports.is_empty() {
        line("function _exportStar(m) { Object.keys(m).forEach(function (k) { if (k !== \"default\" && !Object.prototype.hasOwnProperty.call(exports, k)) exports[k] = m[k]; }); }");
    }
    for (source, var) in &vars {
        line(&format!("var {var} = require({});", js_string(source)));
    }
    for import in &summary.imports {
        let var = var_for(&vars, &import.source);
        for binding in &import.bindings {
            match binding {
                ImportBinding::Named { imported, local } => {
                    line(&format!("var {local} = {var}{};", member(imported)));
                }
                ImportBinding::Default { local } => {
                    line(&format!("var {local} = _interopDefault({var});"));
                }
                ImportBinding::Namespace { local } => {
                    line(&format!("var {local} = {var};"));
                }
            }
        }
    }

    let mut postlude = String::new();
    let mut post = |text: &str| {
        postlude.push_str(text);
        postlude.push('\n');
    };
    for source in &summary.star_reexports {
        post(&format!("_exportStar({});", var_for(&vars, source)));
    }
    for (source, exported) in &summary.namespace_reexports {
        post(&format!(
            "exports{} = {};",
            member(exported),
            var_for(&vars, source)
        ));
    }
    for reexport in &summary.reexports {
        let var = var_for(&vars, &reexport.source);
        for (imported, exported) in &reexport.names {
            post(&format!(
                "exports{} = {var}{};",
                member(exported),
                member(imported)
            ));
        }
    }
    for export in &summary.exports {
        post(&format!("exports{} = {};", member(&export.exported), export.local));
    }

    let body_line = prelude.matches('\n').count();
    let mut code = prelude;
    code.push_str(body);
    if !body.ends_with('\n') && !body.is_empty() {
        code.push('\n');
    }
    code.push_str(&postlude);
    Envelope { code, body_line }
}

fn amd_deps(summary: &ModuleSummary) -> String {
    let mut deps = vec![
        "\"require\"".to_string(),
        "\"exports\"".to_string(),
        "\"module\"".to_string(),
    ];
    for (source, _) in request_vars(summary) {
        deps.push(js_string(&source));
    }
    deps.join(", ")
}

fn amd(summary: &ModuleSummary, body: &str) -> Envelope {
    let inner = common_js(summary, body);
    let header = format!(
        "define([{}], function (require, exports, module) {{\n",
        amd_deps(summary)
    );
    let body_line = header.matches('\n').count() + inner.body_line;
    let code = format!("{header}{}}});\n", inner.code);
    Envelope { code, body_line }
}

fn umd(summary: &ModuleSummary, body: &str, global_name: &str) -> Envelope {
    let inner = common_js(summary, body);
    let header = format!(
        concat!(
            "(function (root, factory) {{\n",
            "  if (typeof define === \"function\" && define.amd) {{\n",
            "    define([{deps}], factory);\n",
            "  }} else if (typeof exports === \"object\" && typeof module !== \"undefined\") {{\n",
            "    factory(require, exports, module);\n",
            "  }} else {{\n",
            "    var mod = {{ exports: {{}} }};\n",
            "    var req = function (id) {{ return root[id]; }};\n",
            "    factory(req, mod.exports, mod);\n",
            "    root{global} = mod.exports;\n",
            "  }}\n",
            "}})(typeof globalThis !== \"undefined\" ? globalThis : typeof self !== \"undefined\" ? self : this, function (require, exports, module) {{\n",
        ),
        deps = amd_deps(summary),
        global = member(global_name),
    );
    let body_line = header.matches('\n').count() + inner.body_line;
    let code = format!("{header}{}}});\n", inner.code);
    Envelope { code, body_line }
}

fn system_js(summary: &ModuleSummary, body: &str) -> Envelope {
    let vars = request_vars(summary);
    let deps = vars
        .iter()
        .map(|(source, _)| js_string(source))
        .collect::<Vec<_>>()
        .join(", ");

    let locals: Vec<&str> = summary
        .imports
        .iter()
        .flat_map(|import| import.bindings.iter())
        .map(|binding| match binding {
            ImportBinding::Named { local, .. }
            | ImportBinding::Default { local }
            | ImportBinding::Namespace { local } => local.as_str(),
        })
        .collect();

    let mut header = format!("System.register([{deps}], function (_export, _context) {{\n");
    header.push_str("  \"use strict\";\n");
    if !locals.is_empty() {
        header.push_str(&format!("  var {};\n", locals.join(", ")));
    }
    header.push_str("  return {\n");
    header.push_str("    setters: [");
    let setters = vars
        .iter()
        .map(|(source, _)| setter(summary, source))
        .collect::<Vec<_>>()
        .join(", ");
    header.push_str(&setters);
    header.push_str("],\n");
    header.push_str("    execute: function () {\n");

    let mut postlude = String::new();
    for export in &summary.exports {
        postlude.push_str(&format!(
            "      _export({}, {});\n",
            js_string(&export.exported),
            export.local
        ));
    }
    postlude.push_str("    }\n  };\n});\n");

    let body_line = header.matches('\n').count();
    let mut code = header;
    code.push_str(body);
    if !body.ends_with('\n') && !body.is_empty() {
        code.push('\n');
    }
    code.push_str(&postlude);
    Envelope { code, body_line }
}

/// The System.register setter for one module request, combining every
/// import binding and re-export that targets it.
fn setter(summary: &ModuleSummary, source: &str) -> String {
    let mut statements: Vec<String> = Vec::new();
    for import in summary.imports.iter().filter(|i| i.source == source) {
        for binding in &import.bindings {
            match binding {
                ImportBinding::Named { imported, local } => {
                    statements.push(format!("{local} = m{};", member(imported)));
                }
                ImportBinding::Default { local } => {
                    statements.push(format!("{local} = m.default;"));
                }
                ImportBinding::Namespace { local } => {
                    statements.push(format!("{local} = m;"));
                }
            }
        }
    }
    for reexport in summary.reexports.iter().filter(|r| r.source == source) {
        for (imported, exported) in &reexport.names {
            statements.push(format!(
                "_export({}, m{});",
                js_string(exported),
                member(imported)
            ));
        }
    }
    for (_, exported) in summary
        .namespace_reexports
        .iter()
        .filter(|(s, _)| s == source)
    {
        statements.push(format!("_export({}, m);", js_string(exported)));
    }
    if summary.star_reexports.iter().any(|s| s == source) {
        statements.push(
            "var exportObj = {}; for (var key in m) { if (key !== \"default\" && Object.prototype.hasOwnProperty.call(m, key)) exportObj[key] = m[key]; } _export(exportObj);"
                .to_string(),
        );
    }
    if statements.is_empty() {
        "function () {}".to_string()
    } else {
        format!("function (m) {{ {} }}", statements.join(" "))
    }
}

/// Property access for `name`: dot form when it is a valid identifier,
/// bracket form otherwise (string export names).
fn member(name: &str) -> String {
    if is_identifier(name) {
        format!(".{name}")
    } else {
        format!("[{}]", js_string(name))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
