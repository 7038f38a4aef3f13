//! Structured JavaScript code trees and their printer
//!
//! The printer emits ES module syntax with JSX, two-space indentation,
//! single-quoted strings and no trailing semicolons.

use serde::{Deserialize, Serialize};

use super::markup::{MarkupAttr, MarkupChild, MarkupNode};

/// A named import specifier (`imported as local`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedImport {
    pub imported: String,
    pub local: String,
}

/// Bindings introduced by an import declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportClause {
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<NamedImport>,
}

impl ImportClause {
    /// True for path-only imports such as `import './style.css'`
    pub fn is_side_effect(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    None,
    Named,
    Default,
}

/// An expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Identifier(String),
    Str(String),
    /// Pre-rendered expression text
    Raw(String),
    Jsx(MarkupNode),
    Object(Vec<(String, Expr)>),
    Array(Vec<Expr>),
    Null,
}

/// A statement or declaration of a JavaScript module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CodeNode {
    /// A sequence of statements printed one after another
    Program(Vec<CodeNode>),
    Import {
        source: String,
        clause: ImportClause,
    },
    Const {
        name: String,
        value: Expr,
        export: ExportKind,
    },
    /// Arrow function bound to a constant
    Function {
        name: String,
        params: Vec<String>,
        body: Vec<CodeNode>,
        export: ExportKind,
    },
    Return(Expr),
    ExportDefault(String),
    /// Raw statement line
    Statement(String),
    Comment(String),
}

impl CodeNode {
    pub fn import(source: impl Into<String>, clause: ImportClause) -> Self {
        Self::Import {
            source: source.into(),
            clause,
        }
    }

    /// Mutable access to the statements of a program node
    pub fn statements_mut(&mut self) -> Option<&mut Vec<CodeNode>> {
        match self {
            Self::Program(statements) => Some(statements),
            _ => None,
        }
    }
}

/// Print a code tree
pub fn render(node: &CodeNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out.truncate(out.trim_end().len());
    out
}

fn write_node(out: &mut String, node: &CodeNode, depth: usize) {
    match node {
        CodeNode::Program(statements) => {
            for statement in statements {
                write_node(out, statement, depth);
            }
        }
        CodeNode::Import { source, clause } => {
            indent(out, depth);
            out.push_str(&print_import(source, clause));
            out.push('\n');
        }
        CodeNode::Const {
            name,
            value,
            export,
        } => {
            indent(out, depth);
            out.push_str(export_prefix(*export));
            out.push_str(&format!("const {} = {}\n", name, print_expr(value, depth)));
        }
        CodeNode::Function {
            name,
            params,
            body,
            export,
        } => {
            indent(out, depth);
            out.push_str(export_prefix(*export));
            out.push_str(&format!("const {} = ({}) => {{\n", name, params.join(", ")));
            for statement in body {
                write_node(out, statement, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
        CodeNode::Return(Expr::Jsx(element)) => {
            indent(out, depth);
            out.push_str("return (\n");
            write_jsx(out, element, depth + 1);
            indent(out, depth);
            out.push_str(")\n");
        }
        CodeNode::Return(expr) => {
            indent(out, depth);
            out.push_str(&format!("return {}\n", print_expr(expr, depth)));
        }
        CodeNode::ExportDefault(name) => {
            indent(out, depth);
            out.push_str(&format!("export default {}\n", name));
        }
        CodeNode::Statement(text) => {
            indent(out, depth);
            out.push_str(text);
            out.push('\n');
        }
        CodeNode::Comment(text) => {
            indent(out, depth);
            out.push_str(&format!("// {}\n", text));
        }
    }
}

fn export_prefix(export: ExportKind) -> &'static str {
    match export {
        ExportKind::None => "",
        ExportKind::Named => "export ",
        ExportKind::Default => "export default ",
    }
}

fn print_import(source: &str, clause: &ImportClause) -> String {
    if clause.is_side_effect() {
        return format!("import '{}'", source);
    }

    let mut bindings = Vec::new();
    if let Some(default) = &clause.default {
        bindings.push(default.clone());
    }
    if let Some(namespace) = &clause.namespace {
        bindings.push(format!("* as {}", namespace));
    }
    if !clause.named.is_empty() {
        let named: Vec<String> = clause
            .named
            .iter()
            .map(|spec| {
                if spec.imported == spec.local {
                    spec.local.clone()
                } else {
                    format!("{} as {}", spec.imported, spec.local)
                }
            })
            .collect();
        bindings.push(format!("{{ {} }}", named.join(", ")));
    }

    format!("import {} from '{}'", bindings.join(", "), source)
}

fn print_expr(expr: &Expr, depth: usize) -> String {
    match expr {
        Expr::Identifier(name) | Expr::Raw(name) => name.clone(),
        Expr::Str(value) => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'")),
        Expr::Null => "null".to_string(),
        Expr::Array(items) => {
            let items: Vec<String> = items.iter().map(|item| print_expr(item, depth)).collect();
            format!("[{}]", items.join(", "))
        }
        Expr::Object(entries) if entries.is_empty() => "{}".to_string(),
        Expr::Object(entries) => {
            let mut out = String::from("{\n");
            for (key, value) in entries {
                indent(&mut out, depth + 1);
                out.push_str(&format!("{}: {},\n", key, print_expr(value, depth + 1)));
            }
            indent(&mut out, depth);
            out.push('}');
            out
        }
        Expr::Jsx(element) => {
            let mut out = String::new();
            write_jsx(&mut out, element, depth);
            out.trim().to_string()
        }
    }
}

fn write_jsx(out: &mut String, node: &MarkupNode, depth: usize) {
    indent(out, depth);
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        match value {
            MarkupAttr::Static(text) => out.push_str(&format!(" {}=\"{}\"", key, text.replace('"', "&quot;"))),
            MarkupAttr::Dynamic(expr) => out.push_str(&format!(" {}={{{}}}", key, expr)),
            MarkupAttr::Boolean => {
                out.push(' ');
                out.push_str(key);
            }
        }
    }

    if node.children.is_empty() {
        out.push_str(" />\n");
        return;
    }
    out.push('>');

    let inline = node
        .children
        .iter()
        .all(|child| !matches!(child, MarkupChild::Element(_)));
    if inline {
        for child in &node.children {
            write_jsx_inline(out, child);
        }
    } else {
        out.push('\n');
        for child in &node.children {
            match child {
                MarkupChild::Element(element) => write_jsx(out, element, depth + 1),
                other => {
                    indent(out, depth + 1);
                    write_jsx_inline(out, other);
                    out.push('\n');
                }
            }
        }
        indent(out, depth);
    }
    out.push_str(&format!("</{}>\n", node.tag));
}

fn write_jsx_inline(out: &mut String, child: &MarkupChild) {
    match child {
        MarkupChild::Text(text) => out.push_str(
            &super::markup::escape_text(text)
                .replace('{', "&#123;")
                .replace('}', "&#125;"),
        ),
        MarkupChild::Raw(raw) => out.push_str(raw),
        MarkupChild::Expression(expr) => out.push_str(&format!("{{{}}}", expr)),
        MarkupChild::Element(element) => {
            let mut nested = String::new();
            write_jsx(&mut nested, element, 0);
            out.push_str(nested.trim_end());
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
