//! Structural GLSL checks standing in for a driver compiler and linker.
//!
//! This is not a parser. It finds top-level declarations and function
//! definitions with line-anchored patterns, which is enough for the shader
//! layout the composer produces. Logs follow Mesa's `0:LINE(COL): error:`
//! shape so the same attribution code handles real and headless output.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::gpu::ShaderStage;

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([A-Za-z_]\w*)[ \t]+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*\{").unwrap()
});

static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(\s*\)").unwrap());

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:layout\s*\([^)]*\)\s*)?(uniform|in|out)\s+(?:(?:flat|smooth|highp|mediump|lowp)\s+)*([A-Za-z_]\w*)\s+([A-Za-z_]\w*)\s*(?:\[\s*(\d+)\s*\])?\s*;",
    )
    .unwrap()
});

const CONTROL_KEYWORDS: [&str; 5] = ["if", "for", "while", "switch", "return"];
const BUILTIN_NULLARY: [&str; 2] = ["EmitVertex", "EndPrimitive"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct UniformDecl {
    pub ty: String,
    pub name: String,
    /// 1 for scalars.
    pub array_len: usize,
    /// Declared with `[N]`, including `[1]`.
    pub is_array: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct VaryingDecl {
    pub ty: String,
    pub name: String,
}

/// What one compiled stage exposes to the linker.
#[derive(Debug, Clone, Default)]
pub(super) struct StageInfo {
    pub uniforms: Vec<UniformDecl>,
    pub inputs: Vec<VaryingDecl>,
    pub outputs: Vec<VaryingDecl>,
    pub functions: BTreeSet<String>,
    pub calls: BTreeSet<String>,
}

/// Check one stage. The error is the full compile log.
pub(super) fn compile(source: &str) -> Result<StageInfo, String> {
    let code = strip_comments(source);
    let mut errors = Vec::new();

    check_version(&code, &mut errors);
    let depths = brace_depths(&code, &mut errors);

    let mut info = StageInfo::default();
    let mut signatures: Vec<(String, String)> = Vec::new();

    for caps in FUNCTION_RE.captures_iter(&code) {
        let whole = caps.get(0).map_or(0, |m| m.start());
        let name = &caps[2];
        if CONTROL_KEYWORDS.contains(&&caps[1]) || CONTROL_KEYWORDS.contains(&name) {
            continue;
        }
        if depth_at(&depths, whole) != 0 {
            continue;
        }
        let params = normalize_params(&caps[3]);
        if signatures.iter().any(|(n, p)| n == name && *p == params) {
            errors.push(format!(
                "0:{}(1): error: function `{name}' redefined",
                line_of(&code, whole)
            ));
        } else {
            signatures.push((name.to_string(), params));
        }
        info.functions.insert(name.to_string());
    }

    for caps in DECLARATION_RE.captures_iter(&code) {
        let start = caps.get(0).map_or(0, |m| m.start());
        if depth_at(&depths, start) != 0 {
            continue;
        }
        let ty = caps[2].to_string();
        let name = caps[3].to_string();
        match &caps[1] {
            "uniform" => {
                if info.uniforms.iter().any(|u| u.name == name) {
                    errors.push(format!(
                        "0:{}(1): error: `{name}' redeclared",
                        line_of(&code, start)
                    ));
                    continue;
                }
                let declared_len = caps.get(4).and_then(|m| m.as_str().parse().ok());
                info.uniforms.push(UniformDecl {
                    ty,
                    name,
                    array_len: declared_len.unwrap_or(1),
                    is_array: declared_len.is_some(),
                });
            }
            "in" => info.inputs.push(VaryingDecl { ty, name }),
            _ => info.outputs.push(VaryingDecl { ty, name }),
        }
    }

    for caps in CALL_RE.captures_iter(&code) {
        let name = &caps[1];
        if !CONTROL_KEYWORDS.contains(&name) {
            info.calls.insert(name.to_string());
        }
    }

    if errors.is_empty() {
        Ok(info)
    } else {
        Err(errors.join("\n"))
    }
}

/// Cross-stage checks. The error is the full link log.
pub(super) fn link(vertex: &StageInfo, fragment: &StageInfo) -> Result<(), String> {
    let mut errors = Vec::new();

    for (stage, info) in [(ShaderStage::Vertex, vertex), (ShaderStage::Fragment, fragment)] {
        if !info.functions.contains("main") {
            errors.push(format!("error: {stage} shader lacks `main'"));
        }
        for call in &info.calls {
            if !info.functions.contains(call) && !BUILTIN_NULLARY.contains(&call.as_str()) {
                errors.push(format!("error: unresolved reference to function `{call}'"));
            }
        }
    }

    for v in &vertex.uniforms {
        if let Some(f) = fragment.uniforms.iter().find(|f| f.name == v.name) {
            if f.ty != v.ty || f.array_len != v.array_len || f.is_array != v.is_array {
                errors.push(format!(
                    "error: uniform `{}' declared as type `{}' and type `{}'",
                    v.name, v.ty, f.ty
                ));
            }
        }
    }

    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|o| o.name == input.name) {
            None => errors.push(format!(
                "error: fragment shader input `{}' has no matching output in the previous stage",
                input.name
            )),
            Some(out) if out.ty != input.ty => errors.push(format!(
                "error: `{}' is declared as `{}' in the vertex shader and `{}' in the fragment shader",
                input.name, out.ty, input.ty
            )),
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("\n"))
    }
}

/// Replace comments with spaces, keeping newlines so line numbers hold.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

fn check_version(code: &str, errors: &mut Vec<String>) {
    let first = code.lines().position(|l| !l.trim().is_empty());
    let mut seen_first = false;
    for (idx, line) in code.lines().enumerate() {
        if line.trim_start().starts_with("#version") {
            if Some(idx) == first {
                seen_first = true;
            } else {
                errors.push(format!(
                    "0:{}(1): error: #version must appear before anything else",
                    idx + 1
                ));
            }
        }
    }
    if !seen_first && errors.is_empty() {
        errors.push("0:1(1): error: missing #version directive".to_string());
    }
}

/// Brace depth change points: `(byte offset, depth after that byte)`.
fn brace_depths(code: &str, errors: &mut Vec<String>) -> Vec<(usize, i32)> {
    let mut depths = Vec::new();
    let mut open_lines: Vec<usize> = Vec::new();
    let mut line = 1;
    for (offset, c) in code.char_indices() {
        match c {
            '\n' => line += 1,
            '{' => {
                open_lines.push(line);
                depths.push((offset, open_lines.len() as i32));
            }
            '}' => {
                if open_lines.pop().is_none() {
                    errors.push(format!("0:{line}(1): error: syntax error, unexpected '}}'"));
                }
                depths.push((offset, open_lines.len() as i32));
            }
            _ => {}
        }
    }
    if let Some(line) = open_lines.last() {
        errors.push(format!("0:{line}(1): error: unmatched '{{'"));
    }
    depths
}

fn depth_at(depths: &[(usize, i32)], offset: usize) -> i32 {
    depths
        .iter()
        .take_while(|(at, _)| *at < offset)
        .last()
        .map_or(0, |(_, depth)| *depth)
}

fn line_of(code: &str, offset: usize) -> usize {
    code[..offset].matches('\n').count() + 1
}

fn normalize_params(params: &str) -> String {
    let params = params.split_whitespace().collect::<Vec<_>>().join(" ");
    if params == "void" {
        String::new()
    } else {
        params
    }
}
