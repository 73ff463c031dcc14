//! Merging effect sources into one program.
//!
//! For each stage, every effect's source is pasted (in order) directly
//! above the base `void main()`, and the line holding [`EXTENSION_POINT`]
//! is replaced by one call per contributing effect, in the same order.

use std::sync::LazyLock;

use regex::Regex;

use crate::gpu::{GpuBackend, ProgramBuildError, ShaderStage};

use super::descriptor::EffectDescriptor;
use super::loader::ShaderSourceLoader;
use super::program::ShaderProgram;
use super::types::{ComposedSource, LineSpan, ShaderError};

/// Marker line in a base shader where effect calls are inserted.
pub const EXTENSION_POINT: &str = "// @effects";

static MAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*void[ \t]+main\s*\(").unwrap());

/// First source line number in a driver log: `0:12(5)`, `0(12)`, `ERROR: 0:12:`.
static LOG_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:ERROR:\s*)?\d+[:(](\d+)").unwrap());

static QUOTED_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[`'"]([A-Za-z_]\w*)['"]"#).unwrap());

#[derive(Debug, Clone)]
pub struct EffectComposer {
    base_vertex: String,
    base_fragment: String,
}

impl EffectComposer {
    pub fn new(base_vertex: impl Into<String>, base_fragment: impl Into<String>) -> Self {
        Self {
            base_vertex: base_vertex.into(),
            base_fragment: base_fragment.into(),
        }
    }

    /// Base skeleton from the loader's `base` entry.
    pub fn from_loader(loader: &dyn ShaderSourceLoader) -> Self {
        Self::new(
            loader.load("base", ShaderStage::Vertex),
            loader.load("base", ShaderStage::Fragment),
        )
    }

    /// Merge `effects` into the base skeleton. Pure and deterministic.
    pub fn compose(&self, effects: &[EffectDescriptor]) -> Result<ComposedSource, ShaderError> {
        let (vertex, vertex_spans) = compose_stage(&self.base_vertex, ShaderStage::Vertex, effects)?;
        let (fragment, fragment_spans) =
            compose_stage(&self.base_fragment, ShaderStage::Fragment, effects)?;
        Ok(ComposedSource {
            vertex,
            fragment,
            vertex_spans,
            fragment_spans,
        })
    }

    /// Compose and link. Failures are attributed to an effect when possible.
    pub fn build<B: GpuBackend>(
        &self,
        backend: &B,
        effects: &[EffectDescriptor],
    ) -> Result<ShaderProgram<B>, ShaderError> {
        let source = self.compose(effects)?;
        match ShaderProgram::link(backend, "main", source.clone()) {
            Ok(program) => Ok(program),
            Err(err) => {
                let err = attribute(err, &source, effects);
                tracing::error!(error = %err, "main shader program failed to build");
                Err(err)
            }
        }
    }
}

fn compose_stage(
    base: &str,
    stage: ShaderStage,
    effects: &[EffectDescriptor],
) -> Result<(String, Vec<LineSpan>), ShaderError> {
    let lines: Vec<&str> = base.lines().collect();

    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.trim() == EXTENSION_POINT)
        .map(|(i, _)| i)
        .collect();
    if markers.len() > 1 {
        return Err(ShaderError::DuplicateExtensionPoint { stage });
    }
    let main_line = lines
        .iter()
        .position(|l| MAIN_RE.is_match(l))
        .ok_or(ShaderError::MissingEntryPoint { stage })?;

    let calls: Vec<String> = effects.iter().filter_map(|e| e.call(stage)).collect();
    let marker = markers.first().copied();
    if marker.is_none() && !calls.is_empty() {
        return Err(ShaderError::MissingExtensionPoint { stage });
    }

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + effects.len() * 8);
    let mut spans = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if index == main_line {
            for effect in effects {
                let source = effect.source(stage).trim_end();
                if source.trim().is_empty() {
                    continue;
                }
                let first = out.len() + 1;
                out.push(format!("// effect: {}", effect.name));
                out.extend(source.lines().map(str::to_string));
                spans.push(LineSpan {
                    first,
                    last: out.len(),
                    effect: effect.name.clone(),
                });
                out.push(String::new());
            }
        }
        if Some(index) == marker {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            out.extend(calls.iter().map(|call| format!("{indent}{call}")));
            continue;
        }
        out.push(line.to_string());
    }

    let mut text = out.join("\n");
    text.push('\n');
    Ok((text, spans))
}

/// Turn a backend failure into a [`ShaderError`] naming the guilty effect.
pub(crate) fn attribute(
    err: ProgramBuildError,
    source: &ComposedSource,
    effects: &[EffectDescriptor],
) -> ShaderError {
    match err.stage {
        Some(stage) => {
            let line = first_log_line(&err.log);
            let effect = line
                .and_then(|l| source.effect_at(stage, l))
                .map(str::to_string);
            ShaderError::Compile {
                stage,
                effect,
                line,
                log: err.log,
            }
        }
        None => ShaderError::Link {
            effect: link_culprit(&err.log, effects),
            log: err.log,
        },
    }
}

fn first_log_line(log: &str) -> Option<usize> {
    LOG_LINE_RE
        .captures(log)
        .and_then(|caps| caps[1].parse().ok())
}

/// First effect owning, or else mentioning, an identifier quoted in the log.
fn link_culprit(log: &str, effects: &[EffectDescriptor]) -> Option<String> {
    for caps in QUOTED_IDENT_RE.captures_iter(log) {
        let ident = &caps[1];
        let owner = effects.iter().find(|e| {
            e.fragment_function == ident || e.vertex_function.as_deref() == Some(ident)
        });
        let mention = || {
            effects.iter().find(|e| {
                contains_word(&e.fragment_source, ident) || contains_word(&e.vertex_source, ident)
            })
        };
        if let Some(effect) = owner.or_else(mention) {
            return Some(effect.name.clone());
        }
    }
    None
}

fn contains_word(haystack: &str, word: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    haystack.match_indices(word).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}
