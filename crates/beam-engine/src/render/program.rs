//! Shader program sources.
//!
//! A program is a vertex stage (`vs_main`) and a fragment stage (`fs_main`),
//! each in its own WGSL source. Vertex inputs are `@location(0)` position and
//! `@location(1)` color (both `vec3<f32>`); the MVP matrix is a uniform at
//! `@group(0) @binding(0)`.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

const BUILTIN_VERTEX: &str = include_str!("shaders/sprite_vert.wgsl");
const BUILTIN_FRAGMENT: &str = include_str!("shaders/sprite_frag.wgsl");

/// Opaque handle to a linked program.
///
/// `INVALID` (0) is returned when compilation fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ProgramHandle(pub u32);

impl ProgramHandle {
    pub const INVALID: ProgramHandle = ProgramHandle(0);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for ProgramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program#{}", self.0)
    }
}

/// Vertex + fragment source text.
#[derive(Debug, Clone)]
pub struct ProgramSource {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
}

impl ProgramSource {
    /// The sprite program shipped with the engine.
    pub fn builtin() -> Self {
        Self {
            label: "builtin sprite".to_string(),
            vertex: BUILTIN_VERTEX.to_string(),
            fragment: BUILTIN_FRAGMENT.to_string(),
        }
    }

    /// Reads both stages from disk.
    pub fn from_files(vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> Result<Self> {
        let vertex = vertex.as_ref();
        let fragment = fragment.as_ref();

        log::info!("loading shader program: {} + {}", vertex.display(), fragment.display());

        Ok(Self {
            label: label_for(vertex, fragment),
            vertex: read_stage(vertex)?,
            fragment: read_stage(fragment)?,
        })
    }

    /// Parses and validates both stages and checks their entry points.
    ///
    /// Returns one diagnostic per problem; empty means the program can be
    /// handed to the GPU.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut out = Vec::new();
        check_stage(&mut out, "vertex", &self.vertex, naga::ShaderStage::Vertex, VERTEX_ENTRY);
        check_stage(&mut out, "fragment", &self.fragment, naga::ShaderStage::Fragment, FRAGMENT_ENTRY);
        out
    }
}

fn read_stage(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader source {}", path.display()))
}

fn label_for(vertex: &Path, fragment: &Path) -> String {
    let stem = |p: &Path| {
        p.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };
    format!("{}+{}", stem(vertex), stem(fragment))
}

fn check_stage(
    out: &mut Vec<String>,
    stage_name: &str,
    src: &str,
    stage: naga::ShaderStage,
    entry: &str,
) {
    if src.trim().is_empty() {
        out.push(format!("{stage_name} stage: source is empty"));
        return;
    }

    let module = match naga::front::wgsl::parse_str(src) {
        Ok(m) => m,
        Err(e) => {
            out.push(format!("{stage_name} stage: {}", e.emit_to_string(src)));
            return;
        }
    };

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    if let Err(e) = validator.validate(&module) {
        out.push(format!("{stage_name} stage: {}", e.emit_to_string(src)));
        return;
    }

    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry && ep.stage == stage);
    if !found {
        out.push(format!("{stage_name} stage: entry point `{entry}` not found"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_program_passes_checks() {
        assert!(ProgramSource::builtin().diagnostics().is_empty());
    }

    #[test]
    fn empty_stage_is_reported() {
        let src = ProgramSource {
            label: "broken".into(),
            vertex: String::new(),
            fragment: BUILTIN_FRAGMENT.into(),
        };
        let diags = src.diagnostics();
        assert_eq!(diags, vec!["vertex stage: source is empty".to_string()]);
    }

    #[test]
    fn swapped_stages_are_reported() {
        let src = ProgramSource {
            label: "swapped".into(),
            vertex: BUILTIN_FRAGMENT.into(),
            fragment: BUILTIN_VERTEX.into(),
        };
        let diags = src.diagnostics();
        assert_eq!(diags.len(), 2);
        assert!(diags[0].contains("`vs_main` not found"));
        assert!(diags[1].contains("`fs_main` not found"));
    }

    #[test]
    fn syntax_error_is_reported_with_stage() {
        let src = ProgramSource {
            label: "typo".into(),
            vertex: BUILTIN_VERTEX.replace("return out;", "return out"),
            fragment: BUILTIN_FRAGMENT.into(),
        };
        let diags = src.diagnostics();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].starts_with("vertex stage:"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ProgramSource::from_files("does/not/exist.vert.wgsl", "nope.frag.wgsl").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.vert.wgsl"));
    }

    #[test]
    fn invalid_handle_is_zero() {
        assert!(!ProgramHandle::INVALID.is_valid());
        assert!(ProgramHandle(1).is_valid());
        assert_eq!(ProgramHandle::default(), ProgramHandle::INVALID);
    }
}
