//! Game configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use beam_engine::device::GpuInit;
use beam_engine::logging::LoggingConfig;
use beam_engine::render::ProgramSource;
use beam_engine::window::{LogicalSize, RuntimeConfig};

/// Where the shader program comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramConfig {
    /// The WGSL program built into the engine.
    Embedded,
    Files { vertex: PathBuf, fragment: PathBuf },
}

impl ProgramConfig {
    pub fn load(&self) -> Result<ProgramSource> {
        match self {
            ProgramConfig::Embedded => Ok(ProgramSource::builtin()),
            ProgramConfig::Files { vertex, fragment } => ProgramSource::from_files(vertex, fragment),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    /// Logical pixels.
    pub width: u32,
    pub height: u32,
    pub program: ProgramConfig,
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Beam".to_string(),
            width: 1920,
            height: 1080,
            program: ProgramConfig::Embedded,
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Defaults overridden by `BEAM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(w) = lookup("BEAM_WIDTH") {
            config.width = parse_dimension("BEAM_WIDTH", &w)?;
        }
        if let Some(h) = lookup("BEAM_HEIGHT") {
            config.height = parse_dimension("BEAM_HEIGHT", &h)?;
        }

        match (lookup("BEAM_VERTEX_SHADER"), lookup("BEAM_FRAGMENT_SHADER")) {
            (Some(vertex), Some(fragment)) => {
                config.program = ProgramConfig::Files {
                    vertex: vertex.into(),
                    fragment: fragment.into(),
                };
            }
            (None, None) => {}
            _ => anyhow::bail!("BEAM_VERTEX_SHADER and BEAM_FRAGMENT_SHADER must be set together"),
        }

        config.logging.env_filter = lookup("BEAM_LOG");

        Ok(config)
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width as f64, self.height as f64),
        }
    }

    pub fn gpu(&self) -> GpuInit {
        // Vertex colors are raw framebuffer values.
        GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        }
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32> {
    let n: u32 = value
        .trim()
        .parse()
        .with_context(|| format!("{key}={value:?} is not a pixel count"))?;
    anyhow::ensure!(n > 0, "{key} must be positive");
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let c = GameConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!((c.width, c.height), (1920, 1080));
        assert_eq!(c.program, ProgramConfig::Embedded);
        assert!(c.logging.env_filter.is_none());
    }

    #[test]
    fn shader_paths_switch_to_files() {
        let c = GameConfig::from_lookup(lookup(&[
            ("BEAM_VERTEX_SHADER", "a.vert.wgsl"),
            ("BEAM_FRAGMENT_SHADER", "a.frag.wgsl"),
            ("BEAM_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(
            c.program,
            ProgramConfig::Files {
                vertex: "a.vert.wgsl".into(),
                fragment: "a.frag.wgsl".into()
            }
        );
        assert_eq!(c.logging.env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn lone_shader_path_is_rejected() {
        assert!(GameConfig::from_lookup(lookup(&[("BEAM_VERTEX_SHADER", "a.wgsl")])).is_err());
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        assert!(GameConfig::from_lookup(lookup(&[("BEAM_WIDTH", "wide")])).is_err());
        assert!(GameConfig::from_lookup(lookup(&[("BEAM_HEIGHT", "0")])).is_err());

        let c = GameConfig::from_lookup(lookup(&[("BEAM_WIDTH", " 800 ")])).unwrap();
        assert_eq!(c.width, 800);
    }

    #[test]
    fn runtime_config_uses_title_and_size() {
        let r = GameConfig::default().runtime();
        assert_eq!(r.title, "Beam");
        assert_eq!(r.initial_size, LogicalSize::new(1920.0, 1080.0));
    }
}
