use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Build-wide configuration, constructed once at startup and read-only after
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Source tree scanned for shader sources
    pub root_dir: PathBuf,
    /// Destination tree for compiled artifacts
    pub output_dir: PathBuf,
    /// External shader compiler executable (bare name resolves via PATH)
    pub compiler: PathBuf,
    /// Working directory for compiler processes; the compiler resolves
    /// relative include paths from there
    pub compiler_root: Option<PathBuf>,
    /// Include search paths, joined with ';' into a single -i argument
    pub include_paths: Vec<String>,
    /// Target platform token forwarded to the compiler
    pub platform: String,
    /// Output subdirectory for the target graphics API
    pub platform_subdir: String,
    /// Shader-model suffix used to form profile tokens (vs_4_0 / ps_4_0)
    pub shader_model: String,
    /// Optimization level 0-3, forwarded as -oN
    pub opt_level: u8,
    /// File extension of compiled artifacts
    pub binary_extension: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            compiler: PathBuf::from("shaderc"),
            compiler_root: None,
            include_paths: vec![
                "bgfx/src".to_string(),
                "bgfx/examples/common".to_string(),
            ],
            platform: "windows".to_string(),
            platform_subdir: "dx11".to_string(),
            shader_model: "4_0".to_string(),
            opt_level: 3,
            binary_extension: "bin".to_string(),
        }
    }
}

impl BuildConfig {
    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("could not parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save the config to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("could not write config file {}", path.display()))?;
        Ok(())
    }

    /// Check that the config describes a runnable build
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(anyhow!("no source root directory configured (--root)"));
        }
        if !self.root_dir.is_dir() {
            return Err(anyhow!(
                "source root {} is not a directory",
                self.root_dir.display()
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("no output directory configured (--output)"));
        }
        if self.opt_level > 3 {
            return Err(anyhow!(
                "optimization level must be 0-3, got {}",
                self.opt_level
            ));
        }
        Ok(())
    }
}
