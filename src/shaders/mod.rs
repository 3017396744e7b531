pub mod dispatch;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::BuildConfig;

/// Graphics pipeline stage a shader source targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A shader-suffixed file with no recognizable stage prefix
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("shader source {name:?} has neither a vs_ nor an fs_ prefix")]
    UnrecognizedStage { name: String },
}

impl ShaderStage {
    /// Derive the stage from the filename prefix. Prefix check only; an
    /// fs_/vs_ occurring mid-name does not count.
    pub fn from_filename(name: &str) -> Result<Self, ClassifyError> {
        if name.starts_with("fs_") {
            Ok(ShaderStage::Fragment)
        } else if name.starts_with("vs_") {
            Ok(ShaderStage::Vertex)
        } else {
            Err(ClassifyError::UnrecognizedStage {
                name: name.to_string(),
            })
        }
    }

    /// Stage token for the compiler's --type flag
    pub fn type_token(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "v",
            ShaderStage::Fragment => "f",
        }
    }

    /// Profile token for the given shader-model suffix, e.g. vs_4_0 or ps_4_0
    pub fn profile(self, shader_model: &str) -> String {
        match self {
            ShaderStage::Vertex => format!("vs_{}", shader_model),
            ShaderStage::Fragment => format!("ps_{}", shader_model),
        }
    }
}

/// Everything the dispatcher needs to compile one shader source.
///
/// Built fresh per file; stage and profile are always derived together so
/// they cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSpec {
    pub stage: ShaderStage,
    pub profile: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

/// Whether a filename names a compilable shader source.
///
/// This is the compiler's loose naming convention, not an extension check:
/// any name ending in the two characters "sc" qualifies (even with no dot),
/// except the varying.def declaration files.
pub fn is_shader_source(name: &str) -> bool {
    name.ends_with("sc") && !name.starts_with("varying.def")
}

/// Classify one directory entry.
///
/// `None` for files that are not shader sources at all; `Some(Err(..))` for
/// shader sources whose stage cannot be determined; `Some(Ok(spec))`
/// otherwise. Pure function of its arguments.
pub fn classify(
    dir: &Path,
    name: &str,
    config: &BuildConfig,
) -> Option<Result<ShaderSpec, ClassifyError>> {
    if !is_shader_source(name) {
        return None;
    }
    let stage = match ShaderStage::from_filename(name) {
        Ok(stage) => stage,
        Err(e) => return Some(Err(e)),
    };
    Some(Ok(ShaderSpec {
        stage,
        profile: stage.profile(&config.shader_model),
        input_path: dir.join(name),
        output_path: output_path(name, config),
    }))
}

/// Artifact path for a source filename: the stem with the binary extension,
/// under the platform subdirectory of the output root. Two sources with the
/// same stem map to the same artifact and overwrite each other silently.
pub fn output_path(name: &str, config: &BuildConfig) -> PathBuf {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    config
        .output_dir
        .join(&config.platform_subdir)
        .join(format!("{}.{}", stem, config.binary_extension))
}
