use std::fmt;
use std::fs;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};

pub mod config;
pub mod logger;
pub mod shaders;
pub mod walk;

use config::BuildConfig;
use shaders::dispatch::{self, CompileInvocation, CompileStatus};
use walk::walk_sources;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-file outcome counts from one build run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    /// Shaders the compiler accepted
    pub compiled: usize,
    /// Shaders the compiler rejected with a non-zero exit
    pub failed: usize,
    /// Shader sources skipped for an unrecognizable stage prefix
    pub skipped: usize,
    /// Directory entries that could not be read during the walk
    pub walk_errors: usize,
}

impl BuildSummary {
    /// True when every discovered shader source compiled. Walk errors do not
    /// count against the build; skipped and failed files do.
    pub fn success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} compiled, {} failed, {} skipped, {} walk errors",
            self.compiled, self.failed, self.skipped, self.walk_errors
        )
    }
}

/// Walk the source tree and run the external compiler once per recognized
/// shader source, sequentially.
///
/// Per-file problems (unreadable entries, unrecognized stage prefixes,
/// compiler rejections) are logged and counted without stopping the run. A
/// compiler that cannot be launched at all aborts immediately.
pub fn run_build(config: &BuildConfig) -> Result<BuildSummary> {
    let artifact_dir = config.output_dir.join(&config.platform_subdir);
    fs::create_dir_all(&artifact_dir).with_context(|| {
        format!(
            "could not create output directory {}",
            artifact_dir.display()
        )
    })?;

    let mut summary = BuildSummary::default();

    for entry in walk_sources(&config.root_dir) {
        let file = match entry {
            Ok(file) => file,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                summary.walk_errors += 1;
                continue;
            }
        };

        let spec = match shaders::classify(&file.dir, &file.name, config) {
            None => continue,
            Some(Err(e)) => {
                warn!("skipping {}: {}", file.path().display(), e);
                summary.skipped += 1;
                continue;
            }
            Some(Ok(spec)) => spec,
        };

        debug!(
            "compiling {} as {} ({:?})",
            spec.input_path.display(),
            spec.profile,
            spec.stage
        );

        let invocation = CompileInvocation::build(&spec, config);
        let status = dispatch::dispatch(&invocation).with_context(|| {
            format!(
                "could not run the shader compiler for {}",
                spec.input_path.display()
            )
        })?;

        match status {
            CompileStatus::Success => summary.compiled += 1,
            CompileStatus::Failure { exit_code } => {
                match exit_code {
                    Some(code) => error!(
                        "shader compiler failed on {} (exit code {})",
                        spec.input_path.display(),
                        code
                    ),
                    None => error!(
                        "shader compiler killed by a signal on {}",
                        spec.input_path.display()
                    ),
                }
                summary.failed += 1;
            }
        }
    }

    info!("build finished: {}", summary);
    Ok(summary)
}
