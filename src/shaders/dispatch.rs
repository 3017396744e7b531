use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use log::info;
use thiserror::Error;

use super::ShaderSpec;
use crate::config::BuildConfig;

/// Outcome of one compiler run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    Success,
    /// Non-zero exit; `exit_code` is None when the child died to a signal
    Failure { exit_code: Option<i32> },
}

/// The compiler could not be started at all. Fatal: nothing else can
/// compile without the tool.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to launch shader compiler {program:?}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One fully-assembled compiler call: program, ordered argument vector, and
/// the working directory for the child process
#[derive(Debug, Clone, PartialEq)]
pub struct CompileInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl CompileInvocation {
    /// Assemble the argument vector for one shader.
    ///
    /// Order is fixed: input, output, stage type, include list, platform,
    /// profile, optimization. Every value is its own argv element; nothing
    /// is ever concatenated into a shell string for execution.
    pub fn build(spec: &ShaderSpec, config: &BuildConfig) -> Self {
        let args = vec![
            "-f".to_string(),
            spec.input_path.display().to_string(),
            "-o".to_string(),
            spec.output_path.display().to_string(),
            "--type".to_string(),
            spec.stage.type_token().to_string(),
            "-i".to_string(),
            config.include_paths.join(";"),
            "--platform".to_string(),
            config.platform.clone(),
            "--profile".to_string(),
            spec.profile.clone(),
            format!("-o{}", config.opt_level),
        ];
        CompileInvocation {
            program: config.compiler.clone(),
            args,
            working_dir: config.compiler_root.clone(),
        }
    }
}

// Command-line rendering for the pre-invocation echo. Logging only; this
// string is never executed.
impl fmt::Display for CompileInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(' ') || arg.contains(';') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Run the compiler for one shader and wait for it to exit.
///
/// stdout/stderr are inherited from this process, not parsed; only the exit
/// code is reported.
pub fn dispatch(invocation: &CompileInvocation) -> Result<CompileStatus, DispatchError> {
    info!("{}", invocation);

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    if let Some(dir) = &invocation.working_dir {
        command.current_dir(dir);
    }

    let status = command.status().map_err(|source| DispatchError::Launch {
        program: invocation.program.clone(),
        source,
    })?;

    if status.success() {
        Ok(CompileStatus::Success)
    } else {
        Ok(CompileStatus::Failure {
            exit_code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_config() -> BuildConfig {
        let mut config = BuildConfig::default();
        config.root_dir = PathBuf::from("shaders");
        config.output_dir = PathBuf::from("out");
        config
    }

    fn test_spec(config: &BuildConfig) -> ShaderSpec {
        crate::shaders::classify(Path::new("shaders"), "vs_basic.sc", config)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_argument_vector_order() {
        let config = test_config();
        let invocation = CompileInvocation::build(&test_spec(&config), &config);

        assert_eq!(invocation.program, PathBuf::from("shaderc"));
        let sep = std::path::MAIN_SEPARATOR;
        let expected: Vec<String> = vec![
            "-f".to_string(),
            format!("shaders{}vs_basic.sc", sep),
            "-o".to_string(),
            format!("out{}dx11{}vs_basic.bin", sep, sep),
            "--type".to_string(),
            "v".to_string(),
            "-i".to_string(),
            "bgfx/src;bgfx/examples/common".to_string(),
            "--platform".to_string(),
            "windows".to_string(),
            "--profile".to_string(),
            "vs_4_0".to_string(),
            "-o3".to_string(),
        ];
        assert_eq!(invocation.args, expected);
    }

    #[test]
    fn test_includes_join_with_semicolons() {
        let mut config = test_config();
        config.include_paths = vec!["a".to_string(), "b/c".to_string(), "d".to_string()];
        let invocation = CompileInvocation::build(&test_spec(&config), &config);
        let i = invocation.args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(invocation.args[i + 1], "a;b/c;d");
    }

    #[test]
    fn test_opt_level_forms_the_flag() {
        let mut config = test_config();
        config.opt_level = 0;
        let invocation = CompileInvocation::build(&test_spec(&config), &config);
        assert_eq!(invocation.args.last().unwrap(), "-o0");
    }

    #[test]
    fn test_working_dir_comes_from_compiler_root() {
        let mut config = test_config();
        config.compiler_root = Some(PathBuf::from("/opt/bgfx"));
        let invocation = CompileInvocation::build(&test_spec(&config), &config);
        assert_eq!(invocation.working_dir, Some(PathBuf::from("/opt/bgfx")));
    }

    #[test]
    fn test_display_quotes_only_awkward_arguments() {
        let config = test_config();
        let rendered = CompileInvocation::build(&test_spec(&config), &config).to_string();
        assert!(rendered.starts_with("shaderc -f "));
        assert!(rendered.contains("\"bgfx/src;bgfx/examples/common\""));
        assert!(rendered.contains("--profile vs_4_0"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dispatch_reports_exit_codes() {
        let invocation = CompileInvocation {
            program: PathBuf::from("true"),
            args: vec![],
            working_dir: None,
        };
        assert_eq!(dispatch(&invocation).unwrap(), CompileStatus::Success);

        let invocation = CompileInvocation {
            program: PathBuf::from("false"),
            args: vec![],
            working_dir: None,
        };
        assert_eq!(
            dispatch(&invocation).unwrap(),
            CompileStatus::Failure { exit_code: Some(1) }
        );
    }

    #[test]
    fn test_dispatch_fails_to_launch_missing_compiler() {
        let invocation = CompileInvocation {
            program: PathBuf::from("sc_build_no_such_compiler"),
            args: vec![],
            working_dir: None,
        };
        assert!(matches!(
            dispatch(&invocation),
            Err(DispatchError::Launch { .. })
        ));
    }
}
