use anyhow::{anyhow, Result};
use clap::{App, Arg};
use log::info;
use std::path::{Path, PathBuf};

use sc_build::config::BuildConfig;

fn main() -> Result<()> {
    let matches = App::new("sc_build")
        .version(sc_build::VERSION)
        .about("Compiles every .sc shader source under a tree with an external shaderc")
        .arg(
            Arg::with_name("root")
                .long("root")
                .value_name("DIR")
                .takes_value(true)
                .help("Source tree to scan for shader sources"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("DIR")
                .takes_value(true)
                .help("Destination tree for compiled artifacts"),
        )
        .arg(
            Arg::with_name("compiler")
                .long("compiler")
                .value_name("PATH")
                .takes_value(true)
                .help("Shader compiler executable. Default is shaderc on PATH."),
        )
        .arg(
            Arg::with_name("compiler-root")
                .long("compiler-root")
                .value_name("DIR")
                .takes_value(true)
                .help("Working directory for compiler processes"),
        )
        .arg(
            Arg::with_name("include")
                .long("include")
                .value_name("PATHS")
                .takes_value(true)
                .help("Include search paths, separated by ';' or ','"),
        )
        .arg(
            Arg::with_name("platform")
                .long("platform")
                .value_name("NAME")
                .takes_value(true)
                .help("Target platform token passed to the compiler"),
        )
        .arg(
            Arg::with_name("platform-subdir")
                .long("platform-subdir")
                .value_name("NAME")
                .takes_value(true)
                .help("Output subdirectory for the target graphics API"),
        )
        .arg(
            Arg::with_name("shader-model")
                .long("shader-model")
                .value_name("VER")
                .takes_value(true)
                .help("Shader-model suffix for profile tokens, e.g. 4_0"),
        )
        .arg(
            Arg::with_name("opt-level")
                .long("opt-level")
                .value_name("N")
                .takes_value(true)
                .help("Compiler optimization level, 0-3"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("JSON config file. Flags given here override its values."),
        )
        .arg(
            Arg::with_name("verbose")
                .short('v')
                .long("verbose")
                .takes_value(false)
                .help("Sets the level of verbosity"),
        )
        .arg(
            Arg::with_name("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .takes_value(true)
                .help("Also write a timestamped log file to this directory"),
        )
        .get_matches();

    let log_dir = matches.value_of("log-dir");
    let verbose = matches.is_present("verbose");
    if let Err(e) = sc_build::logger::init_logger(log_dir, verbose) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let mut config = match matches.value_of("config") {
        Some(path) => BuildConfig::load(Path::new(path))?,
        None => BuildConfig::default(),
    };

    if let Some(root) = matches.value_of("root") {
        config.root_dir = PathBuf::from(root);
    }
    if let Some(output) = matches.value_of("output") {
        config.output_dir = PathBuf::from(output);
    }
    if let Some(compiler) = matches.value_of("compiler") {
        config.compiler = PathBuf::from(compiler);
    }
    if let Some(compiler_root) = matches.value_of("compiler-root") {
        config.compiler_root = Some(PathBuf::from(compiler_root));
    }
    if let Some(includes) = matches.value_of("include") {
        config.include_paths = includes
            .split(|c| c == ';' || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
    }
    if let Some(platform) = matches.value_of("platform") {
        config.platform = platform.to_string();
    }
    if let Some(subdir) = matches.value_of("platform-subdir") {
        config.platform_subdir = subdir.to_string();
    }
    if let Some(model) = matches.value_of("shader-model") {
        config.shader_model = model.to_string();
    }
    if let Some(opt) = matches.value_of("opt-level") {
        config.opt_level = opt
            .parse()
            .map_err(|_| anyhow!("invalid --opt-level {:?}, expected 0-3", opt))?;
    }

    config.validate()?;

    info!(
        "sc_build v{}: scanning {} for {}",
        sc_build::VERSION,
        config.root_dir.display(),
        config.platform
    );

    let summary = sc_build::run_build(&config)?;

    println!("{}", summary);
    if !summary.success() {
        std::process::exit(1);
    }
    Ok(())
}
