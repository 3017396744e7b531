use anyhow::Result;
use log::LevelFilter;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};

// Ensure the logger is only initialized once
static INIT: Once = Once::new();

/// Initialize logging: stderr always, plus a timestamped log file when
/// `log_dir` is given
pub fn init_logger(log_dir: Option<&str>, verbose: bool) -> Result<()> {
    INIT.call_once(|| {
        let log_level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        let mut builder = env_logger::Builder::new();
        builder.filter_level(log_level);

        if let Some(dir) = log_dir {
            let log_dir_path = Path::new(dir);
            if !log_dir_path.exists() {
                if let Err(e) = fs::create_dir_all(log_dir_path) {
                    eprintln!("Failed to create log directory: {}", e);
                }
            }

            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            let log_path = log_dir_path.join(format!("sc_build_{}.log", timestamp));

            if let Ok(log_file) = File::create(&log_path) {
                builder.format(|buf, record| {
                    writeln!(
                        buf,
                        "[{} {} {}:{}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                        record.level(),
                        record.file().unwrap_or("unknown"),
                        record.line().unwrap_or(0),
                        record.args()
                    )
                });
                builder.target(env_logger::Target::Pipe(Box::new(log_file)));
            } else {
                eprintln!("Failed to create log file at: {:?}", log_path);
                builder.target(env_logger::Target::Stderr);
            }
        } else {
            builder.target(env_logger::Target::Stderr);
        }

        let _ = builder.try_init();
    });

    Ok(())
}
