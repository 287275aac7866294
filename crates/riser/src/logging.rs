use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use env_logger::{Env, Target};

/// Process-wide logger for one CLI run.
///
/// Records go to stderr and, with `--log-file`, to that file as well.
/// `RUST_LOG` overrides the default filter. Dropping the session flushes
/// the logger.
pub struct LogSession {
    log_file: Option<PathBuf>,
}

impl LogSession {
    pub fn init(debug: bool, log_file: Option<&Path>) -> Result<Self> {
        let env = if debug {
            Env::default().default_filter_or("debug")
        } else {
            Env::default().default_filter_or("info")
        };
        let mut builder = env_logger::Builder::from_env(env);

        if let Some(path) = log_file {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(Tee { file })));
        }
        builder.try_init().context("Failed to initialize logging")?;

        if let Some(path) = log_file {
            log::debug!("Logging to {}", path.display());
        }
        Ok(LogSession {
            log_file: log_file.map(Path::to_path_buf),
        })
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        log::logger().flush();
        if let Some(path) = &self.log_file {
            log::trace!("Closed log file {}", path.display());
        }
    }
}

/// Writes every record to both stderr and the log file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}
