use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "FLOOROPS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "FLOOROPS_LOG_DIR";
const LOG_FILE_NAME: &str = "floorops-dashboard.log";

/// The terminal is owned by the UI, so logs go to a file or nowhere.
pub fn init_logging(log_dir: Option<&Path>, debug: bool) -> Option<PathBuf> {
    let level = if debug {
        "debug".to_string()
    } else if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        level
    } else {
        "info".to_string()
    };
    let filter = if debug {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let opened = log_dir.and_then(|dir| match open_log_file(dir) {
        Ok(opened) => Some(opened),
        Err(err) => {
            eprintln!("log_file_error: {err}");
            None
        }
    });
    let (make_writer, path) = match opened {
        Some((file, path)) => {
            let file = Arc::new(Mutex::new(file));
            let writer = BoxMakeWriter::new(move || LogFile { file: file.clone() });
            (writer, Some(path))
        }
        None => (BoxMakeWriter::new(io::sink), None),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(make_writer)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }
    path
}

pub fn resolve_log_dir(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var(LOG_DIR_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    })
}

fn open_log_file(dir: &Path) -> io::Result<(File, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

struct LogFile {
    file: Arc<Mutex<File>>,
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lands_in_requested_dir() {
        let dir = std::env::temp_dir().join(format!("floorops-log-{}", std::process::id()));
        let (mut file, path) = open_log_file(&dir).expect("open log file");
        writeln!(file, "probe").expect("write");
        assert_eq!(path, dir.join("floorops-dashboard.log"));
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn flag_wins_over_env_for_log_dir() {
        let flag = PathBuf::from("/tmp/floorops-flag");
        assert_eq!(resolve_log_dir(Some(flag.clone())), Some(flag));
    }
}
