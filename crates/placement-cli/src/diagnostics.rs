use std::backtrace::Backtrace;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOGGED_CRATES: [&str; 4] = [
    "placement_core",
    "placement_app",
    "placement_tui",
    "placement_cli",
];

static HOOK_ONCE: Once = Once::new();
static LOG_PATH: OnceLock<Mutex<Option<PathBuf>>> = OnceLock::new();

fn log_path_state() -> &'static Mutex<Option<PathBuf>> {
    LOG_PATH.get_or_init(|| Mutex::new(None))
}

fn current_log_path() -> Option<PathBuf> {
    log_path_state()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub struct DiagnosticsSession {
    path: Option<PathBuf>,
}

impl DiagnosticsSession {
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        if !enabled {
            return Ok(Self { path: None });
        }

        let config_path = placement_core::config::resolve_config_path()
            .context("failed to resolve config path for diagnostics")?;
        let path = create_log_path(&config_path)?;
        let file = open_log(&path)?;

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(log_filter())
            .try_init()
            .map_err(|error| anyhow!("failed to install diagnostics logger: {error}"))?;

        *log_path_state()
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(path.clone());
        tracing::info!(path = %path.display(), "diagnostics enabled");

        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn log_filter() -> Targets {
    LOGGED_CRATES
        .iter()
        .fold(Targets::new(), |targets, target| {
            targets.with_target(*target, Level::DEBUG)
        })
}

fn open_log(path: &Path) -> Result<File> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(path)
        .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;

    writeln!(
        file,
        "placement diagnostics start\nversion={}\nstart_epoch_ms={}\npid={}",
        env!("CARGO_PKG_VERSION"),
        epoch_millis(),
        std::process::id()
    )
    .with_context(|| format!("failed to write diagnostics header to {}", path.display()))?;
    writeln!(file, "argv={:?}", std::env::args().collect::<Vec<String>>())
        .with_context(|| format!("failed to write diagnostics args to {}", path.display()))?;
    file.flush()
        .with_context(|| format!("failed to flush diagnostics header to {}", path.display()))?;

    Ok(file)
}

fn install_panic_hook() {
    HOOK_ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let payload = panic_payload(panic_info);
            let location = panic_info
                .location()
                .map(|value| format!("{}:{}:{}", value.file(), value.line(), value.column()))
                .unwrap_or_else(|| "unknown".to_string());
            let backtrace = Backtrace::force_capture();

            tracing::error!(
                message = %payload,
                location = %location,
                backtrace = ?backtrace,
                "panic captured"
            );

            eprintln!("Fatal internal error in placement: {payload}");
            match current_log_path() {
                Some(path) => eprintln!("Diagnostics written to {}", path.display()),
                None => eprintln!("Run `placement --diagnostics` to capture a diagnostics log."),
            }
        }));
    });
}

fn panic_payload(panic_info: &std::panic::PanicHookInfo<'_>) -> String {
    if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        return (*payload).to_string();
    }
    if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        return payload.clone();
    }
    "unknown panic payload".to_string()
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn create_log_path(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path.parent().ok_or_else(|| {
        anyhow!(
            "failed to resolve diagnostics directory from config path {}",
            config_path.display()
        )
    })?;

    let diagnostics_dir = config_dir.join("diagnostics");
    fs::create_dir_all(&diagnostics_dir).with_context(|| {
        format!(
            "failed to create diagnostics directory {}",
            diagnostics_dir.display()
        )
    })?;

    Ok(diagnostics_dir.join(format!("{}.log", epoch_millis())))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tracing::Level;

    use super::{create_log_path, log_filter, open_log};

    #[test]
    fn log_filter_keeps_only_workspace_crates() {
        let filter = log_filter();
        assert!(filter.would_enable("placement_core::predictor", &Level::DEBUG));
        assert!(filter.would_enable("placement_cli", &Level::INFO));
        assert!(!filter.would_enable("reqwest::connect", &Level::DEBUG));
        assert!(!filter.would_enable("rustls::client::hs", &Level::INFO));
        assert!(!filter.would_enable("hyper_util::client", &Level::ERROR));
    }

    #[test]
    fn log_path_sits_beside_config_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config_path = temp.path().join("placement").join("config.toml");

        let path = create_log_path(&config_path).expect("log path");
        assert_eq!(
            path.parent().expect("parent"),
            temp.path().join("placement").join("diagnostics")
        );
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("file name");
        let stem = name.strip_suffix(".log").expect(".log suffix");
        assert!(stem.chars().all(|character| character.is_ascii_digit()));
    }

    #[test]
    fn log_starts_with_header() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("1.log");
        drop(open_log(&path).expect("open log"));

        let contents = fs::read_to_string(&path).expect("read log");
        assert!(contents.starts_with("placement diagnostics start\n"));
        assert!(contents.contains("pid="));
        assert!(contents.contains("argv="));
    }

    #[test]
    fn existing_log_is_never_overwritten() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("1.log");
        fs::write(&path, "keep").expect("seed log");

        let error = open_log(&path).expect_err("should refuse to overwrite");
        assert!(format!("{error:#}").contains("failed to create diagnostics log"));
        assert_eq!(fs::read_to_string(&path).expect("read"), "keep");
    }
}
