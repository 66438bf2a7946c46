// --- File: crates/chargeflow_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Configuration is layered: `config/default` at the workspace root, then an
/// environment-specific file selected by `RUN_ENV`, then environment
/// variables prefixed with `CHARGEFLOW` (nested keys separated by `__`,
/// e.g. `CHARGEFLOW_NMI__PASSWORD`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let workspace_root = manifest_dir
        .ancestors()
        .nth(2) // go from crates/chargeflow_config to workspace root
        .unwrap_or(&manifest_dir)
        .to_path_buf();

    let default_path = workspace_root.join("config/default");
    let env_path = workspace_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::with_name(default_path.to_string_lossy().as_ref()).required(false))
        .add_source(File::with_name(env_path.to_string_lossy().as_ref()).required(false))
        .add_source(Environment::with_prefix("CHARGEFLOW").separator("__"));

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// This function checks if the dotenv file has already been loaded using a
/// `OnceCell`. If not, it attempts to load the file named by
/// `DOTENV_OVERRIDE`, defaulting to ".env".
pub fn ensure_dotenv_loaded() {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });
}
