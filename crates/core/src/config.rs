use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::service::ServiceMap;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Load a specific env file. Missing files are ignored, like [`load_dotenv`].
pub fn load_dotenv_from(path: &std::path::Path) {
    if let Err(e) = dotenvy::from_path(path) {
        tracing::debug!(path = %path.display(), error = %e, "env file not loaded");
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Defaults ──────────────────────────────────────────────────

pub const DEFAULT_DOCKER_BIN: &str = "docker";
pub const DEFAULT_DB_CONTAINER: &str = "intellacc_db";
pub const DEFAULT_DB_USER: &str = "intellacc_user";
pub const DEFAULT_DATABASE: &str = "intellaccdb";
pub const DEFAULT_PROJECT_ROOT: &str = "/home/jayjag/Nextcloud/intellacc.com";
pub const DEFAULT_CONTEXT_FILE_NAME: &str = "CLAUDE.md";
pub const DEFAULT_LOG_LINES: u32 = 50;

// ── Top-level config ──────────────────────────────────────────

/// `Config::default()` is the built-in constants, ignoring the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub docker: DockerConfig,
    pub database: DatabaseConfig,
    pub project: ProjectConfig,
    pub logs: LogsConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `INTELLACC_PROFILE`. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("INTELLACC_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let database = DatabaseConfig::from_env_profiled(p);
        let logs = LogsConfig::from_env_profiled(p, &database.container);
        Self {
            profile: p.to_string(),
            docker: DockerConfig::from_env_profiled(p),
            database,
            project: ProjectConfig::from_env_profiled(p),
            logs,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  docker:    bin={}", self.docker.bin);
        tracing::info!(
            "  database:  container={}, user={}, default_db={}",
            self.database.container,
            self.database.user,
            self.database.default_database
        );
        tracing::info!(
            "  project:   root={}, context={}",
            self.project.root.display(),
            self.project.context_file.display()
        );
        tracing::info!(
            "  logs:      default_lines={}, backend={}, frontend={}, prediction_engine={}, db={}",
            self.logs.default_lines,
            self.logs.services.backend,
            self.logs.services.frontend,
            self.logs.services.prediction_engine,
            self.logs.services.db
        );
    }
}

// ── Docker ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Container-management command (looked up on PATH).
    pub bin: String,
}

impl DockerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            bin: profiled_env_or(p, "DOCKER_BIN", DEFAULT_DOCKER_BIN),
        }
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            bin: DEFAULT_DOCKER_BIN.to_string(),
        }
    }
}

// ── Database ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Container running PostgreSQL.
    pub container: String,
    /// Service account passed to `psql -U`.
    pub user: String,
    /// Database used when `query_db` is called without one.
    pub default_database: String,
}

impl DatabaseConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            container: profiled_env_or(p, "DB_CONTAINER", DEFAULT_DB_CONTAINER),
            user: profiled_env_or(p, "DB_USER", DEFAULT_DB_USER),
            default_database: profiled_env_or(p, "DB_DEFAULT_DATABASE", DEFAULT_DATABASE),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_DB_CONTAINER.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            default_database: DEFAULT_DATABASE.to_string(),
        }
    }
}

// ── Project ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project checkout on the host; reported as the working directory.
    pub root: PathBuf,
    /// Project-context document read by `get_project_status`.
    pub context_file: PathBuf,
}

impl ProjectConfig {
    fn from_env_profiled(p: &str) -> Self {
        let root = PathBuf::from(profiled_env_or(p, "PROJECT_ROOT", DEFAULT_PROJECT_ROOT));
        let context_file = profiled_env_opt(p, "PROJECT_CONTEXT_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| root.join(DEFAULT_CONTEXT_FILE_NAME));
        Self { root, context_file }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let root = PathBuf::from(DEFAULT_PROJECT_ROOT);
        Self {
            context_file: root.join(DEFAULT_CONTEXT_FILE_NAME),
            root,
        }
    }
}

// ── Logs ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    /// Trailing line count used when `analyze_logs` is called without `lines`.
    pub default_lines: u32,
    pub services: ServiceMap,
}

impl LogsConfig {
    fn from_env_profiled(p: &str, db_container: &str) -> Self {
        let defaults = ServiceMap::default();
        Self {
            default_lines: profiled_env_u32(p, "LOGS_DEFAULT_LINES", DEFAULT_LOG_LINES),
            services: ServiceMap {
                backend: profiled_env_or(p, "BACKEND_CONTAINER", &defaults.backend),
                frontend: profiled_env_or(p, "FRONTEND_CONTAINER", &defaults.frontend),
                prediction_engine: profiled_env_or(
                    p,
                    "PREDICTION_ENGINE_CONTAINER",
                    &defaults.prediction_engine,
                ),
                db: db_container.to_string(),
            },
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            default_lines: DEFAULT_LOG_LINES,
            services: ServiceMap::default(),
        }
    }
}
