use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::SortMode;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Directory every listing and download is confined to. Home directory when unset.
    pub root: Option<PathBuf>,
    /// Directory shown by `GET /` without a `path` query, relative to `root`.
    pub start_dir: Option<PathBuf>,
    pub default_sort: SortMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    pub size_deadline_ms: u64,
    pub walk_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub listing: ListingConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
        {
            Ok(app_cfg) => app_cfg,
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: lanshelf.toml (in CWD)
        .add_source(::config::File::with_name("lanshelf").required(false));

    if let Ok(custom_path) = std::env::var("LANSHELF_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    builder = builder.add_source(::config::Environment::with_prefix("LANSHELF").separator("__"));

    // Plain PORT wins over everything else
    if let Ok(port) = std::env::var("PORT") {
        if !port.trim().is_empty() {
            builder = builder.set_override("server.port", port.trim().to_string())?;
        }
    }

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.listing.size_deadline_ms == 0 || cfg.listing.size_deadline_ms > 10_000 {
        return Err(anyhow::anyhow!("listing.size_deadline_ms must be in 1..=10000"));
    }
    if cfg.listing.walk_concurrency == 0 || cfg.listing.walk_concurrency > 256 {
        return Err(anyhow::anyhow!("listing.walk_concurrency must be in 1..=256"));
    }

    Ok(())
}

/// Resolves the configured library root (home directory when unset) to a canonical directory.
pub fn resolve_root(cfg: &LibraryConfig) -> anyhow::Result<PathBuf> {
    let root = match &cfg.root {
        Some(p) if !p.as_os_str().is_empty() => p.clone(),
        _ => dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?,
    };
    let canonical = std::fs::canonicalize(&root)
        .map_err(|e| anyhow::anyhow!("library root {} is not accessible: {}", root.display(), e))?;
    if !canonical.is_dir() {
        return Err(anyhow::anyhow!("library root {} is not a directory", canonical.display()));
    }
    Ok(canonical)
}

/// Joins `start_dir` onto `root`; an unset start directory means the root itself.
pub fn start_dir_candidate(cfg: &LibraryConfig, root: &Path) -> PathBuf {
    match &cfg.start_dir {
        Some(p) if !p.as_os_str().is_empty() => root.join(p),
        _ => root.to_path_buf(),
    }
}
