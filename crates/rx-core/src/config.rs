use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable naming the cache root; overrides `cache_dir`.
pub const CACHE_DIR_ENV: &str = "RX_CACHE_DIR";

/// Cache root used when neither the environment nor the config names one.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Import-map file looked up in the working directory by default.
pub const DEFAULT_IMPORT_MAP: &str = "import_map.json";

/// HTTP client parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum redirect hops before a request fails.
    pub max_redirects: u32,
    /// MIME types accepted for module sources (substring match on `Content-Type`).
    pub allowed_content_types: Vec<String>,
    /// Idle curl handles kept for connection reuse.
    pub max_idle_handles: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
            max_redirects: 20,
            // text/plain: some CDNs serve .cjs files this way.
            allowed_content_types: vec![
                "application/javascript".to_string(),
                "text/javascript".to_string(),
                "text/plain".to_string(),
            ],
            max_idle_handles: 8,
        }
    }
}

/// Global configuration loaded from `~/.config/rx/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RxConfig {
    /// Cache root for fetched sources and the lock file. `RX_CACHE_DIR` wins over this.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Import-map file; defaults to `import_map.json` in the working directory.
    #[serde(default)]
    pub import_map: Option<PathBuf>,
    /// Treat plain `http:` URLs as network URLs as well.
    #[serde(default)]
    pub allow_http: bool,
    /// Extra names for the built-in module registry.
    #[serde(default)]
    pub builtin_modules: Vec<String>,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl RxConfig {
    /// Effective cache root: `RX_CACHE_DIR`, then `cache_dir`, then `.cache`.
    pub fn cache_root(&self) -> PathBuf {
        match std::env::var_os(CACHE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => self
                .cache_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
        }
    }

    /// Effective import-map path.
    pub fn import_map_path(&self) -> PathBuf {
        self.import_map
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMPORT_MAP))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rx")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RxConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RxConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RxConfig::default();
        assert!(cfg.cache_dir.is_none());
        assert!(!cfg.allow_http);
        assert_eq!(cfg.fetch.request_timeout_secs, 5);
        assert_eq!(cfg.fetch.max_redirects, 20);
        assert_eq!(cfg.fetch.allowed_content_types.len(), 3);
        assert_eq!(cfg.import_map_path(), PathBuf::from("import_map.json"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RxConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RxConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.fetch.max_redirects, cfg.fetch.max_redirects);
        assert_eq!(
            parsed.fetch.allowed_content_types,
            cfg.fetch.allowed_content_types
        );
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            cache_dir = "/var/cache/rx"
            allow_http = true
            builtin_modules = ["bun:sqlite"]

            [fetch]
            request_timeout_secs = 10
            connect_timeout_secs = 2
            max_redirects = 3
            allowed_content_types = ["text/javascript"]
            max_idle_handles = 1
        "#;
        let cfg: RxConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.cache_dir.as_deref(), Some(std::path::Path::new("/var/cache/rx")));
        assert!(cfg.allow_http);
        assert_eq!(cfg.builtin_modules, vec!["bun:sqlite".to_string()]);
        assert_eq!(cfg.fetch.max_redirects, 3);
        assert_eq!(cfg.fetch.allowed_content_types, vec!["text/javascript".to_string()]);
    }

    #[test]
    fn config_toml_empty_uses_defaults() {
        let cfg: RxConfig = toml::from_str("").unwrap();
        assert!(cfg.import_map.is_none());
        assert_eq!(cfg.fetch.connect_timeout_secs, 5);
        assert_eq!(cfg.fetch.max_idle_handles, 8);
    }

    #[test]
    fn partial_fetch_section_keeps_other_defaults() {
        let cfg: RxConfig = toml::from_str("[fetch]\nmax_redirects = 2\n").unwrap();
        assert_eq!(cfg.fetch.max_redirects, 2);
        assert_eq!(cfg.fetch.request_timeout_secs, 5);
    }
}
