use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

const DEFAULT_API_BASE: &str = "https://emkc.org/api/v2/piston";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read runcellrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn api_base(&self) -> String {
        self.get("PISTON_API_BASE")
            .filter(|v| v != "default")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.get("REQUEST_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60)
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.get("RUNCELL_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_prefs_path)
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &["PISTON_API_BASE", "REQUEST_TIMEOUT"];
    KEYS.contains(&k) || k.starts_with("RUNCELL_")
}

fn config_base_dir() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("runcell")
}

fn default_config_path() -> PathBuf {
    config_base_dir().join("runcellrc")
}

fn default_prefs_path() -> PathBuf {
    config_base_dir().join("prefs")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("PISTON_API_BASE".into(), "default".into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m
}
