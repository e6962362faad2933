use std::path::{Path, PathBuf};

/// Environment variable that overrides the default cache directory.
pub const CACHE_DIR_ENV: &str = "DANLP_CACHE_DIR";

/// Loader configuration threaded through every dataset constructor.
///
/// `LoaderConfig::default()` resolves the cache directory as:
/// 1. `$DANLP_CACHE_DIR` if set and non-empty
/// 2. `<home>/.danlp`
/// 3. `./.danlp` when no home directory can be determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub cache_dir: PathBuf,
}

impl LoaderConfig {
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
        }
    }
}

/// The process-wide default cache location (see [`LoaderConfig`]).
pub fn default_cache_dir() -> PathBuf {
    resolve_cache_dir(std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from), dirs::home_dir())
}

fn resolve_cache_dir(env_override: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match env_override {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".danlp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        let dir = resolve_cache_dir(Some("/data/danlp".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/data/danlp"));
    }

    #[test]
    fn empty_override_falls_back_to_home() {
        let dir = resolve_cache_dir(Some(PathBuf::new()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/home/u/.danlp"));
    }

    #[test]
    fn no_home_uses_working_directory() {
        assert_eq!(resolve_cache_dir(None, None), PathBuf::from("./.danlp"));
    }
}
