//! Dataset registry and the download/cache seam.
//!
//! Fetching and unpacking archives is not done here. An [`ArchiveProvider`]
//! is handed a [`DatasetMeta`] and a cache directory and must return the
//! directory that holds the dataset files. [`CacheDirProvider`] only checks
//! that a previously extracted copy exists.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{DanedError, Result};

/// Static description of a downloadable dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetMeta {
    pub name: &'static str,
    pub url: &'static str,
    /// Extension of the data files, including the leading dot.
    pub file_extension: &'static str,
}

pub const DANED: DatasetMeta = DatasetMeta {
    name: "daned",
    url: "http://danlp-downloads.alexandra.dk/datasets/daned.zip",
    file_extension: ".tsv",
};

pub const EUROPARL_SENTIMENT: DatasetMeta = DatasetMeta {
    name: "europarl.sentiment",
    url: "https://raw.githubusercontent.com/fnielsen/europarl-da-sentiment/master/europarl-da-sentiment.csv",
    file_extension: ".csv",
};

pub const LCC1_SENTIMENT: DatasetMeta = DatasetMeta {
    name: "lcc1.sentiment",
    url: "https://raw.githubusercontent.com/fnielsen/lcc-sentiment/master/dan_mixed_2014_10K-sentences.csv",
    file_extension: ".csv",
};

pub const LCC2_SENTIMENT: DatasetMeta = DatasetMeta {
    name: "lcc2.sentiment",
    url: "https://raw.githubusercontent.com/fnielsen/lcc-sentiment/master/dan_newscrawl_2011_10K-sentences.csv",
    file_extension: ".csv",
};

pub const DATASETS: &[DatasetMeta] = &[DANED, EUROPARL_SENTIMENT, LCC1_SENTIMENT, LCC2_SENTIMENT];

/// Look up a registered dataset by name.
pub fn dataset(name: &str) -> Option<DatasetMeta> {
    DATASETS.iter().find(|m| m.name == name).copied()
}

impl DatasetMeta {
    /// `<dir>/<name><suffix>`, e.g. `daned/daned.props.json`.
    pub fn file_in(&self, dir: &Path, suffix: &str) -> PathBuf {
        dir.join(format!("{}{}", self.name, suffix))
    }
}

/// The download/cache collaborator.
pub trait ArchiveProvider {
    /// Make the dataset available locally and return its directory.
    fn ensure(&self, meta: &DatasetMeta, cache_dir: &Path) -> Result<PathBuf>;
}

/// Resolves datasets already extracted to `<cache_dir>/<name>/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheDirProvider;

impl ArchiveProvider for CacheDirProvider {
    fn ensure(&self, meta: &DatasetMeta, cache_dir: &Path) -> Result<PathBuf> {
        let dir = cache_dir.join(meta.name);
        if dir.is_dir() {
            debug!("dataset '{}' found in cache at {}", meta.name, dir.display());
            return Ok(dir);
        }
        Err(DanedError::DataUnavailable {
            dataset: meta.name.to_string(),
            reason: format!(
                "not cached at {}; download and extract {} there",
                dir.display(),
                meta.url
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookup() {
        assert_eq!(dataset("daned"), Some(DANED));
        assert_eq!(dataset("lcc2.sentiment").map(|m| m.file_extension), Some(".csv"));
        assert!(dataset("twitter.sentiment").is_none());
    }

    #[test]
    fn file_in_joins_name_and_suffix() {
        let path = DANED.file_in(Path::new("/cache/daned"), ".train.tsv");
        assert_eq!(path, PathBuf::from("/cache/daned/daned.train.tsv"));
    }

    #[test]
    fn cold_cache_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = CacheDirProvider.ensure(&DANED, tmp.path()).unwrap_err();
        match err {
            DanedError::DataUnavailable { dataset, reason } => {
                assert_eq!(dataset, "daned");
                assert!(reason.contains(DANED.url));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn warm_cache_resolves_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("daned")).unwrap();
        let dir = CacheDirProvider.ensure(&DANED, tmp.path()).unwrap();
        assert_eq!(dir, tmp.path().join("daned"));
    }
}
