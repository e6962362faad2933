//! Danish sentiment datasets sharing the DaNED cache layout.
//!
//! Both loaders keep only the `valence` score and the `text`.

use std::path::{Path, PathBuf};

use log::info;

use crate::config::LoaderConfig;
use crate::data::loader::{drop_duplicates, load_sentiment};
use crate::data::model::SentimentRecord;
use crate::error::Result;
use crate::fetch::{
    ArchiveProvider, CacheDirProvider, DatasetMeta, EUROPARL_SENTIMENT, LCC1_SENTIMENT,
    LCC2_SENTIMENT,
};

fn resolve(config: &LoaderConfig, provider: &dyn ArchiveProvider, meta: &DatasetMeta) -> Result<PathBuf> {
    let dir = provider.ensure(meta, config.cache_dir())?;
    Ok(meta.file_in(&dir, meta.file_extension))
}

/// Sentences from the European Parliament annotated with a valence score.
#[derive(Debug, Clone)]
pub struct EuroparlSentiment {
    file_path: PathBuf,
}

impl EuroparlSentiment {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        Self::with_provider(config, &CacheDirProvider)
    }

    pub fn with_provider(config: &LoaderConfig, provider: &dyn ArchiveProvider) -> Result<Self> {
        Ok(Self {
            file_path: resolve(config, provider, &EUROPARL_SENTIMENT)?,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Rows missing valence or text are dropped, then exact duplicates.
    pub fn load(&self) -> Result<Vec<SentimentRecord>> {
        let records = drop_duplicates(load_sentiment(&self.file_path)?);
        info!("{}: {} sentences", EUROPARL_SENTIMENT.name, records.len());
        Ok(records)
    }
}

/// The two Leipzig Corpora Collection sentiment samples, concatenated.
#[derive(Debug, Clone)]
pub struct LccSentiment {
    file_paths: [PathBuf; 2],
}

impl LccSentiment {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        Self::with_provider(config, &CacheDirProvider)
    }

    pub fn with_provider(config: &LoaderConfig, provider: &dyn ArchiveProvider) -> Result<Self> {
        Ok(Self {
            file_paths: [
                resolve(config, provider, &LCC1_SENTIMENT)?,
                resolve(config, provider, &LCC2_SENTIMENT)?,
            ],
        })
    }

    pub fn file_paths(&self) -> &[PathBuf; 2] {
        &self.file_paths
    }

    /// Both files in order, rows missing valence or text dropped.
    /// Duplicates across the two files are kept.
    pub fn load(&self) -> Result<Vec<SentimentRecord>> {
        let mut records = Vec::new();
        for path in &self.file_paths {
            records.extend(load_sentiment(path)?);
        }
        info!("lcc sentiment: {} sentences", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DanedError;

    fn seed(cache: &Path, meta: &DatasetMeta, contents: &str) {
        let dir = cache.join(meta.name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(meta.file_in(&dir, meta.file_extension), contents).unwrap();
    }

    #[test]
    fn europarl_dedups() {
        let tmp = tempfile::tempdir().unwrap();
        seed(
            tmp.path(),
            &EUROPARL_SENTIMENT,
            ",valence,text\n0,1,Tak for ordet\n1,1,Tak for ordet\n2,-2,Det er skuffende\n",
        );
        let config = LoaderConfig::with_cache_dir(tmp.path());
        let records = EuroparlSentiment::new(&config).unwrap().load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].valence, -2.0);
    }

    #[test]
    fn lcc_concatenates_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), &LCC1_SENTIMENT, "valence,text\n3,Fantastisk\n,Ingen score\n");
        seed(tmp.path(), &LCC2_SENTIMENT, "valence,text\n3,Fantastisk\n-1,Kedeligt\n");
        let config = LoaderConfig::with_cache_dir(tmp.path());
        let records = LccSentiment::new(&config).unwrap().load().unwrap();
        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["Fantastisk", "Fantastisk", "Kedeligt"]);
    }

    #[test]
    fn lcc_needs_both_datasets() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), &LCC1_SENTIMENT, "valence,text\n1,Fint\n");
        let config = LoaderConfig::with_cache_dir(tmp.path());
        let err = LccSentiment::new(&config).unwrap_err();
        assert!(matches!(err, DanedError::DataUnavailable { ref dataset, .. } if dataset == "lcc2.sentiment"));
    }
}
