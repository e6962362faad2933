use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::LoaderConfig;
use crate::data::loader::{self, load_descriptions, load_properties};
use crate::data::model::{DescriptionsMap, Partition, PartitionTable, PropertiesMap};
use crate::error::{DanedError, Result};
use crate::fetch::{ArchiveProvider, CacheDirProvider, DatasetMeta, DANED};
use crate::kg::{flatten_properties, KgProperties, KnowledgeGraphLookup};

/// Return-shape and fallback switches for [`DaNed::kg_context_from_qid`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KgContextOptions {
    /// Return the raw property pairs instead of the flattened string.
    pub output_as_dictionary: bool,
    /// Ask the online lookup when the QID has no local properties.
    pub allow_online_search: bool,
}

/// The DaNED named entity disambiguation dataset.
///
/// DaNED is derived from the Dacoref dataset, itself built on the Danish
/// Dependency Treebank, and keeps its train/dev/test split. Each row pairs a
/// sentence with the QID of a candidate entity; the label says whether that
/// entity is the one mentioned. A sentence repeats once per candidate, with
/// at most one candidate labelled 1 (see [`crate::data::quality`]).
///
/// Every QID is linked to Wikidata properties and a Wikidata description,
/// shipped as two JSON sidecars that are loaded when the value is built and
/// never modified afterwards.
pub struct DaNed {
    meta: DatasetMeta,
    dataset_dir: PathBuf,
    properties: PropertiesMap,
    descriptions: DescriptionsMap,
    online: Option<Box<dyn KnowledgeGraphLookup + Send + Sync>>,
}

impl fmt::Debug for DaNed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaNed")
            .field("dataset_dir", &self.dataset_dir)
            .field("properties", &self.properties.len())
            .field("descriptions", &self.descriptions.len())
            .field("online", &self.online.is_some())
            .finish()
    }
}

impl DaNed {
    /// Resolve the dataset under `config.cache_dir` and load its sidecars.
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        Self::with_provider(config, &CacheDirProvider)
    }

    /// Like [`DaNed::new`], with a custom download/cache collaborator.
    pub fn with_provider(config: &LoaderConfig, provider: &dyn ArchiveProvider) -> Result<Self> {
        let dir = provider.ensure(&DANED, config.cache_dir())?;
        Self::from_dir(dir)
    }

    /// Load from a directory that already holds the extracted dataset.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dataset_dir = dir.into();
        let meta = DANED;
        if !dataset_dir.is_dir() {
            return Err(DanedError::DataUnavailable {
                dataset: meta.name.to_string(),
                reason: format!("{} is not a directory", dataset_dir.display()),
            });
        }

        let properties = load_properties(&meta.file_in(&dataset_dir, ".props.json"))?;
        let descriptions = load_descriptions(&meta.file_in(&dataset_dir, ".desc.json"))?;
        info!(
            "loaded {} from {} ({} entities with properties, {} with descriptions)",
            meta.name,
            dataset_dir.display(),
            properties.len(),
            descriptions.len()
        );

        Ok(Self {
            meta,
            dataset_dir,
            properties,
            descriptions,
            online: None,
        })
    }

    /// Attach the collaborator used when online search is allowed.
    pub fn with_online_lookup(
        mut self,
        lookup: impl KnowledgeGraphLookup + Send + Sync + 'static,
    ) -> Self {
        self.online = Some(Box::new(lookup));
        self
    }

    /// Use the public Wikidata endpoints for online search.
    #[cfg(feature = "network")]
    pub fn with_wikidata(self) -> Self {
        self.with_online_lookup(crate::kg::WikidataLookup::default())
    }

    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    pub fn properties(&self) -> &PropertiesMap {
        &self.properties
    }

    pub fn descriptions(&self) -> &DescriptionsMap {
        &self.descriptions
    }

    /// `<dataset_dir>/daned.<partition><ext>`
    pub fn partition_path(&self, partition: Partition) -> PathBuf {
        self.meta.file_in(
            &self.dataset_dir,
            &format!(".{}{}", partition.as_str(), self.meta.file_extension),
        )
    }

    /// Load and enrich a single partition.
    pub fn load_partition(&self, partition: Partition) -> Result<PartitionTable> {
        let path = self.partition_path(partition);
        let table = loader::load_partition(&path, partition, &self.properties, &self.descriptions)?;
        debug!(
            "{partition}: {} rows, {} with kg context",
            table.len(),
            table.with_kg()
        );
        Ok(table)
    }

    /// Load the three enriched partitions as `(train, dev, test)`.
    ///
    /// Every row gets a `kg` and `description` column from the sidecars;
    /// QIDs missing from a sidecar get `None` there.
    pub fn load_partitions(&self) -> Result<(PartitionTable, PartitionTable, PartitionTable)> {
        let train = self.load_partition(Partition::Train)?;
        let dev = self.load_partition(Partition::Dev)?;
        let test = self.load_partition(Partition::Test)?;
        Ok((train, dev, test))
    }

    /// Knowledge-graph properties and description of an entity.
    ///
    /// A QID unknown to the sidecars yields empty properties and an empty
    /// description, unless `allow_online_search` is set, in which case the
    /// online lookup answers instead. Properties come back flattened to one
    /// string unless `output_as_dictionary` is set.
    pub fn kg_context_from_qid(
        &self,
        qid: &str,
        options: KgContextOptions,
    ) -> Result<(KgProperties, String)> {
        let (properties, description) = match self.properties.get(qid) {
            None if options.allow_online_search => {
                let online = self
                    .online
                    .as_ref()
                    .ok_or_else(|| DanedError::OnlineLookupUnavailable {
                        qid: qid.to_string(),
                    })?;
                debug!("{qid} not in local sidecars, searching online");
                online.lookup(qid).map_err(DanedError::OnlineLookup)?
            }
            local => (
                local.cloned().unwrap_or_default(),
                self.descriptions.get(qid).cloned().unwrap_or_default(),
            ),
        };

        let properties = if options.output_as_dictionary {
            KgProperties::Pairs(properties)
        } else {
            KgProperties::Flat(flatten_properties(&properties))
        };
        Ok((properties, description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kg::{LookupError, Property};

    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        std::fs::write(
            dir.join("daned.props.json"),
            r#"{"Q1": [["occupation", "writer"], [null, "Rungsted"]]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("daned.desc.json"),
            r#"{"Q1": "dansk forfatter", "Q2": "by i Danmark"}"#,
        )
        .unwrap();
        tmp
    }

    fn dictionary() -> KgContextOptions {
        KgContextOptions {
            output_as_dictionary: true,
            ..Default::default()
        }
    }

    #[test]
    fn known_qid_as_string_and_pairs() {
        let tmp = fixture();
        let daned = DaNed::from_dir(tmp.path()).unwrap();

        let (flat, desc) = daned.kg_context_from_qid("Q1", KgContextOptions::default()).unwrap();
        assert_eq!(flat, KgProperties::Flat("occupation writer Rungsted".into()));
        assert_eq!(desc, "dansk forfatter");

        let (pairs, _) = daned.kg_context_from_qid("Q1", dictionary()).unwrap();
        assert_eq!(pairs.as_pairs().map(|p| p.len()), Some(2));
    }

    #[test]
    fn description_without_properties() {
        let tmp = fixture();
        let daned = DaNed::from_dir(tmp.path()).unwrap();
        let (props, desc) = daned.kg_context_from_qid("Q2", dictionary()).unwrap();
        assert_eq!(props, KgProperties::Pairs(Vec::new()));
        assert_eq!(desc, "by i Danmark");
    }

    #[test]
    fn unknown_qid_is_empty_without_online_search() {
        let tmp = fixture();
        let daned = DaNed::from_dir(tmp.path())
            .unwrap()
            .with_online_lookup(|_: &str| -> std::result::Result<(Vec<Property>, String), LookupError> {
                panic!("online lookup must not be called")
            });
        let (flat, desc) = daned.kg_context_from_qid("Q999", KgContextOptions::default()).unwrap();
        assert_eq!(flat, KgProperties::Flat(String::new()));
        assert_eq!(desc, "");
    }

    #[test]
    fn online_search_without_collaborator() {
        let tmp = fixture();
        let daned = DaNed::from_dir(tmp.path()).unwrap();
        let options = KgContextOptions {
            allow_online_search: true,
            ..Default::default()
        };
        let err = daned.kg_context_from_qid("Q999", options).unwrap_err();
        assert!(matches!(err, DanedError::OnlineLookupUnavailable { ref qid } if qid == "Q999"));

        // Local hits never need the collaborator.
        assert!(daned.kg_context_from_qid("Q1", options).is_ok());
    }

    #[test]
    fn online_failure_passes_through_unchanged() {
        let tmp = fixture();
        let daned = DaNed::from_dir(tmp.path()).unwrap().with_online_lookup(
            |qid: &str| -> std::result::Result<(Vec<Property>, String), LookupError> {
                Err(format!("no route to wikidata for {qid}").into())
            },
        );
        let options = KgContextOptions {
            allow_online_search: true,
            ..Default::default()
        };
        let err = daned.kg_context_from_qid("Q42", options).unwrap_err();
        assert_eq!(err.to_string(), "no route to wikidata for Q42");
        match err {
            DanedError::OnlineLookup(inner) => {
                assert_eq!(inner.to_string(), "no route to wikidata for Q42")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = DaNed::from_dir(tmp.path().join("daned")).unwrap_err();
        assert!(matches!(err, DanedError::DataUnavailable { .. }));
    }

    #[test]
    fn partition_paths() {
        let tmp = fixture();
        let daned = DaNed::from_dir(tmp.path()).unwrap();
        assert_eq!(
            daned.partition_path(Partition::Dev),
            tmp.path().join("daned.dev.tsv")
        );
    }
}
