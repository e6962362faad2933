//! Loader for the DaNED named entity disambiguation dataset.
//!
//! ```no_run
//! use daned::{DaNed, KgContextOptions, LoaderConfig};
//!
//! # fn main() -> daned::Result<()> {
//! let daned = DaNed::new(&LoaderConfig::default())?;
//! let (train, dev, test) = daned.load_partitions()?;
//! println!("{} / {} / {} rows", train.len(), dev.len(), test.len());
//!
//! let (properties, description) = daned.kg_context_from_qid("Q36455", KgContextOptions::default())?;
//! println!("{properties}: {description}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod daned;
pub mod data;
pub mod error;
pub mod fetch;
pub mod kg;
pub mod sentiment;

pub use config::LoaderConfig;
pub use daned::{DaNed, KgContextOptions};
pub use data::model::{EntityRecord, Partition, PartitionTable, SentimentRecord};
pub use error::{DanedError, Result};
pub use kg::{flatten_properties, KgProperties, KnowledgeGraphLookup, Property};
pub use sentiment::{EuroparlSentiment, LccSentiment};
