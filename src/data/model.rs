use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::kg::Property;

/// QID → knowledge-graph properties, as read from `<dataset>.props.json`.
pub type PropertiesMap = HashMap<String, Vec<Property>>;

/// QID → free-text description, as read from `<dataset>.desc.json`.
pub type DescriptionsMap = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Partition – the fixed dataset splits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Train,
    Dev,
    Test,
}

impl Partition {
    /// All partitions in load order.
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Dev, Partition::Test];

    /// File-name stem, e.g. `daned.train.tsv` for [`Partition::Train`].
    pub fn as_str(self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Dev => "dev",
            Partition::Test => "test",
        }
    }
}

impl FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Partition::Train),
            "dev" => Ok(Partition::Dev),
            "test" => Ok(Partition::Test),
            other => Err(format!("unknown partition '{other}' (expected train, dev or test)")),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityRecord – one row of a partition
// ---------------------------------------------------------------------------

/// A (sentence, QID) pair with its label and joined knowledge-graph context.
///
/// `label` is 1 when the entity behind `qid` is the one mentioned in
/// `sentence`. The same sentence appears once per candidate QID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRecord {
    pub qid: String,
    pub sentence: String,
    #[serde(rename = "class")]
    pub label: u8,
    /// `None` when the QID has no entry in the properties sidecar.
    pub kg: Option<Vec<Property>>,
    /// `None` when the QID has no entry in the descriptions sidecar.
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// PartitionTable – an enriched split
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    pub partition: Partition,
    /// Rows in file order.
    pub records: Vec<EntityRecord>,
}

impl PartitionTable {
    pub fn new(partition: Partition, records: Vec<EntityRecord>) -> Self {
        Self { partition, records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityRecord> {
        self.records.iter()
    }

    /// Rows labelled 1.
    pub fn positives(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.iter().filter(|r| r.label == 1)
    }

    /// Rows whose QID was found in the properties sidecar.
    pub fn with_kg(&self) -> usize {
        self.records.iter().filter(|r| r.kg.is_some()).count()
    }
}

impl<'a> IntoIterator for &'a PartitionTable {
    type Item = &'a EntityRecord;
    type IntoIter = std::slice::Iter<'a, EntityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// SentimentRecord – one row of the sentiment datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRecord {
    pub valence: f64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(qid: &str, label: u8, kg: bool) -> EntityRecord {
        EntityRecord {
            qid: qid.to_string(),
            sentence: "Anders bor i København.".to_string(),
            label,
            kg: kg.then(|| vec![Property::new("occupation", "writer")]),
            description: None,
        }
    }

    #[test]
    fn partition_order_and_names() {
        let names: Vec<_> = Partition::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["train", "dev", "test"]);
        assert_eq!(Partition::Dev.to_string(), "dev");
        assert_eq!("TEST".parse::<Partition>(), Ok(Partition::Test));
        assert!("validation".parse::<Partition>().is_err());
    }

    #[test]
    fn table_counts() {
        let table = PartitionTable::new(
            Partition::Train,
            vec![record("Q1", 1, true), record("Q2", 0, false), record("Q3", 0, true)],
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.positives().count(), 1);
        assert_eq!(table.with_kg(), 2);
        assert_eq!((&table).into_iter().next().map(|r| r.qid.as_str()), Some("Q1"));
    }

    #[test]
    fn record_serializes_label_as_class() {
        let json = serde_json::to_value(record("Q1", 1, true)).unwrap();
        assert_eq!(json["class"], 1);
        assert_eq!(json["kg"], serde_json::json!([["occupation", "writer"]]));
        assert!(json["description"].is_null());
    }
}
