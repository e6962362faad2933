use std::collections::BTreeMap;

use serde::Serialize;

use super::model::PartitionTable;

/// A sentence carrying more than one label-1 QID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelConflict {
    pub sentence: String,
    /// Positive QIDs in file order.
    pub qids: Vec<String>,
}

/// Find sentences that break the "one correct entity per sentence" rule.
///
/// The dataset is expected to have at most one positive row per sentence in
/// a partition. Loading never checks this; callers opt in here. Results are
/// ordered by sentence.
pub fn positive_label_conflicts(table: &PartitionTable) -> Vec<LabelConflict> {
    let mut positives: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in table.positives() {
        positives
            .entry(record.sentence.as_str())
            .or_default()
            .push(record.qid.as_str());
    }

    positives
        .into_iter()
        .filter(|(_, qids)| qids.len() > 1)
        .map(|(sentence, qids)| LabelConflict {
            sentence: sentence.to_string(),
            qids: qids.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EntityRecord, Partition};

    fn row(qid: &str, sentence: &str, label: u8) -> EntityRecord {
        EntityRecord {
            qid: qid.into(),
            sentence: sentence.into(),
            label,
            kg: None,
            description: None,
        }
    }

    #[test]
    fn clean_table_has_no_conflicts() {
        let table = PartitionTable::new(
            Partition::Train,
            vec![
                row("Q1", "Holger Danske sover.", 1),
                row("Q2", "Holger Danske sover.", 0),
                row("Q3", "Niels Bohr var fysiker.", 1),
            ],
        );
        assert!(positive_label_conflicts(&table).is_empty());
    }

    #[test]
    fn duplicate_positives_are_reported() {
        let table = PartitionTable::new(
            Partition::Dev,
            vec![
                row("Q1", "Anders And bor i Andeby.", 1),
                row("Q2", "Anders And bor i Andeby.", 0),
                row("Q3", "Anders And bor i Andeby.", 1),
            ],
        );
        let conflicts = positive_label_conflicts(&table);
        assert_eq!(
            conflicts,
            vec![LabelConflict {
                sentence: "Anders And bor i Andeby.".into(),
                qids: vec!["Q1".into(), "Q3".into()],
            }]
        );
    }
}
