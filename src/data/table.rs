use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, ListArray, StringArray, StructArray, UInt8Array};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, FieldRef, Fields, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use super::model::PartitionTable;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

fn kg_pair_fields() -> Fields {
    Fields::from(vec![
        Field::new("property", DataType::Utf8, true),
        Field::new("value", DataType::Utf8, true),
    ])
}

fn kg_item_field() -> FieldRef {
    Arc::new(Field::new("item", DataType::Struct(kg_pair_fields()), true))
}

/// Arrow schema of an enriched partition:
///
/// | column        | type                                   | nullable |
/// |---------------|----------------------------------------|----------|
/// | `qid`         | Utf8                                   | no       |
/// | `sentence`    | Utf8                                   | no       |
/// | `class`       | UInt8                                  | no       |
/// | `kg`          | List<Struct{property, value}>          | yes      |
/// | `description` | Utf8                                   | yes      |
pub fn partition_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("qid", DataType::Utf8, false),
        Field::new("sentence", DataType::Utf8, false),
        Field::new("class", DataType::UInt8, false),
        Field::new("kg", DataType::List(kg_item_field()), true),
        Field::new("description", DataType::Utf8, true),
    ]))
}

// ---------------------------------------------------------------------------
// PartitionTable → RecordBatch
// ---------------------------------------------------------------------------

impl PartitionTable {
    /// Columnar view of the table, one Arrow row per record.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let qids = StringArray::from_iter_values(self.records.iter().map(|r| r.qid.as_str()));
        let sentences =
            StringArray::from_iter_values(self.records.iter().map(|r| r.sentence.as_str()));
        let labels = UInt8Array::from_iter_values(self.records.iter().map(|r| r.label));
        let descriptions: StringArray = self
            .records
            .iter()
            .map(|r| r.description.as_deref())
            .collect();

        // kg: flatten every pair into two child columns, then slice by offsets.
        let mut offsets: Vec<i32> = Vec::with_capacity(self.records.len() + 1);
        let mut validity = Vec::with_capacity(self.records.len());
        let mut names: Vec<Option<&str>> = Vec::new();
        let mut values: Vec<Option<&str>> = Vec::new();
        offsets.push(0);
        for record in &self.records {
            if let Some(props) = &record.kg {
                for p in props {
                    names.push(p.name.as_deref());
                    values.push(p.value.as_deref());
                }
            }
            offsets.push(names.len() as i32);
            validity.push(record.kg.is_some());
        }

        let pairs = StructArray::try_new(
            kg_pair_fields(),
            vec![
                Arc::new(StringArray::from(names)) as ArrayRef,
                Arc::new(StringArray::from(values)) as ArrayRef,
            ],
            None,
        )?;
        let kg = ListArray::try_new(
            kg_item_field(),
            OffsetBuffer::new(offsets.into()),
            Arc::new(pairs),
            Some(NullBuffer::from(validity)),
        )?;

        let batch = RecordBatch::try_new(
            partition_schema(),
            vec![
                Arc::new(qids),
                Arc::new(sentences),
                Arc::new(labels),
                Arc::new(kg),
                Arc::new(descriptions),
            ],
        )?;
        Ok(batch)
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Write an enriched partition to a Parquet file.
pub fn write_parquet(table: &PartitionTable, path: &Path) -> Result<()> {
    let batch = table.to_record_batch()?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read every record batch of a Parquet file.
pub fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(batches)
}
