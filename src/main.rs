use std::path::PathBuf;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::{Parser, Subcommand};
use log::info;

use daned::data::quality::positive_label_conflicts;
use daned::data::table::write_parquet;
use daned::{DaNed, KgContextOptions, LoaderConfig, Partition};

#[derive(Parser)]
#[command(name = "daned", version, about = "Inspect and export the DaNED dataset")]
struct Cli {
    /// Cache directory holding the extracted dataset [default: $DANLP_CACHE_DIR or ~/.danlp]
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Row counts per partition
    Summary,
    /// First rows of one partition
    Head {
        partition: Partition,
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,
    },
    /// Knowledge-graph context of a QID, as JSON
    Lookup {
        qid: String,
        /// Keep the property pairs instead of one flat string
        #[arg(long)]
        dictionary: bool,
        /// Fall back to Wikidata for QIDs missing locally
        #[arg(long)]
        online: bool,
    },
    /// Write every enriched partition to `<out>/daned.<partition>.parquet`
    Export { out: PathBuf },
    /// Report sentences with more than one positive QID
    Validate,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.cache_dir {
        Some(dir) => LoaderConfig::with_cache_dir(dir),
        None => LoaderConfig::default(),
    };
    let daned = DaNed::new(&config).context("opening DaNED")?;
    #[cfg(feature = "network")]
    let daned = daned.with_wikidata();

    match cli.command {
        Command::Summary => {
            let (train, dev, test) = daned.load_partitions()?;
            println!("{:<6} {:>8} {:>10} {:>8}", "split", "rows", "positives", "with kg");
            for table in [&train, &dev, &test] {
                println!(
                    "{:<6} {:>8} {:>10} {:>8}",
                    table.partition.as_str(),
                    table.len(),
                    table.positives().count(),
                    table.with_kg()
                );
            }
        }
        Command::Head { partition, rows } => {
            let table = daned.load_partition(partition)?;
            let batch = table.to_record_batch()?;
            let head = batch.slice(0, rows.min(batch.num_rows()));
            println!("{}", pretty_format_batches(&[head])?);
        }
        Command::Lookup {
            qid,
            dictionary,
            online,
        } => {
            let options = KgContextOptions {
                output_as_dictionary: dictionary,
                allow_online_search: online,
            };
            let (properties, description) = daned
                .kg_context_from_qid(&qid, options)
                .with_context(|| format!("looking up {qid}"))?;
            let out = serde_json::json!({
                "qid": qid,
                "properties": properties,
                "description": description,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Export { out } => {
            std::fs::create_dir_all(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            for partition in Partition::ALL {
                let table = daned.load_partition(partition)?;
                let path = out.join(format!("daned.{partition}.parquet"));
                write_parquet(&table, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("wrote {} rows to {}", table.len(), path.display());
            }
        }
        Command::Validate => {
            let mut total = 0;
            for partition in Partition::ALL {
                let table = daned.load_partition(partition)?;
                for conflict in positive_label_conflicts(&table) {
                    total += 1;
                    println!("{partition}\t{}\t{}", conflict.qids.join(","), conflict.sentence);
                }
            }
            if total == 0 {
                println!("no sentence has more than one positive QID");
            }
        }
    }

    Ok(())
}
