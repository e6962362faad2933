//! Write a small synthetic dataset in the DaNED cache layout.
//!
//! Usage: `generate_sample [CACHE_DIR]` (default `sample_cache`), then
//! `daned --cache-dir sample_cache summary`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

struct Entity {
    qid: &'static str,
    name: &'static str,
    description: &'static str,
    properties: &'static [(Option<&'static str>, Option<&'static str>)],
}

const ENTITIES: &[Entity] = &[
    Entity {
        qid: "Q5673",
        name: "H.C. Andersen",
        description: "dansk forfatter og digter",
        properties: &[
            (Some("beskæftigelse"), Some("forfatter")),
            (Some("fødested"), Some("Odense")),
        ],
    },
    Entity {
        qid: "Q7085",
        name: "Niels Bohr",
        description: "dansk fysiker",
        properties: &[
            (Some("beskæftigelse"), Some("fysiker")),
            (Some("pris modtaget"), Some("Nobelprisen i fysik")),
        ],
    },
    Entity {
        qid: "Q182804",
        name: "Karen Blixen",
        description: "dansk forfatter",
        properties: &[
            (Some("beskæftigelse"), Some("forfatter")),
            (None, Some("Rungstedlund")),
        ],
    },
    Entity {
        qid: "Q25342",
        name: "Odense",
        description: "by på Fyn",
        properties: &[(Some("land"), Some("Danmark"))],
    },
    Entity {
        qid: "Q1748",
        name: "København",
        description: "Danmarks hovedstad",
        properties: &[(Some("land"), Some("Danmark")), (Some("indbyggertal"), None)],
    },
];

/// QIDs that appear as candidates but have no sidecar entries.
const UNKNOWN_QIDS: &[&str] = &["Q4115189", "Q13406268"];

const TEMPLATES: &[&str] = &[
    "{} blev nævnt i aftenens udsendelse.",
    "Mange turister besøger steder knyttet til {}.",
    "Der blev skrevet en ny bog om {}.",
    "{} optræder ofte i danske skolebøger.",
];

/// Deterministic 64-bit linear congruential generator.
struct Lcg(u64);

impl Lcg {
    fn step(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.step() % n as u64) as usize
    }
}

fn write_partition(path: &Path, rows: &[(String, String, u8)]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["qid", "sentence", "class"])?;
    for (qid, sentence, class) in rows {
        writer.write_record([qid.as_str(), sentence.as_str(), class.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cache_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_cache"));
    let dataset_dir = cache_dir.join("daned");
    fs::create_dir_all(&dataset_dir)
        .with_context(|| format!("creating {}", dataset_dir.display()))?;

    let props: BTreeMap<&str, _> = ENTITIES.iter().map(|e| (e.qid, e.properties)).collect();
    let descs: BTreeMap<&str, &str> = ENTITIES.iter().map(|e| (e.qid, e.description)).collect();
    fs::write(
        dataset_dir.join("daned.props.json"),
        serde_json::to_string_pretty(&props)?,
    )?;
    fs::write(
        dataset_dir.join("daned.desc.json"),
        serde_json::to_string_pretty(&descs)?,
    )?;

    let mut rng = Lcg(42);
    let mut total = 0;
    for (part, sentences) in [("train", 12), ("dev", 4), ("test", 4)] {
        let mut rows = Vec::new();
        for _ in 0..sentences {
            let entity = &ENTITIES[rng.below(ENTITIES.len())];
            let template = TEMPLATES[rng.below(TEMPLATES.len())];
            let sentence = template.replacen("{}", entity.name, 1);

            rows.push((entity.qid.to_string(), sentence.clone(), 1));
            let distractor = &ENTITIES[rng.below(ENTITIES.len())];
            if distractor.qid != entity.qid {
                rows.push((distractor.qid.to_string(), sentence.clone(), 0));
            }
            let unknown = UNKNOWN_QIDS[rng.below(UNKNOWN_QIDS.len())];
            rows.push((unknown.to_string(), sentence, 0));
        }
        let path = dataset_dir.join(format!("daned.{part}.tsv"));
        write_partition(&path, &rows)?;
        total += rows.len();
    }

    println!("Wrote {total} rows to {}", dataset_dir.display());
    Ok(())
}
