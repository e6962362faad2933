use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use serde_json::Value as JsonValue;

use super::{KnowledgeGraphLookup, LookupError, Property};

const ENTITY_DATA_URL: &str = "https://www.wikidata.org/wiki/Special:EntityData";
const API_URL: &str = "https://www.wikidata.org/w/api.php";
/// `wbgetentities` accepts at most 50 ids per request.
const LABEL_BATCH: usize = 50;

/// Online lookup against the public Wikidata endpoints.
///
/// Properties are the entity's claims whose main value is another entity or
/// a plain string, labelled in `language` with English as fallback.
pub struct WikidataLookup {
    agent: ureq::Agent,
    language: String,
}

impl Default for WikidataLookup {
    fn default() -> Self {
        Self::new("da")
    }
}

impl WikidataLookup {
    pub fn new(language: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            agent,
            language: language.into(),
        }
    }

    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<JsonValue, LookupError> {
        let mut request = self.agent.get(url);
        for (k, v) in query {
            request = request.query(k, v);
        }
        let body = request.call()?.into_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn labels(&self, ids: &[String]) -> Result<HashMap<String, String>, LookupError> {
        let languages = format!("{}|en", self.language);
        let mut out = HashMap::new();
        for chunk in ids.chunks(LABEL_BATCH) {
            let joined = chunk.join("|");
            let root = self.get_json(
                API_URL,
                &[
                    ("action", "wbgetentities"),
                    ("ids", joined.as_str()),
                    ("props", "labels"),
                    ("languages", languages.as_str()),
                    ("format", "json"),
                ],
            )?;
            out.extend(parse_labels(&root, &self.language));
        }
        Ok(out)
    }
}

impl KnowledgeGraphLookup for WikidataLookup {
    fn lookup(&self, qid: &str) -> Result<(Vec<Property>, String), LookupError> {
        let url = format!("{ENTITY_DATA_URL}/{qid}.json");
        let root = self.get_json(&url, &[])?;
        let entity = root
            .get("entities")
            .and_then(|e| e.as_object())
            .and_then(|e| e.values().next())
            .ok_or_else(|| format!("no entity data returned for {qid}"))?;

        let description = localized(entity.get("descriptions"), &self.language).unwrap_or_default();
        let claims = parse_claims(entity);

        let mut ids: Vec<String> = Vec::new();
        for (prop, value) in &claims {
            ids.push(prop.clone());
            if let ClaimValue::Entity(id) = value {
                ids.push(id.clone());
            }
        }
        ids.sort();
        ids.dedup();
        debug!("resolving {} labels for {qid}", ids.len());
        let labels = self.labels(&ids)?;

        let properties = claims
            .into_iter()
            .map(|(prop, value)| Property {
                name: labels.get(&prop).cloned(),
                value: match value {
                    ClaimValue::Entity(id) => labels.get(&id).cloned(),
                    ClaimValue::Text(s) => Some(s),
                },
            })
            .collect();

        Ok((properties, description))
    }
}

#[derive(Debug, PartialEq)]
enum ClaimValue {
    Entity(String),
    Text(String),
}

/// `(property id, value)` for every entity- or string-valued main snak.
fn parse_claims(entity: &JsonValue) -> Vec<(String, ClaimValue)> {
    let Some(claims) = entity.get("claims").and_then(|c| c.as_object()) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (prop, statements) in claims {
        for statement in statements.as_array().into_iter().flatten() {
            let Some(datavalue) = statement.pointer("/mainsnak/datavalue") else {
                continue;
            };
            let value = match datavalue.get("type").and_then(|t| t.as_str()) {
                Some("wikibase-entityid") => datavalue
                    .pointer("/value/id")
                    .and_then(|v| v.as_str())
                    .map(|id| ClaimValue::Entity(id.to_string())),
                Some("string") => datavalue
                    .get("value")
                    .and_then(|v| v.as_str())
                    .map(|s| ClaimValue::Text(s.to_string())),
                _ => None,
            };
            if let Some(value) = value {
                out.push((prop.clone(), value));
            }
        }
    }
    out
}

fn parse_labels(root: &JsonValue, language: &str) -> HashMap<String, String> {
    root.get("entities")
        .and_then(|e| e.as_object())
        .map(|entities| {
            entities
                .iter()
                .filter_map(|(id, ent)| localized(ent.get("labels"), language).map(|l| (id.clone(), l)))
                .collect()
        })
        .unwrap_or_default()
}

/// Value in `language`, else English.
fn localized(field: Option<&JsonValue>, language: &str) -> Option<String> {
    let field = field?;
    [language, "en"]
        .iter()
        .find_map(|lang| field.pointer(&format!("/{lang}/value")).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_keep_entity_and_string_values() {
        let entity: JsonValue = serde_json::from_str(
            r#"{"claims": {
                "P106": [{"mainsnak": {"datavalue": {"type": "wikibase-entityid", "value": {"id": "Q36180"}}}}],
                "P1477": [{"mainsnak": {"datavalue": {"type": "string", "value": "Hans Christian Andersen"}}}],
                "P569": [{"mainsnak": {"datavalue": {"type": "time", "value": {"time": "+1805-04-02"}}}}],
                "P18": [{"mainsnak": {"snaktype": "novalue"}}]
            }}"#,
        )
        .unwrap();
        let mut claims = parse_claims(&entity);
        claims.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            claims,
            vec![
                ("P106".to_string(), ClaimValue::Entity("Q36180".into())),
                ("P1477".to_string(), ClaimValue::Text("Hans Christian Andersen".into())),
            ]
        );
    }

    #[test]
    fn labels_fall_back_to_english() {
        let root: JsonValue = serde_json::from_str(
            r#"{"entities": {
                "P106": {"labels": {"da": {"value": "beskæftigelse"}}},
                "Q36180": {"labels": {"en": {"value": "writer"}}},
                "Q1": {"labels": {}}
            }}"#,
        )
        .unwrap();
        let labels = parse_labels(&root, "da");
        assert_eq!(labels.get("P106").map(String::as_str), Some("beskæftigelse"));
        assert_eq!(labels.get("Q36180").map(String::as_str), Some("writer"));
        assert!(!labels.contains_key("Q1"));
    }
}
