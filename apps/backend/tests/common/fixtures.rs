//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

use flashdrill_core::WordEntry;

/// Small word list with two units.
pub fn words() -> Vec<WordEntry> {
    [
        ("where", "Wo", "questions"),
        ("what", "Was", "questions"),
        ("dog", "Hund", "animals"),
        ("cat", "Katze", "animals"),
        ("horse", "Pferd", "animals"),
    ]
    .into_iter()
    .map(|(en, de, unit)| WordEntry {
        en: en.to_string(),
        de: de.to_string(),
        unit: unit.to_string(),
    })
    .collect()
}

/// Round config drawing `size` cards from every card.
pub fn config_all(size: usize) -> Value {
    json!({ "selection": { "type": "all" }, "focus": "weak", "size": size })
}

/// Round config restricted to the given topics.
pub fn config_topics(topics: Value, size: usize) -> Value {
    json!({ "selection": { "type": "topics", "topics": topics }, "size": size })
}

/// The answer a card JSON expects.
pub fn expected_answer(card: &Value) -> String {
    let prompt = &card["prompt"];
    match prompt["kind"].as_str() {
        Some("product") => {
            let x = prompt["x"].as_u64().unwrap();
            let y = prompt["y"].as_u64().unwrap();
            (x * y).to_string()
        }
        Some("word") => prompt["de"].as_str().unwrap().to_string(),
        other => panic!("unexpected prompt kind {other:?}"),
    }
}

/// Typed answer request for a card.
pub fn typed_answer(card_id: &str, text: &str, elapsed: f64) -> Value {
    json!({
        "card_id": card_id,
        "response": { "type": "typed", "text": text },
        "elapsed": elapsed,
    })
}
