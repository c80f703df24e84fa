//! `--json` output. Every document is an object with a `status` key.

use serde_json::{Map, Value};

/// Merge `fields` under a leading `status`. A non-object `fields` is kept
/// whole under `data`.
pub fn status_envelope(status: &str, fields: Value) -> Value {
    let mut doc = Map::new();
    doc.insert("status".to_string(), Value::from(status));
    match fields {
        Value::Object(map) => {
            for (key, value) in map {
                if key != "status" {
                    doc.insert(key, value);
                }
            }
        }
        Value::Null => {}
        other => {
            doc.insert("data".to_string(), other);
        }
    }
    Value::Object(doc)
}

pub fn print_status(status: &str, fields: Value) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&status_envelope(status, fields))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_sit_beside_the_status() {
        let doc = status_envelope("ready", json!({"target": "root@db:3306"}));
        assert_eq!(doc, json!({"status": "ready", "target": "root@db:3306"}));
    }

    #[test]
    fn status_cannot_be_overridden_by_fields() {
        let doc = status_envelope("error", json!({"status": "success", "message": "boom"}));
        assert_eq!(doc["status"], "error");
        assert_eq!(doc["message"], "boom");
    }

    #[test]
    fn scalar_fields_are_nested_under_data() {
        assert_eq!(
            status_envelope("success", json!(3)),
            json!({"status": "success", "data": 3})
        );
        assert_eq!(status_envelope("ready", Value::Null), json!({"status": "ready"}));
    }
}
