//! Building task items for bulk creation.

use crate::backend::TaskItem;
use crate::error::{ApportionError, Result};
use serde_json::Value;
use std::path::Path;

/// One text item per non-empty line. Blank text yields no items.
pub fn items_from_text(text: &str) -> Vec<TaskItem> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.lines()
        .filter(|line| !line.is_empty())
        .map(TaskItem::text)
        .collect()
}

/// Reads a JSON array of items. Objects are sent as-is; strings become text items.
pub fn items_from_json_file(path: &Path) -> Result<Vec<TaskItem>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let Value::Array(entries) = value else {
        return Err(ApportionError::Parse(format!(
            "{} must contain a JSON array of items",
            path.display()
        )));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Object(map) => Ok(TaskItem(map)),
            Value::String(text) => Ok(TaskItem::text(text)),
            other => Err(ApportionError::Parse(format!(
                "item {} in {} is neither an object nor a string: {}",
                i,
                path.display(),
                other
            ))),
        })
        .collect()
}

/// Falls back to sample items when nothing was supplied.
pub fn items_or_samples(items: Vec<TaskItem>, samples: &[String]) -> Vec<TaskItem> {
    if !items.is_empty() {
        return items;
    }
    samples.iter().map(|s| TaskItem::text(s.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_items_from_text_skips_blank_lines() {
        let items = items_from_text("a cat\n\n\na dog\n");
        let labels: Vec<_> = items.iter().filter_map(TaskItem::label).collect();
        assert_eq!(labels, vec!["a cat", "a dog"]);
        assert!(items_from_text("").is_empty());
    }

    #[test]
    fn test_whitespace_only_text_falls_back_to_samples() {
        assert!(items_from_text("   \n  \n").is_empty());

        let samples = vec!["Sample task 1".to_string(), "Sample task 2".to_string()];
        let items = items_or_samples(items_from_text("   \n  \n"), &samples);
        let labels: Vec<_> = items.iter().filter_map(TaskItem::label).collect();
        assert_eq!(labels, vec!["Sample task 1", "Sample task 2"]);
    }

    #[test]
    fn test_items_or_samples() {
        let samples = vec!["Sample task 1".to_string(), "Sample task 2".to_string()];
        let fallback = items_or_samples(Vec::new(), &samples);
        assert_eq!(fallback.len(), 2);
        assert_eq!(fallback[1].label(), Some("Sample task 2"));

        let given = items_or_samples(vec![TaskItem::text("x")], &samples);
        assert_eq!(given.len(), 1);
    }

    #[test]
    fn test_items_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"file": "a.png", "size": 10}, "plain text"]"#).unwrap();

        let items = items_from_json_file(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label(), Some("a.png"));
        assert_eq!(items[1].label(), Some("plain text"));
    }

    #[test]
    fn test_items_from_json_file_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"{"text": "x"}"#).unwrap();
        assert!(items_from_json_file(&path).is_err());

        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(items_from_json_file(&path).is_err());
    }
}
