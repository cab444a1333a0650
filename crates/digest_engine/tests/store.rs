use std::fs;

use digest_core::{Difficulty, ProblemRecord};
use digest_engine::{ProblemStore, StoreError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

fn record(id: u32, title: &str) -> ProblemRecord {
    ProblemRecord {
        id,
        slug: title.to_lowercase().replace(' ', "-"),
        title: title.to_string(),
        difficulty: Difficulty::Easy,
        description: format!("{title} description"),
        examples: Vec::new(),
        constraints: vec!["1 <= n".to_string()],
        follow_up: None,
        topics: Vec::new(),
        hints: Vec::new(),
        url: format!("https://leetcode.com/problems/{id}/"),
        markdown: String::new(),
    }
}

#[test]
fn missing_file_opens_empty() {
    let temp = TempDir::new().unwrap();
    let store = ProblemStore::open(temp.path().join("problems.json")).unwrap();
    assert!(store.is_empty());
    assert!(!temp.path().join("problems.json").exists());
}

#[test]
fn insert_persists_and_reopens() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");

    let mut store = ProblemStore::open(&path).unwrap();
    assert_eq!(store.insert(record(2, "Add Two Numbers")).unwrap(), None);
    assert_eq!(store.insert(record(1, "Two Sum")).unwrap(), None);
    let replaced = store.insert(record(1, "Two Sum Again")).unwrap();
    assert_eq!(replaced.map(|r| r.title), Some("Two Sum".to_string()));

    let reopened = ProblemStore::open(&path).unwrap();
    assert_eq!(reopened.ids().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(reopened.get(1).unwrap().title, "Two Sum Again");

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(on_disk.get("1").is_some());
    assert!(on_disk.get("2").is_some());
}

#[test]
fn list_layout_is_migrated_and_rewritten() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");
    let legacy = json!([
        {
            "id": "53",
            "slug": "maximum-subarray",
            "title": "Maximum Subarray",
            "difficulty": "Medium",
            "description": "Find it.",
            "examples": [
                { "title": "Example 1", "input": "nums = [1]", "output": "1",
                  "explanation": null, "image": null, "raw": null }
            ],
            "constraints": [],
            "url": "https://leetcode.com/problems/maximum-subarray/"
        },
        {
            "slug": "no-id",
            "title": "No Id",
            "description": "Position keyed.",
            "url": "https://leetcode.com/problems/no-id/"
        }
    ]);
    fs::write(&path, legacy.to_string()).unwrap();

    let store = ProblemStore::open(&path).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(53).unwrap().examples[0].label, 1);
    assert_eq!(store.get(2).unwrap().title, "No Id");

    let rewritten: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(rewritten.is_object());
    assert_eq!(rewritten["53"]["title"], "Maximum Subarray");
    assert_eq!(rewritten["2"]["id"], 2);
}

#[test]
fn undecodable_entries_are_kept_out_of_memory_but_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");
    let mut good = serde_json::to_value(record(7, "Reverse Integer")).unwrap();
    good["id"] = json!("7");
    let old = json!({ "id": "9", "title": "Old", "slug": "old", "url": "x" });
    let keyed = json!({ "7": good, "9": old.clone() });
    fs::write(&path, keyed.to_string()).unwrap();

    let mut store = ProblemStore::open(&path).unwrap();
    assert_eq!(store.ids().collect::<Vec<_>>(), vec![7]);
    assert_eq!(store.unreadable_keys().collect::<Vec<_>>(), vec!["9"]);

    store.insert(record(2, "Add Two Numbers")).unwrap();
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let mut keys: Vec<&str> = on_disk.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["2", "7", "9"]);
    assert_eq!(on_disk["9"], old);
}

#[test]
fn inserting_over_an_undecodable_entry_replaces_it() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");
    fs::write(&path, json!({ "3": { "title": 12 } }).to_string()).unwrap();

    let mut store = ProblemStore::open(&path).unwrap();
    store.insert(record(3, "Longest Substring")).unwrap();
    assert_eq!(store.unreadable_keys().count(), 0);

    let reopened = ProblemStore::open(&path).unwrap();
    assert_eq!(reopened.get(3).unwrap().title, "Longest Substring");
}

#[test]
fn null_id_in_list_layout_falls_back_to_position() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");
    let legacy = json!([
        { "id": null, "title": "A", "slug": "a", "description": "d", "url": "x" }
    ]);
    fs::write(&path, legacy.to_string()).unwrap();

    let store = ProblemStore::open(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(1).unwrap().title, "A");

    let rewritten: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rewritten["1"]["id"], 1);
}

#[test]
fn undecodable_list_entries_survive_migration() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");
    let broken = json!({ "id": 40, "title": ["not", "text"] });
    let legacy = json!([
        { "title": "A", "slug": "a", "description": "d", "url": "x" },
        broken.clone(),
        { "slug": "no-title" }
    ]);
    fs::write(&path, legacy.to_string()).unwrap();

    let store = ProblemStore::open(&path).unwrap();
    assert_eq!(store.ids().collect::<Vec<_>>(), vec![1]);
    assert_eq!(store.unreadable_keys().collect::<Vec<_>>(), vec!["3", "40"]);

    let rewritten: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rewritten["40"], broken);
    assert_eq!(rewritten["3"], json!({ "id": 3, "slug": "no-title" }));
}

#[test]
fn unexpected_shape_is_treated_as_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");
    fs::write(&path, "\"just a string\"").unwrap();
    assert!(ProblemStore::open(&path).unwrap().is_empty());
}

#[test]
fn malformed_json_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problems.json");
    fs::write(&path, "{ not json").unwrap();
    let err = ProblemStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Malformed { .. }));
}
