use std::env;
use std::fs;
use std::path::PathBuf;

use matematik_pintar::models::ANONYMOUS_NAME;
use matematik_pintar::{Difficulty, Grade, JsonFileStore, Leaderboard, NewScore, Topic};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn temp_dir() -> PathBuf {
    env::temp_dir().join(format!("matematik-pintar-it-{}", Uuid::new_v4()))
}

fn score(name: &str, grade: u8, topic: Topic, score: u32, total: u32) -> NewScore {
    NewScore {
        name: name.to_string(),
        grade: Grade::new(grade).unwrap(),
        topic,
        difficulty: Difficulty::Mudah,
        score,
        total_questions: total,
    }
}

#[test]
fn test_scores_survive_reopening_the_file() {
    let dir = temp_dir();

    {
        let leaderboard = Leaderboard::new(JsonFileStore::in_dir(&dir));
        leaderboard.save_score(score("Ali", 2, Topic::Nombor, 8, 10)).unwrap();
        leaderboard.save_score(score("Siti", 2, Topic::Nombor, 29, 30)).unwrap();
        leaderboard.save_score(score("Chong", 2, Topic::Wang, 10, 10)).unwrap();
        leaderboard.save_score(score("Ravi", 3, Topic::Nombor, 10, 10)).unwrap();
    }

    let reopened = Leaderboard::new(JsonFileStore::in_dir(&dir));
    let names: Vec<String> = reopened
        .top(Grade::new(2).unwrap(), Topic::Nombor)
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, ["Siti", "Ali"]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_saved_record_is_normalised() {
    let dir = temp_dir();
    let leaderboard = Leaderboard::new(JsonFileStore::in_dir(&dir));

    let saved = leaderboard.save_score(score("   ", 1, Topic::Masa, 12, 10)).unwrap();

    assert_eq!(saved.name, ANONYMOUS_NAME);
    assert_eq!(saved.score, 10);
    assert!(!saved.id.is_empty());
    assert!(saved.timestamp > 0);

    let board = leaderboard.top(Grade::new(1).unwrap(), Topic::Masa);
    assert_eq!(board, vec![saved]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_file_uses_camel_case_records() {
    let dir = temp_dir();
    let leaderboard = Leaderboard::new(JsonFileStore::in_dir(&dir));
    leaderboard.save_score(score("Aina", 4, Topic::Pecahan, 3, 5)).unwrap();

    let content = fs::read_to_string(dir.join("leaderboard.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    let entry = &json[0];

    assert_eq!(entry["name"], "Aina");
    assert_eq!(entry["grade"], 4);
    assert_eq!(entry["topic"], Topic::Pecahan.title());
    assert_eq!(entry["totalQuestions"], 5);
    assert!(entry["timestamp"].is_i64());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_corrupt_file_gives_empty_board_and_no_save() {
    let dir = temp_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("leaderboard.json"), "not json").unwrap();

    let leaderboard = Leaderboard::new(JsonFileStore::in_dir(&dir));

    assert!(leaderboard.top(Grade::new(1).unwrap(), Topic::Data).is_empty());
    assert!(leaderboard.save_score(score("Ali", 1, Topic::Data, 1, 1)).is_none());
    assert_eq!(fs::read_to_string(dir.join("leaderboard.json")).unwrap(), "not json");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_saving_keeps_entries_from_older_files() {
    let dir = temp_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("leaderboard.json"),
        r#"[
            {"id":"old","name":"Ali","grade":2,"score":3,"totalQuestions":5},
            {"id":"kept","name":"Siti","grade":2,"topic":"Nombor dan Operasi","score":4,"totalQuestions":5,"timestamp":1}
        ]"#,
    )
    .unwrap();

    let leaderboard = Leaderboard::new(JsonFileStore::in_dir(&dir));
    leaderboard.save_score(score("Aina", 2, Topic::Nombor, 5, 5)).unwrap();

    let content = fs::read_to_string(dir.join("leaderboard.json")).unwrap();
    let json: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(json.len(), 3);
    assert_eq!(json[0]["id"], "old");
    assert_eq!(leaderboard.top(Grade::new(2).unwrap(), Topic::Nombor).len(), 2);

    fs::remove_dir_all(&dir).ok();
}
