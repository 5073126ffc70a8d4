//! Durability of the sled store across reopen.

use quizwheel::error::StorageError;
use quizwheel::store::{QuizStore, SledQuizStore};
use quizwheel::types::Question;
use tempfile::TempDir;

fn sample() -> Vec<Question> {
    vec![
        Question::new("9-z", "Last key, first position"),
        Question::new("1-a", "First key").with_description("middle"),
        Question::new("5-m", "Middle key"),
    ]
}

#[test]
fn collection_survives_reopen_in_insertion_order() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = SledQuizStore::open(temp_dir.path()).unwrap();
        store.set_endpoints(&["https://a.test/q".to_string()]).unwrap();
        store.replace_questions(&sample()).unwrap();
        assert!(store.mark_read("1-a").unwrap());
        store.close().unwrap();
    }

    let store = SledQuizStore::open(temp_dir.path()).unwrap();
    let questions = store.get_all_questions().unwrap();
    let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["9-z", "1-a", "5-m"]);
    assert!(questions[1].is_read);
    assert!(!questions[0].is_read && !questions[2].is_read);
    assert_eq!(store.get_endpoints().unwrap(), vec!["https://a.test/q".to_string()]);
    assert_eq!(
        store.get_question("1-a").unwrap().map(|q| q.description),
        Some("middle".to_string())
    );
}

#[test]
fn settings_replace_clears_questions_durably() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = SledQuizStore::open(temp_dir.path()).unwrap();
        store.replace_questions(&sample()).unwrap();
        let saved = store
            .set_endpoints(&[" https://b.test ".to_string(), " ".to_string()])
            .unwrap();
        assert_eq!(saved, vec!["https://b.test".to_string()]);
        store.close().unwrap();
    }

    let store = SledQuizStore::open(temp_dir.path()).unwrap();
    assert!(store.get_all_questions().unwrap().is_empty());
    assert_eq!(store.get_endpoints().unwrap(), vec!["https://b.test".to_string()]);
}

#[test]
fn rejected_replace_keeps_previous_collection() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledQuizStore::open(temp_dir.path()).unwrap();
    store.replace_questions(&sample()).unwrap();

    let duplicated = vec![Question::new("x", "one"), Question::new("x", "two")];
    let err = store.replace_questions(&duplicated).unwrap_err();
    assert!(matches!(err, StorageError::DuplicateQuestionId(ref id) if id == "x"));
    assert_eq!(store.get_all_questions().unwrap(), sample());
}

#[test]
fn mark_read_of_absent_id_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledQuizStore::open(temp_dir.path()).unwrap();
    store.replace_questions(&sample()).unwrap();

    assert!(!store.mark_read("missing").unwrap());
    assert_eq!(store.get_all_questions().unwrap(), sample());
}
