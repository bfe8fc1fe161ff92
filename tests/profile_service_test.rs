//! Tests for login, logout and summaries.

use mozgalica::engines::{CurrentUser, GameKey};
use mozgalica::{ProfileError, ProfileService, ScoreRepository};
use tempfile::NamedTempFile;

fn setup_service() -> (NamedTempFile, ProfileService) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = ScoreRepository::open(db_path).expect("Failed to open repository");
    (db_file, ProfileService::new(repo))
}

#[test]
fn test_short_name_rejected() {
    let (_db, service) = setup_service();
    let result = service.login("  ab  ");
    assert!(matches!(result, Err(ProfileError::NameTooShort)));
    assert_eq!(service.current_user(), None);
    assert!(service.repository().list_users().expect("List failed").is_empty());
}

#[test]
fn test_login_trims_and_sets_current_user() {
    let (_db, service) = setup_service();
    let user = service.login("  ana ").expect("Login failed");
    assert_eq!(user.username(), "ana");
    assert_eq!(service.current_user().as_deref(), Some("ana"));
}

#[test]
fn test_login_reuses_existing_user() {
    let (_db, service) = setup_service();
    let first = service.login("marko").expect("Login failed");
    service.logout();
    let second = service.login("marko").expect("Login failed");
    assert_eq!(first.id(), second.id());
}

#[test]
fn test_logout_clears_current_user() {
    let (_db, service) = setup_service();
    service.login("ana").expect("Login failed");
    service.logout();
    assert_eq!(service.current_user(), None);
}

#[test]
fn test_summaries_through_service() {
    let (_db, service) = setup_service();
    service
        .repository()
        .save_score("ana", GameKey::TicTacToe, 200)
        .expect("Save failed");

    let summaries = service.summaries("ana").expect("Summaries failed");
    assert_eq!(summaries.len(), 1);
    assert_eq!(*summaries[0].game(), GameKey::TicTacToe);
}
