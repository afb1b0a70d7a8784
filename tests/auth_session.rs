use std::path::Path;

use github_profile_finder::auth::SessionManager;
use github_profile_finder::error::FinderError;
use github_profile_finder::store::AccountStore;
use tempfile::tempdir;

fn manager(dir: &Path) -> SessionManager {
    SessionManager::new(AccountStore::open(dir).expect("Failed to open store"))
}

#[test]
fn test_signup_establishes_session() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());

    let user = session
        .signup("alice", "alice@x.com", "secret1")
        .expect("Signup failed");

    assert_eq!(user.username, "alice");
    assert!(user.favorites.is_empty());
    assert!(session.is_authenticated());
    assert_eq!(session.current_user().unwrap().email, "alice@x.com");
}

#[test]
fn test_signup_duplicate_does_not_mutate_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());

    session
        .signup("alice", "alice@x.com", "secret1")
        .expect("Signup failed");

    // Same username, different email
    let result = session.signup("alice", "other@x.com", "secret2");
    assert!(matches!(result, Err(FinderError::DuplicateAccount)));

    // Same email, different username
    let result = session.signup("bob", "alice@x.com", "secret2");
    assert!(matches!(result, Err(FinderError::DuplicateAccount)));

    let accounts = session.store().list_accounts();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].username, "alice");
}

#[test]
fn test_login_by_username_or_email() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());
    session
        .signup("alice", "alice@x.com", "secret1")
        .expect("Signup failed");
    session.logout().expect("Logout failed");

    let user = session.login("alice", "secret1").expect("Login by username failed");
    assert_eq!(user.email, "alice@x.com");
    session.logout().expect("Logout failed");

    let user = session
        .login("alice@x.com", "secret1")
        .expect("Login by email failed");
    assert_eq!(user.username, "alice");
}

#[test]
fn test_login_comparison_is_case_sensitive() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());
    session
        .signup("alice", "alice@x.com", "secret1")
        .expect("Signup failed");
    session.logout().expect("Logout failed");

    assert!(matches!(
        session.login("Alice", "secret1"),
        Err(FinderError::InvalidCredentials)
    ));
    assert!(matches!(
        session.login("alice", "Secret1"),
        Err(FinderError::InvalidCredentials)
    ));
    assert!(matches!(
        session.login("nobody", "secret1"),
        Err(FinderError::InvalidCredentials)
    ));
    assert!(!session.is_authenticated());
}

#[test]
fn test_logout_clears_session_but_keeps_accounts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());
    session
        .signup("alice", "alice@x.com", "secret1")
        .expect("Signup failed");

    session.logout().expect("Logout failed");

    assert!(!session.is_authenticated());
    assert!(session.store().load_session().is_none());
    assert_eq!(session.store().list_accounts().len(), 1);
}

#[test]
fn test_session_survives_restart() {
    let dir = tempdir().expect("Failed to create temp dir");

    {
        let mut session = manager(dir.path());
        session
            .signup("alice", "alice@x.com", "secret1")
            .expect("Signup failed");
    }

    // A new manager over the same directory hydrates the persisted session
    let session = manager(dir.path());
    assert!(session.is_authenticated());
    assert_eq!(session.current_user().unwrap().username, "alice");
}

#[test]
fn test_favorites_add_remove_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());
    session
        .signup("alice", "alice@x.com", "secret1")
        .expect("Signup failed");

    let before = session.favorites().to_vec();

    session.add_to_favorites("octocat").expect("Add failed");
    assert!(session.is_favorite("octocat"));
    assert_eq!(session.favorites(), ["octocat".to_string()]);

    // Duplicate add is a no-op
    session.add_to_favorites("octocat").expect("Second add failed");
    assert_eq!(session.favorites().len(), 1);

    session
        .remove_from_favorites("octocat")
        .expect("Remove failed");
    assert!(!session.is_favorite("octocat"));
    assert_eq!(session.favorites(), before.as_slice());
}

#[test]
fn test_favorites_noop_without_session() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());

    session.add_to_favorites("octocat").expect("Add failed");
    assert!(!session.is_favorite("octocat"));
    assert!(session.favorites().is_empty());
    assert!(session.store().load_session().is_none());
}

// The full lifecycle: signup, favorite, logout, login, favorites restored.
#[test]
fn test_favorites_mirror_into_account_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = manager(dir.path());

    session
        .signup("alice", "alice@x.com", "secret1")
        .expect("Signup failed");
    assert!(session.favorites().is_empty());

    session.add_to_favorites("octocat").expect("Add failed");
    assert_eq!(session.favorites(), ["octocat".to_string()]);

    // Both copies are written: the session record and the account record
    let accounts = session.store().list_accounts();
    assert_eq!(accounts[0].favorites, ["octocat".to_string()]);
    let persisted = session.store().load_session().expect("Session missing");
    assert_eq!(persisted.favorites, ["octocat".to_string()]);

    session.logout().expect("Logout failed");
    assert!(session.store().load_session().is_none());
    assert_eq!(
        session.store().list_accounts()[0].favorites,
        ["octocat".to_string()]
    );

    let user = session.login("alice@x.com", "secret1").expect("Login failed");
    assert_eq!(user.favorites, ["octocat".to_string()]);
    assert!(session.is_favorite("octocat"));
}
