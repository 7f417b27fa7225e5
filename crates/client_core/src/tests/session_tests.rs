use super::*;

#[tokio::test]
async fn new_session_starts_unauthenticated_even_with_persisted_token() {
    let store = Arc::new(MemoryTokenStore::with_token("persisted"));
    let session = SessionStore::new(store);

    assert!(!session.is_authenticated());
    assert!(!*session.subscribe().borrow());
}

#[tokio::test]
async fn restore_reconciles_flag_with_persisted_token() {
    let session = SessionStore::restore(Arc::new(MemoryTokenStore::with_token("persisted")))
        .await
        .expect("restore");
    assert!(session.is_authenticated());

    let session = SessionStore::restore(Arc::new(MemoryTokenStore::default()))
        .await
        .expect("restore");
    assert!(!session.is_authenticated());

    let session = SessionStore::restore(Arc::new(MemoryTokenStore::with_token("  ")))
        .await
        .expect("restore");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn persist_and_clear_drive_the_observable_flag() {
    let store = Arc::new(MemoryTokenStore::default());
    let session = SessionStore::new(store.clone());
    let mut rx = session.subscribe();

    session.persist_token("tok123").await.expect("persist");
    rx.changed().await.expect("flag change");
    assert!(*rx.borrow_and_update());
    assert_eq!(store.load().await.expect("load"), Some("tok123".to_string()));

    session.clear_session().await.expect("clear");
    rx.changed().await.expect("flag change");
    assert!(!*rx.borrow_and_update());
    assert_eq!(store.load().await.expect("load"), None);
}

#[tokio::test]
async fn authenticated_capability_requires_a_stored_token() {
    let session = SessionStore::new(Arc::new(MemoryTokenStore::default()));
    assert!(matches!(
        session.authenticated().await,
        Err(ClientError::NotAuthenticated)
    ));

    session.persist_token("tok123").await.expect("persist");
    let authenticated = session.authenticated().await.expect("capability");
    assert_eq!(authenticated.token().expose(), "tok123");
    assert_eq!(
        format!("{:?}", authenticated.token()),
        "BearerToken(<redacted>)"
    );
}

#[tokio::test]
async fn file_store_round_trips_and_clears_wholesale() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");
    let store = FileTokenStore::new(&path);

    assert_eq!(store.load().await.expect("load empty"), None);

    store.save("tok123").await.expect("save");
    assert!(path.exists());
    assert_eq!(store.load().await.expect("load"), Some("tok123".to_string()));

    store.clear().await.expect("clear");
    assert!(!path.exists());
    store.clear().await.expect("clear is idempotent");
}

#[tokio::test]
async fn file_store_reports_corrupt_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").expect("write");

    let err = FileTokenStore::new(&path)
        .load()
        .await
        .expect_err("corrupt file");
    assert!(matches!(err, TokenStoreError::Corrupt { .. }));
}

#[tokio::test]
async fn session_survives_a_restart_through_the_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");

    let first = SessionStore::new(Arc::new(FileTokenStore::new(&path)));
    first.persist_token("tok123").await.expect("persist");

    let second = SessionStore::restore(Arc::new(FileTokenStore::new(&path)))
        .await
        .expect("restore");
    assert!(second.is_authenticated());
    assert_eq!(
        second
            .authenticated()
            .await
            .expect("capability")
            .token()
            .expose(),
        "tok123"
    );
}

#[tokio::test]
async fn corrupt_session_file_counts_as_signed_out_and_can_be_replaced() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "garbage").expect("write");

    let session = SessionStore::restore(Arc::new(FileTokenStore::new(&path)))
        .await
        .expect("restore tolerates a corrupt file");
    assert!(!session.is_authenticated());
    assert!(matches!(
        session.authenticated().await,
        Err(ClientError::NotAuthenticated)
    ));

    session.persist_token("tok123").await.expect("overwrite");
    assert_eq!(
        session
            .authenticated()
            .await
            .expect("capability")
            .token()
            .expose(),
        "tok123"
    );

    std::fs::write(&path, "garbage").expect("write");
    session.clear_session().await.expect("clear");
    assert!(!path.exists());
}
