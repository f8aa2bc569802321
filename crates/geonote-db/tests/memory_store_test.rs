//! Note store behavior checked against the in-memory repository.
//!
//! The same checks run against PostGIS in `postgis_notes_test.rs`.

mod common;

use geonote_core::{validate_note, Error, NearbyQuery, Note, NoteRepository, Validator};
use geonote_db::InMemoryNoteRepository;

#[tokio::test]
async fn test_insert_then_list_by_owner() {
    common::insert_then_list_by_owner(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_list_by_owner_empty_for_unknown_user() {
    common::list_by_owner_is_empty_for_unknown_user(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_list_by_owner_only_returns_owned_notes() {
    common::list_by_owner_only_returns_owned_notes(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_list_all_cardinality() {
    common::list_all_cardinality(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_nearby_example_returns_other_users_note_only() {
    common::nearby_example(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_exclusion_law() {
    common::exclusion_law(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_zero_radius_matches_only_the_center() {
    common::zero_radius_matches_only_the_center(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_far_notes_are_outside_the_radius() {
    common::far_notes_are_outside_the_radius(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_radius_monotonicity() {
    common::radius_monotonicity(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_concurrent_inserts_get_distinct_ids() {
    common::concurrent_inserts_get_distinct_ids(&InMemoryNoteRepository::new()).await;
}

#[tokio::test]
async fn test_invalid_query_is_client_error() {
    let repo = InMemoryNoteRepository::new();
    let err = repo
        .find_nearby(&NearbyQuery::new(0.0, 0.0, -5.0))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_validate_then_insert_flow() {
    let repo = InMemoryNoteRepository::new();

    let mut rejected = Note::new(1, 95.0, 10.0, "");
    let mut v = Validator::new();
    validate_note(&mut v, &rejected);
    let err = v.into_result().unwrap_err();
    match &err {
        Error::Validation(errors) => {
            assert!(errors.contains("text"));
            assert!(errors.contains("latitude"));
            assert!(!errors.contains("longitude"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert!(err.is_client_error());
    assert!(rejected.id.is_none());

    rejected.latitude = 45.0;
    rejected.text = "fixed".to_string();
    let mut v = Validator::new();
    validate_note(&mut v, &rejected);
    assert!(v.valid());

    repo.insert(&mut rejected).await.unwrap();
    assert!(rejected.is_persisted());
    assert_eq!(repo.len(), 1);
}

/// The trait is object safe, so callers can hold either store behind a `dyn`.
#[tokio::test]
async fn test_repository_as_trait_object() {
    let repo: Box<dyn NoteRepository> = Box::new(InMemoryNoteRepository::new());
    let mut note = Note::new(3, 1.5, 2.5, "boxed");
    repo.insert(&mut note).await.unwrap();
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}
