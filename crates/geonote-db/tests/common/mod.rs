//! Store-agnostic checks shared by the in-memory and PostGIS test suites.
//!
//! Every function takes a fresh, empty repository.

#![allow(dead_code)]

use std::collections::BTreeSet;

use futures::future::join_all;
use geonote_core::{NearbyQuery, Note, NoteRepository};

/// Note A of the worked example: owned by user 1.
pub const POINT_A: (f64, f64) = (37.0, -122.0);
/// Note B of the worked example: owned by user 2, about 14 m from A.
pub const POINT_B: (f64, f64) = (37.0001, -122.0001);

pub async fn insert<R: NoteRepository>(
    repo: &R,
    user_id: i64,
    (latitude, longitude): (f64, f64),
    text: &str,
) -> Note {
    let mut note = Note::new(user_id, latitude, longitude, text);
    repo.insert(&mut note).await.expect("insert failed");
    note
}

pub fn ids(notes: &[Note]) -> BTreeSet<i64> {
    notes.iter().filter_map(|n| n.id).collect()
}

pub async fn insert_then_list_by_owner<R: NoteRepository>(repo: &R) {
    let inserted = insert(repo, 7, (51.507351, -0.127758), "Trafalgar pigeons").await;
    assert!(inserted.id.is_some());
    assert!(inserted.created_at.is_some());

    let mine = repo.list_by_user(7).await.unwrap();
    assert_eq!(mine.len(), 1);
    let listed = &mine[0];
    assert_eq!(listed.id, inserted.id);
    assert_eq!(listed.latitude, 51.507351);
    assert_eq!(listed.longitude, -0.127758);
    assert_eq!(listed.text, "Trafalgar pigeons");
    assert!(listed.created_at.is_some());
    assert!(listed.user_id.is_none(), "listing must not project the owner");
}

pub async fn list_by_owner_is_empty_for_unknown_user<R: NoteRepository>(repo: &R) {
    insert(repo, 1, POINT_A, "mine").await;
    assert!(repo.list_by_user(999).await.unwrap().is_empty());
}

pub async fn list_by_owner_only_returns_owned_notes<R: NoteRepository>(repo: &R) {
    let a = insert(repo, 1, POINT_A, "one").await;
    let b = insert(repo, 1, POINT_B, "two").await;
    insert(repo, 2, POINT_B, "someone else").await;

    let mine = repo.list_by_user(1).await.unwrap();
    assert_eq!(ids(&mine), ids(&[a, b]));
}

pub async fn list_all_cardinality<R: NoteRepository>(repo: &R) {
    let mut expected = BTreeSet::new();
    for (i, user_id) in [1, 2, 3, 1, 2].into_iter().enumerate() {
        let offset = i as f64 * 0.01;
        let note = insert(repo, user_id, (10.0 + offset, 20.0 - offset), "n").await;
        expected.insert(note.id.unwrap());
    }

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(ids(&all), expected);
    assert!(all.iter().all(|n| n.user_id.is_none()));
}

pub async fn nearby_example<R: NoteRepository>(repo: &R) {
    let a = insert(repo, 1, POINT_A, "note A").await;
    let b = insert(repo, 2, POINT_B, "note B").await;

    let query = NearbyQuery::new(POINT_A.0, POINT_A.1, 1000.0);
    let found = repo.find_nearby_for_user(1, &query).await.unwrap();

    assert_eq!(ids(&found), ids(&[b.clone()]));
    let found_b = &found[0];
    assert_eq!(found_b.user_id, Some(2), "nearby search projects the owner");
    assert_eq!(found_b.text, "note B");
    assert!(!ids(&found).contains(&a.id.unwrap()));
}

pub async fn exclusion_law<R: NoteRepository>(repo: &R) {
    let own = insert(repo, 5, POINT_A, "my own note").await;
    let own_id = own.id.unwrap();

    for radius_m in [0.0, 1.0, 1000.0, 50_000.0] {
        let query = NearbyQuery::new(POINT_A.0, POINT_A.1, radius_m);

        let excluded = repo.find_nearby_for_user(5, &query).await.unwrap();
        assert!(
            !ids(&excluded).contains(&own_id),
            "own note returned at radius {}",
            radius_m
        );

        let unfiltered = repo.find_nearby(&query).await.unwrap();
        assert!(
            ids(&unfiltered).contains(&own_id),
            "unfiltered search missed the note at radius {}",
            radius_m
        );
    }
}

pub async fn zero_radius_matches_only_the_center<R: NoteRepository>(repo: &R) {
    let at_center = insert(repo, 1, POINT_A, "center").await;
    insert(repo, 2, POINT_B, "14 m away").await;

    let found = repo
        .find_nearby(&NearbyQuery::new(POINT_A.0, POINT_A.1, 0.0))
        .await
        .unwrap();
    assert_eq!(ids(&found), ids(&[at_center]));
}

pub async fn far_notes_are_outside_the_radius<R: NoteRepository>(repo: &R) {
    // 0.02 degrees of latitude is roughly 2.2 km
    insert(repo, 2, (37.02, -122.0), "across town").await;
    let near = insert(repo, 2, POINT_B, "around the corner").await;

    let found = repo
        .find_nearby_for_user(1, &NearbyQuery::new(POINT_A.0, POINT_A.1, 1000.0))
        .await
        .unwrap();
    assert_eq!(ids(&found), ids(&[near]));
}

pub async fn radius_monotonicity<R: NoteRepository>(repo: &R) {
    let center = POINT_A;
    let offsets = [0.0, 0.00005, 0.0002, 0.001, 0.004, 0.01, 0.05];
    for (i, d) in offsets.iter().enumerate() {
        let user_id = (i % 3) as i64 + 1;
        insert(repo, user_id, (center.0 + d, center.1 - d), "ring").await;
    }

    let radii = [0.0, 5.0, 25.0, 150.0, 600.0, 1500.0, 8000.0, 1_000_000.0];
    let mut previous: Option<BTreeSet<i64>> = None;
    for radius_m in radii {
        let query = NearbyQuery::new(center.0, center.1, radius_m);
        let current = ids(&repo.find_nearby_for_user(1, &query).await.unwrap());
        if let Some(prev) = &previous {
            assert!(
                prev.is_subset(&current),
                "results at smaller radius are not a subset at {} m",
                radius_m
            );
        }
        previous = Some(current);
    }

    // the widest radius covers every note not owned by user 1
    let all_others = previous.unwrap();
    assert_eq!(all_others.len(), 4);
}

pub async fn concurrent_inserts_get_distinct_ids<R: NoteRepository>(repo: &R) {
    let futures = (0..20).map(|i| async move {
        let mut note = Note::new(i % 4, 40.0, -73.0, format!("note {}", i));
        repo.insert(&mut note).await.map(|_| note)
    });
    let notes: Vec<Note> = join_all(futures)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(ids(&notes).len(), 20);
    assert_eq!(repo.list_all().await.unwrap().len(), 20);
}
