//! Playback director integration tests

mod common;

use common::{next_started, track, RecordingSink, REQUESTER};
use jukebox_core::RoomId;
use jukebox_playback::{PlaybackConfig, PlaybackDirector};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_concurrent_lookups_share_one_room() {
    let director = Arc::new(PlaybackDirector::default());
    let room_id = RoomId::new(10);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let director = Arc::clone(&director);
            tokio::spawn(async move { director.get_or_create(room_id).await })
        })
        .collect();

    let mut rooms = Vec::new();
    for handle in handles {
        rooms.push(handle.await.unwrap());
    }

    assert!(rooms.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(director.room_count().await, 1);
    director.shutdown_all().await;
}

#[tokio::test]
async fn test_rooms_are_independent() {
    let director = PlaybackDirector::default();
    let first = director.get_or_create(RoomId::new(1)).await;
    let second = director.get_or_create(RoomId::new(2)).await;

    assert!(!Arc::ptr_eq(&first, &second));
    first.set_volume(10);
    assert_eq!(second.volume(), 50);
    assert_eq!(director.room_count().await, 2);
    director.shutdown_all().await;
}

#[tokio::test]
async fn test_remove_stops_room_and_releases_sink() {
    let director = PlaybackDirector::default();
    let room_id = RoomId::new(3);
    let room = director.get_or_create(room_id).await;
    let sink = RecordingSink::new();
    room.connect(sink.clone()).await.unwrap();

    let mut events = room.subscribe();
    room.enqueue(track("a", REQUESTER)).unwrap();
    next_started(&mut events).await;

    assert!(director.remove(room_id).await);
    assert!(room.is_stopped());
    assert_eq!(sink.disconnect_count(), 1);
    assert!(director.get(room_id).await.is_none());
    assert!(!director.remove(room_id).await);

    let fresh = director.get_or_create(room_id).await;
    assert!(!Arc::ptr_eq(&room, &fresh));
    assert!(fresh.current().is_none());
    director.shutdown_all().await;
}

#[tokio::test(start_paused = true)]
async fn test_idle_room_is_replaced_on_next_lookup() {
    let director = PlaybackDirector::new(PlaybackConfig {
        idle_timeout_secs: 30,
        ..PlaybackConfig::default()
    });
    let room_id = RoomId::new(4);
    let idle = director.get_or_create(room_id).await;

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(idle.is_stopped());
    assert!(director.get(room_id).await.is_none());
    assert_eq!(director.room_count().await, 0);

    let replacement = director.get_or_create(room_id).await;
    assert!(!Arc::ptr_eq(&idle, &replacement));
    assert!(!replacement.is_stopped());
    director.shutdown_all().await;
}

#[tokio::test]
async fn test_shutdown_all_stops_every_room() {
    let director = PlaybackDirector::default();
    let rooms = vec![
        director.get_or_create(RoomId::new(1)).await,
        director.get_or_create(RoomId::new(2)).await,
        director.get_or_create(RoomId::new(3)).await,
    ];

    director.shutdown_all().await;

    assert!(rooms.iter().all(|room| room.is_stopped()));
    assert_eq!(director.room_count().await, 0);
}
