use event_stars::api::mock::MockEventApi;
use event_stars::models::{Band, Event, Member};
use event_stars::view_model::EventsViewModel;
use std::sync::Arc;

fn event_with_members(id: i64, title: &str, members: &[&str]) -> Event {
    let mut ev = Event::new(id, title);
    ev.nb_stars = Some(3);
    ev.bands.push(Band {
        name: Some(format!("{} band", title)),
        members: members.iter().map(|m| Member { name: Some(m.to_string()) }).collect(),
    });
    ev
}

fn setup() -> (Arc<MockEventApi>, EventsViewModel) {
    let api = Arc::new(MockEventApi::new(vec![
        event_with_members(1, "GrasPop Metal Meeting", &["Queen Anika Walsh"]),
        event_with_members(2, "Hellfest", &["John Doe"]),
        event_with_members(3, "Motocultor", &["Kelsey Gibbs", "Anika Walsh II"]),
    ]));
    let vm = EventsViewModel::new(api.clone());
    (api, vm)
}

fn ids(vm: &EventsViewModel) -> Vec<i64> {
    vm.events().iter().map(|e| e.id).collect()
}

#[tokio::test]
async fn activate_loads_every_event() {
    let (_api, mut vm) = setup();
    assert!(vm.events().is_empty());
    let loaded = vm.activate().await.unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(ids(&vm), vec![1, 2, 3]);
}

#[tokio::test]
async fn search_replaces_list_with_matches() {
    let (_api, mut vm) = setup();
    vm.activate().await.unwrap();
    vm.set_search_query("  wal ");
    assert!(vm.search().await.unwrap());
    assert_eq!(ids(&vm), vec![1, 3]);
    // the query itself is kept as typed
    assert_eq!(vm.search_query(), "  wal ");
}

#[tokio::test]
async fn blank_search_is_a_no_op() {
    let (_api, mut vm) = setup();
    vm.activate().await.unwrap();
    vm.set_search_query("   ");
    assert!(!vm.search().await.unwrap());
    assert_eq!(ids(&vm), vec![1, 2, 3]);
}

#[tokio::test]
async fn failed_search_keeps_current_list() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    api.set_failing(true).await;
    vm.set_search_query("walsh");
    assert!(vm.search().await.is_err());
    assert_eq!(ids(&vm), vec![1, 2, 3]);
}

#[tokio::test]
async fn show_all_clears_query_and_reloads() {
    let (_api, mut vm) = setup();
    vm.activate().await.unwrap();
    vm.set_search_query("doe");
    vm.search().await.unwrap();
    assert_eq!(ids(&vm), vec![2]);

    vm.show_all().await.unwrap();
    assert_eq!(vm.search_query(), "");
    assert_eq!(ids(&vm), vec![1, 2, 3]);
}

#[tokio::test]
async fn delete_removes_event_locally_and_remotely() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    vm.delete_event(2).await.unwrap();
    assert_eq!(ids(&vm), vec![1, 3]);
    assert_eq!(api.stored().await.len(), 2);
}

#[tokio::test]
async fn delete_of_unlisted_event_leaves_list_alone() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    vm.set_search_query("doe");
    vm.search().await.unwrap();

    vm.delete_event(3).await.unwrap();
    assert_eq!(ids(&vm), vec![2]);
    assert_eq!(api.stored().await.len(), 2);
}

#[tokio::test]
async fn failed_delete_keeps_event() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    api.set_failing(true).await;
    assert!(vm.delete_event(1).await.is_err());
    assert_eq!(ids(&vm), vec![1, 2, 3]);
}

#[tokio::test]
async fn update_stars_changes_list_and_backend() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    vm.update_stars(1, 5).await.unwrap();
    assert_eq!(vm.find(1).unwrap().nb_stars, Some(5));
    let stored = api.stored().await;
    assert_eq!(stored.iter().find(|e| e.id == 1).unwrap().nb_stars, Some(5));
    // the title is never touched by an update
    assert_eq!(stored[0].title.as_deref(), Some("GrasPop Metal Meeting"));
}

#[tokio::test]
async fn update_stars_validates_range_before_calling_backend() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    assert!(vm.update_stars(1, 6).await.is_err());
    assert_eq!(vm.find(1).unwrap().nb_stars, Some(3));
    assert_eq!(api.stored().await[0].nb_stars, Some(3));
}

#[tokio::test]
async fn failed_update_restores_previous_rating() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    api.set_failing(true).await;
    assert!(vm.update_stars(2, 1).await.is_err());
    assert_eq!(vm.find(2).unwrap().nb_stars, Some(3));
}

#[tokio::test]
async fn update_of_unlisted_event_is_an_error() {
    let (_api, mut vm) = setup();
    assert!(vm.update_stars(1, 2).await.is_err());
}

#[tokio::test]
async fn update_comment_round_trips_through_backend() {
    let (api, mut vm) = setup();
    vm.activate().await.unwrap();
    vm.update_comment(3, "Excellent event!").await.unwrap();
    assert_eq!(vm.find(3).unwrap().comment.as_deref(), Some("Excellent event!"));
    let stored = api.stored().await;
    assert_eq!(stored[2].comment.as_deref(), Some("Excellent event!"));
    assert_eq!(stored[2].nb_stars, Some(3));

    api.set_failing(true).await;
    assert!(vm.update_comment(3, "changed").await.is_err());
    assert_eq!(vm.find(3).unwrap().comment.as_deref(), Some("Excellent event!"));
}
