use super::*;
use crate::test_support::{http_500, user, FakeBlogApi};
use shared::error::ErrorCode;

fn authors() -> Vec<User> {
    vec![
        user("Alice Martin", "alice@travel.io", &[1, 2, 3, 4, 5, 6]),
        user("Bob Stone", "bob@roam.net", &[7]),
        user("Carla Diaz", "carla@travel.io", &[]),
    ]
}

#[test]
fn filter_matches_name_or_email() {
    let users = authors();

    let by_name = filter_authors(&users, &SearchTerm::new("bob"));
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Bob Stone");

    let by_email = filter_authors(&users, &SearchTerm::new("TRAVEL.IO"));
    assert_eq!(
        by_email.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
        ["Alice Martin", "Carla Diaz"]
    );

    assert!(filter_authors(&users, &SearchTerm::new("zzz")).is_empty());
}

#[test]
fn recent_posts_reports_hidden_count() {
    let users = authors();
    let (shown, hidden) = recent_posts(&users[0], RECENT_POSTS_SHOWN);
    assert_eq!(shown.len(), 4);
    assert_eq!(hidden, 2);

    let (shown, hidden) = recent_posts(&users[2], RECENT_POSTS_SHOWN);
    assert!(shown.is_empty());
    assert_eq!(hidden, 0);
}

#[tokio::test]
async fn load_returns_users_in_fetch_order() {
    let aggregator = AuthorListAggregator::new(FakeBlogApi::new(Vec::new(), authors()).shared());
    let users = aggregator.load().await.expect("load");
    assert_eq!(users[0].name, "Alice Martin");
    assert_eq!(users[0].post_count(), 6);
}

#[tokio::test]
async fn failure_collapses_into_authors_message() {
    let api = FakeBlogApi::new(Vec::new(), authors()).failing_users(http_500("/api/users"));
    let aggregator = AuthorListAggregator::new(api.shared());

    let state = aggregator.load_view().await;
    let err = state.error().expect("failed state");
    assert_eq!(err.code, ErrorCode::Http);
    assert_eq!(err.message, "Failed to load authors. Please try again later.");
}
