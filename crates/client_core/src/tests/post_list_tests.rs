use super::*;
use crate::test_support::{http_500, post, user, FakeBlogApi};
use shared::error::ErrorCode;

fn corpus() -> (Vec<Post>, Vec<User>) {
    (
        vec![
            post(1, "Autumn in Kyoto", "Maple leaves and temples"),
            post(2, "Lisbon on foot", "Trams, tiles and pastel de nata"),
            post(3, "Patagonia", "Wind, glaciers and long roads"),
        ],
        vec![
            user("Alice", "alice@example.com", &[1, 2]),
            user("Bob", "bob@example.com", &[]),
        ],
    )
}

fn authored(posts: Vec<Post>, users: &[User]) -> Vec<AuthoredPost> {
    attach_authors(posts, users)
}

#[test]
fn attaches_author_names_and_unknown_sentinel() {
    let (posts, users) = corpus();
    let posts = authored(posts, &users);
    assert_eq!(posts[0].author, "Alice");
    assert_eq!(posts[1].author, "Alice");
    assert_eq!(posts[2].author, UNKNOWN_AUTHOR);
}

#[test]
fn first_user_listing_a_post_keeps_it() {
    let users = vec![
        user("Alice", "a@example.com", &[7]),
        user("Bob", "b@example.com", &[7, 8]),
    ];
    let lookup = author_lookup(&users);
    assert_eq!(lookup.get(&PostId(7)), Some(&"Alice"));
    assert_eq!(lookup.get(&PostId(8)), Some(&"Bob"));
}

#[test]
fn filter_matches_title_desc_and_author_case_insensitively() {
    let (posts, users) = corpus();
    let posts = authored(posts, &users);

    let by_title = filter_posts(&posts, &SearchTerm::new("KYOTO"));
    assert_eq!(by_title.iter().map(|p| p.id()).collect::<Vec<_>>(), [PostId(1)]);

    let by_desc = filter_posts(&posts, &SearchTerm::new("glacier"));
    assert_eq!(by_desc.iter().map(|p| p.id()).collect::<Vec<_>>(), [PostId(3)]);

    let by_author = filter_posts(&posts, &SearchTerm::new("alice"));
    assert_eq!(
        by_author.iter().map(|p| p.id()).collect::<Vec<_>>(),
        [PostId(1), PostId(2)]
    );

    let unknown = filter_posts(&posts, &SearchTerm::new("unknown author"));
    assert_eq!(unknown.iter().map(|p| p.id()).collect::<Vec<_>>(), [PostId(3)]);
}

#[test]
fn filter_is_idempotent_and_keeps_source_untouched() {
    let (posts, users) = corpus();
    let posts = authored(posts, &users);
    let before = posts.clone();
    let term = SearchTerm::new("a");

    let once = filter_posts(&posts, &term);
    let twice = filter_posts(once.iter().copied(), &term);
    assert_eq!(once, twice);
    assert_eq!(posts, before);
}

#[test]
fn empty_term_keeps_every_post_in_order() {
    let (posts, users) = corpus();
    let posts = authored(posts, &users);
    let all = filter_posts(&posts, &SearchTerm::new(""));
    assert_eq!(all.len(), posts.len());
}

#[test]
fn non_matching_term_yields_no_featured_post() {
    let (posts, users) = corpus();
    let posts = authored(posts, &users);
    let filtered = filter_posts(&posts, &SearchTerm::new("zzz"));
    assert!(filtered.is_empty());

    let split = split_featured(&filtered);
    assert!(split.featured.is_none());
    assert!(split.rest.is_empty());
}

#[test]
fn split_featured_takes_first_filtered_item() {
    let (posts, users) = corpus();
    let posts = authored(posts, &users);
    let filtered = filter_posts(&posts, &SearchTerm::new("alice"));

    let split = split_featured(&filtered);
    assert_eq!(split.featured.map(|p| p.id()), Some(PostId(1)));
    assert_eq!(split.rest.iter().map(|p| p.id()).collect::<Vec<_>>(), [PostId(2)]);
}

#[test]
fn popular_authors_caps_at_limit() {
    let (posts, users) = corpus();
    let data = PostListData {
        posts: authored(posts, &users),
        users,
    };
    assert_eq!(data.popular_authors(1).len(), 1);
    assert_eq!(data.popular_authors(5).len(), 2);
}

#[tokio::test]
async fn load_joins_posts_with_authors() {
    let (posts, users) = corpus();
    let aggregator = PostListAggregator::new(FakeBlogApi::new(posts, users).shared());

    let data = aggregator.load().await.expect("load");
    assert_eq!(data.posts.len(), 3);
    assert_eq!(data.users.len(), 2);
    assert_eq!(data.posts[2].author, UNKNOWN_AUTHOR);
}

#[tokio::test]
async fn failed_posts_request_fails_the_whole_page() {
    let (posts, users) = corpus();
    let api = FakeBlogApi::new(posts, users).failing_posts(http_500("/api/posts"));
    let aggregator = PostListAggregator::new(api.shared());

    match aggregator.load_view().await {
        ViewState::Failed(err) => {
            assert_eq!(err.code, ErrorCode::Http);
            assert_eq!(err.message, "Failed to load posts. Please try again later.");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_users_request_fails_the_whole_page() {
    let (posts, users) = corpus();
    let api = FakeBlogApi::new(posts, users).failing_users(http_500("/api/users"));
    let aggregator = PostListAggregator::new(api.shared());

    let err = aggregator.load().await.expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::Http);
}

#[tokio::test]
async fn repeated_loads_refetch() {
    let (posts, users) = corpus();
    let api = FakeBlogApi::new(posts, users);
    let calls = Arc::clone(&api.calls);
    let aggregator = PostListAggregator::new(api.shared());

    let first = aggregator.load().await.expect("first");
    let second = aggregator.load().await.expect("second");
    assert_eq!(first, second);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 4);
}
