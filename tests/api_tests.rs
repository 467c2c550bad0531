use post_api::{
    AppConfig, AppState, create_router,
    models::{Post, PostPage},
    repository::{FileRepository, RepositoryState, SledRepository},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
}

fn temp_data_file() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("post-api-test-{}.json", Uuid::new_v4()))
}

async fn file_repo() -> RepositoryState {
    Arc::new(
        FileRepository::new(temp_data_file())
            .await
            .expect("Failed to open test data file"),
    )
}

fn sled_repo() -> RepositoryState {
    Arc::new(SledRepository::temporary().expect("Failed to open test sled db"))
}

async fn spawn_app(repo: RepositoryState) -> TestApp {
    let config = AppConfig::default();

    let state = AppState { repo, config };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

/// Logs in with the default test identity and returns the bearer token.
async fn login(client: &reqwest::Client, app: &TestApp) -> String {
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "test@example.com", "password": "password"
        }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().expect("token missing").to_string()
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app(file_repo().await).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app(file_repo().await).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "test@example.com", "password": "wrong"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials provided");
}

#[tokio::test]
async fn posts_require_a_token() {
    let app = spawn_app(file_repo().await).await;
    let client = reqwest::Client::new();

    // No Authorization header at all.
    let response = client
        .get(format!("{}/api/posts", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No token provided");

    // A token signed with a different secret.
    let response = client
        .get(format!("{}/api/posts", app.address))
        .header("Authorization", "Bearer not.a.real.token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn post_lifecycle_over_http() {
    // The full create/read/update/delete journey, run against both backends
    // through the same HTTP surface.
    for repo in [file_repo().await, sled_repo()] {
        let app = spawn_app(repo).await;
        let client = reqwest::Client::new();
        let token = login(&client, &app).await;

        // Create: status defaults to draft, timestamps start equal.
        let response = client
            .post(format!("{}/api/posts", app.address))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "title": "A", "content": "B" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let created: Post = response.json().await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.status, post_api::models::PostStatus::Draft);
        assert_eq!(created.created_at, created.updated_at);

        // Get returns the record create returned.
        let response = client
            .get(format!("{}/api/posts/{}", app.address, created.id))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let fetched: Post = response.json().await.unwrap();
        assert_eq!(fetched, created);

        // Update merges the patch and advances updatedAt only.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let response = client
            .put(format!("{}/api/posts/{}", app.address, created.id))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "title": "A2", "status": "published" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let updated: Post = response.json().await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.content, "B");
        assert_eq!(updated.status, post_api::models::PostStatus::Published);
        assert!(updated.updated_at > created.updated_at);

        // Delete confirms, and the record is gone afterwards.
        let response = client
            .delete(format!("{}/api/posts/{}", app.address, created.id))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Post deleted successfully");

        let response = client
            .get(format!("{}/api/posts/{}", app.address, created.id))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let app = spawn_app(file_repo().await).await;
    let client = reqwest::Client::new();
    let token = login(&client, &app).await;

    let response = client
        .post(format!("{}/api/posts", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "title": "", "content": "B" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "title must not be empty");
}

#[tokio::test]
async fn unknown_ids_are_404_everywhere() {
    let app = spawn_app(file_repo().await).await;
    let client = reqwest::Client::new();
    let token = login(&client, &app).await;

    let get = client
        .get(format!("{}/api/posts/missing", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(get.status(), 404);

    let put = client
        .put(format!("{}/api/posts/missing", app.address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), 404);

    let delete = client
        .delete(format!("{}/api/posts/missing", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), 404);
    let body: serde_json::Value = delete.json().await.unwrap();
    assert_eq!(body["message"], "Post not found");
}

#[tokio::test]
async fn pagination_splits_ten_posts_into_two_pages() {
    let app = spawn_app(file_repo().await).await;
    let client = reqwest::Client::new();
    let token = login(&client, &app).await;

    for i in 0..10 {
        let response = client
            .post(format!("{}/api/posts", app.address))
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "title": format!("Post {i}"), "content": "body"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    // Default limit is 6, so ten posts make two pages.
    let response = client
        .get(format!("{}/api/posts?limit=6&page=1", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let page: PostPage = response.json().await.unwrap();
    assert_eq!(page.posts.len(), 6);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.current_page, 1);

    let response = client
        .get(format!("{}/api/posts?limit=6&page=2", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let page: PostPage = response.json().await.unwrap();
    assert_eq!(page.posts.len(), 4);
    assert_eq!(page.current_page, 2);

    // Past the end: empty sequence, same envelope, not an error.
    let response = client
        .get(format!("{}/api/posts?limit=6&page=3", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let page: PostPage = response.json().await.unwrap();
    assert!(page.posts.is_empty());
    assert_eq!(page.total_pages, 2);

    // Absent parameters fall back to page 1 / limit 6.
    let response = client
        .get(format!("{}/api/posts", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let page: PostPage = response.json().await.unwrap();
    assert_eq!(page.posts.len(), 6);
    assert_eq!(page.current_page, 1);
}
