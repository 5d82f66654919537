use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use cookbook_api::{ApiConfig, AppState, AppStateInner, RateLimitConfig, router};
use cookbook_db::{MemoryRecipeRepository, MemoryUserRepository, Repository, UserRepository};

struct TestApp {
    app: Router,
    users: Arc<MemoryUserRepository>,
    recipes: Arc<MemoryRecipeRepository>,
}

const GENEROUS: RateLimitConfig = RateLimitConfig {
    refill_per_second: 1.0,
    burst: 10_000,
};

fn test_app(config: ApiConfig, rate_limit: RateLimitConfig) -> TestApp {
    let users = Arc::new(MemoryUserRepository::new());
    let recipes = Arc::new(MemoryRecipeRepository::new());
    let state: AppState = Arc::new(AppStateInner::new(
        users.clone(),
        recipes.clone(),
        rate_limit,
        config,
    ));
    TestApp {
        app: router(state),
        users,
        recipes,
    }
}

fn default_app() -> TestApp {
    test_app(ApiConfig::default(), GENEROUS)
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send_json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, String) {
        self.send(method, uri, Some(&body.to_string())).await
    }

    async fn register(&self, username: &str, password: &str) {
        let (status, _) = self
            .send_json(
                Method::POST,
                "/api/register",
                json!({ "username": username, "email": format!("{username}@example.com"), "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn create_recipe(&self, title: &str, category: &str) {
        let (status, _) = self
            .send_json(
                Method::POST,
                "/api/recipes",
                json!({
                    "title": title,
                    "category": category,
                    "recipeText": "Mix and bake.",
                    "publisherUsername": "alice",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn envelope(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

// -- Users --

#[tokio::test]
async fn register_then_get_user() {
    let t = default_app();

    let (status, body) = t
        .send_json(
            Method::POST,
            "/api/register",
            json!({ "username": "alice", "email": "alice@example.com", "password": "pw123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        envelope(&body),
        json!({ "status": "success", "message": "New user successfully registered alice" })
    );

    let (status, body) = t.send(Method::GET, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope(&body), json!({ "status": "success", "message": "alice" }));

    let stored = t.users.get_by_id(1).unwrap();
    assert_eq!(stored.email, "alice@example.com");
    assert_eq!(stored.password, "pw123");
}

#[tokio::test]
async fn list_users_hides_passwords() {
    let t = default_app();
    t.register("alice", "pw123").await;
    t.register("bob", "hunter2").await;

    let (status, body) = t.send(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let users: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], 1);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["email"], "bob@example.com");
    assert!(users[0].get("password").is_none());
    assert!(users[0].get("createdAt").is_some());
}

#[tokio::test]
async fn register_rejects_bad_bodies() {
    let t = default_app();

    let (status, body) = t.send(Method::POST, "/api/register", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid request body");

    let (status, body) = t
        .send_json(Method::POST, "/api/register", json!({ "username": "alice" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid JSON message");

    assert!(t.users.get_all().unwrap().is_empty());
}

#[tokio::test]
async fn register_literal_field_check_only_rejects_all_empty() {
    let t = test_app(
        ApiConfig {
            require_all_fields: false,
            ..ApiConfig::default()
        },
        GENEROUS,
    );

    let (status, _) = t
        .send_json(Method::POST, "/api/register", json!({ "username": "alice" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t.send_json(Method::POST, "/api/register", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid JSON message");
}

#[tokio::test]
async fn missing_user_is_404_by_default() {
    let t = default_app();

    let (status, body) = t.send(Method::GET, "/api/users/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "record not found");
}

#[tokio::test]
async fn missing_user_is_500_in_literal_mode() {
    let t = test_app(
        ApiConfig {
            not_found_as_500: true,
            ..ApiConfig::default()
        },
        GENEROUS,
    );

    let (status, body) = t.send(Method::GET, "/api/users/42", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "record not found");
}

#[tokio::test]
async fn oversized_id_is_a_bad_request() {
    let t = default_app();

    let (status, body) = t
        .send(Method::GET, "/api/users/99999999999999999999999", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid user ID");
}

#[tokio::test]
async fn update_user_renames() {
    let t = default_app();
    t.register("alice", "pw123").await;

    let (status, body) = t
        .send_json(Method::PUT, "/api/users/1", json!({ "newName": "alicia" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope(&body)["message"], "User successfully updated");
    assert_eq!(t.users.get_by_id(1).unwrap().username, "alicia");

    let (status, body) = t.send(Method::PUT, "/api/users/1", Some("[")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid request body");
}

#[tokio::test]
async fn update_missing_user_creates_nothing() {
    let t = default_app();

    let (status, _) = t
        .send_json(Method::PUT, "/api/users/7", json!({ "newName": "ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(t.users.get_all().unwrap().is_empty());
}

#[tokio::test]
async fn delete_user_is_idempotent() {
    let t = default_app();
    t.register("alice", "pw123").await;

    for _ in 0..2 {
        let (status, body) = t.send(Method::DELETE, "/api/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(envelope(&body)["message"], "User successfully deleted");
    }

    let (status, _) = t.send(Method::GET, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Login --

#[tokio::test]
async fn login_with_matching_credentials() {
    let t = default_app();
    t.register("alice", "pw123").await;

    let (status, body) = t
        .send_json(
            Method::POST,
            "/api/login",
            json!({ "username": "alice", "password": "pw123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        envelope(&body),
        json!({ "status": "success", "message": "You successfully logged in alice" })
    );
}

#[tokio::test]
async fn login_mismatch_is_200_with_empty_message_by_default() {
    let t = default_app();
    t.register("alice", "pw123").await;

    let (status, body) = t
        .send_json(
            Method::POST,
            "/api/login",
            json!({ "username": "alice", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope(&body), json!({ "status": "success", "message": "" }));
}

#[tokio::test]
async fn login_mismatch_is_401_in_strict_mode() {
    let t = test_app(
        ApiConfig {
            login_mismatch_unauthorized: true,
            ..ApiConfig::default()
        },
        GENEROUS,
    );
    t.register("alice", "pw123").await;

    let (status, body) = t
        .send_json(
            Method::POST,
            "/api/login",
            json!({ "username": "alice", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "Invalid username or password");

    let (status, _) = t
        .send_json(
            Method::POST,
            "/api/login",
            json!({ "username": "alice", "password": "pw123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_only_accepts_post() {
    let t = default_app();

    let (status, body) = t.send(Method::GET, "/api/login", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, "Method not allowed");

    let (status, body) = t.send(Method::POST, "/api/login", Some("nope")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid JSON format");
}

// -- Recipes --

#[tokio::test]
async fn create_then_get_recipe() {
    let t = default_app();

    let (status, body) = t
        .send_json(
            Method::POST,
            "/api/recipes",
            json!({
                "title": "Cheesecake",
                "category": "cake",
                "recipeText": "Bake slowly.",
                "publisherUsername": "alice",
                "publishedDate": "2024-03-01T12:00:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope(&body)["message"], "Recipe successfully created");

    let (status, body) = t.send(Method::GET, "/api/recipes/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope(&body), json!({ "status": "success", "message": "Cheesecake" }));

    let (_, body) = t.send(Method::GET, "/api/recipes", None).await;
    let recipes: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(recipes[0]["recipeText"], "Bake slowly.");
    assert_eq!(recipes[0]["publisherUsername"], "alice");
    assert_eq!(recipes[0]["publishedDate"], "2024-03-01T12:00:00Z");
}

#[tokio::test]
async fn create_recipe_requires_text_fields() {
    let t = default_app();

    let (status, body) = t
        .send_json(
            Method::POST,
            "/api/recipes",
            json!({ "title": "Pie", "category": "pie", "recipeText": "", "publisherUsername": "bob" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing required fields");
    let (status, _) = t.send(Method::GET, "/api/recipes/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete_recipe() {
    let t = default_app();
    t.create_recipe("Pie", "pie").await;

    let (status, body) = t
        .send_json(Method::PUT, "/api/recipes/1", json!({ "newTitle": "Apple pie" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope(&body)["message"], "Recipe title successfully updated");

    let (_, body) = t.send(Method::GET, "/api/recipes/1", None).await;
    assert_eq!(envelope(&body)["message"], "Apple pie");

    let (status, body) = t.send(Method::DELETE, "/api/recipes/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope(&body)["message"], "Recipe successfully deleted");

    let (status, _) = t
        .send_json(Method::PUT, "/api/recipes/1", json!({ "newTitle": "Zombie pie" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_recipes_filters_by_category() {
    let t = default_app();
    t.create_recipe("Sponge", "cake").await;
    t.create_recipe("Sourdough", "bread").await;
    t.create_recipe("Cupcake", "cupcakes").await;

    let (status, body) = t.send(Method::GET, "/api/recipes?filter=cake", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<String> = serde_json::from_str::<Vec<Value>>(&body)
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Sponge", "Cupcake"]);
}

#[tokio::test]
async fn list_recipes_uses_the_first_repeated_filter() {
    let t = default_app();
    t.create_recipe("Sponge", "cake").await;
    t.create_recipe("Apple", "pie").await;

    let (status, body) = t
        .send(Method::GET, "/api/recipes?filter=cake&filter=pie", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let recipes: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["title"], "Sponge");
}

#[tokio::test]
async fn create_recipe_accepts_large_text() {
    let t = test_app(
        ApiConfig::default(),
        RateLimitConfig {
            refill_per_second: 0.0,
            burst: 2,
        },
    );
    let text = "a".repeat(3 * 1024 * 1024);

    let (status, _) = t
        .send_json(
            Method::POST,
            "/api/recipes",
            json!({
                "title": "Long loaf",
                "category": "bread",
                "recipeText": text,
                "publisherUsername": "alice",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t.send(Method::GET, "/api/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    let recipes: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["recipeText"].as_str().unwrap().len(), text.len());

    // Both requests above spent the bucket.
    let (status, _) = t.send(Method::GET, "/api/recipes", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn list_recipes_paginates_by_twelve() {
    let t = default_app();
    for i in 1..=25 {
        t.create_recipe(&format!("Recipe {i:02}"), "bread").await;
    }

    let titles = |body: &str| -> Vec<String> {
        serde_json::from_str::<Vec<Value>>(body)
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, body) = t.send(Method::GET, "/api/recipes?page=2", None).await;
    let expected: Vec<String> = (13..=24).map(|i| format!("Recipe {i:02}")).collect();
    assert_eq!(titles(&body), expected);

    let (_, body) = t.send(Method::GET, "/api/recipes?page=abc", None).await;
    assert_eq!(titles(&body).first().map(String::as_str), Some("Recipe 01"));

    let (status, body) = t.send(Method::GET, "/api/recipes?page=99", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.trim(), "[]");
}

#[tokio::test]
async fn list_recipes_sorts_and_rejects_bad_sort() {
    let t = default_app();
    t.create_recipe("Banana bread", "bread").await;
    t.create_recipe("Apple pie", "pie").await;

    let (status, body) = t
        .send(Method::GET, "/api/recipes?sort=title%20asc", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let recipes: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(recipes[0]["title"], "Apple pie");

    let (status, body) = t
        .send(Method::GET, "/api/recipes?sort=title%3B%20DROP%20TABLE%20recipes", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Invalid sort expression"));
    assert_eq!(t.recipes.get_by_id(1).unwrap().title, "Banana bread");
}

// -- Routing and rate limiting --

#[tokio::test]
async fn unmatched_paths_get_the_not_found_page() {
    let page = std::env::temp_dir().join(format!("cookbook-404-{}.html", std::process::id()));
    std::fs::write(&page, "<h1>Lost?</h1>").unwrap();

    let t = test_app(
        ApiConfig {
            not_found_page: Some(page.clone()),
            ..ApiConfig::default()
        },
        GENEROUS,
    );

    let (status, body) = t.send(Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "<h1>Lost?</h1>");

    let (status, body) = t.send(Method::GET, "/api/recipes/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "<h1>Lost?</h1>");

    std::fs::remove_file(&page).ok();
}

#[tokio::test]
async fn not_found_page_falls_back_to_text() {
    let t = default_app();

    let (status, body) = t.send(Method::GET, "/api/users/12ab", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "404 page not found");
}

#[tokio::test]
async fn unsupported_method_on_known_path() {
    let t = default_app();

    let (status, _) = t.send(Method::POST, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn rate_limit_rejects_without_side_effects() {
    let t = test_app(
        ApiConfig::default(),
        RateLimitConfig {
            refill_per_second: 0.001,
            burst: 3,
        },
    );

    for name in ["a", "b", "c"] {
        t.register(name, "pw").await;
    }

    let (status, body) = t
        .send_json(
            Method::POST,
            "/api/register",
            json!({ "username": "d", "email": "d@example.com", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, "Rate limit exceeded");
    assert_eq!(t.users.get_all().unwrap().len(), 3);

    let (status, _) = t.send(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn unmatched_ids_do_not_consume_tokens() {
    let t = test_app(
        ApiConfig::default(),
        RateLimitConfig {
            refill_per_second: 0.001,
            burst: 1,
        },
    );

    for _ in 0..5 {
        let (status, _) = t.send(Method::GET, "/api/users/not-a-number", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (status, _) = t.send(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
}
