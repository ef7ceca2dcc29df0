use std::sync::Arc;

use recipe_recommender::{AppSettings, AppState, LocalStorage, Recommender, RecommenderServer};
use serde_json::{json, Value};
use tempfile::TempDir;

const RECIPES_CSV: &str = "\
name,ingredients
Spaghetti Pomodoro,\"spaghetti, canned tomatoes, basil, garlic, olive oil\"
Penne Arrabbiata,\"penne, canned tomatoes, chili flakes, garlic, olive oil\"
Pesto Genovese,\"trofie, basil, pine nuts, parmesan, garlic, olive oil\"
Pancakes,\"flour, milk, eggs, sugar, butter\"
Chocolate Cake,\"flour, sugar, cocoa powder, eggs, butter\"
Banana Bread,\"bananas, flour, sugar, eggs, butter\"
";

async fn start_server(dir: &TempDir) -> String {
    std::fs::write(dir.path().join("recipes.csv"), RECIPES_CSV).unwrap();

    let settings = AppSettings {
        dataset_path: "recipes.csv".to_string(),
        port: 0,
        ..AppSettings::default()
    };

    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    let mut recommender =
        Recommender::from_storage(&storage, &settings.dataset_path, &settings.dataset_name)
            .await
            .unwrap();
    recommender
        .setup(&settings.index_field, &settings.content_field)
        .unwrap();
    assert_eq!(recommender.len(), 6);
    assert_eq!(recommender.name(), "recipes");

    let state = AppState::new(Arc::new(recommender), &settings);
    let server = RecommenderServer::bind(&settings, state).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    format!("http://{addr}")
}

#[tokio::test]
async fn test_end_to_end_recommendations() {
    let dir = TempDir::new().unwrap();
    let base = start_server(&dir).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/recommendations"))
        .query(&[("query", "Spaghetti Pomodoro")])
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let body: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(body.len(), 5);
    assert!(!body.contains(&json!("Spaghetti Pomodoro")));
    assert_eq!(body[0], json!("Penne Arrabbiata"));
}

#[tokio::test]
async fn test_end_to_end_run_script() {
    let dir = TempDir::new().unwrap();
    let base = start_server(&dir).await;

    let resp = reqwest::get(format!("{base}/run_script")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"result": "Replace this with your Python script output"})
    );
}

#[tokio::test]
async fn test_end_to_end_missing_query_is_server_error() {
    let dir = TempDir::new().unwrap();
    let base = start_server(&dir).await;

    let resp = reqwest::get(format!("{base}/recommendations")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Query is empty");
}

#[tokio::test]
async fn test_missing_dataset_fails_at_startup() {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

    let err = Recommender::from_storage(&storage, "missing.csv", "recipes")
        .await
        .unwrap_err();
    assert!(matches!(err, recipe_recommender::RecommenderError::IoError(_)));
}
