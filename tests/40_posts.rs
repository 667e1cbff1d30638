mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use serde_json::json;

use common::{TestApp, ALICE, BOB};

async fn create_post(app: &TestApp, title: &str, author: i64) -> Result<i64> {
    let token = TestApp::token(author);
    let res = app
        .post_json("/posts", Some(&token), json!({ "title": title, "content": "Some words", "author_id": author }))
        .await?;
    anyhow::ensure!(res.status == StatusCode::CREATED, "create failed: {} {}", res.status, res.body);
    Ok(res.body["id"].as_i64().unwrap_or_default())
}

#[tokio::test]
async fn author_creates_and_reads_post() -> Result<()> {
    let app = TestApp::new().await?;
    let token = TestApp::token(BOB);

    let res = app
        .post_json("/posts", Some(&token), json!({ "title": " First ", "content": " <em>hi</em> ", "author_id": BOB }))
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["id"].as_i64().unwrap();
    assert_eq!(res.headers[header::LOCATION], format!("/posts/{id}").as_str());
    assert_eq!(res.body["title"], "First");
    assert_eq!(res.body["content"], "&lt;em&gt;hi&lt;/em&gt;");
    assert_eq!(res.body["author"]["nickname"], "bob");

    let res = app.get(&format!("/posts/{id}")).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["author_id"], BOB);
    Ok(())
}

#[tokio::test]
async fn missing_content_is_unprocessable() -> Result<()> {
    let app = TestApp::new().await?;
    let token = TestApp::token(ALICE);

    let res = app
        .post_json("/posts", Some(&token), json!({ "title": "Empty", "content": "", "author_id": ALICE }))
        .await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["message"], "required content");

    let res = app
        .post_json("/posts", Some(&token), json!({ "title": "Orphan", "content": "text" }))
        .await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["message"], "required author");
    Ok(())
}

#[tokio::test]
async fn duplicate_post_title_is_translated() -> Result<()> {
    let app = TestApp::new().await?;
    create_post(&app, "Same", ALICE).await?;
    let token = TestApp::token(BOB);

    let res = app
        .post_json("/posts", Some(&token), json!({ "title": "Same", "content": "x", "author_id": BOB }))
        .await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["message"], "Title Already Taken");
    Ok(())
}

#[tokio::test]
async fn only_author_updates_and_deletes() -> Result<()> {
    let app = TestApp::new().await?;
    let id = create_post(&app, "Draft", ALICE).await?;
    let alice = TestApp::token(ALICE);
    let bob = TestApp::token(BOB);
    let uri = format!("/posts/{id}");

    let res = app
        .put_json(&uri, Some(&bob), json!({ "title": "Mine now", "content": "x", "author_id": BOB }))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .put_json(&uri, Some(&alice), json!({ "title": "Final", "content": "Edited", "author_id": ALICE }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "Final");
    assert_eq!(res.body["content"], "Edited");

    let res = app.delete(&uri, Some(&bob)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get(&uri).await?.status, StatusCode::OK);

    let res = app.delete(&uri, Some(&alice)).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&uri).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_posts_with_authors() -> Result<()> {
    let app = TestApp::new().await?;
    create_post(&app, "One", ALICE).await?;
    create_post(&app, "Two", BOB).await?;

    let res = app.get("/posts").await?;
    assert_eq!(res.status, StatusCode::OK);
    let posts = res.body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p["author"].is_object()));
    Ok(())
}
