mod common;

use serde_json::Value;

async fn setup(app: &common::TestApp) -> (i32, i32, i32) {
    let film_id = common::create_test_film(app, "Gladiator").await;
    let user1 = common::create_test_user(app, "reviewer").await;
    let user2 = common::create_test_user(app, "reader").await;
    (film_id, user1, user2)
}

async fn list_reviews(app: &common::TestApp, film_id: Option<i32>) -> Vec<Value> {
    let url = match film_id {
        Some(fid) => app.url(&format!("/reviews?film_id={}", fid)),
        None => app.url("/reviews"),
    };
    let resp = app.client.get(url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    body["data"].as_array().unwrap().clone()
}

async fn useful_of(app: &common::TestApp, review_id: i32) -> i64 {
    let resp = app
        .client
        .get(app.url(&format!("/reviews/{}", review_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    body["data"]["useful"].as_i64().unwrap()
}

#[tokio::test]
async fn new_review_starts_with_zero_useful() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, _) = setup(&app).await;

    let resp = app
        .client
        .post(app.url("/reviews"))
        .json(&serde_json::json!({
            "content": "Decent film, worth one evening.",
            "film_id": film_id,
            "user_id": user1,
            "is_positive": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["useful"], 0);
    assert_eq!(body["data"]["film_id"], film_id);
    assert_eq!(body["data"]["is_positive"], true);
}

#[tokio::test]
async fn review_for_unknown_film_or_user_is_404() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, _) = setup(&app).await;

    let resp = app
        .client
        .post(app.url("/reviews"))
        .json(&serde_json::json!({
            "content": "Ghost film",
            "film_id": 99999,
            "user_id": user1,
            "is_positive": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = app
        .client
        .post(app.url("/reviews"))
        .json(&serde_json::json!({
            "content": "Ghost user",
            "film_id": film_id,
            "user_id": 99999,
            "is_positive": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn update_changes_content_and_keeps_useful() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, user2) = setup(&app).await;
    let review_id = common::create_test_review(&app, film_id, user1, true, "First cut").await;

    // One positive mark so useful is nonzero before the update.
    let resp = app
        .client
        .put(app.url(&format!("/reviews/{}/like/{}", review_id, user2)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .put(app.url("/reviews"))
        .json(&serde_json::json!({
            "id": review_id,
            "content": "A must-see!",
            "is_positive": false
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["content"], "A must-see!");
    assert_eq!(body["data"]["is_positive"], false);
    assert_eq!(body["data"]["useful"], 1);
}

#[tokio::test]
async fn update_of_unknown_review_is_404() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let resp = app
        .client
        .put(app.url("/reviews"))
        .json(&serde_json::json!({
            "id": 99999,
            "content": "Nobody home",
            "is_positive": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_shrinks_list_and_second_delete_fails() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, _) = setup(&app).await;
    let r1 = common::create_test_review(&app, film_id, user1, true, "one").await;
    common::create_test_review(&app, film_id, user1, false, "two").await;

    assert_eq!(list_reviews(&app, Some(film_id)).await.len(), 2);

    let resp = app
        .client
        .delete(app.url(&format!("/reviews/{}", r1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(list_reviews(&app, Some(film_id)).await.len(), 1);

    // Deletion is not idempotent.
    let resp = app
        .client
        .delete(app.url(&format!("/reviews/{}", r1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_cascades_marks() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, user2) = setup(&app).await;
    let review_id = common::create_test_review(&app, film_id, user1, true, "marked").await;

    app.client
        .put(app.url(&format!("/reviews/{}/like/{}", review_id, user1)))
        .send()
        .await
        .unwrap();
    app.client
        .put(app.url(&format!("/reviews/{}/dislike/{}", review_id, user2)))
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/reviews/{}", review_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(list_reviews(&app, Some(film_id)).await.is_empty());

    // The marks went with the review; a fresh review by the same users starts clean.
    let again = common::create_test_review(&app, film_id, user1, true, "again").await;
    assert_eq!(useful_of(&app, again).await, 0);
}

#[tokio::test]
async fn get_review_by_id() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, _) = setup(&app).await;
    let review_id =
        common::create_test_review(&app, film_id, user1, true, "A fine picture").await;

    let resp = app
        .client
        .get(app.url(&format!("/reviews/{}", review_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["content"], "A fine picture");

    let resp = app
        .client
        .get(app.url("/reviews/99999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn marks_drive_ordering_and_removal_reverses_it() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, user2) = setup(&app).await;
    let r1 = common::create_test_review(&app, film_id, user1, true, "first").await;
    let r2 = common::create_test_review(&app, film_id, user1, false, "second").await;
    let r3 = common::create_test_review(&app, film_id, user1, true, "third").await;

    // All tied at zero: creation order.
    let order: Vec<i64> = list_reviews(&app, Some(film_id))
        .await
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![r1 as i64, r2 as i64, r3 as i64]);

    // One like lifts the second review to the top.
    app.client
        .put(app.url(&format!("/reviews/{}/like/{}", r2, user1)))
        .send()
        .await
        .unwrap();
    let top = list_reviews(&app, Some(film_id)).await[0]["id"].as_i64().unwrap();
    assert_eq!(top, r2 as i64);

    // Two likes lift the third above it.
    app.client
        .put(app.url(&format!("/reviews/{}/like/{}", r3, user1)))
        .send()
        .await
        .unwrap();
    app.client
        .put(app.url(&format!("/reviews/{}/like/{}", r3, user2)))
        .send()
        .await
        .unwrap();
    let order: Vec<i64> = list_reviews(&app, Some(film_id))
        .await
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![r3 as i64, r2 as i64, r1 as i64]);

    // Removing the marks unwinds the ordering, step by step.
    app.client
        .delete(app.url(&format!("/reviews/{}/like/{}", r3, user2)))
        .send()
        .await
        .unwrap();
    let top = list_reviews(&app, Some(film_id)).await[0]["id"].as_i64().unwrap();
    assert_eq!(top, r2 as i64);

    app.client
        .delete(app.url(&format!("/reviews/{}/like/{}", r3, user1)))
        .send()
        .await
        .unwrap();
    app.client
        .delete(app.url(&format!("/reviews/{}/like/{}", r2, user1)))
        .send()
        .await
        .unwrap();
    let order: Vec<i64> = list_reviews(&app, Some(film_id))
        .await
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![r1 as i64, r2 as i64, r3 as i64]);
}

#[tokio::test]
async fn likes_and_dislikes_move_useful() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, user2) = setup(&app).await;
    let review_id = common::create_test_review(&app, film_id, user1, true, "scored").await;

    assert_eq!(useful_of(&app, review_id).await, 0);

    let resp = app
        .client
        .put(app.url(&format!("/reviews/{}/like/{}", review_id, user1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(useful_of(&app, review_id).await, 1);

    app.client
        .put(app.url(&format!("/reviews/{}/dislike/{}", review_id, user2)))
        .send()
        .await
        .unwrap();
    assert_eq!(useful_of(&app, review_id).await, 0);

    app.client
        .delete(app.url(&format!("/reviews/{}/dislike/{}", review_id, user2)))
        .send()
        .await
        .unwrap();
    assert_eq!(useful_of(&app, review_id).await, 1);

    app.client
        .delete(app.url(&format!("/reviews/{}/like/{}", review_id, user1)))
        .send()
        .await
        .unwrap();
    assert_eq!(useful_of(&app, review_id).await, 0);
}

#[tokio::test]
async fn second_mark_is_rejected_regardless_of_polarity() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, _) = setup(&app).await;
    let review_id = common::create_test_review(&app, film_id, user1, true, "once only").await;

    let resp = app
        .client
        .put(app.url(&format!("/reviews/{}/like/{}", review_id, user1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(useful_of(&app, review_id).await, 1);

    // Same polarity: conflict, not a silent update.
    let resp = app
        .client
        .put(app.url(&format!("/reviews/{}/like/{}", review_id, user1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    assert_eq!(useful_of(&app, review_id).await, 1);

    // Opposite polarity: still a conflict, there is no vote-change path.
    let resp = app
        .client
        .put(app.url(&format!("/reviews/{}/dislike/{}", review_id, user1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    assert_eq!(useful_of(&app, review_id).await, 1);
}

#[tokio::test]
async fn marks_on_unknown_targets_are_404() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, _) = setup(&app).await;
    let review_id = common::create_test_review(&app, film_id, user1, true, "target").await;

    let resp = app
        .client
        .put(app.url(&format!("/reviews/{}/like/{}", 99999, user1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = app
        .client
        .put(app.url(&format!("/reviews/{}/like/{}", review_id, 99999)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Removing a mark that was never added
    let resp = app
        .client
        .delete(app.url(&format!("/reviews/{}/like/{}", review_id, user1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn list_honours_count_and_film_filter() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let (film_id, user1, _) = setup(&app).await;
    let other_film = common::create_test_film(&app, "The Other One").await;

    for i in 0..12 {
        common::create_test_review(&app, film_id, user1, true, &format!("review {i}")).await;
    }
    common::create_test_review(&app, other_film, user1, true, "elsewhere").await;

    // Default cap is 10.
    assert_eq!(list_reviews(&app, None).await.len(), 10);

    let resp = app
        .client
        .get(app.url(&format!("/reviews?film_id={}&count=3", film_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    assert_eq!(list_reviews(&app, Some(other_film)).await.len(), 1);
}
