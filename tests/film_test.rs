mod common;

use serde_json::Value;

#[tokio::test]
async fn create_and_get_film_resolves_references() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let film_id = common::create_test_film(&app, "Gladiator").await;

    let resp = app
        .client
        .get(app.url(&format!("/films/{}", film_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let film = &body["data"];

    assert_eq!(film["name"], "Gladiator");
    assert_eq!(film["mpa"]["id"], 1);
    assert_eq!(film["mpa"]["name"], "G");
    let genres = film["genres"].as_array().unwrap();
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0]["id"], 1);
    assert_eq!(genres[1]["id"], 2);
}

#[tokio::test]
async fn film_validation_rejects_bad_input() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    // Before the first public film screening
    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": "Too Early",
            "description": "Impossible",
            "release_date": "1895-12-27",
            "duration": 60,
            "mpa": { "id": 1 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Blank name
    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": "",
            "description": "No name",
            "release_date": "2000-01-01",
            "duration": 60,
            "mpa": { "id": 1 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Description over 200 characters
    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": "Wordy",
            "description": "x".repeat(201),
            "release_date": "2000-01-01",
            "duration": 60,
            "mpa": { "id": 1 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Non-positive duration
    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": "Instant",
            "description": "Zero minutes",
            "release_date": "2000-01-01",
            "duration": 0,
            "mpa": { "id": 1 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Unknown MPA rating
    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": "Unrated",
            "description": "No such rating",
            "release_date": "2000-01-01",
            "duration": 60,
            "mpa": { "id": 99 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn update_replaces_genre_links() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let film_id = common::create_test_film(&app, "Mutable").await;

    let resp = app
        .client
        .put(app.url("/films"))
        .json(&serde_json::json!({
            "id": film_id,
            "name": "Mutable",
            "description": "Regenred",
            "release_date": "2000-05-01",
            "duration": 120,
            "mpa": { "id": 3 },
            "genres": [{ "id": 6 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let film = &body["data"];

    assert_eq!(film["mpa"]["id"], 3);
    let genres = film["genres"].as_array().unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0]["id"], 6);
}

#[tokio::test]
async fn duplicate_genres_collapse() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": "Repeats",
            "description": "Same genre twice",
            "release_date": "2000-01-01",
            "duration": 90,
            "mpa": { "id": 1 },
            "genres": [{ "id": 1 }, { "id": 1 }, { "id": 2 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["genres"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_film_is_not_idempotent() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let film_id = common::create_test_film(&app, "Short-lived").await;

    let resp = app
        .client
        .delete(app.url(&format!("/films/{}", film_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .delete(app.url(&format!("/films/{}", film_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn likes_rank_popular_films() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let f1 = common::create_test_film(&app, "Quiet").await;
    let f2 = common::create_test_film(&app, "Crowd Favourite").await;
    let u1 = common::create_test_user(&app, "liker").await;
    let u2 = common::create_test_user(&app, "liker").await;

    for user in [u1, u2] {
        let resp = app
            .client
            .put(app.url(&format!("/films/{}/like/{}", f2, user)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
    app.client
        .put(app.url(&format!("/films/{}/like/{}", f1, u1)))
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .get(app.url("/films/popular?count=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let films = body["data"].as_array().unwrap();
    assert_eq!(films.len(), 2);
    assert_eq!(films[0]["id"], f2);
    assert_eq!(films[1]["id"], f1);
}

#[tokio::test]
async fn double_like_keeps_a_single_like() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let f1 = common::create_test_film(&app, "Liked Once").await;
    let f2 = common::create_test_film(&app, "Liked Twice By One").await;
    let u1 = common::create_test_user(&app, "fan").await;
    let u2 = common::create_test_user(&app, "fan").await;

    // Two different users like f1; one user likes f2 twice.
    for user in [u1, u2] {
        app.client
            .put(app.url(&format!("/films/{}/like/{}", f1, user)))
            .send()
            .await
            .unwrap();
    }
    for _ in 0..2 {
        let resp = app
            .client
            .put(app.url(&format!("/films/{}/like/{}", f2, u1)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = app
        .client
        .get(app.url("/films/popular?count=2"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let films = body["data"].as_array().unwrap();
    assert_eq!(films[0]["id"], f1);
    assert_eq!(films[1]["id"], f2);
}

#[tokio::test]
async fn removing_an_absent_like_is_404() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let film_id = common::create_test_film(&app, "Unliked").await;
    let user_id = common::create_test_user(&app, "stranger").await;

    let resp = app
        .client
        .delete(app.url(&format!("/films/{}/like/{}", film_id, user_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn common_films_are_liked_by_both() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let f1 = common::create_test_film(&app, "Shared Taste").await;
    let f2 = common::create_test_film(&app, "Only Mine").await;
    let u1 = common::create_test_user(&app, "first").await;
    let u2 = common::create_test_user(&app, "second").await;

    for (film, user) in [(f1, u1), (f1, u2), (f2, u1)] {
        app.client
            .put(app.url(&format!("/films/{}/like/{}", film, user)))
            .send()
            .await
            .unwrap();
    }

    let resp = app
        .client
        .get(app.url(&format!("/films/common?user_id={}&friend_id={}", u1, u2)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let films = body["data"].as_array().unwrap();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0]["id"], f1);
}

#[tokio::test]
async fn recommendations_come_from_the_closest_neighbour() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let f1 = common::create_test_film(&app, "Both Like").await;
    let f2 = common::create_test_film(&app, "Also Both").await;
    let f3 = common::create_test_film(&app, "Only Theirs").await;
    let u1 = common::create_test_user(&app, "me").await;
    let u2 = common::create_test_user(&app, "neighbour").await;

    for (film, user) in [(f1, u1), (f2, u1), (f1, u2), (f2, u2), (f3, u2)] {
        app.client
            .put(app.url(&format!("/films/{}/like/{}", film, user)))
            .send()
            .await
            .unwrap();
    }

    let resp = app
        .client
        .get(app.url(&format!("/users/{}/recommendations", u1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let films = body["data"].as_array().unwrap();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0]["id"], f3);
}

#[tokio::test]
async fn recommendations_for_lonely_user_are_empty() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let user_id = common::create_test_user(&app, "hermit").await;

    let resp = app
        .client
        .get(app.url(&format!("/users/{}/recommendations", user_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dictionaries_are_seeded() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let resp = app.client.get(app.url("/genres")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let resp = app.client.get(app.url("/genres/1")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Comedy");

    let resp = app.client.get(app.url("/mpa")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let resp = app.client.get(app.url("/mpa/99")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn director_crud_roundtrip() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let resp = app
        .client
        .post(app.url("/directors"))
        .json(&serde_json::json!({ "name": "Ridley Scott" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let director_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .put(app.url("/directors"))
        .json(&serde_json::json!({ "id": director_id, "name": "R. Scott" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "R. Scott");

    // Attach to a film, then delete; the film loses the link.
    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": "Directed",
            "description": "Has a director",
            "release_date": "2000-05-01",
            "duration": 155,
            "mpa": { "id": 4 },
            "directors": [{ "id": director_id }]
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let film_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["directors"].as_array().unwrap().len(), 1);

    let resp = app
        .client
        .delete(app.url(&format!("/directors/{}", director_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/films/{}", film_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["directors"].as_array().unwrap().is_empty());

    let resp = app
        .client
        .delete(app.url(&format!("/directors/{}", director_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
