// ABOUTME: HTTP tests for recipe routes, favorites, and the shopping cart
// ABOUTME: Exercises nested writes, filtering, pagination links, and permissions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{create_admin, create_test_app, create_user, insert_recipe, recipe_body, seed_catalog};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_recipe_returns_full_representation() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (author, token) = create_user(&app, "alice").await;

    let body = recipe_body(
        "  fluffy pancakes ",
        &[catalog.tag("lunch"), catalog.tag("breakfast")],
        &[
            (catalog.unit("Flour", "g"), 200),
            (catalog.unit("Milk", "ml"), 300),
        ],
    );
    let recipe: Value = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&body)
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    assert_eq!(recipe["name"], "Fluffy pancakes");
    assert_eq!(recipe["author"]["id"], author.id);
    assert_eq!(recipe["author"]["is_subscribed"], false);
    assert_eq!(recipe["is_favorited"], false);
    assert_eq!(recipe["is_in_shopping_cart"], false);
    assert_eq!(recipe["cooking_time"], 25);

    let tag_names: Vec<&str> = recipe["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(tag_names, ["Breakfast", "Lunch"]);

    assert_eq!(
        recipe["ingredients"][0],
        json!({"id": catalog.unit("Flour", "g"), "name": "Flour", "measurement_unit": "g", "amount": 200})
    );
    assert!(recipe["image"]
        .as_str()
        .unwrap()
        .starts_with("/media/recipes/images/"));
    assert_eq!(app.stored_image_count(), 1);
}

#[tokio::test]
async fn test_create_recipe_requires_authentication() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let body = recipe_body("Soup", &[catalog.tag("dinner")], &[(catalog.unit("Egg", "pcs"), 2)]);

    let error: Value = AxumTestRequest::post("/api/recipes/")
        .json(&body)
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(
        error["detail"],
        "Authentication credentials were not provided."
    );
}

#[tokio::test]
async fn test_invalid_token_rejected_on_public_listing() {
    let app = create_test_app().await;
    AxumTestRequest::get("/api/recipes/")
        .token("0000000000000000000000000000000000000000")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_recipe_validation_stores_nothing() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (_, token) = create_user(&app, "alice").await;
    let flour = catalog.unit("Flour", "g");

    let body = recipe_body("Bread", &[catalog.tag("lunch"), 9999], &[(flour, 10), (flour, 20)]);
    let errors: Value = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&body)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();

    assert_eq!(errors["ingredients"][0], "Ingredients must not repeat.");
    assert_eq!(errors["tags"][0], "Invalid pk \"9999\" - object does not exist.");
    assert_eq!(app.stored_image_count(), 0);
    assert_eq!(app.database().recipes().count(&Default::default()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_name_for_same_author_rejected() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (author, token) = create_user(&app, "alice").await;
    let (_, other_token) = create_user(&app, "bob").await;
    insert_recipe(app.database(), author.id, "Omelette", &[catalog.tag("breakfast")], &[(catalog.unit("Egg", "pcs"), 3)]).await;

    let body = recipe_body("omelette", &[catalog.tag("breakfast")], &[(catalog.unit("Egg", "pcs"), 2)]);
    let errors: Value = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&body)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(errors["name"].is_array());

    AxumTestRequest::post("/api/recipes/")
        .token(&other_token)
        .json(&body)
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app().await;
    let (_, token) = create_user(&app, "alice").await;

    let error: Value = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .raw_body("application/json", "{\"name\": ")
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(error["errors"].is_string());
}

#[tokio::test]
async fn test_list_pagination_links() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (author, _) = create_user(&app, "alice").await;
    let egg = catalog.unit("Egg", "pcs");
    for name in ["Cake", "Bun", "Apple pie"] {
        insert_recipe(app.database(), author.id, name, &[catalog.tag("lunch")], &[(egg, 1)]).await;
    }

    let first: Value = AxumTestRequest::get("/api/recipes/?limit=2")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(first["count"], 3);
    assert_eq!(first["next"], "/api/recipes/?limit=2&page=2");
    assert_eq!(first["previous"], Value::Null);
    let names: Vec<&str> = first["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Apple pie", "Bun"]);

    let second: Value = AxumTestRequest::get("/api/recipes/?page=2&limit=2")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(second["next"], Value::Null);
    assert_eq!(second["previous"], "/api/recipes/?limit=2");
    assert_eq!(second["results"].as_array().unwrap().len(), 1);

    AxumTestRequest::get("/api/recipes/?page=3&limit=2")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_by_tags_and_author() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, _) = create_user(&app, "alice").await;
    let (bob, _) = create_user(&app, "bob").await;
    let egg = catalog.unit("Egg", "pcs");
    insert_recipe(app.database(), alice.id, "Porridge", &[catalog.tag("breakfast")], &[(egg, 1)]).await;
    insert_recipe(app.database(), alice.id, "Salad", &[catalog.tag("lunch")], &[(egg, 1)]).await;
    insert_recipe(app.database(), bob.id, "Steak", &[catalog.tag("dinner"), catalog.tag("lunch")], &[(egg, 1)]).await;

    let tagged: Value = AxumTestRequest::get("/api/recipes/?tags=breakfast&tags=lunch")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(tagged["count"], 3);

    let dinner: Value = AxumTestRequest::get("/api/recipes/?tags=dinner")
        .send(app.router())
        .await
        .json();
    assert_eq!(dinner["count"], 1);
    assert_eq!(dinner["results"][0]["name"], "Steak");

    let by_alice: Value = AxumTestRequest::get(&format!("/api/recipes/?author={}", alice.id))
        .send(app.router())
        .await
        .json();
    assert_eq!(by_alice["count"], 2);

    let combined: Value =
        AxumTestRequest::get(&format!("/api/recipes/?author={}&tags=lunch", bob.id))
            .send(app.router())
            .await
            .json();
    assert_eq!(combined["count"], 1);
}

#[tokio::test]
async fn test_list_membership_filters() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let egg = catalog.unit("Egg", "pcs");
    let liked = insert_recipe(app.database(), alice.id, "Liked", &[catalog.tag("lunch")], &[(egg, 1)]).await;
    insert_recipe(app.database(), alice.id, "Other", &[catalog.tag("lunch")], &[(egg, 1)]).await;

    AxumTestRequest::post(&format!("/api/recipes/{liked}/favorite/"))
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED);

    let favorites: Value = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .token(&token)
        .send(app.router())
        .await
        .json();
    assert_eq!(favorites["count"], 1);
    assert_eq!(favorites["results"][0]["id"], liked);
    assert_eq!(favorites["results"][0]["is_favorited"], true);

    let not_favorites: Value = AxumTestRequest::get("/api/recipes/?is_favorited=0")
        .token(&token)
        .send(app.router())
        .await
        .json();
    assert_eq!(not_favorites["count"], 1);
    assert_eq!(not_favorites["results"][0]["name"], "Other");

    let anonymous: Value = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(anonymous["count"], 0);

    let invalid: Value = AxumTestRequest::get("/api/recipes/?is_in_shopping_cart=maybe")
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(invalid["is_in_shopping_cart"].is_array());
}

#[tokio::test]
async fn test_anonymous_listing_never_flags_membership() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let egg = catalog.unit("Egg", "pcs");
    let id = insert_recipe(app.database(), alice.id, "Omelette", &[catalog.tag("breakfast")], &[(egg, 3)]).await;

    for action in ["favorite", "shopping_cart"] {
        AxumTestRequest::post(&format!("/api/recipes/{id}/{action}/"))
            .token(&token)
            .send(app.router())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let owner: Value = AxumTestRequest::get("/api/recipes/")
        .token(&token)
        .send(app.router())
        .await
        .json();
    assert_eq!(owner["results"][0]["is_favorited"], true);
    assert_eq!(owner["results"][0]["is_in_shopping_cart"], true);

    let anonymous: Value = AxumTestRequest::get("/api/recipes/")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(anonymous["count"], 1);
    assert_eq!(anonymous["results"][0]["is_favorited"], false);
    assert_eq!(anonymous["results"][0]["is_in_shopping_cart"], false);

    let detail: Value = AxumTestRequest::get(&format!("/api/recipes/{id}/"))
        .send(app.router())
        .await
        .json();
    assert_eq!(detail["is_favorited"], false);
    assert_eq!(detail["is_in_shopping_cart"], false);
}

#[tokio::test]
async fn test_empty_filter_values_are_ignored() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let egg = catalog.unit("Egg", "pcs");
    insert_recipe(app.database(), alice.id, "Porridge", &[catalog.tag("breakfast")], &[(egg, 1)]).await;
    insert_recipe(app.database(), alice.id, "Salad", &[catalog.tag("lunch")], &[(egg, 1)]).await;

    let listed: Value = AxumTestRequest::get("/api/recipes/?is_favorited=&is_in_shopping_cart=&tags=")
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(listed["count"], 2);

    let tagged: Value = AxumTestRequest::get("/api/recipes/?tags=&tags=lunch")
        .send(app.router())
        .await
        .json();
    assert_eq!(tagged["count"], 1);
    assert_eq!(tagged["results"][0]["name"], "Salad");
}

#[tokio::test]
async fn test_image_that_does_not_decode_is_rejected() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (_, token) = create_user(&app, "alice").await;

    let mut signature_only = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    signature_only.extend_from_slice(&[0; 4]);
    let mut body = recipe_body("Toast", &[catalog.tag("breakfast")], &[(catalog.unit("Egg", "pcs"), 1)]);
    body["image"] = json!(format!("data:image/png;base64,{}", STANDARD.encode(&signature_only)));

    let errors: Value = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&body)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(errors["image"][0]
        .as_str()
        .unwrap()
        .starts_with("Upload a valid image."));
    assert_eq!(app.stored_image_count(), 0);
    assert_eq!(app.database().recipes().count(&Default::default()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_permissions() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, _) = create_user(&app, "alice").await;
    let (_, bob_token) = create_user(&app, "bob").await;
    let (_, admin_token) = create_admin(&app, "chef").await;
    let egg = catalog.unit("Egg", "pcs");
    let id = insert_recipe(app.database(), alice.id, "Omelette", &[catalog.tag("breakfast")], &[(egg, 3)]).await;

    AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .token(&bob_token)
        .json(&json!({"name": "Stolen"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated: Value = AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .token(&admin_token)
        .json(&json!({"cooking_time": 7}))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated["cooking_time"], 7);
    assert_eq!(updated["name"], "Omelette");
    assert_eq!(updated["author"]["id"], alice.id);
}

#[tokio::test]
async fn test_partial_update_replaces_only_given_relations() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let id = insert_recipe(
        app.database(),
        alice.id,
        "Crepes",
        &[catalog.tag("breakfast")],
        &[(catalog.unit("Flour", "g"), 100), (catalog.unit("Milk", "ml"), 250)],
    )
    .await;

    let updated: Value = AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .token(&token)
        .json(&json!({"ingredients": [{"id": catalog.unit("Sugar", "g"), "amount": 15}]}))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(updated["ingredients"][0]["name"], "Sugar");
    assert_eq!(updated["tags"][0]["slug"], "breakfast");
    assert_eq!(updated["image"], "/media/recipes/images/crepes.png");
}

#[tokio::test]
async fn test_put_requires_all_fields_but_not_image() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let egg = catalog.unit("Egg", "pcs");
    let id = insert_recipe(app.database(), alice.id, "Toast", &[catalog.tag("breakfast")], &[(egg, 1)]).await;

    let errors: Value = AxumTestRequest::put(&format!("/api/recipes/{id}/"))
        .token(&token)
        .json(&json!({"name": "Toast"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(errors["tags"].is_array());
    assert!(errors["ingredients"].is_array());
    assert!(errors.get("image").is_none());

    let mut body = recipe_body("French toast", &[catalog.tag("lunch")], &[(egg, 2)]);
    body.as_object_mut().unwrap().remove("image");
    let updated: Value = AxumTestRequest::put(&format!("/api/recipes/{id}/"))
        .token(&token)
        .json(&body)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated["name"], "French toast");
    assert_eq!(updated["image"], "/media/recipes/images/toast.png");
}

#[tokio::test]
async fn test_delete_recipe() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let (_, bob_token) = create_user(&app, "bob").await;
    let egg = catalog.unit("Egg", "pcs");
    let id = insert_recipe(app.database(), alice.id, "Boiled egg", &[catalog.tag("breakfast")], &[(egg, 1)]).await;

    AxumTestRequest::delete(&format!("/api/recipes/{id}/"))
        .token(&bob_token)
        .send(app.router())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    AxumTestRequest::delete(&format!("/api/recipes/{id}/"))
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    AxumTestRequest::get(&format!("/api/recipes/{id}/"))
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = create_test_app().await;
    AxumTestRequest::get("/api/recipes/pancakes/")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_toggle() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let egg = catalog.unit("Egg", "pcs");
    let id = insert_recipe(app.database(), alice.id, "Shakshuka", &[catalog.tag("breakfast")], &[(egg, 4)]).await;
    let uri = format!("/api/recipes/{id}/favorite/");

    let brief: Value = AxumTestRequest::post(&uri)
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(brief["id"], id);
    assert_eq!(brief["name"], "Shakshuka");
    assert_eq!(brief["cooking_time"], 10);
    assert_eq!(brief.as_object().unwrap().len(), 4);

    let duplicate: Value = AxumTestRequest::post(&uri)
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(duplicate["errors"].is_string());

    AxumTestRequest::delete(&uri)
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::delete(&uri)
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    AxumTestRequest::post("/api/recipes/424242/favorite/")
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shopping_cart_download_sums_amounts() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;
    let (alice, token) = create_user(&app, "alice").await;
    let flour = catalog.unit("Flour", "g");
    let sugar = catalog.unit("Sugar", "g");
    let first = insert_recipe(app.database(), alice.id, "Cookies", &[catalog.tag("lunch")], &[(flour, 200), (sugar, 50)]).await;
    let second = insert_recipe(app.database(), alice.id, "Bread", &[catalog.tag("lunch")], &[(flour, 100)]).await;

    for id in [first, second] {
        AxumTestRequest::post(&format!("/api/recipes/{id}/shopping_cart/"))
            .token(&token)
            .send(app.router())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        response.header("content-type"),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"ingredients.txt\"")
    );
    assert_eq!(response.text(), "Flour (g): 300\nSugar (g): 50\n");

    let in_cart: Value = AxumTestRequest::get("/api/recipes/?is_in_shopping_cart=true")
        .token(&token)
        .send(app.router())
        .await
        .json();
    assert_eq!(in_cart["count"], 2);
}

#[tokio::test]
async fn test_empty_shopping_cart_download() {
    let app = create_test_app().await;
    let (_, token) = create_user(&app, "alice").await;

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .token(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.text(), "");

    AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
