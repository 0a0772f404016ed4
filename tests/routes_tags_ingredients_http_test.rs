// ABOUTME: HTTP tests for the read-only tag and ingredient catalogs
// ABOUTME: Verifies ordering, lookup by id, and ingredient name search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_app, seed_catalog};
use foodgram_server::services::catalog::{self, IngredientRecord};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

#[tokio::test]
async fn test_tags_are_listed_by_name_without_pagination() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;

    let tags: Value = AxumTestRequest::get("/api/tags/")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let tags = tags.as_array().unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(
        tags[0],
        json!({"id": catalog.tag("breakfast"), "name": "Breakfast", "color": "#E26C2D", "slug": "breakfast"})
    );
    assert_eq!(tags[2]["slug"], "lunch");
}

#[tokio::test]
async fn test_tag_detail() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;

    let tag: Value = AxumTestRequest::get(&format!("/api/tags/{}/", catalog.tag("dinner")))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(tag["name"], "Dinner");

    AxumTestRequest::get("/api/tags/777/")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    AxumTestRequest::get("/api/tags/dinner/")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ingredients_listed_per_unit() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;

    let units: Value = AxumTestRequest::get("/api/ingredients/")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let units = units.as_array().unwrap();
    assert_eq!(units.len(), 5);
    assert_eq!(
        units[3],
        json!({"id": catalog.unit("Sugar", "g"), "name": "Sugar", "measurement_unit": "g"})
    );
    assert_eq!(units[4]["measurement_unit"], "tbsp");
}

#[tokio::test]
async fn test_ingredient_search_puts_prefix_matches_first() {
    let app = create_test_app().await;
    seed_catalog(app.database()).await;
    let extra = [IngredientRecord {
        name: "almond flour".to_owned(),
        measurement_unit: "g".to_owned(),
    }];
    catalog::import_ingredients(app.database(), &extra)
        .await
        .unwrap();

    let found: Value = AxumTestRequest::get("/api/ingredients/?name=FLO")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Flour", "Almond flour"]);

    let none: Value = AxumTestRequest::get("/api/ingredients/?name=saffron")
        .send(app.router())
        .await
        .json();
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn test_ingredient_detail() {
    let app = create_test_app().await;
    let catalog = seed_catalog(app.database()).await;

    let unit: Value = AxumTestRequest::get(&format!(
        "/api/ingredients/{}/",
        catalog.unit("Milk", "ml")
    ))
    .send(app.router())
    .await
    .assert_status(StatusCode::OK)
    .json();
    assert_eq!(unit["name"], "Milk");
    assert_eq!(unit["measurement_unit"], "ml");

    AxumTestRequest::get("/api/ingredients/424242/")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
