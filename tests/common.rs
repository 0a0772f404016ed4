// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds an in-memory app, registers users with tokens, and seeds the catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram_server`

use std::sync::{Arc, Once};

use axum::Router;
use foodgram_core::models::{IngredientUnit, Tag, User, UserRole};
use foodgram_server::{
    config::environment::ServerConfig,
    database::{Database, IngredientAmount, RecipeWrite},
    resources::ServerResources,
    server::build_router,
    services::{
        accounts::{self, RegistrationPayload},
        catalog::{self, IngredientRecord, TagRecord},
    },
};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Password used for every test account
pub const TEST_PASSWORD: &str = "Kitchen-Pass-42";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// An in-memory server with its own media directory
pub struct TestApp {
    pub resources: Arc<ServerResources>,
    pub media_dir: TempDir,
}

impl TestApp {
    /// Full router with middleware
    pub fn router(&self) -> Router {
        build_router(&self.resources)
    }

    /// Database handle
    pub fn database(&self) -> &Database {
        &self.resources.database
    }

    /// Number of files stored under the recipe image directory
    pub fn stored_image_count(&self) -> usize {
        std::fs::read_dir(self.media_dir.path().join("recipes/images"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Standard test app: in-memory `SQLite`, minimum bcrypt cost, temp media root
pub async fn create_test_app() -> TestApp {
    init_test_logging();
    let media_dir = tempfile::tempdir().expect("Failed to create media dir");
    let config = ServerConfig::for_testing(media_dir.path().to_path_buf());
    let resources = ServerResources::from_config(config)
        .await
        .expect("Failed to build resources");
    TestApp {
        resources: Arc::new(resources),
        media_dir,
    }
}

async fn register(app: &TestApp, username: &str, role: UserRole) -> (User, String) {
    let payload = RegistrationPayload {
        email: Some(format!("{username}@example.com")),
        username: Some(username.to_owned()),
        first_name: Some("Test".to_owned()),
        last_name: Some("Cook".to_owned()),
        password: Some(TEST_PASSWORD.to_owned()),
    };
    let user = accounts::register(app.database(), &app.resources.auth, payload, role)
        .await
        .expect("Failed to register user");
    let token = app
        .resources
        .auth
        .issue_token(app.database(), user.id)
        .await
        .expect("Failed to issue token");
    (user, token)
}

/// Register a regular user and issue a token
pub async fn create_user(app: &TestApp, username: &str) -> (User, String) {
    register(app, username, UserRole::User).await
}

/// Register an administrator and issue a token
pub async fn create_admin(app: &TestApp, username: &str) -> (User, String) {
    register(app, username, UserRole::Admin).await
}

/// Seeded tags and ingredient units, in listing order
pub struct Catalog {
    /// Breakfast, Dinner, Lunch
    pub tags: Vec<Tag>,
    /// Egg (pcs), Flour (g), Milk (ml), Sugar (g), Sugar (tbsp)
    pub units: Vec<IngredientUnit>,
}

impl Catalog {
    /// Id of the tag with `slug`
    pub fn tag(&self, slug: &str) -> i64 {
        self.tags.iter().find(|t| t.slug == slug).unwrap().id
    }

    /// Id of the ingredient unit `name (unit)`
    pub fn unit(&self, name: &str, measurement_unit: &str) -> i64 {
        self.units
            .iter()
            .find(|u| u.name == name && u.measurement_unit == measurement_unit)
            .unwrap()
            .id
    }
}

/// Load a small catalog of tags and ingredients
pub async fn seed_catalog(database: &Database) -> Catalog {
    let tags = [
        ("Breakfast", "#E26C2D", "breakfast"),
        ("Lunch", "#49B64E", "lunch"),
        ("Dinner", "#8775D2", "dinner"),
    ]
    .map(|(name, color, slug)| TagRecord {
        name: name.to_owned(),
        color: color.to_owned(),
        slug: Some(slug.to_owned()),
    });
    catalog::import_tags(database, &tags).await.unwrap();

    let ingredients = [
        ("flour", "g"),
        ("sugar", "g"),
        ("sugar", "tbsp"),
        ("milk", "ml"),
        ("egg", "pcs"),
    ]
    .map(|(name, unit)| IngredientRecord {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    });
    catalog::import_ingredients(database, &ingredients)
        .await
        .unwrap();

    Catalog {
        tags: database.tags().list().await.unwrap(),
        units: database.ingredients().list_units(None).await.unwrap(),
    }
}

/// A 1x1 RGB PNG, base64-encoded
pub const PNG_1X1_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4z8AAAAMBAQDJ/pLvAAAAAElFTkSuQmCC";

/// The 1x1 PNG as a data URI
pub fn png_data_uri() -> String {
    format!("data:image/png;base64,{PNG_1X1_BASE64}")
}

/// A complete recipe submission body
pub fn recipe_body(name: &str, tag_ids: &[i64], ingredients: &[(i64, i64)]) -> Value {
    json!({
        "name": name,
        "text": "Mix everything and cook.",
        "cooking_time": 25,
        "image": png_data_uri(),
        "tags": tag_ids,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({"id": id, "amount": amount}))
            .collect::<Vec<_>>(),
    })
}

/// Store a recipe directly, bypassing HTTP
pub async fn insert_recipe(
    database: &Database,
    author_id: i64,
    name: &str,
    tag_ids: &[i64],
    ingredients: &[(i64, i64)],
) -> i64 {
    let write = RecipeWrite {
        name: name.to_owned(),
        text: "Cook it.".to_owned(),
        cooking_time: 10,
        image: format!("recipes/images/{}.png", name.to_lowercase().replace(' ', "-")),
        tag_ids: tag_ids.to_vec(),
        ingredients: ingredients
            .iter()
            .map(|&(ingredient_unit_id, amount)| IngredientAmount {
                ingredient_unit_id,
                amount,
            })
            .collect(),
    };
    database
        .recipes()
        .create(author_id, &write)
        .await
        .expect("Failed to insert recipe")
        .id
}
