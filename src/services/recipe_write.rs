// ABOUTME: Validation of recipe create and update submissions
// ABOUTME: Collects per-field errors, then checks referenced tags and ingredients exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Nested recipe writes carry the recipe fields, a tag id list, an
//! ingredient list and an optional image in one body. Everything is
//! validated before any row or file is written, and all problems are
//! reported together keyed by field.

use std::collections::HashSet;

use foodgram_core::{
    constants::{
        limits::{MAX_AMOUNT, MAX_COOKING_TIME, MIN_AMOUNT, MIN_COOKING_TIME, NAME_MAX_LENGTH},
        messages::{FIELD_BLANK, FIELD_REQUIRED},
    },
    errors::{AppError, AppResult, FieldErrors},
    text::capitalize,
};
use serde::Deserialize;

use super::images::{decode_data_uri, DecodedImage};
use crate::database::{Database, IngredientAmount, RecipeChanges, RecipeWrite};

/// Which fields a submission must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `POST`: every field including the image
    Create,
    /// `PUT`: every field; the image may be kept
    Replace,
    /// `PATCH`: only the fields present
    Partial,
}

impl WriteMode {
    const fn requires_fields(self) -> bool {
        !matches!(self, Self::Partial)
    }

    const fn requires_image(self) -> bool {
        matches!(self, Self::Create)
    }
}

/// One submitted ingredient line
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientPayload {
    /// Ingredient-unit id
    pub id: i64,
    /// Quantity
    pub amount: i64,
}

/// Recipe submission body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePayload {
    /// Ingredient lines
    pub ingredients: Option<Vec<IngredientPayload>>,
    /// Tag ids
    pub tags: Option<Vec<i64>>,
    /// Base64 data URI
    pub image: Option<String>,
    /// Recipe name
    pub name: Option<String>,
    /// Instructions
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
}

/// A submission that passed validation; `None` fields were not submitted
#[derive(Debug, Clone, Default)]
pub struct ValidatedRecipe {
    /// Capitalized name
    pub name: Option<String>,
    /// Trimmed instructions
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Decoded image, not yet stored
    pub image: Option<DecodedImage>,
    /// Duplicate-free tag ids
    pub tag_ids: Option<Vec<i64>>,
    /// Duplicate-free ingredient lines
    pub ingredients: Option<Vec<IngredientAmount>>,
}

impl ValidatedRecipe {
    /// Complete contents for a new recipe whose image is stored at `image`
    ///
    /// # Errors
    ///
    /// Returns an internal error if a field is absent, which only happens
    /// when the submission was not validated in [`WriteMode::Create`]
    pub fn into_write(self, image: String) -> AppResult<RecipeWrite> {
        let missing = |field: &str| AppError::internal(format!("Validated recipe lacks {field}"));
        Ok(RecipeWrite {
            name: self.name.ok_or_else(|| missing("name"))?,
            text: self.text.ok_or_else(|| missing("text"))?,
            cooking_time: self.cooking_time.ok_or_else(|| missing("cooking_time"))?,
            image,
            tag_ids: self.tag_ids.ok_or_else(|| missing("tags"))?,
            ingredients: self.ingredients.ok_or_else(|| missing("ingredients"))?,
        })
    }

    /// Changes for an update; `image` is the stored path of a new image, if any
    #[must_use]
    pub fn into_changes(self, image: Option<String>) -> RecipeChanges {
        RecipeChanges {
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            image,
            tag_ids: self.tag_ids,
            ingredients: self.ingredients,
        }
    }
}

impl RecipePayload {
    /// Checks that need no database access
    #[must_use]
    pub fn check(self, mode: WriteMode) -> (ValidatedRecipe, FieldErrors) {
        let mut errors = FieldErrors::new();
        let required = mode.requires_fields();

        let name = required_value(self.name, "name", required, &mut errors).and_then(|name| {
            let name = capitalize(&name);
            if name.is_empty() {
                errors.add("name", FIELD_BLANK);
                None
            } else if name.chars().count() > NAME_MAX_LENGTH {
                errors.add(
                    "name",
                    format!("Ensure this field has no more than {NAME_MAX_LENGTH} characters."),
                );
                None
            } else {
                Some(name)
            }
        });

        let text = required_value(self.text, "text", required, &mut errors).and_then(|text| {
            let text = text.trim().to_owned();
            if text.is_empty() {
                errors.add("text", FIELD_BLANK);
                None
            } else {
                Some(text)
            }
        });

        let cooking_time = required_value(self.cooking_time, "cooking_time", required, &mut errors)
            .and_then(|minutes| {
                if (MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&minutes) {
                    Some(minutes)
                } else {
                    errors.add(
                        "cooking_time",
                        format!(
                            "Cooking time must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME} minutes."
                        ),
                    );
                    None
                }
            });

        let image = required_value(self.image, "image", mode.requires_image(), &mut errors)
            .and_then(|uri| match decode_data_uri(&uri) {
                Ok(image) => Some(image),
                Err(message) => {
                    errors.add("image", message);
                    None
                }
            });

        let tag_ids = required_value(self.tags, "tags", required, &mut errors)
            .and_then(|tags| check_tags(tags, &mut errors));
        let ingredients = required_value(self.ingredients, "ingredients", required, &mut errors)
            .and_then(|lines| check_ingredients(&lines, &mut errors));

        (
            ValidatedRecipe {
                name,
                text,
                cooking_time,
                image,
                tag_ids,
                ingredients,
            },
            errors,
        )
    }
}

/// Validate a submission, including references and per-author name uniqueness
///
/// `recipe_id` is the recipe being updated, if any.
///
/// # Errors
///
/// Returns `ValidationFailed` with every problem found, or a database error
pub async fn validate(
    database: &Database,
    payload: RecipePayload,
    mode: WriteMode,
    author_id: i64,
    recipe_id: Option<i64>,
) -> AppResult<ValidatedRecipe> {
    let (validated, mut errors) = payload.check(mode);

    if let Some(tag_ids) = &validated.tag_ids {
        let existing = database.tags().existing_ids(tag_ids).await?;
        for missing in tag_ids.iter().filter(|id| !existing.contains(id)) {
            errors.add("tags", format!("Invalid pk \"{missing}\" - object does not exist."));
        }
    }

    if let Some(lines) = &validated.ingredients {
        let unit_ids: Vec<i64> = lines.iter().map(|l| l.ingredient_unit_id).collect();
        let existing = database.ingredients().existing_unit_ids(&unit_ids).await?;
        for missing in unit_ids.iter().filter(|id| !existing.contains(id)) {
            errors.add("ingredients", format!("Ingredient {missing} does not exist."));
        }
    }

    if let Some(name) = &validated.name {
        if database
            .recipes()
            .name_taken(author_id, name, recipe_id)
            .await?
        {
            errors.add("name", "You already have a recipe with this name.");
        }
    }

    errors.into_result()?;
    Ok(validated)
}

fn required_value<T>(
    value: Option<T>,
    field: &str,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<T> {
    if value.is_none() && required {
        errors.add(field, FIELD_REQUIRED);
    }
    value
}

fn check_tags(tags: Vec<i64>, errors: &mut FieldErrors) -> Option<Vec<i64>> {
    if tags.is_empty() {
        errors.add("tags", "Add at least one tag.");
        return None;
    }
    let mut seen = HashSet::new();
    if tags.iter().any(|id| !seen.insert(*id)) {
        errors.add("tags", "Tags must not repeat.");
        return None;
    }
    Some(tags)
}

fn check_ingredients(
    lines: &[IngredientPayload],
    errors: &mut FieldErrors,
) -> Option<Vec<IngredientAmount>> {
    if lines.is_empty() {
        errors.add("ingredients", "Add at least one ingredient.");
        return None;
    }
    let mut valid = true;
    let mut seen = HashSet::new();
    if lines.iter().any(|line| !seen.insert(line.id)) {
        errors.add("ingredients", "Ingredients must not repeat.");
        valid = false;
    }
    if lines
        .iter()
        .any(|line| !(MIN_AMOUNT..=MAX_AMOUNT).contains(&line.amount))
    {
        errors.add(
            "ingredients",
            format!("Amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}."),
        );
        valid = false;
    }
    valid.then(|| {
        lines
            .iter()
            .map(|line| IngredientAmount {
                ingredient_unit_id: line.id,
                amount: line.amount,
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gif_uri() -> String {
        "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==".to_owned()
    }

    fn full_payload() -> RecipePayload {
        RecipePayload {
            ingredients: Some(vec![
                IngredientPayload { id: 1, amount: 10 },
                IngredientPayload { id: 2, amount: 5 },
            ]),
            tags: Some(vec![1, 2]),
            image: Some(gif_uri()),
            name: Some("  pancakes ".to_owned()),
            text: Some("Mix and fry.".to_owned()),
            cooking_time: Some(20),
        }
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let (validated, errors) = full_payload().check(WriteMode::Create);
        assert!(errors.is_empty(), "{}", errors.summary());
        assert_eq!(validated.name.as_deref(), Some("Pancakes"));
        assert_eq!(validated.ingredients.unwrap().len(), 2);
        assert!(validated.image.is_some());
    }

    #[test]
    fn test_duplicate_ingredients_rejected() {
        let payload = RecipePayload {
            ingredients: Some(vec![
                IngredientPayload { id: 3, amount: 10 },
                IngredientPayload { id: 3, amount: 20 },
            ]),
            ..full_payload()
        };
        let (validated, errors) = payload.check(WriteMode::Create);
        assert!(validated.ingredients.is_none());
        assert_eq!(
            errors.get("ingredients").unwrap(),
            ["Ingredients must not repeat.".to_owned()]
        );
    }

    #[test]
    fn test_create_requires_every_field() {
        let (_, errors) = RecipePayload::default().check(WriteMode::Create);
        for field in ["ingredients", "tags", "image", "name", "text", "cooking_time"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_replace_allows_missing_image() {
        let payload = RecipePayload {
            image: None,
            ..full_payload()
        };
        let (_, errors) = payload.check(WriteMode::Replace);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_partial_checks_only_present_fields() {
        let payload = RecipePayload {
            tags: Some(Vec::new()),
            ..RecipePayload::default()
        };
        let (_, errors) = payload.check(WriteMode::Partial);
        assert!(errors.contains("tags"));
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_bounds() {
        let payload = RecipePayload {
            cooking_time: Some(0),
            ingredients: Some(vec![IngredientPayload { id: 1, amount: 2001 }]),
            ..full_payload()
        };
        let (_, errors) = payload.check(WriteMode::Create);
        assert!(errors.contains("cooking_time"));
        assert!(errors.contains("ingredients"));
    }
}
