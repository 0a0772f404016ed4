// ABOUTME: Tag model used to categorize recipes
// ABOUTME: Name, color, and slug are each unique
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

/// Recipe tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Row id
    pub id: i64,
    /// Display name, stored capitalized
    pub name: String,
    /// `#RRGGBB`, stored uppercase
    pub color: String,
    /// URL-safe identifier used by the `tags` filter
    pub slug: String,
}
