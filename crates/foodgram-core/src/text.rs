// ABOUTME: Text normalization for names, colors, and slugs
// ABOUTME: Capitalization, Cyrillic transliteration, and hex color checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::constants::limits;

/// Trim and capitalize: first character uppercase, the rest lowercase
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.trim().chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Trim and lowercase
#[must_use]
pub fn lowercase(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Normalize a `#RRGGBB` color to uppercase, `None` if malformed
#[must_use]
pub fn normalize_color(value: &str) -> Option<String> {
    let value = value.trim();
    let hex = value.strip_prefix('#')?;
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(value.to_ascii_uppercase())
    } else {
        None
    }
}

/// Whether `value` matches `^[-a-zA-Z0-9_]+$`
#[must_use]
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Derive a slug from a display name
///
/// Cyrillic is transliterated, whitespace becomes `-`, anything else outside
/// `[a-z0-9_-]` is dropped. Runs of `-` collapse and the result is truncated
/// to the slug length limit.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if let Some(latin) = transliterate(c) {
            slug.push_str(latin);
        }
    }
    let trimmed = slug.trim_matches('-');
    trimmed.chars().take(limits::SLUG_MAX_LENGTH).collect()
}

const fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'э' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' | 'ы' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}
