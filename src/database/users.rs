// ABOUTME: Database operations for user accounts
// ABOUTME: Registration, lookup by id or email, listing, and password updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashMap;

use chrono::Utc;
use foodgram_core::{
    errors::{AppError, AppResult},
    models::{User, UserRole},
    pagination::PageRequest,
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

use super::{format_timestamp, parse_timestamp, unique_violation, Database};

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, role, date_joined";

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        self.execute_schema(&[
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
                date_joined TEXT NOT NULL
            )
            ",
        ])
        .await
    }
}

/// Fields for a new account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Lowercased email
    pub email: String,
    /// Username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash
    pub password_hash: String,
    /// Role
    pub role: UserRole,
}

/// User account storage
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account
    ///
    /// # Errors
    ///
    /// Returns a field error when the email or username is taken, or a database error
    pub async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, password_hash, role, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(format_timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some("users.email") => {
                AppError::field("email", "A user with that email already exists.")
            }
            Some("users.username") => {
                AppError::field("username", "A user with that username already exists.")
            }
            _ => AppError::database(format!("Failed to create user: {e}")),
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            date_joined: now,
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user {user_id}: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Get a user by (lowercased) email
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Load several users keyed by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_many(&self, user_ids: &[i64]) -> AppResult<HashMap<i64, User>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE id IN ("));
        let mut ids = builder.separated(", ");
        for id in user_ids {
            ids.push_bind(*id);
        }
        builder.push(")");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load users: {e}")))?;

        rows.iter()
            .map(|row| row_to_user(row).map(|user| (user.id, user)))
            .collect()
    }

    /// Whether an email is registered
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.exists("email", email).await
    }

    /// Whether a username is registered
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        self.exists("username", username).await
    }

    async fn exists(&self, column: &'static str, value: &str) -> AppResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar(&format!("SELECT 1 FROM users WHERE {column} = $1 LIMIT 1"))
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check {column}: {e}")))?;
        Ok(found.is_some())
    }

    /// List users ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, page: &PageRequest) -> AppResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        rows.iter().map(row_to_user).collect()
    }

    /// Total number of users
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;
        Ok(count as u64)
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;
        Ok(())
    }

    /// Change a user's role
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn set_role(&self, user_id: i64, role: UserRole) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update role: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Convert a `users` row (selected with `USER_COLUMNS`) into a model
pub(crate) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let role: String = row.get("role");
    let date_joined: String = row.get("date_joined");
    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password_hash"),
        role: UserRole::parse(&role),
        date_joined: parse_timestamp(&date_joined)?,
    })
}
