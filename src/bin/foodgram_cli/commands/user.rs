// ABOUTME: User management commands for foodgram-cli
// ABOUTME: Creates accounts with the registration rules and promotes users to admin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use foodgram_server::{
    auth::AuthManager,
    database::Database,
    errors::AppError,
    services::accounts::{self, RegistrationPayload},
};
use foodgram_core::models::UserRole;
use tracing::info;

use crate::Result;

/// Account fields collected from the command line
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
}

/// Create an account, applying the same validation as API registration
pub async fn create(database: &Database, bcrypt_cost: u32, account: NewAccount) -> Result<()> {
    let role = if account.admin {
        UserRole::Admin
    } else {
        UserRole::User
    };
    let auth = AuthManager::new(bcrypt_cost);
    let payload = RegistrationPayload {
        email: Some(account.email),
        username: Some(account.username),
        first_name: Some(account.first_name),
        last_name: Some(account.last_name),
        password: Some(account.password),
    };

    let user = accounts::register(database, &auth, payload, role).await?;
    info!(user_id = user.id, role = role.as_str(), "User created");

    println!("\nUser created");
    println!("{}", "=".repeat(50));
    println!("   Id:       {}", user.id);
    println!("   Email:    {}", user.email);
    println!("   Username: {}", user.username);
    println!("   Role:     {}", role.as_str());
    Ok(())
}

/// Grant the admin role to the account with `email`
pub async fn promote(database: &Database, email: &str) -> Result<()> {
    let email = accounts::normalize_email(email);
    let user = database
        .users()
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {email}")))?;

    database.users().set_role(user.id, UserRole::Admin).await?;
    info!(user_id = user.id, "User promoted to admin");
    println!("{} is now an administrator", user.email);
    Ok(())
}
