// ABOUTME: Command modules for foodgram-cli
// ABOUTME: Fixture loading, account administration, and ingredient removal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub mod ingredient;
pub mod load_data;
pub mod user;
