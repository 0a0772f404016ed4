// ABOUTME: HTTP middleware for CORS, request tracing, and request-id propagation
// ABOUTME: Layers are applied once around the merged router in the server module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

/// Cross-origin resource sharing
pub mod cors;
/// Request spans and request ids
pub mod tracing;

pub use cors::setup_cors;
pub use tracing::{
    create_request_span, propagate_request_id_layer, set_request_id_layer, trace_layer,
    REQUEST_ID_HEADER,
};
