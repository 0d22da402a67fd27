//! Request types accepted by the proxy surface

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credentials for sign-in
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// New-account registration payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Display name for the account
    pub name: String,
}

/// Status transition for an order or custom-cake request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: String,
}
