/**
 * Routes Module
 * API route handlers
 */
pub mod ai;
pub mod auth;
pub mod brand;
pub mod health;
pub mod posts;
pub mod upload;

use serde::{Deserialize, Serialize};

/// Acknowledgement for operations with nothing else to report
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
