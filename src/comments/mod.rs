/// Comment management
///
/// Star-rated comments scoped to a resource.
mod service;

pub use service::CommentService;

use serde::{Deserialize, Serialize};

/// Comment creation request
///
/// Every field defaults when absent so validation can answer with the
/// contract's 400 message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddCommentRequest {
    pub resource_id: String,
    pub author: String,
    pub content: String,
    pub rating: Option<i64>,
}
