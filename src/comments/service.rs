/// Comment service
use crate::comments::AddCommentRequest;
use crate::error::{ShelfError, ShelfResult};
use crate::storage::{Comment, NewComment, StorageBackend};
use std::sync::Arc;

pub struct CommentService {
    store: Arc<dyn StorageBackend>,
}

impl CommentService {
    pub fn new(store: Arc<dyn StorageBackend>) -> Self {
        Self { store }
    }

    /// Validate and persist a comment
    ///
    /// The resource reference is deliberately not checked; comments may
    /// outlive the resource they point at.
    pub async fn add(&self, req: AddCommentRequest) -> ShelfResult<Comment> {
        let rating = match req.rating {
            Some(rating) => rating,
            None => return Err(ShelfError::Validation("缺少必填字段".to_string())),
        };
        if req.resource_id.trim().is_empty()
            || req.author.trim().is_empty()
            || req.content.trim().is_empty()
        {
            return Err(ShelfError::Validation("缺少必填字段".to_string()));
        }
        if !(1..=5).contains(&rating) {
            return Err(ShelfError::Validation("评分必须在 1-5 之间".to_string()));
        }

        let comment = self
            .store
            .create_comment(NewComment {
                resource_id: req.resource_id,
                author: req.author,
                content: req.content,
                rating,
            })
            .await?;

        tracing::info!(
            "Added comment {} on resource {}",
            comment.id,
            comment.resource_id
        );

        Ok(comment)
    }

    /// List comments for a resource, newest first
    pub async fn list(&self, resource_id: &str) -> ShelfResult<Vec<Comment>> {
        self.store.list_comments(resource_id).await
    }
}
