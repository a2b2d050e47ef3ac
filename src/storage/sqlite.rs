/// SQLite storage backend
///
/// Each operation is a single parameterized statement against the
/// `resources` and `comments` tables; filtering and sorting are pushed
/// into SQL. The schema is created at startup with idempotent statements.
use crate::error::{ShelfError, ShelfResult};
use crate::storage::{
    Comment, NewComment, NewResource, Resource, ResourceFilter, StorageBackend,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::Path;
use uuid::Uuid;

/// Create a SQLite connection pool, creating the database file if missing
pub async fn create_pool(path: &Path) -> ShelfResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5)),
    )
    .await
    .map_err(ShelfError::Database)?;

    Ok(pool)
}

/// Relational store over a SQLite pool
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create the catalog tables if they do not exist yet
    pub async fn init_schema(&self) -> ShelfResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resources (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                subject TEXT NOT NULL,
                grade TEXT NOT NULL,
                uploader TEXT NOT NULL,
                file_name TEXT NOT NULL,
                file_type TEXT NOT NULL,
                file_size INTEGER NOT NULL,
                download_count INTEGER NOT NULL DEFAULT 0,
                uploaded_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                resource_id TEXT NOT NULL,
                author TEXT NOT NULL,
                content TEXT NOT NULL,
                rating INTEGER NOT NULL,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_comments_resource
             ON comments (resource_id, created_at)",
        )
        .execute(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_resources_uploaded
             ON resources (uploaded_at)",
        )
        .execute(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        Ok(())
    }
}

const RESOURCE_COLUMNS: &str = "id, title, description, subject, grade, uploader, \
     file_name, file_type, file_size, download_count, uploaded_at";

fn row_to_resource(row: &SqliteRow) -> ShelfResult<Resource> {
    let subject: String = row.try_get("subject")?;
    let grade: String = row.try_get("grade")?;
    let file_type: String = row.try_get("file_type")?;

    Ok(Resource {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        subject: subject.parse().map_err(ShelfError::Internal)?,
        grade: grade.parse().map_err(ShelfError::Internal)?,
        uploader: row.try_get("uploader")?,
        file_name: row.try_get("file_name")?,
        file_type: file_type.parse().map_err(ShelfError::Internal)?,
        file_size: row.try_get("file_size")?,
        download_count: row.try_get("download_count")?,
        uploaded_at: row.try_get("uploaded_at")?,
    })
}

fn row_to_comment(row: &SqliteRow) -> ShelfResult<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        resource_id: row.try_get("resource_id")?,
        author: row.try_get("author")?,
        content: row.try_get("content")?,
        rating: row.try_get("rating")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl StorageBackend for SqliteStore {
    async fn list_resources(&self, filter: &ResourceFilter) -> ShelfResult<Vec<Resource>> {
        // The WHERE clause is assembled from whichever filters are present;
        // values are always bound, never interpolated.
        let mut sql = format!("SELECT {} FROM resources", RESOURCE_COLUMNS);
        let mut clauses: Vec<&str> = Vec::new();
        if filter.subject.is_some() {
            clauses.push("subject = ?");
        }
        if filter.grade.is_some() {
            clauses.push("grade = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY uploaded_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(subject) = filter.subject {
            query = query.bind(subject.as_str());
        }
        if let Some(grade) = filter.grade {
            query = query.bind(grade.as_str());
        }

        let rows = query
            .fetch_all(&self.db)
            .await
            .map_err(ShelfError::Database)?;

        rows.iter().map(row_to_resource).collect()
    }

    async fn get_resource(&self, id: &str) -> ShelfResult<Option<Resource>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM resources WHERE id = ?1",
            RESOURCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        match row {
            Some(row) => Ok(Some(row_to_resource(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_resource(&self, new: NewResource) -> ShelfResult<Resource> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO resources
                (id, title, description, subject, grade, uploader,
                 file_name, file_type, file_size, download_count, uploaded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.subject.as_str())
        .bind(new.grade.as_str())
        .bind(&new.uploader)
        .bind(&new.file_name)
        .bind(new.file_type.as_str())
        .bind(new.file_size)
        .bind(0i64)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        Ok(Resource {
            id,
            title: new.title,
            description: new.description,
            subject: new.subject,
            grade: new.grade,
            uploader: new.uploader,
            file_name: new.file_name,
            file_type: new.file_type,
            file_size: new.file_size,
            download_count: 0,
            uploaded_at: now,
        })
    }

    async fn increment_download_count(&self, id: &str) -> ShelfResult<()> {
        // A missing id updates zero rows, which is the tolerated no-op.
        sqlx::query("UPDATE resources SET download_count = download_count + 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ShelfError::Database)?;

        Ok(())
    }

    async fn delete_resource(&self, id: &str) -> ShelfResult<()> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ShelfError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ShelfError::NotFound(format!("Resource not found: {}", id)));
        }

        Ok(())
    }

    async fn list_comments(&self, resource_id: &str) -> ShelfResult<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, resource_id, author, content, rating, created_at
             FROM comments WHERE resource_id = ?1 ORDER BY created_at DESC",
        )
        .bind(resource_id)
        .fetch_all(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        rows.iter().map(row_to_comment).collect()
    }

    async fn create_comment(&self, new: NewComment) -> ShelfResult<Comment> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO comments (id, resource_id, author, content, rating, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(&new.resource_id)
        .bind(&new.author)
        .bind(&new.content)
        .bind(new.rating)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ShelfError::Database)?;

        Ok(Comment {
            id,
            resource_id: new.resource_id,
            author: new.author,
            content: new.content,
            rating: new.rating,
            created_at: now,
        })
    }
}
