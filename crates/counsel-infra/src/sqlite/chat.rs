//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `counsel-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, writes on the
//! single-connection writer and reads on the reader pool.

use chrono::{DateTime, SecondsFormat, Utc};
use counsel_core::chat::repository::ChatRepository;
use counsel_types::chat::{
    ChatMessage, ChatSession, MessageRole, ServiceType, SessionFilter, SessionSummary,
};
use counsel_types::error::RepositoryError;
use counsel_types::user::User;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct UserRow {
    id: String,
    name: Option<String>,
    email: Option<String>,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain ChatSession.
struct ChatSessionRow {
    id: String,
    title: String,
    description: Option<String>,
    user_id: Option<String>,
    service_type: String,
    created_at: String,
    updated_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            user_id: row.try_get("user_id")?,
            service_type: row.try_get("service_type")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;
        let service_type: ServiceType = self
            .service_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatSession {
            id,
            title: self.title,
            description: self.description,
            user_id: self.user_id,
            service_type,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
///
/// `prefix` lets the same mapping read the aliased latest-message columns
/// of the session listing query.
struct ChatMessageRow {
    id: String,
    session_id: String,
    sequence: i64,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Self::from_prefixed(row, "")
    }

    fn from_prefixed(row: &sqlx::sqlite::SqliteRow, prefix: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get(format!("{prefix}id").as_str())?,
            session_id: row.try_get(format!("{prefix}session_id").as_str())?,
            sequence: row.try_get(format!("{prefix}sequence").as_str())?,
            role: row.try_get(format!("{prefix}role").as_str())?,
            content: row.try_get(format!("{prefix}content").as_str())?,
            created_at: row.try_get(format!("{prefix}created_at").as_str())?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id,
            session_id,
            sequence: self.sequence,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps so string comparison in SQL is chronological.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

const LIST_SESSIONS_SQL: &str = r#"
SELECT s.id, s.title, s.description, s.user_id, s.service_type, s.created_at, s.updated_at,
       (SELECT COUNT(*) FROM chat_messages c WHERE c.session_id = s.id) AS message_count,
       m.id AS latest_id, m.session_id AS latest_session_id, m.sequence AS latest_sequence,
       m.role AS latest_role, m.content AS latest_content, m.created_at AS latest_created_at
FROM chat_sessions s
LEFT JOIN chat_messages m
       ON m.session_id = s.id
      AND m.sequence = (SELECT MAX(sequence) FROM chat_messages x WHERE x.session_id = s.id)
"#;

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn upsert_user(&self, user: &User) -> Result<User, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO users (id, name, email, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(id) DO NOTHING"#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!(
                        "email already registered to another user: {}",
                        user.email.as_deref().unwrap_or_default()
                    ));
                }
            }
            RepositoryError::Query(e.to_string())
        })?;

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(&self.pool.writer)
            .await
            .map_err(query_error)?;

        UserRow::from_row(&row).map_err(query_error)?.into_user()
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(UserRow::from_row(&row).map_err(query_error)?.into_user()?)),
            None => Ok(None),
        }
    }

    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_sessions (id, title, description, user_id, service_type, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(&session.title)
        .bind(&session.description)
        .bind(&session.user_id)
        .bind(session.service_type.to_string())
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!(
                        "session {} already exists",
                        session.id
                    ));
                }
            }
            RepositoryError::Query(e.to_string())
        })?;

        Ok(session.clone())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let session_row = ChatSessionRow::from_row(&row).map_err(query_error)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn update_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chat_sessions
               SET title = ?, description = ?, service_type = ?
               WHERE id = ?"#,
        )
        .bind(&session.title)
        .bind(&session.description)
        .bind(session.service_type.to_string())
        .bind(session.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn touch_session(
        &self,
        session_id: &Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_sessions SET updated_at = MAX(updated_at, ?) WHERE id = ?")
            .bind(format_datetime(&at))
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_sessions(
        &self,
        filter: &SessionFilter,
    ) -> Result<Vec<SessionSummary>, RepositoryError> {
        let mut sql = String::from(LIST_SESSIONS_SQL);
        match filter {
            SessionFilter::Owner(_) => sql.push_str(" WHERE s.user_id = ?"),
            SessionFilter::Unowned => sql.push_str(" WHERE s.user_id IS NULL"),
            SessionFilter::Any => {}
        }
        sql.push_str(" ORDER BY s.updated_at DESC, s.created_at DESC, s.id DESC");

        let mut query = sqlx::query(&sql);
        if let SessionFilter::Owner(user_id) = filter {
            query = query.bind(user_id);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let session = ChatSessionRow::from_row(row)
                .map_err(query_error)?
                .into_session()?;
            let message_count: i64 = row.try_get("message_count").map_err(query_error)?;
            let latest_id: Option<String> = row.try_get("latest_id").map_err(query_error)?;
            let latest_message = match latest_id {
                Some(_) => Some(
                    ChatMessageRow::from_prefixed(row, "latest_")
                        .map_err(query_error)?
                        .into_message()?,
                ),
                None => None,
            };

            summaries.push(SessionSummary {
                session,
                latest_message,
                message_count,
            });
        }

        Ok(summaries)
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?")
            .bind(session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(query_error)?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await.map_err(query_error)?;
        Ok(())
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<ChatMessage, RepositoryError> {
        // Single statement on the single writer connection, so the sequence
        // lookup and insert cannot race another append.
        let row = sqlx::query(
            r#"INSERT INTO chat_messages (id, session_id, sequence, role, content, created_at)
               VALUES (?, ?,
                       (SELECT COALESCE(MAX(sequence), 0) + 1 FROM chat_messages WHERE session_id = ?),
                       ?, ?, ?)
               RETURNING sequence"#,
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(query_error)?;

        let sequence: i64 = row.try_get("sequence").map_err(query_error)?;
        Ok(ChatMessage {
            sequence,
            ..message.clone()
        })
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM chat_messages WHERE session_id = ? ORDER BY sequence ASC")
            .bind(session_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = ChatMessageRow::from_row(row).map_err(query_error)?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn latest_message(
        &self,
        session_id: &Uuid,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY sequence DESC LIMIT 1",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(ChatMessageRow::from_row(&row).map_err(query_error)?.into_message()?)),
            None => Ok(None),
        }
    }
}
