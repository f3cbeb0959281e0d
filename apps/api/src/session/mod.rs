//! In-memory, per-browser-session state. Nothing here outlives the process.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::documents::cover_letter::CoverLetter;
use crate::documents::PageImage;
use crate::errors::AppError;

/// A resume whose pages were all rendered successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub file_name: String,
    pub pages: Vec<PageImage>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub resume: Option<ResumeDocument>,
    pub cover_letter: Option<CoverLetter>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            resume: None,
            cover_letter: None,
            created_at: now,
            last_seen: now,
        }
    }

    pub fn resume_uploaded(&self) -> bool {
        self.resume.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.id,
            resume_uploaded: self.resume_uploaded(),
            resume_file_name: self.resume.as_ref().map(|r| r.file_name.clone()),
            resume_page_count: self.resume.as_ref().map_or(0, |r| r.pages.len()),
            cover_letter: self.cover_letter.as_ref().map(CoverLetterStatus::from),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub resume_uploaded: bool,
    pub resume_file_name: Option<String>,
    pub resume_page_count: usize,
    pub cover_letter: Option<CoverLetterStatus>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterStatus {
    pub file_name: String,
    /// "text" or "pages"
    pub kind: &'static str,
    pub page_count: usize,
}

impl From<&CoverLetter> for CoverLetterStatus {
    fn from(letter: &CoverLetter) -> Self {
        Self {
            file_name: letter.file_name().to_string(),
            kind: match letter {
                CoverLetter::Text { .. } => "text",
                CoverLetter::Pages { .. } => "pages",
            },
            page_count: letter.pages().len(),
        }
    }
}

/// Shared session map. Cloning shares the same map.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs.min(i64::MAX as u64 / 1000) as i64),
        }
    }

    /// Creates a session, dropping idle ones first.
    pub async fn create(&self) -> Session {
        let now = Utc::now();
        let session = Session::new(now);
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_seen <= self.ttl);
        if sessions.len() < before {
            debug!("Expired {} idle session(s)", before - sessions.len());
        }
        sessions.insert(session.id, session.clone());
        session
    }

    /// Returns a copy of the session. Page buffers are reference-counted, so
    /// this does not duplicate image data.
    pub async fn snapshot(&self, id: Uuid) -> Result<Session, AppError> {
        let mut sessions = self.inner.write().await;
        let session = self.touch(&mut sessions, id)?;
        Ok(session.clone())
    }

    /// Applies `f` to the session under the write lock.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Result<T, AppError> {
        let mut sessions = self.inner.write().await;
        let session = self.touch(&mut sessions, id)?;
        Ok(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Looks up a live session and marks it as seen. A session idle for
    /// longer than the TTL is dropped and reported as not found.
    fn touch<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, Session>,
        id: Uuid,
    ) -> Result<&'a mut Session, AppError> {
        let now = Utc::now();
        let expired = match sessions.get(&id) {
            Some(s) => now - s.last_seen > self.ttl,
            None => return Err(not_found(id)),
        };
        if expired {
            sessions.remove(&id);
            debug!("Session {id} expired");
            return Err(not_found(id));
        }
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.last_seen = now;
        Ok(session)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
