use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{FormSession, RegionIndex};

/// In-memory registry of live form sessions.
#[derive(Clone)]
pub struct SessionService {
    regions: Arc<RegionIndex>,
    sessions: Arc<Mutex<HashMap<Uuid, FormSession>>>,
    idle_timeout: Duration,
}

impl SessionService {
    pub fn new(regions: Arc<RegionIndex>, idle_timeout_secs: i64) -> Self {
        Self {
            regions,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout: Duration::try_seconds(idle_timeout_secs.min(MAX_IDLE_TIMEOUT_SECS))
                .unwrap_or(Duration::MAX),
        }
    }

    pub async fn create_session(&self) -> SessionInfo {
        let session = FormSession::new(self.regions.clone());
        let info = session.info();
        self.sessions.lock().await.insert(session.id(), session);
        log::info!("Session created: {}", info.session_id);
        info
    }

    pub async fn get_session(&self, session_id: Uuid) -> AppResult<SessionInfo> {
        let mut sessions = self.sessions.lock().await;
        let session = Self::active_session(&mut sessions, session_id)?;
        Ok(session.info())
    }

    pub async fn close_session(&self, session_id: Uuid) -> AppResult<()> {
        match self.sessions.lock().await.remove(&session_id) {
            Some(session) => {
                log::info!(
                    "Session closed: {session_id} ({} records)",
                    session.collector().len()
                );
                Ok(())
            }
            None => Err(session_not_found(session_id)),
        }
    }

    pub async fn append_record(
        &self,
        session_id: Uuid,
        request: CreateRecordRequest,
    ) -> AppResult<AppendRecordResponse> {
        let mut sessions = self.sessions.lock().await;
        let session = Self::active_session(&mut sessions, session_id)?;
        let record = session.submit(request)?.clone();

        Ok(AppendRecordResponse {
            record,
            total: session.collector().len(),
        })
    }

    pub async fn list_records(&self, session_id: Uuid) -> AppResult<RecordListResponse> {
        let mut sessions = self.sessions.lock().await;
        let session = Self::active_session(&mut sessions, session_id)?;
        let collector = session.collector();

        Ok(RecordListResponse {
            records: collector.records().to_vec(),
            total: collector.len(),
            is_empty: collector.is_empty(),
        })
    }

    pub async fn export_records(&self, session_id: Uuid) -> AppResult<Vec<u8>> {
        let mut sessions = self.sessions.lock().await;
        let session = Self::active_session(&mut sessions, session_id)?;
        let bytes = session.export()?;
        log::debug!(
            "Session {session_id} exported {} records ({} bytes)",
            session.collector().len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// 清理超过空闲时间的会话，返回清理数量
    pub async fn expire_idle_sessions(&self) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(self.idle_timeout) else {
            log::warn!("Idle timeout {} out of range, skip sweep", self.idle_timeout);
            return 0;
        };
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active_at() > cutoff);
        before - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn active_session(
        sessions: &mut HashMap<Uuid, FormSession>,
        session_id: Uuid,
    ) -> AppResult<&mut FormSession> {
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        session.touch();
        Ok(session)
    }
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {session_id} not found or expired"))
}
