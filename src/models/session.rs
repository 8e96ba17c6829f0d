use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::SubsidyRecord;

/// 会话空闲超时上限（一年）
pub const MAX_IDLE_TIMEOUT_SECS: i64 = 365 * 24 * 3600;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub record_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordListResponse {
    pub records: Vec<SubsidyRecord>,
    pub total: usize,
    /// 为空时前端显示"暂无录入数据"
    pub is_empty: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppendRecordResponse {
    pub record: SubsidyRecord,
    pub total: usize,
}
