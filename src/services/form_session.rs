use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{RecordCollector, RegionIndex};
use crate::utils::{format_date_parts, validate_date_parts, validate_price};

/// One user's data-entry session: the shared region index plus the
/// session's own record list.
#[derive(Debug)]
pub struct FormSession {
    id: Uuid,
    regions: Arc<RegionIndex>,
    collector: RecordCollector,
    created_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
}

impl FormSession {
    pub fn new(regions: Arc<RegionIndex>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            regions,
            collector: RecordCollector::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id,
            created_at: self.created_at,
            last_active_at: self.last_active_at,
            record_count: self.collector.len(),
        }
    }

    pub fn collector(&self) -> &RecordCollector {
        &self.collector
    }

    /// Build a record from the submitted form state.
    ///
    /// The region must be a combination the cascading selectors can show;
    /// date parts are range-checked only, so 2023-02-30 is accepted.
    pub fn build_record(&self, request: CreateRecordRequest) -> AppResult<SubsidyRecord> {
        if !self
            .regions
            .is_cascade_selection(&request.province, &request.city, &request.county)
        {
            return Err(AppError::ValidationError(format!(
                "无效的行政区选择: {} / {} / {}",
                request.province, request.city, request.county
            )));
        }
        validate_date_parts("date_from", &request.date_from)?;
        validate_date_parts("date_to", &request.date_to)?;
        validate_price(request.price)?;

        let unit = request.unit.resolve(request.custom_unit.as_deref());

        Ok(SubsidyRecord {
            province: request.province,
            city: request.city,
            county: request.county,
            date_from: format_date_parts(&request.date_from),
            date_to: format_date_parts(&request.date_to),
            subsidy_type: request.subsidy_type,
            price: request.price,
            unit,
            remark: request.remark.unwrap_or_default(),
        })
    }

    pub fn submit(&mut self, request: CreateRecordRequest) -> AppResult<&SubsidyRecord> {
        let record = self.build_record(request)?;
        self.collector.append(record);
        self.touch();
        log::info!(
            "Session {} appended record #{}",
            self.id,
            self.collector.len()
        );
        self.collector
            .records()
            .last()
            .ok_or_else(|| AppError::InternalError("record list is empty after append".to_string()))
    }

    pub fn export(&self) -> AppResult<Vec<u8>> {
        self.collector.export()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> Arc<RegionIndex> {
        let csv = "province,city,county\n广东省,深圳市,\n广东省,深圳市,南山区\n";
        Arc::new(RegionIndex::from_reader(csv.as_bytes(), 50).unwrap())
    }

    fn request() -> CreateRecordRequest {
        serde_json::from_str(r#"{"province":"广东省","city":"深圳市","county":"全县"}"#).unwrap()
    }

    #[test]
    fn test_submit_with_defaults() {
        let mut session = FormSession::new(regions());
        let record = session.submit(request()).unwrap().clone();

        assert_eq!(record.county, WHOLE_COUNTY);
        assert_eq!(record.date_from, "2023-01-01");
        assert_eq!(record.date_to, "2025-12-31");
        assert_eq!(record.subsidy_type, SubsidyType::PerKwh);
        assert_eq!(record.price, 0.10);
        assert_eq!(record.unit, "W");
        assert_eq!(record.remark, "");
        assert_eq!(session.info().record_count, 1);
    }

    #[test]
    fn test_unvalidated_calendar_date_is_kept() {
        let session = FormSession::new(regions());
        let mut req = request();
        req.date_from = DateParts::new(2023, 2, 30);
        let record = session.build_record(req).unwrap();
        assert_eq!(record.date_from, "2023-02-30");
    }

    #[test]
    fn test_custom_unit() {
        let session = FormSession::new(regions());
        let mut req = request();
        req.unit = UnitOption::Other;
        req.custom_unit = Some("元/户".to_string());
        assert_eq!(session.build_record(req).unwrap().unit, "元/户");
    }

    #[test]
    fn test_rejects_out_of_range_input() {
        let session = FormSession::new(regions());

        let mut req = request();
        req.date_to = DateParts::new(2051, 1, 1);
        assert!(matches!(session.build_record(req), Err(AppError::ValidationError(_))));

        let mut req = request();
        req.price = -1.0;
        assert!(matches!(session.build_record(req), Err(AppError::ValidationError(_))));

        let mut req = request();
        req.county = "福田区".to_string();
        assert!(matches!(session.build_record(req), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_failed_submit_does_not_append() {
        let mut session = FormSession::new(regions());
        let mut req = request();
        req.price = f64::NAN;
        assert!(session.submit(req).is_err());
        assert!(session.collector().is_empty());
    }

    #[test]
    fn test_sessions_are_independent() {
        let shared = regions();
        let mut a = FormSession::new(shared.clone());
        let b = FormSession::new(shared);
        a.submit(request()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.collector().len(), 1);
        assert!(b.collector().is_empty());
    }
}
