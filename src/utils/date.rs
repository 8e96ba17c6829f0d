use crate::error::{AppError, AppResult};
use crate::models::{DAY_MAX, DAY_MIN, DateParts, MONTH_MAX, MONTH_MIN, YEAR_MAX, YEAR_MIN};

/// 校验年月日各自的取值范围（不做日历合法性校验，2月30日可以通过）
pub fn validate_date_parts(field: &str, date: &DateParts) -> AppResult<()> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&date.year) {
        return Err(AppError::ValidationError(format!(
            "{field}: year must be between {YEAR_MIN} and {YEAR_MAX}"
        )));
    }
    if !(MONTH_MIN..=MONTH_MAX).contains(&date.month) {
        return Err(AppError::ValidationError(format!(
            "{field}: month must be between {MONTH_MIN} and {MONTH_MAX}"
        )));
    }
    if !(DAY_MIN..=DAY_MAX).contains(&date.day) {
        return Err(AppError::ValidationError(format!(
            "{field}: day must be between {DAY_MIN} and {DAY_MAX}"
        )));
    }
    Ok(())
}

/// 格式化为 YYYY-MM-DD
pub fn format_date_parts(date: &DateParts) -> String {
    format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
}
