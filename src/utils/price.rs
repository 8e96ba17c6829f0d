use crate::error::{AppError, AppResult};

/// 补贴价格必须为非负有限数
pub fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() {
        return Err(AppError::ValidationError(
            "price must be a finite number".to_string(),
        ));
    }
    if price < 0.0 {
        return Err(AppError::ValidationError(
            "price must not be negative".to_string(),
        ));
    }
    Ok(())
}
