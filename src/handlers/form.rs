use crate::models::*;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/form/options",
    tag = "form",
    responses(
        (status = 200, description = "补贴类型、单位、日期范围及表单默认值", body = FormOptions)
    )
)]
pub async fn get_form_options() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(FormOptions::default())))
}

pub fn form_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/form").route("/options", web::get().to(get_form_options)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_form_options() {
        let app = test::init_service(App::new().configure(form_config)).await;
        let req = test::TestRequest::get().uri("/form/options").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["subsidy_types"], serde_json::json!(["度电补贴", "初装补贴"]));
        assert_eq!(body["data"]["units"], serde_json::json!(["W", "kW", "KWh", "其它"]));
        assert_eq!(body["data"]["date_bounds"]["year_min"], 2000);
        assert_eq!(body["data"]["defaults"]["date_to"]["day"], 31);
    }
}
