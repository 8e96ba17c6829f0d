use crate::models::*;
use crate::services::RegionService;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/regions/search",
    tag = "region",
    params(
        ("q" = Option<String>, Query, description = "省/市/县任意名称，区分大小写的子串匹配")
    ),
    responses(
        (status = 200, description = "模糊搜索结果（最多 50 条）", body = RegionSearchResponse)
    )
)]
pub async fn search_regions(
    region_service: web::Data<RegionService>,
    query: web::Query<RegionSearchQuery>,
) -> Result<HttpResponse> {
    let response = region_service.search(query.q.as_deref());
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/regions/select",
    tag = "region",
    params(
        ("q" = Option<String>, Query, description = "搜索文本"),
        ("label" = Option<String>, Query, description = "选中的候选项：省 / 市 / 县")
    ),
    responses(
        (status = 200, description = "选中的行政区及预填的级联状态", body = RegionSelectResponse)
    )
)]
pub async fn select_region(
    region_service: web::Data<RegionService>,
    query: web::Query<RegionSelectQuery>,
) -> Result<HttpResponse> {
    let response = region_service.select(query.q.as_deref(), query.label.as_deref());
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/regions/provinces",
    tag = "region",
    responses(
        (status = 200, description = "全部省份（排序去重）")
    )
)]
pub async fn get_provinces(region_service: web::Data<RegionService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(region_service.provinces())))
}

#[utoipa::path(
    get,
    path = "/regions/cities",
    tag = "region",
    params(
        ("province" = String, Query, description = "省份")
    ),
    responses(
        (status = 200, description = "该省城市列表，含\"全省\""),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn get_cities(
    region_service: web::Data<RegionService>,
    query: web::Query<CitiesQuery>,
) -> Result<HttpResponse> {
    let cities = region_service.cities(&query.province);
    Ok(HttpResponse::Ok().json(ApiResponse::success(cities)))
}

#[utoipa::path(
    get,
    path = "/regions/counties",
    tag = "region",
    params(
        ("province" = String, Query, description = "省份"),
        ("city" = String, Query, description = "城市")
    ),
    responses(
        (status = 200, description = "该市县/区列表，含\"全市\""),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn get_counties(
    region_service: web::Data<RegionService>,
    query: web::Query<CountiesQuery>,
) -> Result<HttpResponse> {
    let counties = region_service.counties(&query.province, &query.city);
    Ok(HttpResponse::Ok().json(ApiResponse::success(counties)))
}

#[utoipa::path(
    get,
    path = "/regions/cascade",
    tag = "region",
    params(
        ("province" = Option<String>, Query, description = "默认省份"),
        ("city" = Option<String>, Query, description = "默认城市"),
        ("county" = Option<String>, Query, description = "默认县/区")
    ),
    responses(
        (status = 200, description = "级联下拉框状态，未匹配的默认值回退到第一项", body = CascadeSelection)
    )
)]
pub async fn get_cascade(
    region_service: web::Data<RegionService>,
    query: web::Query<CascadeQuery>,
) -> Result<HttpResponse> {
    let selection = region_service.cascade(&query);
    Ok(HttpResponse::Ok().json(ApiResponse::success(selection)))
}

pub fn region_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/regions")
            .route("/search", web::get().to(search_regions))
            .route("/select", web::get().to(select_region))
            .route("/provinces", web::get().to(get_provinces))
            .route("/cities", web::get().to(get_cities))
            .route("/counties", web::get().to(get_counties))
            .route("/cascade", web::get().to(get_cascade)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RegionIndex;
    use actix_web::{App, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn region_service() -> RegionService {
        let csv = "province,city,county\n广东省,深圳市,\n广东省,深圳市,南山区\n北京市,北京市,朝阳区\n";
        RegionService::new(Arc::new(
            RegionIndex::from_reader(csv.as_bytes(), 50).unwrap(),
        ))
    }

    #[actix_web::test]
    async fn test_search_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(region_service()))
                .service(web::scope("/api/v1").configure(region_config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/regions/search?q=%E6%B7%B1%E5%9C%B3")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        let candidates = body["data"]["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["label"], "广东省 / 深圳市 / 全县");
    }

    #[actix_web::test]
    async fn test_search_without_query_is_empty() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(region_service()))
                .service(web::scope("/api/v1").configure(region_config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/regions/search")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"]["candidates"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_counties_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(region_service()))
                .service(web::scope("/api/v1").configure(region_config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/regions/counties?province=%E5%B9%BF%E4%B8%9C%E7%9C%81&city=%E6%B7%B1%E5%9C%B3%E5%B8%82")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], serde_json::json!(["全县", "全市", "南山区"]));
    }
}
