use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| {
            // 在生产环境中应该限制允许的域名
            true
        })
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        // 前端需要携带 X-Session-Id
        .allow_any_header()
        // 浏览器下载 CSV 时需要读取文件名
        .expose_headers(vec![actix_web::http::header::CONTENT_DISPOSITION])
        .supports_credentials()
        .max_age(3600)
}
