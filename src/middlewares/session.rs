use crate::error::AppError;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use uuid::Uuid;

pub const SESSION_HEADER: &str = "X-Session-Id";

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            // 完全匹配的公开路径（创建会话不需要会话ID）
            exact_paths: vec![
                "/swagger-ui",
                "/swagger-ui/",
                "/api-docs/openapi.json",
                "/api/v1/sessions",
            ],
            // 前缀匹配的公开路径（行政区查询与表单选项与会话无关）
            prefix_paths: vec![
                "/swagger-ui/",
                "/api-docs/",
                "/api/v1/regions/",
                "/api/v1/form/",
            ],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }

        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

/// Resolves the `X-Session-Id` header into a `Uuid` request extension.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service,
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if self.public_paths.is_public_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let header = req
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim);

        match header.map(Uuid::parse_str) {
            Some(Ok(session_id)) => {
                req.extensions_mut().insert(session_id);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Some(Err(_)) => {
                let error = AppError::SessionError("Invalid session id".to_string());
                Box::pin(async move { Err(error.into()) })
            }
            None => {
                let error = AppError::SessionError("Missing session id".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpRequest, HttpResponse, ResponseError, test, web};

    async fn echo_session(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<Uuid>() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::Ok().body("none"),
        }
    }

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new().wrap(SessionMiddleware).service(
                    web::resource("/api/v1/session/records")
                        .route(web::get().to(echo_session))
                        .route(web::method(Method::OPTIONS).to(echo_session)),
                ),
            )
            .await
        };
    }

    fn status_of<B>(result: Result<ServiceResponse<B>, Error>) -> StatusCode {
        match result {
            Ok(resp) => resp.status(),
            Err(e) => e.as_response_error().status_code(),
        }
    }

    #[actix_web::test]
    async fn test_malformed_session_header_is_unauthorized() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/v1/session/records")
            .insert_header((SESSION_HEADER, "not-a-uuid"))
            .to_request();
        let result = test::try_call_service(&app, req).await;
        assert_eq!(status_of(result), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_missing_session_header_is_unauthorized() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/v1/session/records")
            .to_request();
        let result = test::try_call_service(&app, req).await;
        assert_eq!(status_of(result), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_session_header_is_attached() {
        let app = init_app!();
        let session_id = Uuid::new_v4();
        let req = test::TestRequest::get()
            .uri("/api/v1/session/records")
            .insert_header((SESSION_HEADER, format!(" {session_id} ")))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, session_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn test_preflight_bypasses_session_check() {
        let app = init_app!();
        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/v1/session/records")
            .to_request();
        let result = test::try_call_service(&app, req).await;
        assert_eq!(status_of(result), StatusCode::OK);
    }

    #[::core::prelude::v1::test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path("/api/v1/sessions"));
        assert!(paths.is_public_path("/api/v1/regions/search"));
        assert!(paths.is_public_path("/api/v1/form/options"));
        assert!(paths.is_public_path("/swagger-ui/index.html"));
        assert!(!paths.is_public_path("/api/v1/session"));
        assert!(!paths.is_public_path("/api/v1/session/records"));
    }
}
