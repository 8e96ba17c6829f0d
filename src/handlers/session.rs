use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::SessionService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

/// Name of the CSV download.
#[derive(Debug, Clone)]
pub struct ExportFileName(pub String);

fn get_session_id_from_request(req: &HttpRequest) -> AppResult<Uuid> {
    req.extensions()
        .get::<Uuid>()
        .copied()
        .ok_or_else(|| AppError::SessionError("Missing session id".to_string()))
}

#[utoipa::path(
    post,
    path = "/sessions",
    tag = "session",
    responses(
        (status = 200, description = "创建录入会话成功", body = SessionInfo)
    )
)]
pub async fn create_session(session_service: web::Data<SessionService>) -> Result<HttpResponse> {
    let info = session_service.create_session().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(info)))
}

#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    params(
        ("X-Session-Id" = String, Header, description = "会话ID")
    ),
    responses(
        (status = 200, description = "会话信息", body = SessionInfo),
        (status = 401, description = "缺少或无效的会话ID"),
        (status = 404, description = "会话不存在或已过期")
    )
)]
pub async fn get_session(
    session_service: web::Data<SessionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = match get_session_id_from_request(&req) {
        Ok(session_id) => session_service.get_session(session_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(info) => Ok(HttpResponse::Ok().json(ApiResponse::success(info))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/session",
    tag = "session",
    params(
        ("X-Session-Id" = String, Header, description = "会话ID")
    ),
    responses(
        (status = 200, description = "会话已关闭"),
        (status = 404, description = "会话不存在或已过期")
    )
)]
pub async fn close_session(
    session_service: web::Data<SessionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = match get_session_id_from_request(&req) {
        Ok(session_id) => session_service.close_session(session_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message((), "会话已关闭"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/session/records",
    tag = "session",
    params(
        ("X-Session-Id" = String, Header, description = "会话ID")
    ),
    responses(
        (status = 200, description = "已录入政策数据", body = RecordListResponse),
        (status = 404, description = "会话不存在或已过期")
    )
)]
pub async fn list_records(
    session_service: web::Data<SessionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = match get_session_id_from_request(&req) {
        Ok(session_id) => session_service.list_records(session_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(list) if list.is_empty => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(list, "暂无录入数据。")))
        }
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/session/records",
    tag = "session",
    request_body = CreateRecordRequest,
    params(
        ("X-Session-Id" = String, Header, description = "会话ID")
    ),
    responses(
        (status = 200, description = "记录添加成功", body = AppendRecordResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "会话不存在或已过期")
    )
)]
pub async fn append_record(
    session_service: web::Data<SessionService>,
    req: HttpRequest,
    request: web::Json<CreateRecordRequest>,
) -> Result<HttpResponse> {
    let result = match get_session_id_from_request(&req) {
        Ok(session_id) => {
            session_service
                .append_record(session_id, request.into_inner())
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(response, "记录添加成功！")))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/session/export",
    tag = "session",
    params(
        ("X-Session-Id" = String, Header, description = "会话ID")
    ),
    responses(
        (status = 200, description = "下载全部数据为CSV", content_type = "text/csv"),
        (status = 404, description = "会话不存在或已过期")
    )
)]
pub async fn export_records(
    session_service: web::Data<SessionService>,
    file_name: web::Data<ExportFileName>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = match get_session_id_from_request(&req) {
        Ok(session_id) => session_service.export_records(session_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file_name.0),
            ))
            .body(bytes)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn session_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/sessions", web::post().to(create_session)).service(
        web::scope("/session")
            .route("", web::get().to(get_session))
            .route("", web::delete().to(close_session))
            .route("/records", web::get().to(list_records))
            .route("/records", web::post().to(append_record))
            .route("/export", web::get().to(export_records)),
    );
}
