use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use pv_subsidy_backend::{
    config::Config,
    handlers::{self, session::ExportFileName},
    middlewares::{SessionMiddleware, create_cors},
    services::{RegionIndex, RegionService, SessionService},
    swagger::swagger_config,
    tasks,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().context("Failed to load configuration")?;

    // 加载行政区划参考表，失败则直接退出
    let region_index = RegionIndex::load_from_csv(&config.region.data_path, config.region.search_limit)
        .with_context(|| {
            format!(
                "Failed to load administrative regions from {}",
                config.region.data_path
            )
        })?;
    let region_index = Arc::new(region_index);

    // 创建服务
    let region_service = RegionService::new(region_index.clone());
    let session_service = SessionService::new(region_index, config.session.idle_timeout_secs);
    let export_file_name = ExportFileName(config.export.file_name.clone());

    tasks::spawn_all(session_service.clone(), config.session.sweep_interval_secs);

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(SessionMiddleware)
            .app_data(web::Data::new(region_service.clone()))
            .app_data(web::Data::new(session_service.clone()))
            .app_data(web::Data::new(export_file_name.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::region_config)
                    .configure(handlers::form_config)
                    .configure(handlers::session_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
