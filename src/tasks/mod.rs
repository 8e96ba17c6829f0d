//! Background scheduled tasks for the application.
//!
//! Call `spawn_all` once during startup to launch them.

use crate::services::SessionService;

/// Spawn all background tasks. Detaches via `tokio::spawn`; does not block.
pub fn spawn_all(session_service: SessionService, sweep_interval_secs: u64) {
    // 清理空闲过期的录入会话
    {
        let svc = session_service.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(sweep_interval_secs)).await;
                let expired = svc.expire_idle_sessions().await;
                if expired > 0 {
                    log::info!("Expired idle sessions: {expired}");
                }
            }
        });
    }
}
