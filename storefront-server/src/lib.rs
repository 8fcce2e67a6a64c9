//! Storefront Server - 电商店面后端
//!
//! # 架构概述
//!
//! - **订单引擎** (`orders`): 库存校验、下单、收货扣减库存、报表
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移、仓储函数
//! - **认证** (`auth`): JWT + Argon2, 角色守卫, 登录限流
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # 配置、状态、错误、服务器生命周期
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验
//! ├── db/            # 数据库层
//! └── orders/        # 订单引擎
//! ```

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderEngine;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env, 初始化日志
pub fn setup_environment() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    let json = std::env::var("LOG_JSON")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
}
