use std::sync::Arc;

use shared::models::Role;

use crate::auth::{JwtService, RateLimiter, password};
use crate::core::config::BootstrapAdmin;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::{RepoError, user};
use crate::orders::{OrderEngine, SqliteStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// Clone 为浅拷贝 (Arc / 连接池句柄)。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | orders | 订单引擎 |
/// | rate_limiter | 登录/注册限流 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub orders: Arc<OrderEngine>,
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    /// 由已打开的数据库组装状态
    pub fn new(config: Config, db: DbService) -> Self {
        let store = Arc::new(SqliteStore::new(db.pool.clone()));
        let orders = Arc::new(OrderEngine::new(store.clone(), store));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            jwt_service,
            orders,
            rate_limiter: RateLimiter::new(),
        }
    }

    /// 打开数据库、执行迁移、创建首个管理员
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url).await?;

        if let Some(admin) = &config.bootstrap_admin {
            bootstrap_admin(&db, admin).await?;
        }

        Ok(Self::new(config.clone(), db))
    }

    /// In-memory state for handler tests
    #[cfg(test)]
    pub(crate) async fn for_tests() -> Result<Self> {
        let db = DbService::in_memory().await?;
        Ok(Self::new(Config::for_tests(), db))
    }

    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

async fn bootstrap_admin(db: &DbService, admin: &BootstrapAdmin) -> Result<()> {
    let hash = password::hash_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap admin password: {e}"))?;

    match user::create(&db.pool, &admin.email, &hash, Role::Admin).await {
        Ok(created) => {
            tracing::info!(user_id = created.id, email = %created.email, "Bootstrap admin created");
        }
        Err(RepoError::Duplicate(_)) => {
            tracing::debug!(email = %admin.email, "Bootstrap admin already exists");
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to create bootstrap admin: {e}").into());
        }
    }
    Ok(())
}
