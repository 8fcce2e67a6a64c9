use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite:storefront.db | SQLite 数据库 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | JWT_SECRET | (开发环境自动生成) | JWT 密钥, 非开发环境必填 |
/// | JWT_EXPIRATION_MINUTES | 60 | 令牌有效期 |
/// | MAX_BODY_BYTES | 5242880 | 请求体上限 (图片以 base64 上传) |
/// | BOOTSTRAP_ADMIN_EMAIL / BOOTSTRAP_ADMIN_PASSWORD | - | 首个管理员账号 |
///
/// 日志相关变量 (`LOG_LEVEL`, `LOG_DIR`, `LOG_JSON`) 由
/// [`crate::setup_environment`] 在加载配置前读取。
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub max_body_bytes: usize,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Admin account created at startup when no account uses this email
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &str, environment: &str) -> Result<String> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(ServerError::Config(format!(
                        "{name} must be set in {environment} environment"
                    )));
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(ServerError::Config(format!(
                "{name} must not be empty in {environment} environment"
            )));
        }
        Ok(val)
    }

    fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn optional_env(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt_secret = Self::require_secret("JWT_SECRET", &environment)?;

        let bootstrap_admin = match (
            Self::optional_env("BOOTSTRAP_ADMIN_EMAIL"),
            Self::optional_env("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => {
                return Err(ServerError::Config(
                    "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
                        .into(),
                ));
            }
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:storefront.db".into()),
            http_port: Self::parse_env("HTTP_PORT", 3000),
            jwt: JwtConfig::new(jwt_secret, Self::parse_env("JWT_EXPIRATION_MINUTES", 60)),
            max_body_bytes: Self::parse_env("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
            bootstrap_admin,
            environment,
        })
    }

    /// In-memory configuration for tests
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            environment: "development".into(),
            jwt: JwtConfig::new("test-secret-at-least-32-characters!!", 60),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            bootstrap_admin: None,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
