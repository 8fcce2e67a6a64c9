//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户 (extractor, 从数据库加载)
//! - [`password`] - argon2 密码哈希
//! - [`rate_limit`] - 登录/注册限流

pub mod extractor;
pub mod jwt;
pub mod password;
pub mod rate_limit;

pub use extractor::{CurrentUser, MaybeUser};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use rate_limit::RateLimiter;
