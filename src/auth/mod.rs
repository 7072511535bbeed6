//! 认证模块
//!
//! JWT 签发/校验 + 请求提取器 + 路由守卫中间件。
//! 密码哈希在 db::models::User (Argon2)。

mod extractor;
mod jwt;
mod middleware;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtService};
pub use middleware::require_auth;
