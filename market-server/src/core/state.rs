//! Application state

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::vnpay::VnpayConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 服务器状态 - 持有配置与数据库连接池
///
/// 使用 Arc 语义的浅拷贝类型（SqlitePool 内部已是 Arc），
/// 可以在 axum handler 间廉价 clone。
#[derive(Clone)]
pub struct AppState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
}

impl AppState {
    /// Create a new AppState: open the database and apply migrations
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: config.clone(),
            pool: db.pool,
        })
    }

    /// Gateway adapter configuration derived from server config
    pub fn vnpay_config(&self) -> VnpayConfig {
        VnpayConfig {
            tmn_code: self.config.vnpay_tmn_code.clone(),
            hash_secret: self.config.vnpay_hash_secret.clone(),
            api_url: self.config.vnpay_api_url.clone(),
            return_url: self.config.vnpay_return_url.clone(),
        }
    }
}
