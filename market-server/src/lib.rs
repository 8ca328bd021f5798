//! Market Server - 二手时尚市场的下单与结算后端
//!
//! # 架构概述
//!
//! 核心是 order→payment→payout 管线：
//!
//! - **下单** (`checkout`): 购物车 → 订单，库存预留 + 价格快照 + 收货快照
//! - **网关** (`vnpay`): VNPay 签名协议（出站 URL / 入站回调校验）
//! - **结算** (`settlement`): 幂等支付处理 + 多卖家分账
//! - **数据库** (`db`): SQLite (WAL) + repository 层
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! market-server/src/
//! ├── core/          # 配置、状态
//! ├── api/           # HTTP 路由和处理器
//! ├── checkout/      # 订单引擎
//! ├── vnpay/         # 支付网关适配器
//! ├── settlement/    # 支付处理 + 卖家分账
//! ├── money/         # Decimal 金额计算
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod money;
pub mod settlement;
pub mod utils;
pub mod vnpay;

// Re-export 公共类型
pub use crate::core::{AppState, Config};
pub use utils::{AppError, AppResult};

// Security logging macro - 安全相关事件统一打到 "security" target
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*);
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(target: "security", event = $event, $($arg)*);
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*);
    };
}
