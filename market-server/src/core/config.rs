//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Frontend base URL (payment result redirect targets)
    pub frontend_url: String,
    /// VNPay merchant terminal code
    pub vnpay_tmn_code: String,
    /// VNPay HMAC-SHA512 signing secret
    pub vnpay_hash_secret: String,
    /// VNPay gateway base URL
    pub vnpay_api_url: String,
    /// Return URL VNPay redirects the customer back to
    pub vnpay_return_url: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "market.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            vnpay_tmn_code: std::env::var("VNPAY_TMN_CODE").unwrap_or_else(|_| "DEMOV210".into()),
            vnpay_hash_secret: Self::require_secret("VNPAY_HASH_SECRET", &environment)?,
            vnpay_api_url: std::env::var("VNPAY_API_URL").unwrap_or_else(|_| {
                "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".into()
            }),
            vnpay_return_url: std::env::var("VNPAY_RETURN_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api/payment/vnpay-callback".into()),
        })
    }
}
