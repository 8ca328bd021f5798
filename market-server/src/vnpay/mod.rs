//! VNPay gateway adapter
//!
//! Pure signature-protocol plumbing, no network I/O: the server only emits a
//! redirect URL and verifies the parameters VNPay echoes back to the return
//! endpoint. HMAC-SHA512 over the sorted, URL-encoded parameter string is
//! the sole trust boundary for inbound notifications: nothing downstream
//! may act on an amount or response code that did not pass `verify_callback`.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::collections::{BTreeMap, HashMap};

use crate::money;

type HmacSha512 = Hmac<Sha512>;

/// VNPay "payment approved" response code
pub const VNP_RESPONSE_SUCCESS: &str = "00";

const VNP_VERSION: &str = "2.1.0";
const SECURE_HASH_FIELD: &str = "vnp_SecureHash";
const SECURE_HASH_TYPE_FIELD: &str = "vnp_SecureHashType";

/// Payment link lifetime
const EXPIRE_MINUTES: i64 = 15;

/// Gateway merchant credentials and endpoints
#[derive(Debug, Clone)]
pub struct VnpayConfig {
    /// Merchant terminal code (vnp_TmnCode)
    pub tmn_code: String,
    /// HMAC-SHA512 shared secret
    pub hash_secret: String,
    /// Gateway payment page base URL
    pub api_url: String,
    /// URL VNPay sends the customer back to
    pub return_url: String,
}

/// Verified fields extracted from a signature-checked callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCallback {
    /// Transaction reference (the order id the payment belongs to)
    pub txn_ref: i64,
    /// Amount in minor units (order total × 100)
    pub amount_minor: i64,
    /// Gateway response code ("00" = approved)
    pub response_code: String,
}

/// Callback verification failures
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Invalid gateway signature")]
    SignatureInvalid,

    #[error("Callback missing field: {0}")]
    MissingField(&'static str),

    #[error("Callback field not parseable: {0}")]
    MalformedField(&'static str),
}

/// VNPay reference timezone (UTC+7). Timestamps are rendered here
/// regardless of the server's local zone.
fn gateway_offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("UTC+7 is a valid offset")
}

/// Format a timestamp as yyyyMMddHHmmss in the gateway timezone
fn format_gateway_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&gateway_offset())
        .format("%Y%m%d%H%M%S")
        .to_string()
}

/// Lowercase hex HMAC-SHA512
fn hmac_sha512_hex(secret: &str, data: &str) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build the string that gets signed: `key=urlencode(value)` pairs joined
/// with `&`, keys in byte order (BTreeMap), keys NOT encoded, empty values
/// skipped. Must match VNPay's reference implementation byte for byte.
fn hash_data(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the redirect query string: both keys and values URL-encoded
fn query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Generate the signed redirect URL sending a customer to the VNPay payment
/// page for an order.
pub fn create_payment_url(
    config: &VnpayConfig,
    order_id: i64,
    total_amount: f64,
    client_ip: &str,
) -> String {
    create_payment_url_at(config, order_id, total_amount, client_ip, Utc::now())
}

/// Clock-injectable variant of [`create_payment_url`] (tests pin `now`)
pub fn create_payment_url_at(
    config: &VnpayConfig,
    order_id: i64,
    total_amount: f64,
    client_ip: &str,
    now: DateTime<Utc>,
) -> String {
    let amount_minor = money::to_minor_units(total_amount);

    let mut params = BTreeMap::new();
    params.insert("vnp_Version".into(), VNP_VERSION.to_string());
    params.insert("vnp_Command".into(), "pay".to_string());
    params.insert("vnp_TmnCode".into(), config.tmn_code.clone());
    params.insert("vnp_CurrCode".into(), "VND".to_string());
    params.insert("vnp_TxnRef".into(), order_id.to_string());
    params.insert(
        "vnp_OrderInfo".into(),
        format!("Thanh toan don hang #{order_id}"),
    );
    params.insert("vnp_OrderType".into(), "other".to_string());
    params.insert("vnp_Locale".into(), "vn".to_string());
    params.insert("vnp_ReturnUrl".into(), config.return_url.clone());
    params.insert("vnp_IpAddr".into(), client_ip.to_string());
    params.insert("vnp_Amount".into(), amount_minor.to_string());
    params.insert("vnp_CreateDate".into(), format_gateway_time(now));
    params.insert(
        "vnp_ExpireDate".into(),
        format_gateway_time(now + Duration::minutes(EXPIRE_MINUTES)),
    );

    let signature = hmac_sha512_hex(&config.hash_secret, &hash_data(&params));

    tracing::debug!(order_id, amount_minor, "VNPay redirect URL created");

    format!(
        "{}?{}&{SECURE_HASH_FIELD}={signature}",
        config.api_url,
        query_string(&params)
    )
}

/// Verify an inbound callback's signature and extract the fields the
/// payment processor needs.
///
/// Recomputes the HMAC over every non-empty parameter except the signature
/// fields themselves and compares constant-time (`Mac::verify_slice`).
pub fn verify_callback(
    config: &VnpayConfig,
    raw_params: &HashMap<String, String>,
) -> Result<VerifiedCallback, CallbackError> {
    let supplied = raw_params
        .get(SECURE_HASH_FIELD)
        .filter(|v| !v.is_empty())
        .ok_or(CallbackError::MissingField(SECURE_HASH_FIELD))?;

    let fields: BTreeMap<String, String> = raw_params
        .iter()
        .filter(|(k, v)| {
            !v.is_empty() && k.as_str() != SECURE_HASH_FIELD && k.as_str() != SECURE_HASH_TYPE_FIELD
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let mut mac = HmacSha512::new_from_slice(config.hash_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(hash_data(&fields).as_bytes());

    let sig_bytes = hex::decode(supplied).map_err(|_| CallbackError::SignatureInvalid)?;
    if mac.verify_slice(&sig_bytes).is_err() {
        return Err(CallbackError::SignatureInvalid);
    }

    let txn_ref = fields
        .get("vnp_TxnRef")
        .ok_or(CallbackError::MissingField("vnp_TxnRef"))?
        .parse::<i64>()
        .map_err(|_| CallbackError::MalformedField("vnp_TxnRef"))?;

    let amount_minor = fields
        .get("vnp_Amount")
        .ok_or(CallbackError::MissingField("vnp_Amount"))?
        .parse::<i64>()
        .map_err(|_| CallbackError::MalformedField("vnp_Amount"))?;

    let response_code = fields
        .get("vnp_ResponseCode")
        .cloned()
        .ok_or(CallbackError::MissingField("vnp_ResponseCode"))?;

    Ok(VerifiedCallback {
        txn_ref,
        amount_minor,
        response_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_config() -> VnpayConfig {
        VnpayConfig {
            tmn_code: "TESTTMN1".into(),
            hash_secret: "supersecretkey".into(),
            api_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".into(),
            return_url: "http://localhost:8080/api/payment/vnpay-callback".into(),
        }
    }

    /// Split a generated URL back into decoded key/value pairs, the way an
    /// HTTP framework would hand query params to the callback endpoint.
    fn parse_query(url: &str) -> HashMap<String, String> {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| {
                (
                    urlencoding::decode(k).unwrap().into_owned(),
                    urlencoding::decode(v).unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn gateway_time_is_utc_plus_7() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(format_gateway_time(t), "20260101073000");
    }

    #[test]
    fn expire_date_is_15_minutes_after_create() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 50, 0).unwrap();
        let url = create_payment_url_at(&test_config(), 42, 100.0, "1.2.3.4", now);
        let params = parse_query(&url);
        assert_eq!(params["vnp_CreateDate"], "20260310165000");
        assert_eq!(params["vnp_ExpireDate"], "20260310170500");
    }

    #[test]
    fn signature_is_lowercase_hex_sha512() {
        let sig = hmac_sha512_hex("key", "data");
        assert_eq!(sig.len(), 128);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        // Deterministic
        assert_eq!(sig, hmac_sha512_hex("key", "data"));
    }

    #[test]
    fn hash_data_sorts_keys_and_skips_empty_values() {
        let mut params = BTreeMap::new();
        params.insert("b".to_string(), "2".to_string());
        params.insert("a".to_string(), "1 x".to_string());
        params.insert("c".to_string(), String::new());
        assert_eq!(hash_data(&params), "a=1%20x&b=2");
    }

    #[test]
    fn round_trip_create_then_verify() {
        let cfg = test_config();
        let now = Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap();
        let url = create_payment_url_at(&cfg, 987654, 199_000.0, "203.0.113.9", now);

        // Gateway echoes the same parameter set back, plus a response code
        let mut echoed = parse_query(&url);
        echoed.insert("vnp_ResponseCode".into(), "00".into());

        // The echoed response code is not part of the original signature, so a
        // faithful echo re-signs; simulate by re-signing the full echoed set
        // the way the gateway does.
        let resigned: BTreeMap<String, String> = echoed
            .iter()
            .filter(|(k, v)| {
                !v.is_empty()
                    && k.as_str() != SECURE_HASH_FIELD
                    && k.as_str() != SECURE_HASH_TYPE_FIELD
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        echoed.insert(
            SECURE_HASH_FIELD.into(),
            hmac_sha512_hex(&cfg.hash_secret, &hash_data(&resigned)),
        );

        let verified = verify_callback(&cfg, &echoed).unwrap();
        assert_eq!(verified.txn_ref, 987654);
        assert_eq!(verified.amount_minor, 19_900_000);
        assert_eq!(verified.response_code, VNP_RESPONSE_SUCCESS);
    }

    #[test]
    fn tampered_amount_fails_verification() {
        let cfg = test_config();
        let url = create_payment_url_at(
            &cfg,
            11,
            50_000.0,
            "10.0.0.1",
            Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap(),
        );
        let mut params = parse_query(&url);
        // Attacker rewrites the amount but cannot recompute the signature
        params.insert("vnp_Amount".into(), "1".into());

        assert_eq!(
            verify_callback(&cfg, &params),
            Err(CallbackError::SignatureInvalid)
        );
    }

    #[test]
    fn missing_signature_is_rejected() {
        let cfg = test_config();
        let mut params = HashMap::new();
        params.insert("vnp_TxnRef".to_string(), "1".to_string());
        assert_eq!(
            verify_callback(&cfg, &params),
            Err(CallbackError::MissingField(SECURE_HASH_FIELD))
        );
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let cfg = test_config();
        let url = create_payment_url_at(
            &cfg,
            7,
            1000.0,
            "10.0.0.1",
            Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap(),
        );
        let params = parse_query(&url);

        let other = VnpayConfig {
            hash_secret: "differentsecret".into(),
            ..cfg
        };
        assert_eq!(
            verify_callback(&other, &params),
            Err(CallbackError::SignatureInvalid)
        );
    }
}
