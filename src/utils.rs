use serde_json::Value;
use subtle::ConstantTimeEq;

/// Reads a webhook identifier. Strings are trimmed and blank ones count as absent;
/// numbers are accepted since some templates render ids unquoted.
pub fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerces a JSON number or numeric string into a finite score.
pub fn coerce_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score.is_finite().then_some(score)
}

/// Checks an `Authorization` header value against `Bearer <secret>` in constant time.
pub fn bearer_matches(header: Option<&str>, secret: &str) -> bool {
    let Some(token) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return false;
    };
    bool::from(token.as_bytes().ct_eq(secret.as_bytes()))
}
