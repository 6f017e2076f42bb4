use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

/// Reads the user identifier claim out of a bearer token's payload segment.
///
/// The signature is not verified. The value is only good for display and for
/// addressing the caller's own history listing; the backend enforces access.
/// Accepts `user_id` or `userId`, as a string or a number.
pub fn display_user_id(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;

    let claim = claims.get("user_id").or_else(|| claims.get("userId"))?;
    match claim {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
