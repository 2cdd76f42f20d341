//! IPv4 addresses.

use std::net::Ipv4Addr;

use scrub_model::Value;

/// Dotted-quad IPv4 address or `Null`. `0.0.0.0` carries no source
/// information and is treated as missing, as is `INVALID_IP`.
pub fn normalize_ipv4(value: &Value) -> Value {
    let Some(raw) = value.as_text() else {
        return Value::Null;
    };
    match raw.trim().parse::<Ipv4Addr>() {
        Ok(addr) if !addr.is_unspecified() => Value::Text(addr.to_string()),
        _ => Value::Null,
    }
}
