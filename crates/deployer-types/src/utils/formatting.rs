//! Hex string formatting helpers.

/// Adds a "0x" prefix to a hex string if it is missing.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes a "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Shortens a long hex value to `0x1234…abcd` for log lines.
pub fn truncate_hash(hex_str: &str) -> String {
	let body = without_0x_prefix(hex_str);
	if body.len() <= 12 {
		return with_0x_prefix(body);
	}
	format!("0x{}…{}", &body[..6], &body[body.len() - 4..])
}
