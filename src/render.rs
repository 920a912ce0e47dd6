use crate::composite::NameValuePair;
use crate::config::StitcherConfig;
use serde_json::Value;

/// Marker appended when a hex rendering is truncated to `max_value_hex_len`.
const TRUNCATION_MARKER: &str = "...";

/// Hex-renders raw bytes for `msg` strings (spec §4.3/§4.4 "rendered as
/// hex"), truncating to `StitcherConfig::max_value_hex_len` when set and
/// appending `TRUNCATION_MARKER` so truncated output is distinguishable
/// from a value that happened to be exactly that long.
pub fn render_hex(bytes: &[u8], config: &StitcherConfig) -> String {
  let encoded = hex::encode(bytes);
  match config.max_value_hex_len {
    Some(max) if encoded.len() > max => format!("{}{}", &encoded[..max], TRUNCATION_MARKER),
    _ => encoded,
  }
}

/// Renders bound values as a JSON array of hex strings (null entries
/// render as JSON null), ignoring any names even when the on-wire payload
/// carried them — Query/Execute msg rendering is hex-only (spec §4.3).
pub fn render_hex_values(values: &[NameValuePair], config: &StitcherConfig) -> Value {
  Value::Array(
    values
      .iter()
      .map(|v| match &v.value {
        Some(bytes) => Value::String(render_hex(bytes, config)),
        None => Value::Null,
      })
      .collect(),
  )
}
