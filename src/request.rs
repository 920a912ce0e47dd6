// Request processor (spec §4.3): opcode-dispatched per-message decoders
// that populate a normalized Request record.

use crate::buf_ext::BufExt;
use crate::composite::{name_value_pair_list, query_parameters};
use crate::config::StitcherConfig;
use crate::error::{CqlError, Result};
use crate::frame::Frame;
use crate::opcode::{BatchFlags, RequestOpcode};
use crate::record::Request;
use crate::render::render_hex_values;
use bytes::Bytes;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
enum BatchQueryValue {
  Query(String),
  Id(Bytes),
}

pub fn decode_request(frame: &Frame, config: &StitcherConfig) -> Result<Request> {
  if let Some(max) = config.max_body_len {
    if frame.body.len() > max {
      return Err(CqlError::DecodeInvalid(format!(
        "body length {} exceeds max_body_len {max}",
        frame.body.len()
      )));
    }
  }

  let op = RequestOpcode::try_from(frame.opcode).map_err(CqlError::UnhandledOpcode)?;
  let mut b = frame.body.clone();

  let msg = match op {
    RequestOpcode::Startup => {
      let map = crate::composite::string_map(&mut b)?;
      b.cql_expect_eof()?;
      Value::Object(map).to_string()
    }

    RequestOpcode::AuthResponse => {
      let token = b.cql_get_bytes()?;
      b.cql_expect_eof()?;
      match token {
        Some(bytes) => String::from_utf8(bytes.to_vec())
          .map_err(|e| CqlError::DecodeInvalid(format!("invalid utf-8 auth token: {e}")))?,
        None => String::new(),
      }
    }

    RequestOpcode::Options => {
      b.cql_expect_eof()?;
      String::new()
    }

    RequestOpcode::Register => {
      let list = crate::composite::string_list(&mut b)?;
      b.cql_expect_eof()?;
      Value::Array(list.into_iter().map(Value::String).collect()).to_string()
    }

    RequestOpcode::Query => {
      let text = b.cql_get_long_string()?;
      let params = query_parameters(&mut b)?;
      b.cql_expect_eof()?;
      match params.values {
        Some(values) if !values.is_empty() => {
          format!("{}\n{}", text, render_hex_values(&values, config))
        }
        _ => text,
      }
    }

    RequestOpcode::Prepare => {
      let text = b.cql_get_long_string()?;
      b.cql_expect_eof()?;
      text
    }

    RequestOpcode::Execute => {
      let _id = b.cql_get_short_bytes()?; // not surfaced; see SPEC_FULL.md §9
      let params = query_parameters(&mut b)?;
      b.cql_expect_eof()?;
      let values = params.values.unwrap_or_default();
      render_hex_values(&values, config).to_string()
    }

    RequestOpcode::Batch => decode_batch(&mut b, config)?,
  };

  Ok(Request { op, timestamp_ns: frame.timestamp_ns, msg })
}

fn decode_batch(b: &mut Bytes, config: &StitcherConfig) -> Result<String> {
  let batch_type = b.cql_get_byte()?;
  if batch_type > 2 {
    return Err(CqlError::DecodeInvalid(format!("invalid batch type {batch_type}")));
  }

  let n = b.cql_get_short()?;
  let mut queries = Vec::with_capacity(n as usize);
  for _ in 0..n {
    let kind = b.cql_get_byte()?;
    // cql_stitcher.cc's ProcessBatchReq only extracts a query_or_id payload
    // for kind 0 or 1; any other kind falls through with nothing assigned
    // and decoding continues. Mirrored here: no payload is read and no
    // error is raised for an unrecognized kind.
    let query = match kind {
      0 => BatchQueryValue::Query(b.cql_get_long_string()?),
      1 => BatchQueryValue::Id(b.cql_get_short_bytes()?),
      _ => BatchQueryValue::Id(Bytes::new()),
    };
    // Erratum: has_names is always false here regardless of the flags byte
    // parsed below, because that flag describes values already consumed.
    let _values = name_value_pair_list(b, false)?;
    queries.push(query);
  }

  let _consistency = b.cql_get_consistency()?;
  let raw_flags = b.cql_get_byte()?;
  let flags = BatchFlags::from_bits_truncate(raw_flags);

  if flags.contains(BatchFlags::SERIAL_CONSISTENCY) {
    let _serial_consistency = b.cql_get_consistency()?;
  }
  if flags.contains(BatchFlags::DEFAULT_TIMESTAMP) {
    let _timestamp = b.cql_get_long()?;
  }
  // BatchFlags::WITH_NAMES_FOR_VALUES is intentionally never read here.

  let rendered: Vec<Value> = queries
    .iter()
    .map(|q| match q {
      BatchQueryValue::Query(text) => json!({ "query": text }),
      BatchQueryValue::Id(id) => json!({ "id": crate::render::render_hex(id, config) }),
    })
    .collect();

  Ok(Value::Array(rendered).to_string())
}
