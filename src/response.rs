// Response processor (spec §4.4): symmetric opcode-dispatched decoders for
// Response, including the nested RESULT sub-kinds.

use crate::buf_ext::BufExt;
use crate::composite::{result_metadata, schema_change, string_multimap};
use crate::config::StitcherConfig;
use crate::error::{CqlError, Result};
use crate::frame::Frame;
use crate::opcode::{ResponseOpcode, ResultKind};
use crate::record::Response;
use crate::render::render_hex;
use bytes::Bytes;
use serde_json::Value;

pub fn decode_response(frame: &Frame, config: &StitcherConfig) -> Result<Response> {
  if let Some(max) = config.max_body_len {
    if frame.body.len() > max {
      return Err(CqlError::DecodeInvalid(format!(
        "body length {} exceeds max_body_len {max}",
        frame.body.len()
      )));
    }
  }

  let op = ResponseOpcode::try_from(frame.opcode).map_err(CqlError::UnhandledOpcode)?;
  let mut b = frame.body.clone();

  let msg = match op {
    ResponseOpcode::Error => {
      let code = b.cql_get_int()?;
      let text = b.cql_get_string()?;
      b.cql_expect_eof()?;
      format!("[{code}] {text}")
    }

    ResponseOpcode::Ready => {
      b.cql_expect_eof()?;
      String::new()
    }

    ResponseOpcode::Authenticate => {
      let name = b.cql_get_string()?;
      b.cql_expect_eof()?;
      name
    }

    ResponseOpcode::Supported => {
      let map = string_multimap(&mut b)?;
      b.cql_expect_eof()?;
      Value::Object(map).to_string()
    }

    ResponseOpcode::AuthSuccess | ResponseOpcode::AuthChallenge => {
      let token = b.cql_get_bytes()?;
      b.cql_expect_eof()?;
      token.map(|t| render_hex(&t, config)).unwrap_or_default()
    }

    ResponseOpcode::Result => decode_result(&mut b, config)?,

    ResponseOpcode::Event => decode_event(&mut b)?,
  };

  Ok(Response { op, timestamp_ns: frame.timestamp_ns, msg })
}

fn decode_result(b: &mut Bytes, config: &StitcherConfig) -> Result<String> {
  let kind = b.cql_get_int()?;
  let kind = ResultKind::try_from(kind).map_err(CqlError::UnrecognizedResultKind)?;

  let msg = match kind {
    ResultKind::Void => {
      b.cql_expect_eof()?;
      "Response type = VOID".to_string()
    }

    ResultKind::Rows => {
      let metadata = result_metadata(b, false)?;
      let rows_count = b.cql_get_int()?;
      // Row data is intentionally skipped; EOF is not required here.
      let column_names: Vec<Value> = metadata.columns.iter().map(|c| Value::String(c.name.clone())).collect();
      format!(
        "Response type = ROWS\nNumber of columns = {}\n{}\nNumber of rows = {}",
        metadata.columns_count,
        Value::Array(column_names),
        rows_count
      )
    }

    ResultKind::SetKeyspace => {
      let keyspace = b.cql_get_string()?;
      b.cql_expect_eof()?;
      format!("Response type = SET_KEYSPACE\nKeyspace = {keyspace}")
    }

    ResultKind::Prepared => {
      let _id = b.cql_get_short_bytes()?;
      let _bound_metadata = result_metadata(b, true)?;
      let _result_metadata = result_metadata(b, false)?;
      b.cql_expect_eof()?;
      "Response type = PREPARED".to_string()
    }

    ResultKind::SchemaChange => {
      let _change = schema_change(b)?;
      b.cql_expect_eof()?;
      "Response type = SCHEMA_CHANGE".to_string()
    }
  };

  Ok(msg)
}

fn decode_event(b: &mut Bytes) -> Result<String> {
  let event_type = b.cql_get_string()?;
  match event_type.as_str() {
    "TOPOLOGY_CHANGE" | "STATUS_CHANGE" => {
      let change_type = b.cql_get_string()?;
      let addr = b.cql_get_inet()?;
      b.cql_expect_eof()?;
      Ok(format!("{event_type} {change_type} {addr}"))
    }
    "SCHEMA_CHANGE" => {
      let change = schema_change(b)?;
      b.cql_expect_eof()?;
      Ok(format!(
        "{event_type} {} keyspace={} name={}",
        change.change_type,
        change.keyspace.unwrap_or_default(),
        change.name.unwrap_or_default()
      ))
    }
    other => Err(CqlError::UnknownEventType(other.to_string())),
  }
}
