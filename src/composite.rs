// Composite decoder (spec §4.2): higher-order CQL structures built on top
// of the primitive decoder in buf_ext.rs.

use crate::buf_ext::BufExt;
use crate::error::{CqlError, Result};
use crate::opcode::{Consistency, QueryFlags, ResultMetadataFlags};
use bytes::{Buf, Bytes};
use serde_json::{Map, Value};

// [string map]: short N; N times (string key, string value). Last-wins on
// duplicate keys, insertion order preserved (serde_json::Map is an
// IndexMap when built with the `preserve_order` feature).
pub fn string_map(b: &mut impl Buf) -> Result<Map<String, Value>> {
  let n = b.cql_get_short()?;
  let mut map = Map::new();
  for _ in 0..n {
    let key = b.cql_get_string()?;
    let value = b.cql_get_string()?;
    map.insert(key, Value::String(value));
  }
  Ok(map)
}

// [string multimap]: short N; N times (string key, string list value).
pub fn string_multimap(b: &mut impl Buf) -> Result<Map<String, Value>> {
  let n = b.cql_get_short()?;
  let mut map = Map::new();
  for _ in 0..n {
    let key = b.cql_get_string()?;
    let values = string_list(b)?;
    map.insert(key, Value::Array(values.into_iter().map(Value::String).collect()));
  }
  Ok(map)
}

// [string list]: short N; N strings.
pub fn string_list(b: &mut impl Buf) -> Result<Vec<String>> {
  let n = b.cql_get_short()?;
  (0..n).map(|_| b.cql_get_string()).collect()
}

#[derive(Debug, Clone)]
pub struct NameValuePair {
  pub name: Option<String>,
  pub value: Option<Bytes>,
}

// name/value pair list(has_names): short N; per entry, optional name string
// then a `[bytes]` value. See SPEC_FULL.md §9 for the Batch erratum that
// always passes has_names = false regardless of the on-wire flag.
pub fn name_value_pair_list(b: &mut impl Buf, has_names: bool) -> Result<Vec<NameValuePair>> {
  let n = b.cql_get_short()?;
  let mut pairs = Vec::with_capacity(n as usize);
  for _ in 0..n {
    let name = if has_names { Some(b.cql_get_string()?) } else { None };
    let value = b.cql_get_bytes()?;
    pairs.push(NameValuePair { name, value });
  }
  Ok(pairs)
}

#[derive(Debug, Clone)]
pub struct QueryParameters {
  pub consistency: Consistency,
  pub values: Option<Vec<NameValuePair>>,
  pub page_size: Option<i32>,
  pub paging_state: Option<Bytes>,
  pub serial_consistency: Option<Consistency>,
  pub default_timestamp: Option<i64>,
}

pub fn query_parameters(b: &mut impl Buf) -> Result<QueryParameters> {
  let consistency = b.cql_get_consistency()?;
  let raw_flags = b.cql_get_byte()?;
  let flags = QueryFlags::from_bits_truncate(raw_flags);

  let values = if flags.contains(QueryFlags::VALUES) {
    let has_names = flags.contains(QueryFlags::NAMES);
    Some(name_value_pair_list(b, has_names)?)
  } else {
    None
  };

  let page_size = if flags.contains(QueryFlags::PAGE_SIZE) { Some(b.cql_get_int()?) } else { None };

  let paging_state = if flags.contains(QueryFlags::PAGING_STATE) { b.cql_get_bytes()? } else { None };

  let serial_consistency =
    if flags.contains(QueryFlags::SERIAL_CONSISTENCY) { Some(b.cql_get_consistency()?) } else { None };

  let default_timestamp =
    if flags.contains(QueryFlags::DEFAULT_TIMESTAMP) { Some(b.cql_get_long()?) } else { None };

  Ok(QueryParameters { consistency, values, page_size, paging_state, serial_consistency, default_timestamp })
}

// Column type option (SPEC_FULL.md §3): the `[option]` wire encoding,
// consumed structurally since no type-aware value rendering is in scope.
#[derive(Debug, Clone)]
pub enum ColumnTypeOption {
  Custom(String),
  Simple(u16),
  List(Box<ColumnTypeOption>),
  Map(Box<ColumnTypeOption>, Box<ColumnTypeOption>),
  Set(Box<ColumnTypeOption>),
  Udt { keyspace: String, name: String, fields: Vec<(String, ColumnTypeOption)> },
  Tuple(Vec<ColumnTypeOption>),
  Unknown(u16),
}

pub fn column_type_option(b: &mut impl Buf) -> Result<ColumnTypeOption> {
  let id = b.cql_get_short()?;
  match id {
    0x0000 => Ok(ColumnTypeOption::Custom(b.cql_get_string()?)),
    0x0001..=0x0014 => Ok(ColumnTypeOption::Simple(id)),
    0x0020 => Ok(ColumnTypeOption::List(Box::new(column_type_option(b)?))),
    0x0021 => {
      let key = column_type_option(b)?;
      let value = column_type_option(b)?;
      Ok(ColumnTypeOption::Map(Box::new(key), Box::new(value)))
    }
    0x0022 => Ok(ColumnTypeOption::Set(Box::new(column_type_option(b)?))),
    0x0030 => {
      let keyspace = b.cql_get_string()?;
      let name = b.cql_get_string()?;
      let field_count = b.cql_get_short()?;
      let mut fields = Vec::with_capacity(field_count as usize);
      for _ in 0..field_count {
        let field_name = b.cql_get_string()?;
        let field_type = column_type_option(b)?;
        fields.push((field_name, field_type));
      }
      Ok(ColumnTypeOption::Udt { keyspace, name, fields })
    }
    0x0031 => {
      let field_count = b.cql_get_short()?;
      let fields = (0..field_count).map(|_| column_type_option(b)).collect::<Result<Vec<_>>>()?;
      Ok(ColumnTypeOption::Tuple(fields))
    }
    other => Ok(ColumnTypeOption::Unknown(other)),
  }
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
  pub keyspace: Option<String>,
  pub table: Option<String>,
  pub name: String,
  pub type_option: ColumnTypeOption,
}

#[derive(Debug, Clone)]
pub struct ResultMetadata {
  pub flags: ResultMetadataFlags,
  pub columns_count: i32,
  pub pk_indices: Option<Vec<u16>>,
  pub paging_state: Option<Bytes>,
  pub global_keyspace: Option<String>,
  pub global_table: Option<String>,
  pub columns: Vec<ColumnSpec>,
}

// result metadata(has_pk): spec §4.2.
pub fn result_metadata(b: &mut impl Buf, has_pk: bool) -> Result<ResultMetadata> {
  let raw_flags = b.cql_get_int()?;
  let flags = ResultMetadataFlags::from_bits_truncate(raw_flags);
  let columns_count = b.cql_get_int()?;

  let pk_indices = if has_pk {
    let pk_count = b.cql_get_int()?;
    let pk_count = usize::try_from(pk_count)
      .map_err(|_| CqlError::DecodeInvalid(format!("negative pk_count {pk_count}")))?;
    let mut indices = Vec::with_capacity(pk_count);
    for _ in 0..pk_count {
      indices.push(b.cql_get_short()?);
    }
    Some(indices)
  } else {
    None
  };

  let paging_state =
    if flags.contains(ResultMetadataFlags::HAS_MORE_PAGES) { b.cql_get_bytes()? } else { None };

  let mut global_keyspace = None;
  let mut global_table = None;
  let mut columns = Vec::new();

  if !flags.contains(ResultMetadataFlags::NO_METADATA) {
    let global = flags.contains(ResultMetadataFlags::GLOBAL_TABLES_SPEC);
    if global {
      global_keyspace = Some(b.cql_get_string()?);
      global_table = Some(b.cql_get_string()?);
    }

    let count = usize::try_from(columns_count)
      .map_err(|_| CqlError::DecodeInvalid(format!("negative columns_count {columns_count}")))?;
    columns.reserve(count);
    for _ in 0..count {
      let (keyspace, table) = if global {
        (None, None)
      } else {
        (Some(b.cql_get_string()?), Some(b.cql_get_string()?))
      };
      let name = b.cql_get_string()?;
      let type_option = column_type_option(b)?;
      columns.push(ColumnSpec { keyspace, table, name, type_option });
    }
  }

  Ok(ResultMetadata { flags, columns_count, pk_indices, paging_state, global_keyspace, global_table, columns })
}

#[derive(Debug, Clone)]
pub struct SchemaChange {
  pub change_type: String,
  pub target: String,
  pub keyspace: Option<String>,
  pub name: Option<String>,
  pub arg_types: Option<Vec<String>>,
}

// schema change descriptor: spec §4.2.
pub fn schema_change(b: &mut impl Buf) -> Result<SchemaChange> {
  let change_type = b.cql_get_string()?;
  let target = b.cql_get_string()?;

  let (keyspace, name, arg_types) = match target.as_str() {
    "KEYSPACE" => (Some(b.cql_get_string()?), None, None),
    "TABLE" | "TYPE" => {
      let keyspace = b.cql_get_string()?;
      let name = b.cql_get_string()?;
      (Some(keyspace), Some(name), None)
    }
    "FUNCTION" | "AGGREGATE" => {
      let keyspace = b.cql_get_string()?;
      let name = b.cql_get_string()?;
      let arg_types = string_list(b)?;
      (Some(keyspace), Some(name), Some(arg_types))
    }
    other => return Err(CqlError::DecodeInvalid(format!("unrecognized schema change target {other}"))),
  };

  Ok(SchemaChange { change_type, target, keyspace, name, arg_types })
}
