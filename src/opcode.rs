// Opcode and enum dispatch tables (spec §3, §9 "Dynamic dispatch on opcode").
// Tagged variants keyed by opcode instead of a raw integer switch, so the
// match arms in request.rs/response.rs are exhaustiveness-checked.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOpcode {
  Startup,
  Options,
  Query,
  Prepare,
  Execute,
  Register,
  Batch,
  AuthResponse,
}

impl TryFrom<u8> for RequestOpcode {
  type Error = u8;

  fn try_from(v: u8) -> Result<Self, u8> {
    match v {
      0x01 => Ok(RequestOpcode::Startup),
      0x05 => Ok(RequestOpcode::Options),
      0x07 => Ok(RequestOpcode::Query),
      0x09 => Ok(RequestOpcode::Prepare),
      0x0A => Ok(RequestOpcode::Execute),
      0x0B => Ok(RequestOpcode::Register),
      0x0D => Ok(RequestOpcode::Batch),
      0x0F => Ok(RequestOpcode::AuthResponse),
      other => Err(other),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOpcode {
  Error,
  Ready,
  Authenticate,
  Supported,
  Result,
  Event,
  AuthChallenge,
  AuthSuccess,
}

impl TryFrom<u8> for ResponseOpcode {
  type Error = u8;

  fn try_from(v: u8) -> Result<Self, u8> {
    match v {
      0x00 => Ok(ResponseOpcode::Error),
      0x02 => Ok(ResponseOpcode::Ready),
      0x03 => Ok(ResponseOpcode::Authenticate),
      0x06 => Ok(ResponseOpcode::Supported),
      0x08 => Ok(ResponseOpcode::Result),
      0x0C => Ok(ResponseOpcode::Event),
      0x0E => Ok(ResponseOpcode::AuthChallenge),
      0x10 => Ok(ResponseOpcode::AuthSuccess),
      other => Err(other),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
  Void,
  Rows,
  SetKeyspace,
  Prepared,
  SchemaChange,
}

impl TryFrom<i32> for ResultKind {
  type Error = i32;

  fn try_from(v: i32) -> Result<Self, i32> {
    match v {
      1 => Ok(ResultKind::Void),
      2 => Ok(ResultKind::Rows),
      3 => Ok(ResultKind::SetKeyspace),
      4 => Ok(ResultKind::Prepared),
      5 => Ok(ResultKind::SchemaChange),
      other => Err(other),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consistency {
  Any,
  One,
  Two,
  Three,
  Quorum,
  All,
  LocalQuorum,
  EachQuorum,
  Serial,
  LocalSerial,
  LocalOne,
}

impl TryFrom<u16> for Consistency {
  type Error = u16;

  fn try_from(v: u16) -> Result<Self, u16> {
    match v {
      0x0000 => Ok(Consistency::Any),
      0x0001 => Ok(Consistency::One),
      0x0002 => Ok(Consistency::Two),
      0x0003 => Ok(Consistency::Three),
      0x0004 => Ok(Consistency::Quorum),
      0x0005 => Ok(Consistency::All),
      0x0006 => Ok(Consistency::LocalQuorum),
      0x0007 => Ok(Consistency::EachQuorum),
      0x0008 => Ok(Consistency::Serial),
      0x0009 => Ok(Consistency::LocalSerial),
      0x000A => Ok(Consistency::LocalOne),
      other => Err(other),
    }
  }
}

bitflags::bitflags! {
  /// Flags byte following the consistency level in query parameters (spec §4.2).
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct QueryFlags: u8 {
    const VALUES = 0x01;
    const SKIP_METADATA = 0x02;
    const PAGE_SIZE = 0x04;
    const PAGING_STATE = 0x08;
    const SERIAL_CONSISTENCY = 0x10;
    const DEFAULT_TIMESTAMP = 0x20;
    const NAMES = 0x40;
  }
}

bitflags::bitflags! {
  /// Flags int at the start of result metadata (spec §4.2).
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct ResultMetadataFlags: i32 {
    const GLOBAL_TABLES_SPEC = 0x01;
    const HAS_MORE_PAGES = 0x02;
    const NO_METADATA = 0x04;
  }
}

bitflags::bitflags! {
  /// Flags byte trailing a Batch message (spec §4.3, §9 erratum).
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct BatchFlags: u8 {
    const SERIAL_CONSISTENCY = 0x10;
    const DEFAULT_TIMESTAMP = 0x20;
    // Named "with_names_for_values" in the protocol; parsed for
    // completeness and never acted on (see SPEC_FULL.md §9).
    const WITH_NAMES_FOR_VALUES = 0x40;
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn request_opcode_round_trip() {
    assert_eq!(Ok(RequestOpcode::Query), RequestOpcode::try_from(0x07));
    assert_eq!(Err(0x42), RequestOpcode::try_from(0x42));
  }

  #[test]
  fn result_kind_round_trip() {
    assert_eq!(Ok(ResultKind::SchemaChange), ResultKind::try_from(5));
    assert_eq!(Err(6), ResultKind::try_from(6));
  }
}
