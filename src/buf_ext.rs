use crate::error::{CqlError, Result};
use crate::opcode::Consistency;
use bytes::{Buf, Bytes};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Primitive decoder (spec §4.1): a cursor over a frame body that extracts
/// fixed and variable-width CQL primitives, failing on underflow or
/// malformed encodings instead of panicking.
pub trait BufExt: Buf {
  fn cql_get_byte(&mut self) -> Result<u8> {
    self.cql_require(1)?;
    Ok(self.get_u8())
  }

  fn cql_get_short(&mut self) -> Result<u16> {
    self.cql_require(2)?;
    Ok(self.get_u16())
  }

  fn cql_get_int(&mut self) -> Result<i32> {
    self.cql_require(4)?;
    Ok(self.get_i32())
  }

  fn cql_get_long(&mut self) -> Result<i64> {
    self.cql_require(8)?;
    Ok(self.get_i64())
  }

  // [string]: short N, N bytes UTF-8.
  fn cql_get_string(&mut self) -> Result<String> {
    let len = self.cql_get_short()? as usize;
    self.cql_get_fixed_length_string(len)
  }

  // [long string]: int N, N bytes UTF-8.
  fn cql_get_long_string(&mut self) -> Result<String> {
    let len = self.cql_get_int()?;
    let len = usize::try_from(len)
      .map_err(|_| CqlError::DecodeInvalid(format!("negative long string length {len}")))?;
    self.cql_get_fixed_length_string(len)
  }

  fn cql_get_fixed_length_string(&mut self, len: usize) -> Result<String> {
    let bytes = self.cql_get_fixed_length_bytes(len)?;
    String::from_utf8(bytes.to_vec())
      .map_err(|e| CqlError::DecodeInvalid(format!("invalid utf-8 string: {e}")))
  }

  // [bytes]: int N; N<0 is null, otherwise N raw bytes.
  fn cql_get_bytes(&mut self) -> Result<Option<Bytes>> {
    let len = self.cql_get_int()?;
    if len < 0 {
      return Ok(None);
    }
    Ok(Some(self.cql_get_fixed_length_bytes(len as usize)?))
  }

  // [short bytes]: short N, N raw bytes. Never null.
  fn cql_get_short_bytes(&mut self) -> Result<Bytes> {
    let len = self.cql_get_short()? as usize;
    self.cql_get_fixed_length_bytes(len)
  }

  fn cql_get_fixed_length_bytes(&mut self, len: usize) -> Result<Bytes> {
    self.cql_require(len)?;
    Ok(self.copy_to_bytes(len))
  }

  // [inet]: byte K (4 or 16), K address bytes, int port.
  fn cql_get_inet(&mut self) -> Result<SocketAddr> {
    let len = self.cql_get_byte()?;
    let ip = match len {
      4 => {
        let b = self.cql_get_fixed_length_bytes(4)?;
        IpAddr::V4(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
      }
      16 => {
        let b = self.cql_get_fixed_length_bytes(16)?;
        let mut octets = [0u8; 16];
        octets.copy_from_slice(&b);
        IpAddr::V6(Ipv6Addr::from(octets))
      }
      other => return Err(CqlError::DecodeInvalid(format!("invalid inet address length {other}"))),
    };
    let port = self.cql_get_int()?;
    let port =
      u16::try_from(port).map_err(|_| CqlError::DecodeInvalid(format!("invalid inet port {port}")))?;
    Ok(SocketAddr::new(ip, port))
  }

  // [consistency]: short enum.
  fn cql_get_consistency(&mut self) -> Result<Consistency> {
    let raw = self.cql_get_short()?;
    Consistency::try_from(raw)
      .map_err(|raw| CqlError::DecodeInvalid(format!("invalid consistency level 0x{raw:04x}")))
  }

  fn cql_expect_eof(&mut self) -> Result<()> {
    if self.has_remaining() {
      Err(CqlError::DecodeTrailingBytes { remaining: self.remaining() })
    } else {
      Ok(())
    }
  }

  fn cql_require(&mut self, len: usize) -> Result<()> {
    if self.remaining() < len {
      Err(CqlError::DecodeUnderflow { requested: len, remaining: self.remaining() })
    } else {
      Ok(())
    }
  }
}

// Blanket implementation, same pattern as mysql::buf_ext / pg::buf_ext.
impl<T> BufExt for T where T: Buf {}
