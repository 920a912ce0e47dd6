use thiserror::Error;

/// Errors surfaced by the primitive decoder, the composite decoder, and the
/// request/response processors built on top of them.
#[derive(Debug, Error)]
pub enum CqlError {
  #[error("decode underflow: requested {requested} bytes, {remaining} remaining")]
  DecodeUnderflow { requested: usize, remaining: usize },

  #[error("decode invalid: {0}")]
  DecodeInvalid(String),

  #[error("decode trailing bytes: {remaining} bytes remaining after decode")]
  DecodeTrailingBytes { remaining: usize },

  #[error("unrecognized result kind: {0}")]
  UnrecognizedResultKind(i32),

  #[error("unknown event type: {0}")]
  UnknownEventType(String),

  #[error("unhandled opcode: 0x{0:02x}")]
  UnhandledOpcode(u8),
}

pub type Result<T> = std::result::Result<T, CqlError>;
