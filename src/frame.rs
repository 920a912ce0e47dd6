use bytes::Bytes;

/// One CQL protocol message as delivered by the external frame producer
/// (spec §3 Data Model). The header envelope (`version`/`flags`/`stream`/
/// `opcode`/`body_length`) is assumed already parsed by the producer; this
/// type carries every documented header attribute as a plain public field
/// (no accessors), even the ones the stitcher and processors never read
/// themselves (`version`, `flags`) — they round-trip through the producer
/// for a downstream consumer that wants them.
#[derive(Debug, Clone)]
pub struct Frame {
  pub version: u8,
  pub flags: u8,
  pub stream: i16,
  pub opcode: u8,
  pub timestamp_ns: u64,
  pub body: Bytes,
  /// Set by the stitcher once a request frame has been matched to a
  /// response; never read or written by anything else. Meaningless on
  /// response frames, which are always popped outright.
  pub consumed: bool,
}

impl Frame {
  /// Builds a frame with `version` defaulted to the only protocol version
  /// this crate decodes (v4, spec §6) and `flags` defaulted to none set.
  /// Construct the struct literal directly (all fields are `pub`) when the
  /// producer has a real `version`/`flags` byte to carry through.
  pub fn new(stream: i16, opcode: u8, timestamp_ns: u64, body: impl Into<Bytes>) -> Self {
    Self { version: 4, flags: 0, stream, opcode, timestamp_ns, body: body.into(), consumed: false }
  }

  pub fn body_length(&self) -> usize {
    self.body.len()
  }
}
