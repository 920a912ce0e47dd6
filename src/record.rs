use crate::opcode::{RequestOpcode, ResponseOpcode};

#[derive(Debug, Clone)]
pub struct Request {
  pub op: RequestOpcode,
  pub timestamp_ns: u64,
  pub msg: String,
}

#[derive(Debug, Clone)]
pub struct Response {
  pub op: ResponseOpcode,
  pub timestamp_ns: u64,
  pub msg: String,
}

/// A matched (request, response) pair ready for telemetry emission (spec §3).
///
/// Invariant: `req.timestamp_ns <= resp.timestamp_ns`, except for records
/// synthesized from solitary Event responses, where both timestamps and
/// `req.msg == "-"` hold by construction (spec §4.5 step 1).
#[derive(Debug, Clone)]
pub struct Record {
  pub req: Request,
  pub resp: Response,
}
