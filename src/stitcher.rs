// Stitcher (spec §4.5): pairs queued requests and responses by stream id
// and produces matched records. Response-led: the response queue drives
// the scan, and the request queue is only ever mutated from its head.

use crate::config::StitcherConfig;
use crate::opcode::ResponseOpcode;
use crate::queue::FrameQueue;
use crate::record::{Record, Request};
use crate::{request, response};

pub struct Stitcher {
  config: StitcherConfig,
}

impl Stitcher {
  pub fn new(config: StitcherConfig) -> Self {
    Self { config }
  }

  /// Processes every response currently in `responses`, matching each one
  /// against `requests` and returning the records produced. Both queues
  /// are mutated in place; `responses` is always empty on return.
  pub fn process_frames(&self, requests: &mut FrameQueue, responses: &mut FrameQueue) -> Vec<Record> {
    let mut records = Vec::new();

    while let Some(resp_frame) = responses.pop_front() {
      let is_event = matches!(ResponseOpcode::try_from(resp_frame.opcode), Ok(ResponseOpcode::Event));

      if is_event {
        match response::decode_response(&resp_frame, &self.config) {
          Ok(resp) => {
            // Synthesized solitary request: spec §4.4 step 1. No request
            // frame is ever touched for an Event response.
            let req = Request { op: crate::opcode::RequestOpcode::Register, timestamp_ns: resp.timestamp_ns, msg: "-".to_string() };
            records.push(Record { req, resp });
          }
          Err(err) => {
            tracing::error!(stream = resp_frame.stream, opcode = resp_frame.opcode, error = %err, "failed to decode event response");
          }
        }
      } else {
        match requests.find_and_consume(resp_frame.stream) {
          Some(req_frame) => {
            let req_result = request::decode_request(&req_frame, &self.config);
            let resp_result = response::decode_response(&resp_frame, &self.config);

            match (req_result, resp_result) {
              (Ok(req), Ok(resp)) => {
                debug_assert!(req.timestamp_ns <= resp.timestamp_ns, "request must not be newer than its response");
                debug_assert_eq!(req_frame.stream, resp_frame.stream);
                records.push(Record { req, resp });
              }
              (Err(err), _) => {
                tracing::error!(stream = req_frame.stream, opcode = req_frame.opcode, error = %err, "failed to decode request");
              }
              (_, Err(err)) => {
                tracing::error!(stream = resp_frame.stream, opcode = resp_frame.opcode, error = %err, "failed to decode response");
              }
            }
          }
          None => {
            tracing::warn!(stream = resp_frame.stream, opcode = resp_frame.opcode, "orphan response: no matching request");
          }
        }
      }

      requests.compact_consumed();

      if let Some(max_age) = self.config.max_unmatched_request_age_ns {
        for expired in requests.evict_stale(resp_frame.timestamp_ns, max_age) {
          tracing::error!(stream = expired.stream, opcode = expired.opcode, "unmatched request expired and was dropped");
        }
      }
    }

    records
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::frame::Frame;

  fn startup_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0u16.to_be_bytes());
    body
  }

  fn ready_body() -> Vec<u8> {
    Vec::new()
  }

  #[test]
  fn stitch_scenario_emits_in_response_order() {
    let mut requests = FrameQueue::new();
    requests.push(Frame::new(1, 0x01, 10, startup_body())); // STARTUP
    requests.push(Frame::new(2, 0x07, 20, {
      let mut b = Vec::new();
      let text = b"SELECT * FROM t";
      b.extend_from_slice(&(text.len() as i32).to_be_bytes());
      b.extend_from_slice(text);
      b.extend_from_slice(&1u16.to_be_bytes());
      b.push(0x00);
      b
    })); // QUERY

    let mut responses = FrameQueue::new();
    responses.push(Frame::new(2, 0x08, 25, {
      let mut b = Vec::new();
      b.extend_from_slice(&1i32.to_be_bytes()); // Void
      b
    })); // RESULT
    responses.push(Frame::new(1, 0x02, 15, ready_body())); // READY

    let stitcher = Stitcher::new(StitcherConfig::default());
    let records = stitcher.process_frames(&mut requests, &mut responses);

    assert!(responses.is_empty());
    assert!(requests.is_empty());
    assert_eq!(2, records.len());
    assert_eq!("SELECT * FROM t", records[0].req.msg);
    assert_eq!(crate::opcode::RequestOpcode::Startup, records[1].req.op);
  }

  #[test]
  fn orphan_response_is_dropped_without_panic() {
    let mut requests = FrameQueue::new();
    let mut responses = FrameQueue::new();
    responses.push(Frame::new(1, 0x02, 10, ready_body()));

    let stitcher = Stitcher::new(StitcherConfig::default());
    let records = stitcher.process_frames(&mut requests, &mut responses);
    assert!(records.is_empty());
    assert!(responses.is_empty());
  }

  #[test]
  fn event_response_synthesizes_register_request_and_consumes_nothing() {
    let mut requests = FrameQueue::new();
    requests.push(Frame::new(9, 0x01, 5, startup_body()));

    let mut responses = FrameQueue::new();
    let mut event_body = Vec::new();
    event_body.extend_from_slice(&13u16.to_be_bytes());
    event_body.extend_from_slice(b"STATUS_CHANGE");
    event_body.extend_from_slice(&2u16.to_be_bytes());
    event_body.extend_from_slice(b"UP");
    event_body.push(4);
    event_body.extend_from_slice(&[127, 0, 0, 1]);
    event_body.extend_from_slice(&9042i32.to_be_bytes());
    responses.push(Frame::new(9, 0x0C, 100, event_body));

    let stitcher = Stitcher::new(StitcherConfig::default());
    let records = stitcher.process_frames(&mut requests, &mut responses);

    assert_eq!(1, records.len());
    assert_eq!("-", records[0].req.msg);
    assert_eq!(records[0].req.timestamp_ns, records[0].resp.timestamp_ns);
    assert_eq!(1, requests.len(), "event responses must not consume request frames");
  }

  #[test]
  fn decode_failure_drops_record_but_still_consumes_frames() {
    let mut requests = FrameQueue::new();
    requests.push(Frame::new(1, 0x7F, 10, &b""[..])); // unhandled opcode

    let mut responses = FrameQueue::new();
    responses.push(Frame::new(1, 0x02, 15, ready_body()));

    let stitcher = Stitcher::new(StitcherConfig::default());
    let records = stitcher.process_frames(&mut requests, &mut responses);

    assert!(records.is_empty());
    assert!(responses.is_empty());
    assert!(requests.is_empty(), "matched request must still be consumed even on decode failure");
  }
}
