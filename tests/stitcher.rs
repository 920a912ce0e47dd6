use cql::{Frame, FrameQueue, Stitcher, StitcherConfig};

fn int_prefixed(text: &[u8]) -> Vec<u8> {
  let mut b = Vec::new();
  b.extend_from_slice(&(text.len() as i32).to_be_bytes());
  b.extend_from_slice(text);
  b
}

// spec §8 scenario 6: requests = [(stream=1, STARTUP, t=10), (stream=2,
// QUERY, t=20)], responses = [(stream=2, RESULT, t=25), (stream=1, READY,
// t=15)]. Emission follows response order, not request order.
#[test]
fn stitch_scenario_pairs_by_stream_in_response_order() {
  let mut requests = FrameQueue::new();
  requests.push(Frame::new(1, 0x01, 10, vec![0x00, 0x00])); // STARTUP, empty string map

  let mut query_body = int_prefixed(b"SELECT * FROM t");
  query_body.extend_from_slice(&1u16.to_be_bytes()); // consistency ONE
  query_body.push(0x00); // flags
  requests.push(Frame::new(2, 0x07, 20, query_body));

  let mut responses = FrameQueue::new();
  responses.push(Frame::new(2, 0x08, 25, 1i32.to_be_bytes().to_vec())); // RESULT/Void
  responses.push(Frame::new(1, 0x02, 15, Vec::<u8>::new())); // READY

  let stitcher = Stitcher::new(StitcherConfig::default());
  let records = stitcher.process_frames(&mut requests, &mut responses);

  assert!(requests.is_empty());
  assert!(responses.is_empty());
  assert_eq!(2, records.len());

  assert_eq!("SELECT * FROM t", records[0].req.msg);
  assert_eq!("Response type = VOID", records[0].resp.msg);

  assert_eq!(r#"{}"#, records[1].req.msg);
  assert_eq!("", records[1].resp.msg);
  assert!(records[1].req.timestamp_ns <= records[1].resp.timestamp_ns);
}

#[test]
fn stream_reuse_matches_earliest_unconsumed_request_first() {
  let mut requests = FrameQueue::new();
  requests.push(Frame::new(1, 0x05, 1, Vec::<u8>::new())); // OPTIONS, t=1
  requests.push(Frame::new(1, 0x05, 2, Vec::<u8>::new())); // OPTIONS, t=2, same stream

  let mut responses = FrameQueue::new();
  responses.push(Frame::new(1, 0x02, 5, Vec::<u8>::new()));
  responses.push(Frame::new(1, 0x02, 6, Vec::<u8>::new()));

  let stitcher = Stitcher::new(StitcherConfig::default());
  let records = stitcher.process_frames(&mut requests, &mut responses);

  assert_eq!(2, records.len());
  assert_eq!(1, records[0].req.timestamp_ns);
  assert_eq!(2, records[1].req.timestamp_ns);
  assert!(requests.is_empty());
}

#[test]
fn unmatched_requests_survive_across_invocations_by_default() {
  let mut requests = FrameQueue::new();
  requests.push(Frame::new(1, 0x05, 1, Vec::<u8>::new()));

  let mut responses = FrameQueue::new();
  let stitcher = Stitcher::new(StitcherConfig::default());
  let records = stitcher.process_frames(&mut requests, &mut responses);

  assert!(records.is_empty());
  assert_eq!(1, requests.len(), "no response arrived, so the request must remain queued");
}

#[test]
fn unmatched_requests_age_out_when_configured() {
  let mut requests = FrameQueue::new();
  requests.push(Frame::new(1, 0x05, 0, Vec::<u8>::new()));

  let mut responses = FrameQueue::new();
  // Orphan response on a different stream, far in the future, so head
  // compaction + eviction runs against the stale stream-1 request.
  responses.push(Frame::new(2, 0x02, 1_000_000, Vec::<u8>::new()));

  let config = StitcherConfig { max_unmatched_request_age_ns: Some(1_000), ..Default::default() };
  let stitcher = Stitcher::new(config);
  let records = stitcher.process_frames(&mut requests, &mut responses);

  assert!(records.is_empty());
  assert!(requests.is_empty(), "stale unmatched request should have been evicted");
}
