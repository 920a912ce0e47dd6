/// Implementation-time tunables for the stitcher core (spec §6, §5b).
///
/// Passed explicitly to `Stitcher::new`, the same way `mysql::ConnectionOptions`
/// is passed to `Connection::connect` rather than read from globals. The
/// default matches the original's behavior exactly: no limits, no aging-out.
#[derive(Debug, Clone, Default)]
pub struct StitcherConfig {
  /// Reject frames whose body exceeds this many bytes with `DecodeInvalid`
  /// before attempting to decode them. `None` (default) means unlimited.
  pub max_body_len: Option<usize>,

  /// Cap the number of hex characters rendered per value in `msg` strings.
  /// `None` (default) means unlimited.
  pub max_value_hex_len: Option<usize>,

  /// Resolves the open question in SPEC_FULL.md §9: when set, unconsumed
  /// requests older than this many nanoseconds relative to the most
  /// recently processed response are dropped during head compaction
  /// instead of accumulating forever. `None` (default) preserves the
  /// original's unbounded growth.
  pub max_unmatched_request_age_ns: Option<u64>,
}
