use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use super::parser::CaptureParser;
use crate::flow_event::FlowEvent;

lazy_static! {
    // Anchors only on `proto`, `length` and the `host.port > host.port` pair.
    // `.` stops at line breaks, so `length` always comes from the summary line.
    static ref RECORD_REGEX: Regex = Regex::new(
        r".*proto (?P<proto>\w+) .*length (?P<length>\d+).*\n\s*(?P<src>[\w\d\.-]+)\.(?P<srcp>[\w\d-]+) > (?P<dst>[\w\d\.-]+)\.(?P<dstp>[\w\d-]+).*"
    )
    .unwrap();
}

/// Parses the two-line records `tcpdump -v` prints for IP traffic:
///
/// ```text
/// 11:13:09.115134 IP (tos 0x0, ttl 62, ..., proto TCP (6), length 96)
///     122.228.207.19.22 > 153.35.127.167.25040: Flags [P.], ...
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpdumpParser;

impl TcpdumpParser {
    pub fn new() -> Self {
        TcpdumpParser
    }
}

impl CaptureParser for TcpdumpParser {
    fn parse(&self, record: &str) -> Option<FlowEvent> {
        let caps = RECORD_REGEX.captures(record)?;

        let length = match caps["length"].parse::<u64>() {
            Ok(length) => length,
            Err(e) => {
                trace!("Unusable length {:?}: {}", &caps["length"], e);
                return None;
            }
        };

        Some(FlowEvent::new(
            caps["proto"].to_lowercase(),
            length,
            caps["src"].to_string(),
            caps["srcp"].to_string(),
            caps["dst"].to_string(),
            caps["dstp"].to_string(),
        ))
    }
}
