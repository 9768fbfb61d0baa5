use std::sync::Arc;

use log::{debug, error, trace};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    aggregator::Aggregator, classifier::classify, domain::reduce_host, flow_event::LabelTuple,
    parsers::parser::CaptureParser, services::ServiceTable,
};

/// Groups physical capture lines into logical records.
///
/// `tcpdump -v` prints a summary line followed by an indented detail line for
/// IP packets. Other packets (ARP, ...) only get the summary line.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    pending: Option<String>,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line and returns the record it completes, if any.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return None;
        }

        if line.starts_with(char::is_whitespace) {
            return match self.pending.take() {
                Some(mut summary) => {
                    summary.push('\n');
                    summary.push_str(line);
                    Some(summary)
                }
                None => Some(line.to_string()),
            };
        }

        // A new summary line closes the previous single-line record.
        self.pending.replace(line.to_string())
    }

    /// Returns the summary line still waiting for its detail line.
    pub fn finish(&mut self) -> Option<String> {
        self.pending.take()
    }
}

/// Parse, reduce, classify and count, one record at a time.
pub struct Pipeline<P> {
    parser: P,
    services: Arc<ServiceTable>,
    aggregator: Arc<Aggregator>,
    fqdn: bool,
}

impl<P> Pipeline<P>
where
    P: CaptureParser,
{
    pub fn new(
        parser: P,
        services: Arc<ServiceTable>,
        aggregator: Arc<Aggregator>,
        fqdn: bool,
    ) -> Self {
        Self {
            parser,
            services,
            aggregator,
            fqdn,
        }
    }

    /// Processes one logical record. Returns the labels that were counted, or
    /// `None` if the record was skipped.
    pub fn process(&self, record: &str) -> Option<LabelTuple> {
        let Some(event) = self.parser.parse(record) else {
            debug!("[SKIP] {}", record.replace('\n', "\t"));
            return None;
        };

        let labels = LabelTuple {
            src: reduce_host(&event.src_host, self.fqdn),
            dst: reduce_host(&event.dst_host, self.fqdn),
            proto: event.protocol.clone(),
            service: classify(&event, &self.services),
        };
        self.aggregator.record(&labels, event.length);

        trace!("{} -> {:?} +{}", event.endpoint_key(), labels, event.length);
        Some(labels)
    }
}

/// What a pump saw before its input ended.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpStats {
    pub records: u64,
    pub flows: u64,
    pub skipped: u64,
}

impl PumpStats {
    fn observe(&mut self, outcome: Option<LabelTuple>) {
        self.records += 1;
        match outcome {
            Some(_) => self.flows += 1,
            None => self.skipped += 1,
        }
    }
}

/// Reads capture output until it ends and pushes every record through
/// `pipeline`.
///
/// Records are processed in arrival order on the calling task. End of input
/// and read errors both end the pump; nothing is retried.
pub async fn pump<R, P>(mut reader: R, pipeline: &Pipeline<P>) -> PumpStats
where
    R: AsyncBufRead + Unpin,
    P: CaptureParser,
{
    let mut assembler = RecordAssembler::new();
    let mut stats = PumpStats::default();
    let mut buffer = Vec::with_capacity(512);

    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                let line = line.trim_end_matches(&['\n', '\r'][..]);
                if let Some(record) = assembler.push_line(line) {
                    stats.observe(pipeline.process(&record));
                }
            }
            Err(e) => {
                error!("Failed to read capture output: {}", e);
                break;
            }
        }
    }

    if let Some(record) = assembler.finish() {
        stats.observe(pipeline.process(&record));
    }

    debug!("Capture stream ended: {:?}", stats);
    stats
}
