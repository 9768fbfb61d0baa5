/// A single packet as summarised by the capture tool.
///
/// Ports are kept as the raw tokens the capture tool printed, since well-known
/// ports are often rendered by name (`https`, `domain`) rather than number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEvent {
    /// Lower-cased transport protocol name, e.g. `tcp`.
    pub protocol: String,
    /// IP length reported on the summary line.
    pub length: u64,
    pub src_host: String,
    pub src_port: String,
    pub dst_host: String,
    pub dst_port: String,
}

impl FlowEvent {
    /// Creates a new instance of FlowEvent.
    pub fn new(
        protocol: String,
        length: u64,
        src_host: String,
        src_port: String,
        dst_host: String,
        dst_port: String,
    ) -> Self {
        FlowEvent {
            protocol,
            length,
            src_host,
            src_port,
            dst_host,
            dst_port,
        }
    }

    /// Generates a printable key based on hosts, ports, and protocol
    pub fn endpoint_key(&self) -> String {
        format!(
            "{}.{} > {}.{}/{}",
            self.src_host, self.src_port, self.dst_host, self.dst_port, self.protocol
        )
    }
}

/// The key counters are aggregated under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelTuple {
    pub src: String,
    pub dst: String,
    pub proto: String,
    pub service: String,
}

impl LabelTuple {
    pub fn new(src: &str, dst: &str, proto: &str, service: &str) -> Self {
        LabelTuple {
            src: src.to_string(),
            dst: dst.to_string(),
            proto: proto.to_string(),
            service: service.to_string(),
        }
    }
}
