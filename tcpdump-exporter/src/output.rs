use crate::{aggregator::FlowCounters, flow_event::LabelTuple};

pub const PACKETS_METRIC: &str = "tcpdump_packets_total";
pub const BYTES_METRIC: &str = "tcpdump_bytes_total";

/// Content type of the text exposition format written by [`render_metrics`].
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Renders both counter families in the Prometheus text exposition format.
pub fn render_metrics(snapshot: &[(LabelTuple, FlowCounters)]) -> String {
    let mut out = String::with_capacity(128 + snapshot.len() * 160);

    write_family(
        &mut out,
        PACKETS_METRIC,
        "Total packets transferred",
        snapshot.iter().map(|(labels, c)| (labels, c.packets)),
    );
    write_family(
        &mut out,
        BYTES_METRIC,
        "Total bytes transferred",
        snapshot.iter().map(|(labels, c)| (labels, c.bytes)),
    );

    out
}

fn write_family<'a>(
    out: &mut String,
    name: &str,
    help: &str,
    samples: impl Iterator<Item = (&'a LabelTuple, u64)>,
) {
    out.push_str(&format!("# HELP {} {}\n", name, help));
    out.push_str(&format!("# TYPE {} counter\n", name));
    for (labels, value) in samples {
        out.push_str(&format!(
            "{}{{src=\"{}\",dst=\"{}\",service=\"{}\",proto=\"{}\"}} {}\n",
            name,
            escape_label_value(&labels.src),
            escape_label_value(&labels.dst),
            escape_label_value(&labels.service),
            escape_label_value(&labels.proto),
            value
        ));
    }
}

fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
