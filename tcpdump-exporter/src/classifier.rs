use crate::{flow_event::FlowEvent, services::ServiceTable};

/// Picks the service label for a flow; empty when nothing matches.
///
/// Tiers, first match wins:
/// 1. destination port token is a known service name
/// 2. source port token is a known service name
/// 3. numeric destination port under the flow's protocol
/// 4. numeric source port under the flow's protocol
pub fn classify(event: &FlowEvent, services: &ServiceTable) -> String {
    if services.is_known_name(&event.dst_port) {
        return event.dst_port.clone();
    }
    if services.is_known_name(&event.src_port) {
        return event.src_port.clone();
    }

    lookup_port(&event.dst_port, &event.protocol, services)
        .or_else(|| lookup_port(&event.src_port, &event.protocol, services))
        .unwrap_or_default()
}

fn lookup_port(port: &str, protocol: &str, services: &ServiceTable) -> Option<String> {
    let port = port.parse::<u16>().ok()?;
    services.lookup(port, protocol).map(str::to_string)
}
