use crate::flow_event::FlowEvent;

/// Turns one logical capture record into a [`FlowEvent`].
///
/// Returning `None` means the record is skipped: it did not carry every token a
/// flow needs. A skip is not an error and callers keep going.
pub trait CaptureParser {
    fn parse(&self, record: &str) -> Option<FlowEvent>;
}
