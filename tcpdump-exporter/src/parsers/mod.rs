pub mod parser;
pub mod tcpdump_parser;
