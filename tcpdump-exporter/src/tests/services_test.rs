#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::services::ServiceTable;

    const SERVICES: &str = "\
# Network services, Internet style
#
tcpmux          1/tcp                           # TCP port service multiplexer
ssh             22/tcp                          # SSH Remote Login Protocol
domain          53/tcp                          # Domain Name Server
domain          53/udp
http            80/tcp          www             # WorldWideWeb HTTP
https           443/tcp
https           443/udp
http-alt        8080/tcp        webcache        # WWW caching service

# ssh-old 2222/tcp
bogus           70000/tcp
";

    #[test]
    fn test_from_lines_registers_entries() {
        let table = ServiceTable::from_lines(SERVICES.lines());

        assert_eq!(table.lookup(22, "tcp"), Some("ssh"));
        assert_eq!(table.lookup(53, "udp"), Some("domain"));
        assert_eq!(table.lookup(443, "udp"), Some("https"));
        assert_eq!(table.lookup(8080, "tcp"), Some("http-alt"));
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_lookup_misses() {
        let table = ServiceTable::from_lines(SERVICES.lines());

        assert_eq!(table.lookup(22, "udp"), None);
        assert_eq!(table.lookup(25040, "tcp"), None);
    }

    #[test]
    fn test_comments_and_bad_ports_are_ignored() {
        let table = ServiceTable::from_lines(SERVICES.lines());

        assert_eq!(table.lookup(2222, "tcp"), None);
        assert!(!table.is_known_name("ssh-old"));
        assert!(!table.is_known_name("bogus"));
        assert!(!table.is_known_name("#"));
    }

    #[test]
    fn test_known_names() {
        let table = ServiceTable::from_lines(SERVICES.lines());

        assert!(table.is_known_name("ssh"));
        assert!(table.is_known_name("http-alt"));
        // Aliases are not registered
        assert!(!table.is_known_name("www"));
        assert!(!table.is_known_name("webcache"));
    }

    #[test]
    fn test_last_entry_wins() {
        let table = ServiceTable::from_lines(["first 9000/tcp", "second 9000/tcp"]);

        assert_eq!(table.lookup(9000, "tcp"), Some("second"));
        assert!(table.is_known_name("first"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_protocol_is_lower_cased() {
        let table = ServiceTable::from_lines(["custom 4000/TCP"]);
        assert_eq!(table.lookup(4000, "tcp"), Some("custom"));
    }

    #[test]
    fn test_empty_feed() {
        let table = ServiceTable::from_lines(Vec::<String>::new());
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "tcpdump-exporter-services-{}",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SERVICES.as_bytes()).unwrap();
        drop(file);

        let table = ServiceTable::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.lookup(80, "tcp"), Some("http"));
    }

    #[test]
    fn test_load_missing_file_gives_empty_table() {
        let table = ServiceTable::load("/nonexistent/tcpdump-exporter/services");
        assert!(table.is_empty());
        assert!(ServiceTable::from_file("/nonexistent/tcpdump-exporter/services").is_err());
    }
}
