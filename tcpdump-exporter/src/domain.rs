/// Reduces a host token to the label it is aggregated under.
///
/// Dotted-quad addresses are returned as-is. Names are cut down to their last
/// two labels (`www.example.com` becomes `example.com`) unless `fqdn` is set.
/// There is no public suffix list, so `foo.co.uk` becomes `co.uk`.
pub fn reduce_host(host: &str, fqdn: bool) -> String {
    let parts: Vec<&str> = host.split('.').collect();

    if is_ipv4_literal(&parts) || fqdn || parts.len() <= 2 {
        return host.to_string();
    }

    parts[parts.len() - 2..].join(".")
}

fn is_ipv4_literal(parts: &[&str]) -> bool {
    parts.len() == 4 && parts.iter().all(|part| part.parse::<i64>().is_ok())
}
