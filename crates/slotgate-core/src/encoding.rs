//! Hostname encoding for use as document field-path segments.

/// Escape characters that are structurally significant in document-store
/// field paths: a literal period and dollar sign.
///
/// The encoded form is the stored and compared form; nothing ever decodes
/// it. Hostnames without significant characters pass through unchanged.
pub fn encode_hostname(hostname: &str) -> String {
    if !hostname.contains(['.', '$']) {
        return hostname.to_string();
    }
    let mut encoded = String::with_capacity(hostname.len() + 4);
    for ch in hostname.chars() {
        match ch {
            '.' => encoded.push_str("%2E"),
            '$' => encoded.push_str("%24"),
            _ => encoded.push(ch),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_hostname_unchanged() {
        assert_eq!(encode_hostname("worker17"), "worker17");
    }

    #[test]
    fn period_escaped() {
        assert_eq!(encode_hostname("db.internal"), "db%2Einternal");
    }

    #[test]
    fn dollar_escaped() {
        assert_eq!(encode_hostname("a$b"), "a%24b");
    }

    #[test]
    fn mixed_fqdn() {
        assert_eq!(encode_hostname("job$1.eu.example.com"), "job%241%2Eeu%2Eexample%2Ecom");
    }
}
