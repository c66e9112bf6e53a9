//! Sequential public identifiers (`EM001`, `STU042`, `ROOM007`, ...).
//!
//! The numeric suffix is zero-padded to three digits and grows past 999
//! without wrapping. Callers fetch the current highest id for a prefix and
//! derive the next one here.

pub fn next_in_sequence(prefix: &str, last_id: Option<&str>) -> String {
    let next = last_id
        .and_then(|id| id.strip_prefix(prefix))
        .and_then(|suffix| suffix.parse::<u64>().ok())
        .map(|n| n + 1)
        .unwrap_or(1);

    format!("{}{:03}", prefix, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_when_empty() {
        assert_eq!(next_in_sequence("EM", None), "EM001");
        assert_eq!(next_in_sequence("ROOM", None), "ROOM001");
    }

    #[test]
    fn increments_last_id() {
        assert_eq!(next_in_sequence("EM", Some("EM001")), "EM002");
        assert_eq!(next_in_sequence("STU", Some("STU041")), "STU042");
        assert_eq!(next_in_sequence("ROOM", Some("ROOM009")), "ROOM010");
    }

    #[test]
    fn grows_past_three_digits() {
        assert_eq!(next_in_sequence("ISS", Some("ISS999")), "ISS1000");
        assert_eq!(next_in_sequence("ISS", Some("ISS1000")), "ISS1001");
    }

    #[test]
    fn malformed_last_id_restarts_sequence() {
        assert_eq!(next_in_sequence("EM", Some("garbage")), "EM001");
        assert_eq!(next_in_sequence("EM", Some("EMabc")), "EM001");
    }
}
