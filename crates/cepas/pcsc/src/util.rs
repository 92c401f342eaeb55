//! Connection string handling

/// Driver prefix accepted in connection strings
const DRIVER_PREFIX: &str = "pcsc";

/// Which reader a connection string refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReaderSelector<'a> {
    /// First reader reported by the service
    First,
    /// Reader matching this name
    Named(&'a str),
}

/// Parse `""`, `"pcsc"`, `"pcsc:<name>"` or a bare reader name
pub(crate) fn parse_connstring(connstring: &str) -> ReaderSelector<'_> {
    let connstring = connstring.trim();
    let name = match connstring.split_once(':') {
        Some((DRIVER_PREFIX, name)) => name.trim(),
        _ if connstring == DRIVER_PREFIX => "",
        _ => connstring,
    };

    if name.is_empty() {
        ReaderSelector::First
    } else {
        ReaderSelector::Named(name)
    }
}

/// Pick a reader by exact name, falling back to the first name containing it
pub(crate) fn select_reader<'r>(readers: &'r [String], selector: &ReaderSelector<'_>) -> Option<&'r str> {
    match selector {
        ReaderSelector::First => readers.first().map(String::as_str),
        ReaderSelector::Named(name) => readers
            .iter()
            .find(|r| r.as_str() == *name)
            .or_else(|| readers.iter().find(|r| r.contains(name)))
            .map(String::as_str),
    }
}
