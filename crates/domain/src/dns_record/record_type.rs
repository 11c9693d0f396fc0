use std::fmt;

/// Record types the gateway exposes over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    NS,
    PTR,
    TXT,
}

impl RecordType {
    /// Dispatch order of the aggregate lookup.
    pub const ALL: [RecordType; 7] = [
        RecordType::A,
        RecordType::AAAA,
        RecordType::CNAME,
        RecordType::MX,
        RecordType::NS,
        RecordType::PTR,
        RecordType::TXT,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::NS => "NS",
            RecordType::PTR => "PTR",
            RecordType::TXT => "TXT",
        }
    }

    /// JSON key used for this type in lookup responses.
    pub fn result_key(&self) -> &'static str {
        match self {
            RecordType::A => "ipv4",
            RecordType::AAAA => "ipv6",
            RecordType::CNAME => "cname",
            RecordType::MX => "mx",
            RecordType::NS => "ns",
            RecordType::PTR => "ptr",
            RecordType::TXT => "txt",
        }
    }

    /// PTR is the only type queried with an address instead of a name.
    pub fn takes_ip_target(&self) -> bool {
        matches!(self, RecordType::PTR)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
