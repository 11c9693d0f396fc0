use super::RecordType;
use serde::Serialize;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A mail exchanger as returned by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxRecord {
    pub host: String,
    pub pref: u16,
}

impl MxRecord {
    pub fn new(host: impl Into<String>, pref: u16) -> Self {
        Self {
            host: host.into(),
            pref,
        }
    }
}

/// Values of one record type, serialized without a tag so that the
/// surrounding response decides the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordSet {
    Ipv4(Vec<Ipv4Addr>),
    Ipv6(Vec<Ipv6Addr>),
    Cname(String),
    Mx(Vec<MxRecord>),
    Ns(Vec<String>),
    Ptr(Vec<String>),
    Txt(Vec<String>),
}

impl RecordSet {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordSet::Ipv4(_) => RecordType::A,
            RecordSet::Ipv6(_) => RecordType::AAAA,
            RecordSet::Cname(_) => RecordType::CNAME,
            RecordSet::Mx(_) => RecordType::MX,
            RecordSet::Ns(_) => RecordType::NS,
            RecordSet::Ptr(_) => RecordType::PTR,
            RecordSet::Txt(_) => RecordType::TXT,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordSet::Ipv4(v) => v.len(),
            RecordSet::Ipv6(v) => v.len(),
            RecordSet::Cname(name) => usize::from(!name.is_empty()),
            RecordSet::Mx(v) => v.len(),
            RecordSet::Ns(v) | RecordSet::Ptr(v) | RecordSet::Txt(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
