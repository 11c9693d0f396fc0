use dnsgate_domain::{DomainError, MxRecord, RecordSet, RecordType};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{Name, RData};
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes an upstream reply and checks it answers the query we sent.
    ///
    /// NXDOMAIN and every non-zero rcode other than it become errors here, so
    /// a returned message always carries `NOERROR`.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<Message, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "Upstream replied with a query message".to_string(),
            ));
        }

        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID mismatch: expected {}, got {}",
                expected_id,
                message.id()
            )));
        }

        let rcode = message.response_code();

        debug!(
            rcode = Self::rcode_to_status(rcode),
            answers = message.answers().len(),
            truncated = message.truncated(),
            "DNS response parsed"
        );

        match rcode {
            ResponseCode::NoError => Ok(message),
            ResponseCode::NXDomain => Err(DomainError::NxDomain),
            other => Err(DomainError::ServerFailure(
                Self::rcode_to_status(other).to_string(),
            )),
        }
    }

    /// Collects the answer records of `record_type`.
    ///
    /// An answer section without any usable record (NODATA) is
    /// [`DomainError::NoRecords`].
    pub fn extract_records(
        message: &Message,
        record_type: RecordType,
    ) -> Result<RecordSet, DomainError> {
        let answers = message.answers();

        let set = match record_type {
            RecordType::A => RecordSet::Ipv4(
                answers
                    .iter()
                    .filter_map(|r| match r.data() {
                        RData::A(a) => Some(a.0),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::AAAA => RecordSet::Ipv6(
                answers
                    .iter()
                    .filter_map(|r| match r.data() {
                        RData::AAAA(aaaa) => Some(aaaa.0),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::CNAME => RecordSet::Cname(Self::canonical_name(message)?),
            RecordType::MX => RecordSet::Mx(
                answers
                    .iter()
                    .filter_map(|r| match r.data() {
                        RData::MX(mx) => {
                            Some(MxRecord::new(mx.exchange().to_utf8(), mx.preference()))
                        }
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::NS => RecordSet::Ns(
                answers
                    .iter()
                    .filter_map(|r| match r.data() {
                        RData::NS(ns) => Some(ns.0.to_utf8()),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::PTR => RecordSet::Ptr(
                answers
                    .iter()
                    .filter_map(|r| match r.data() {
                        RData::PTR(ptr) => Some(ptr.0.to_utf8()),
                        _ => None,
                    })
                    .collect(),
            ),
            RecordType::TXT => RecordSet::Txt(
                answers
                    .iter()
                    .filter_map(|r| match r.data() {
                        // Character-strings of one record are joined.
                        RData::TXT(txt) => Some(
                            txt.txt_data()
                                .iter()
                                .map(|s| String::from_utf8_lossy(s))
                                .collect::<String>(),
                        ),
                        _ => None,
                    })
                    .collect(),
            ),
        };

        if set.is_empty() {
            return Err(DomainError::NoRecords);
        }

        Ok(set)
    }

    /// Canonical name of the question, read off an address answer.
    ///
    /// This is the last hop of the CNAME chain, or the question name itself
    /// when the answer holds records but no alias. An empty answer section is
    /// [`DomainError::NoRecords`].
    pub fn canonical_name(message: &Message) -> Result<String, DomainError> {
        if let Some(target) = Self::final_cname_target(message) {
            return Ok(target);
        }

        if message.answers().is_empty() {
            return Err(DomainError::NoRecords);
        }

        message
            .queries()
            .first()
            .map(|q| q.name().to_utf8())
            .ok_or(DomainError::NoRecords)
    }

    /// Follows the CNAME chain from the question name to its last hop.
    fn final_cname_target(message: &Message) -> Option<String> {
        let links: Vec<(&Name, &Name)> = message
            .answers()
            .iter()
            .filter_map(|r| match r.data() {
                RData::CNAME(cname) => Some((r.name(), &cname.0)),
                _ => None,
            })
            .collect();

        let (first_owner, _) = links.first()?;
        let mut current = message
            .queries()
            .first()
            .map(|q| q.name())
            .unwrap_or(*first_owner);
        let mut target = None;

        // Bounded by the number of links, so a looping chain terminates.
        for _ in 0..links.len() {
            match links.iter().find(|(owner, _)| *owner == current) {
                Some((_, next)) => {
                    target = Some(*next);
                    current = *next;
                }
                None => break,
            }
        }

        target
            .or_else(|| links.last().map(|(_, t)| *t))
            .map(Name::to_utf8)
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
