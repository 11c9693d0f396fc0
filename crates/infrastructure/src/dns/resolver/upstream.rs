use crate::dns::forwarding::{ip_to_reverse_domain, MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsTransport, TcpTransport};
use async_trait::async_trait;
use dnsgate_application::ports::BoundResolver;
use dnsgate_domain::{DomainError, RecordSet, RecordType, UpstreamAddr};
use hickory_proto::op::Message;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::debug;

/// Resolver pinned to a single upstream, reached over TCP.
pub struct UpstreamResolver {
    transport: TcpTransport,
    query_timeout: Duration,
}

impl UpstreamResolver {
    pub fn new(upstream: UpstreamAddr, dial_timeout: Duration, query_timeout: Duration) -> Self {
        Self {
            transport: TcpTransport::new(upstream, dial_timeout),
            query_timeout,
        }
    }

    /// Name actually put in the question section. PTR targets must be IP
    /// literals and are rewritten to their reverse name.
    fn query_name(target: &str, record_type: RecordType) -> Result<String, DomainError> {
        if !record_type.takes_ip_target() {
            return Ok(target.to_string());
        }

        let ip: IpAddr = target
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(target.to_string()))?;

        Ok(ip_to_reverse_domain(&ip))
    }

    /// Address lookups of an IP literal answer with the literal itself, or
    /// with nothing when the family does not match.
    fn literal_address(
        target: &str,
        record_type: RecordType,
    ) -> Option<Result<RecordSet, DomainError>> {
        let ip: IpAddr = target.trim().parse().ok()?;

        match (record_type, ip) {
            (RecordType::A, IpAddr::V4(v4)) => Some(Ok(RecordSet::Ipv4(vec![v4]))),
            (RecordType::AAAA, IpAddr::V6(v6)) => Some(Ok(RecordSet::Ipv6(vec![v6]))),
            (RecordType::A | RecordType::AAAA, _) => Some(Err(DomainError::NoRecords)),
            _ => None,
        }
    }

    /// One query/reply exchange with the upstream.
    async fn exchange(&self, qname: &str, query_type: RecordType) -> Result<Message, DomainError> {
        let (id, query_bytes) = MessageBuilder::build_query(qname, query_type)?;
        let response = self.transport.send(&query_bytes, self.query_timeout).await?;
        ResponseParser::parse(&response, id)
    }

    /// Canonical name found through the address lookups: the A answer first,
    /// the AAAA answer when the A answer is empty.
    async fn canonical_name(&self, qname: &str) -> Result<RecordSet, DomainError> {
        for query_type in [RecordType::A, RecordType::AAAA] {
            let message = self.exchange(qname, query_type).await?;
            match ResponseParser::canonical_name(&message) {
                Ok(name) => return Ok(RecordSet::Cname(name)),
                Err(DomainError::NoRecords) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::NoRecords)
    }
}

#[async_trait]
impl BoundResolver for UpstreamResolver {
    async fn lookup(
        &self,
        target: &str,
        record_type: RecordType,
    ) -> Result<RecordSet, DomainError> {
        if let Some(literal) = Self::literal_address(target, record_type) {
            return literal;
        }

        let start = Instant::now();
        let qname = Self::query_name(target, record_type)?;

        let records = match record_type {
            RecordType::CNAME => self.canonical_name(&qname).await?,
            _ => {
                let message = self.exchange(&qname, record_type).await?;
                ResponseParser::extract_records(&message, record_type)?
            }
        };

        debug!(
            upstream = %self.transport.upstream(),
            qname = %qname,
            record_type = %record_type,
            count = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream answered"
        );

        Ok(records)
    }

    fn upstream(&self) -> &UpstreamAddr {
        self.transport.upstream()
    }
}
