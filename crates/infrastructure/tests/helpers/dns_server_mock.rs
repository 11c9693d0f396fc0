use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use hickory_proto::serialize::binary::BinEncodable;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// What the mock does with one incoming query.
pub enum MockReply {
    Answer {
        rcode: ResponseCode,
        answers: Vec<Record>,
    },
    /// Correct answer framing, wrong transaction ID.
    WrongId,
    /// Arbitrary frame body.
    Raw(Vec<u8>),
    /// Keep the connection open and never answer.
    Hang,
}

impl MockReply {
    pub fn answers(answers: Vec<Record>) -> Self {
        MockReply::Answer {
            rcode: ResponseCode::NoError,
            answers,
        }
    }

    pub fn rcode(rcode: ResponseCode) -> Self {
        MockReply::Answer {
            rcode,
            answers: Vec::new(),
        }
    }
}

type Handler = Arc<dyn Fn(&Query) -> MockReply + Send + Sync>;

/// DNS-over-TCP server on an ephemeral loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<Mutex<Vec<(String, RecordType)>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(handler: F) -> std::io::Result<Self>
    where
        F: Fn(&Query) -> MockReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let queries = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let seen = Arc::clone(&queries);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        if let Ok((stream, _)) = accepted {
                            tokio::spawn(Self::serve(stream, Arc::clone(&handler), Arc::clone(&seen)));
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Question names and types received so far, in arrival order.
    pub fn queries(&self) -> Vec<(String, RecordType)> {
        self.queries.lock().unwrap().clone()
    }

    async fn serve(
        mut stream: TcpStream,
        handler: Handler,
        seen: Arc<Mutex<Vec<(String, RecordType)>>>,
    ) {
        loop {
            let mut len_buf = [0u8; 2];
            if stream.read_exact(&mut len_buf).await.is_err() {
                return;
            }
            let mut body = vec![0u8; u16::from_be_bytes(len_buf) as usize];
            if stream.read_exact(&mut body).await.is_err() {
                return;
            }

            let Ok(request) = Message::from_vec(&body) else {
                return;
            };
            let Some(query) = request.queries().first().cloned() else {
                return;
            };
            seen.lock()
                .unwrap()
                .push((query.name().to_ascii(), query.query_type()));

            let reply = match handler(&query) {
                MockReply::Answer { rcode, answers } => {
                    Self::response(request.id(), &query, rcode, answers)
                }
                MockReply::WrongId => Self::response(
                    request.id().wrapping_add(1),
                    &query,
                    ResponseCode::NoError,
                    Vec::new(),
                ),
                MockReply::Raw(bytes) => bytes,
                MockReply::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    return;
                }
            };

            let len = (reply.len() as u16).to_be_bytes();
            if stream.write_all(&len).await.is_err() || stream.write_all(&reply).await.is_err() {
                return;
            }
        }
    }

    fn response(id: u16, query: &Query, rcode: ResponseCode, answers: Vec<Record>) -> Vec<u8> {
        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .set_recursion_available(true)
            .set_response_code(rcode)
            .add_query(query.clone());
        for answer in answers {
            message.add_answer(answer);
        }
        message.to_vec().unwrap()
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Answer record builders.
pub mod records {
    use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, PTR, TXT};
    use hickory_proto::rr::{Name, RData, Record};
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    pub fn a(owner: &str, ip: Ipv4Addr) -> Record {
        Record::from_rdata(name(owner), 300, RData::A(A(ip)))
    }

    pub fn aaaa(owner: &str, ip: Ipv6Addr) -> Record {
        Record::from_rdata(name(owner), 300, RData::AAAA(AAAA(ip)))
    }

    pub fn cname(owner: &str, target: &str) -> Record {
        Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
    }

    pub fn mx(owner: &str, pref: u16, exchange: &str) -> Record {
        Record::from_rdata(name(owner), 300, RData::MX(MX::new(pref, name(exchange))))
    }

    pub fn ns(owner: &str, host: &str) -> Record {
        Record::from_rdata(name(owner), 300, RData::NS(NS(name(host))))
    }

    pub fn ptr(owner: &str, host: &str) -> Record {
        Record::from_rdata(name(owner), 300, RData::PTR(PTR(name(host))))
    }

    pub fn txt(owner: &str, strings: &[&str]) -> Record {
        let strings = strings.iter().map(|s| s.to_string()).collect();
        Record::from_rdata(name(owner), 300, RData::TXT(TXT::new(strings)))
    }
}
