use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use trust_dns_client::client::{Client, ClientConnection, SyncClient};
use trust_dns_client::error::{ClientError, ClientErrorKind};
use trust_dns_client::tcp::TcpClientConnection;
use trust_dns_client::udp::UdpClientConnection;
use trust_dns_proto::error::ProtoErrorKind;
use trust_dns_proto::op::{Edns, Message, MessageType, OpCode, Query, ResponseCode};
use trust_dns_proto::rr::{Name, RData};
use trust_dns_resolver::config::{Protocol, ResolverOpts};
use trust_dns_resolver::system_conf::read_system_conf;

use super::{Answer, DnsError, QueryKind, RecordData, ResolverConfig, TlsaRecord};

const DNS_PORT: u16 = 53;
const EDNS_PAYLOAD: u16 = 1232;

/// Backend answering single queries. Implemented over the wire by
/// [`ClientLookup`], and by stubs in tests.
pub trait DnsLookup {
    fn query(&self, name: &str, kind: QueryKind) -> Result<Answer, DnsError>;
}

impl<T: DnsLookup + ?Sized> DnsLookup for &T {
    fn query(&self, name: &str, kind: QueryKind) -> Result<Answer, DnsError> {
        (**self).query(name, kind)
    }
}

/// Sends queries with the DO bit set and reports the AD bit of each response.
#[derive(Debug, Clone)]
pub struct ClientLookup {
    nameservers: Vec<SocketAddr>,
    timeout: Duration,
    request_dnssec: bool,
}

impl ClientLookup {
    pub fn from_config(config: &ResolverConfig) -> Result<Self, DnsError> {
        let nameservers = match config.nameserver {
            Some(ip) => vec![SocketAddr::new(ip, DNS_PORT)],
            None => system_nameservers()?,
        };
        if nameservers.is_empty() {
            return Err(DnsError::NoNameserver);
        }
        let timeout = config
            .timeout
            .unwrap_or_else(|| ResolverOpts::default().timeout);
        tracing::debug!(?nameservers, ?timeout, "DNS client configured");
        Ok(Self {
            nameservers,
            timeout,
            request_dnssec: true,
        })
    }

    pub fn nameservers(&self) -> &[SocketAddr] {
        &self.nameservers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// UDP first; a truncated answer is fetched again over TCP within the
    /// same deadline.
    fn exchange(
        &self,
        server: SocketAddr,
        name: &Name,
        kind: QueryKind,
        deadline: Instant,
    ) -> Result<Message, ClientError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let connection = UdpClientConnection::with_timeout(server, remaining)?;
        let message = self.send(connection, name, kind)?;
        if !message.truncated() {
            return Ok(message);
        }

        tracing::debug!(%server, %name, %kind, "truncated response, retrying over TCP");
        let remaining = deadline.saturating_duration_since(Instant::now());
        let connection = TcpClientConnection::with_timeout(server, remaining)?;
        self.send(connection, name, kind)
    }

    fn send<CC: ClientConnection>(
        &self,
        connection: CC,
        name: &Name,
        kind: QueryKind,
    ) -> Result<Message, ClientError> {
        let client = SyncClient::new(connection);
        let request = build_query(name.clone(), kind, self.request_dnssec);
        client
            .send(request)
            .into_iter()
            .next()
            .unwrap_or_else(|| Err(ClientError::from("no response received")))
            .map(|response| (*response).clone())
    }
}

impl DnsLookup for ClientLookup {
    fn query(&self, name: &str, kind: QueryKind) -> Result<Answer, DnsError> {
        let absolute = if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{name}.")
        };
        let qname = Name::from_ascii(&absolute).map_err(|err| DnsError::invalid_name(name, err))?;

        let deadline = Instant::now() + self.timeout;
        let mut last_error = None;
        for server in &self.nameservers {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            tracing::trace!(%server, name, %kind, "sending query");
            match self.exchange(*server, &qname, kind, deadline) {
                Ok(message) => return answer_from(&message, name, kind),
                Err(err) => {
                    tracing::debug!(%server, name, %kind, error = %err, "nameserver failed");
                    last_error = Some(err);
                }
            }
        }

        Err(match last_error {
            Some(err) if !is_timeout(&err) => DnsError::query(name, kind, err),
            _ => DnsError::timeout(name, kind),
        })
    }
}

pub(crate) fn build_query(name: Name, kind: QueryKind, request_dnssec: bool) -> Message {
    let mut message = Message::new();
    message
        .add_query(Query::query(name, kind.record_type()))
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_authentic_data(request_dnssec);

    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_PAYLOAD);
    edns.set_version(0);
    edns.set_dnssec_ok(request_dnssec);
    message.set_edns(edns);
    message
}

/// Turns a response into an [`Answer`]; NXDOMAIN keeps its AD bit.
pub(crate) fn answer_from(message: &Message, name: &str, kind: QueryKind) -> Result<Answer, DnsError> {
    if message.truncated() {
        return Err(DnsError::truncated(name, kind));
    }
    let authenticated = message.header().authentic_data();
    tracing::debug!(
        name,
        %kind,
        rcode = %message.response_code(),
        authenticated,
        answers = message.answers().len(),
        "DNS response"
    );
    match message.response_code() {
        ResponseCode::NoError => {}
        ResponseCode::NXDomain => return Ok(Answer::nxdomain(authenticated)),
        code => return Err(DnsError::rcode(name, kind, code)),
    }

    let wanted = kind.record_type();
    let records = message
        .answers()
        .iter()
        .filter(|record| record.record_type() == wanted)
        .filter_map(|record| record.data())
        .filter_map(record_data)
        .collect();
    Ok(Answer::found(records, authenticated))
}

fn record_data(rdata: &RData) -> Option<RecordData> {
    match rdata {
        RData::A(a) => Some(RecordData::Address(IpAddr::V4((*a).into()))),
        RData::AAAA(aaaa) => Some(RecordData::Address(IpAddr::V6((*aaaa).into()))),
        RData::MX(mx) => Some(RecordData::Exchange {
            preference: mx.preference(),
            exchange: mx.exchange().to_ascii(),
        }),
        RData::TLSA(tlsa) => Some(RecordData::Tlsa(TlsaRecord::new(
            tlsa.cert_usage().into(),
            tlsa.selector().into(),
            tlsa.matching().into(),
            tlsa.cert_data(),
        ))),
        _ => None,
    }
}

fn system_nameservers() -> Result<Vec<SocketAddr>, DnsError> {
    let (config, _opts) = read_system_conf().map_err(DnsError::resolver_init)?;
    let mut servers: Vec<SocketAddr> = Vec::new();
    for ns in config.name_servers() {
        if ns.protocol == Protocol::Udp && !servers.contains(&ns.socket_addr) {
            servers.push(ns.socket_addr);
        }
    }
    Ok(servers)
}

fn is_timeout(err: &ClientError) -> bool {
    match err.kind() {
        ClientErrorKind::Timeout => true,
        ClientErrorKind::Proto(proto) => matches!(proto.kind(), ProtoErrorKind::Timeout),
        _ => false,
    }
}
