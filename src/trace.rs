use std::net::Ipv4Addr;

use log::debug;

use crate::dns::question::Question;
use crate::dns::record::ResourceRecord;

/// A passive observer of the resolver's wire activity. Every hook has an
/// empty default body; sinks implement only what they care about. Nothing a
/// sink does can influence resolution.
pub trait Tracer: Send + Sync {
    /// Fires right before a datagram goes out, once per transmission, so a
    /// retried query is reported as many times as it is sent.
    fn query_to_send(&self, _question: &Question, _server: Ipv4Addr, _txid: u16) {}

    /// Fires once the response header is parsed, before any section.
    fn response_header(&self, _txid: u16, _authoritative: bool, _rcode: u8) {}

    /// Fires before the answer section is parsed.
    fn answers_header(&self, _count: u16) {}

    /// Fires before the authority section is parsed.
    fn nameservers_header(&self, _count: u16) {}

    /// Fires before the additional section is parsed.
    fn additional_header(&self, _count: u16) {}

    /// Fires once per successfully parsed record, in wire order.
    fn resource_record(&self, _record: &ResourceRecord, _type_code: u16, _class_code: u16) {}
}

/// Discards everything.
pub struct NullTracer;

impl Tracer for NullTracer {}

/// Forwards every event to the `log` facade at debug level.
pub struct LogTracer;

impl Tracer for LogTracer {
    fn query_to_send(&self, question: &Question, server: Ipv4Addr, txid: u16) {
        debug!("query {:#06x} [{}] -> {}", txid, question, server);
    }

    fn response_header(&self, txid: u16, authoritative: bool, rcode: u8) {
        debug!(
            "reply {:#06x} authoritative={} rcode={}",
            txid, authoritative, rcode
        );
    }

    fn answers_header(&self, count: u16) {
        debug!("answer records: {}", count);
    }

    fn nameservers_header(&self, count: u16) {
        debug!("authority records: {}", count);
    }

    fn additional_header(&self, count: u16) {
        debug!("additional records: {}", count);
    }

    fn resource_record(&self, record: &ResourceRecord, type_code: u16, class_code: u16) {
        debug!("record {} (type {}, class {})", record, type_code, class_code);
    }
}
