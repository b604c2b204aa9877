use std::net::Ipv4Addr;

use burrow::dns::question::Question;
use burrow::dns::record::ResourceRecord;
use burrow::Tracer;

/// Prints every wire event as it happens; this is what `--verbose` shows.
pub struct ConsoleTracer;

impl Tracer for ConsoleTracer {
    fn query_to_send(&self, question: &Question, server: Ipv4Addr, txid: u16) {
        println!(";; query {:#06x}: {} -> {}", txid, question, server);
    }

    fn response_header(&self, txid: u16, authoritative: bool, rcode: u8) {
        println!(
            ";; reply {:#06x}: authoritative={} rcode={}",
            txid, authoritative, rcode
        );
    }

    fn answers_header(&self, count: u16) {
        println!(";; ANSWER: {}", count);
    }

    fn nameservers_header(&self, count: u16) {
        println!(";; AUTHORITY: {}", count);
    }

    fn additional_header(&self, count: u16) {
        println!(";; ADDITIONAL: {}", count);
    }

    fn resource_record(&self, record: &ResourceRecord, _type_code: u16, _class_code: u16) {
        println!("{}", record);
    }
}
