use std::fmt::{self, Display, Formatter};
use std::net::{Ipv4Addr, Ipv6Addr};

use nom::error::ErrorKind;

use super::parse_utils::{
    fail, parse_ipv4, parse_ipv6, parse_name, parse_qclass, parse_qtype, parse_rdlength,
    parse_ttl, VResult,
};
use super::question::Question;
use super::QType;

// What this resolver keeps of an RDATA field: an address for A/AAAA, the
// target host name for NS/CNAME/MX, a hex rendering for everything else.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    Name(String),
    Hex(String),
}

impl Display for RData {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RData::A(address) => write!(f, "{}", address),
            // Eight explicit hex groups. `::` shorthand is deliberately not
            // used so the text matches what earlier tooling printed.
            RData::AAAA(address) => {
                let groups: Vec<String> = address
                    .segments()
                    .iter()
                    .map(|group| format!("{:x}", group))
                    .collect();
                write!(f, "{}", groups.join(":"))
            }
            RData::Name(name) => write!(f, "{}", name),
            RData::Hex(hex) => write!(f, "{}", hex),
        }
    }
}

// Resource record format
//
// The answer, authority, and additional sections all share the same
// format: a variable number of resource records, where the number of
// records is specified in the corresponding count field in the header.
// Each resource record has the following format:
//                                     1  1  1  1  1  1
//       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//     |                                               |
//     /                                               /
//     /                      NAME                     /
//     |                                               |
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//     |                      TYPE                     |
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//     |                     CLASS                     |
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//     |                      TTL                      |
//     |                                               |
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//     |                   RDLENGTH                    |
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
//     /                     RDATA                     /
//     /                                               /
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//
/// A record answers the question formed by its owner name, type and class.
/// Two records are equal when question and payload agree; the TTL is not
/// part of a record's identity.
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub question: Question,
    pub ttl: u32,
    pub payload: RData,
}

impl ResourceRecord {
    pub fn new(question: Question, ttl: u32, payload: RData) -> Self {
        Self {
            question,
            ttl,
            payload,
        }
    }
}

impl PartialEq for ResourceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.question == other.question && self.payload == other.payload
    }
}

impl Eq for ResourceRecord {}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.question.qname, self.ttl, self.question.qclass, self.question.qtype, self.payload
        )
    }
}

// Parses one record. The remainder always resumes at the byte after the
// RDATA window, however far the payload parse itself wandered through
// compression pointers. A payload that cannot be decoded yields `None` and
// leaves the remainder in the same defined place, so the caller can keep
// going with the next record.
pub fn parse_record<'a>(
    input: &'a [u8],
    source: &'a [u8],
) -> VResult<&'a [u8], Option<ResourceRecord>> {
    let (rest, name) = parse_name(input, source)?;
    let (rest, qtype) = parse_qtype(rest)?;
    let (rest, qclass) = parse_qclass(rest)?;
    let (rest, ttl) = parse_ttl(rest)?;
    let (rest, rd_length) = parse_rdlength(rest)?;
    let rd_length = rd_length as usize;

    if rest.len() < rd_length {
        return Err(fail(input, ErrorKind::Eof));
    }
    let window = &rest[..rd_length];
    let after = &rest[rd_length..];

    let record = decode_rdata(qtype, window, rest, source)
        .map(|payload| ResourceRecord::new(Question::new(name, qtype, qclass), ttl, payload));
    Ok((after, record))
}

fn decode_rdata(qtype: QType, window: &[u8], suffix: &[u8], source: &[u8]) -> Option<RData> {
    match qtype {
        QType::A if window.len() == 4 => {
            parse_ipv4(window).ok().map(|(_, address)| RData::A(address))
        }
        QType::AAAA if window.len() == 16 => parse_ipv6(window)
            .ok()
            .map(|(_, address)| RData::AAAA(address)),
        QType::NS | QType::CNAME => parse_name(suffix, source)
            .ok()
            .map(|(_, target)| RData::Name(target)),
        QType::MX if window.len() >= 2 => {
            // preference first, then the exchange name
            parse_name(&suffix[2..], source)
                .ok()
                .map(|(_, exchange)| RData::Name(exchange))
        }
        QType::MX => None,
        // Mis-sized address records degrade to hex rather than vanish.
        _ => Some(RData::Hex(hex::encode(window))),
    }
}
