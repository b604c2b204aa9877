use anyhow::Result;
use nom::error::Error;
use nom::Finish;
use rand::random;

use super::header::Header;
use super::question::Question;
use super::record::{parse_record, ResourceRecord};
use super::{QType, Serialize};
use crate::trace::Tracer;

/// A decoded response, with records kept per section so the resolver can
/// tell an answer from a delegation.
#[derive(Debug)]
pub struct Response {
    pub header: Header,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Response {
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
    }

    /// The NS records of the authority section, in the order received.
    pub fn nameservers(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.authorities
            .iter()
            .filter(|record| record.question.qtype == QType::NS)
    }
}

/// Encodes a single-question, non-recursive query under a fresh transaction
/// id, returning both. The name goes out as plain labels; compression is
/// only ever honored on the way in.
pub fn encode_query(question: &Question) -> Result<(Vec<u8>, u16)> {
    let id = random::<u16>();
    let mut bytes = Header::query(id).serialize()?;
    bytes.append(&mut question.serialize()?);
    Ok((bytes, id))
}

/// Decodes a response message, reporting progress to the tracer: the header
/// first, then each section's count right before its records, then every
/// record that parsed. Records whose payload cannot be decoded are skipped;
/// a message whose framing cannot be followed is an error.
pub fn decode_response(source: &[u8], tracer: &dyn Tracer) -> Result<Response> {
    let (rest, header) = Header::deserialize(source).finish().map_err(describe)?;
    tracer.response_header(header.id, header.aa, header.r_code.code());

    // The question section is walked, not kept: records further down may
    // point into it.
    let mut rest = rest;
    for _ in 0..header.qd_count {
        let (next, _) = Question::deserialize(rest, source)
            .finish()
            .map_err(describe)?;
        rest = next;
    }

    tracer.answers_header(header.an_count);
    let (rest, answers) = parse_section(rest, source, header.an_count, tracer)?;
    tracer.nameservers_header(header.ns_count);
    let (rest, authorities) = parse_section(rest, source, header.ns_count, tracer)?;
    tracer.additional_header(header.ar_count);
    let (_, additionals) = parse_section(rest, source, header.ar_count, tracer)?;

    Ok(Response {
        header,
        answers,
        authorities,
        additionals,
    })
}

fn parse_section<'a>(
    mut rest: &'a [u8],
    source: &'a [u8],
    count: u16,
    tracer: &dyn Tracer,
) -> Result<(&'a [u8], Vec<ResourceRecord>)> {
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (next, record) = parse_record(rest, source).finish().map_err(describe)?;
        rest = next;
        if let Some(record) = record {
            tracer.resource_record(
                &record,
                record.question.qtype.code(),
                record.question.qclass.code(),
            );
            records.push(record);
        }
    }
    Ok((rest, records))
}

fn describe(error: Error<&[u8]>) -> anyhow::Error {
    anyhow::Error::msg(format!(
        "malformed message: {:?} with {} bytes left",
        error.code,
        error.input.len()
    ))
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use pretty_assertions::assert_eq;

    use super::super::record::RData;
    use super::super::{QClass, QType};
    use super::*;
    use crate::trace::NullTracer;

    fn encode_name(name: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        for label in name.split('.').filter(|label| !label.is_empty()) {
            bytes.push(label.len() as u8);
            bytes.extend_from_slice(label.as_bytes());
        }
        bytes.push(0);
        bytes
    }

    #[test]
    fn encoded_query_is_non_recursive() {
        let question = Question::new("example.com", QType::A, QClass::IN);

        let (bytes, id) = encode_query(&question).unwrap();

        assert_eq!(id.to_be_bytes(), bytes[0..2]);
        // flags all zero: QR=0, opcode=QUERY, RD=0
        assert_eq!(&[0x00, 0x00], &bytes[2..4]);
        // one question, nothing else
        assert_eq!(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], &bytes[4..12]);
        assert_eq!(encode_name("example.com")[..], bytes[12..bytes.len() - 4]);
    }

    #[test]
    fn decode_response_with_all_sections() {
        // header: id 0x1234, QR+AA, 1 question, 1 answer, 1 authority, 1 additional
        let mut bytes = vec![
            0x12, 0x34, 0x84, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01,
        ];
        bytes.extend(encode_name("example.com"));
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        // answer: example.com A 93.184.216.34, via a pointer to the question name
        bytes.extend_from_slice(&[
            0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x0e, 0x10, 0x00, 0x04, 0x5d, 0xb8,
            0xd8, 0x22,
        ]);
        // authority: example.com NS ns.example.com, target compressed against the question
        bytes.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x0e, 0x10]);
        bytes.extend_from_slice(&[0x00, 0x05, 0x02, 0x6e, 0x73, 0xc0, 0x0c]);
        // additional: ns.example.com A 192.0.2.1
        bytes.extend(encode_name("ns.example.com"));
        bytes.extend_from_slice(&[
            0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x0e, 0x10, 0x00, 0x04, 0xc0, 0x00, 0x02, 0x01,
        ]);

        let response = decode_response(&bytes, &NullTracer).unwrap();

        assert_eq!(0x1234, response.header.id);
        assert!(response.header.aa);
        assert_eq!(
            vec![ResourceRecord::new(
                Question::new("example.com", QType::A, QClass::IN),
                3600,
                RData::A(Ipv4Addr::new(93, 184, 216, 34)),
            )],
            response.answers
        );
        assert_eq!(
            vec![ResourceRecord::new(
                Question::new("example.com", QType::NS, QClass::IN),
                3600,
                RData::Name("ns.example.com".to_owned()),
            )],
            response.authorities
        );
        assert_eq!(
            vec![ResourceRecord::new(
                Question::new("ns.example.com", QType::A, QClass::IN),
                3600,
                RData::A(Ipv4Addr::new(192, 0, 2, 1)),
            )],
            response.additionals
        );

        let nameservers: Vec<_> = response.nameservers().collect();
        assert_eq!(1, nameservers.len());
    }

    #[test]
    fn record_after_compressed_rdata_still_parses() {
        // Two answers; the first one's RDATA is a compressed name, and the
        // cursor must land exactly after it for the second to come out right.
        let mut bytes = vec![
            0x00, 0x10, 0x80, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
        ];
        bytes.extend(encode_name("www.example.com"));
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        // CNAME www.example.com -> example.com (pointer to offset 16, the
        // "example" label inside the question name)
        bytes.extend_from_slice(&[
            0xc0, 0x0c, 0x00, 0x05, 0x00, 0x01, 0x00, 0x00, 0x0e, 0x10, 0x00, 0x02, 0xc0, 0x10,
        ]);
        // A example.com 93.184.216.34
        bytes.extend_from_slice(&[
            0xc0, 0x10, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x0e, 0x10, 0x00, 0x04, 0x5d, 0xb8,
            0xd8, 0x22,
        ]);

        let response = decode_response(&bytes, &NullTracer).unwrap();

        assert_eq!(2, response.answers.len());
        assert_eq!(
            RData::Name("example.com".to_owned()),
            response.answers[0].payload
        );
        assert_eq!(
            Question::new("example.com", QType::A, QClass::IN),
            response.answers[1].question
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let bytes = vec![0xff; 7];

        assert!(decode_response(&bytes, &NullTracer).is_err());
    }
}
