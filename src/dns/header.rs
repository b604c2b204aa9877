use nom::bits::bits;
use nom::bits::complete::take;
use nom::combinator::map;
use nom::error::Error;
use nom::IResult;

use super::parse_utils::VResult;
use super::Serialize;

//  The header contains the following fields:
//
//                                  1  1  1  1  1  1
//    0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
//  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//  |                      ID                       |
//  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//  |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
//  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//  |                    QDCOUNT                    |
//  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//  |                    ANCOUNT                    |
//  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//  |                    NSCOUNT                    |
//  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//  |                    ARCOUNT                    |
//  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    // A 16 bit identifier assigned by the program that generates any kind of query
    pub id: u16,

    // A one bit field that specifies whether this message is a query (0), or a response (1).
    pub qr: bool,

    // A four bit field that specifies kind of query in this message.
    pub opcode: Opcode,

    // Authoritative Answer - this bit is valid in responses, and specifies that the responding
    // name server is an authority for the domain name in question section.
    pub aa: bool,

    // TrunCation - specifies that this message was truncated due to length greater than that
    // permitted on the transmission channel.
    pub tc: bool,

    // Recursion Desired - If RD is set, it directs the name server to pursue the query
    // recursively. This resolver never sets it; it pursues delegations itself.
    pub rd: bool,

    // Recursion Available - denotes whether recursive query support is available in the server.
    pub ra: bool,

    // Z Reserved for future use.  Must be zero in all queries and responses.
    pub z: u8,

    // Response code - this 4 bit field is set as part of responses.
    pub r_code: ResponseCode,

    // QDCOUNT an unsigned 16 bit integer specifying the number of entries in the question section.
    pub qd_count: u16,

    // ANCOUNT an unsigned 16 bit integer specifying the number of resource records in the answer section.
    pub an_count: u16,

    // NSCOUNT an unsigned 16 bit integer specifying the number of name server resource records in the authority records section.
    pub ns_count: u16,

    // ARCOUNT an unsigned 16 bit integer specifying the number of resource records in the additional records section.
    pub ar_count: u16,
}

impl Header {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u16,
        qr: bool,
        opcode: Opcode,
        aa: bool,
        tc: bool,
        rd: bool,
        ra: bool,
        r_code: ResponseCode,
        qd_count: u16,
        an_count: u16,
        ns_count: u16,
        ar_count: u16,
    ) -> Header {
        Self {
            id,
            qr,
            opcode,
            aa,
            tc,
            rd,
            ra,
            z: 0x00,
            r_code,
            qd_count,
            an_count,
            ns_count,
            ar_count,
        }
    }

    // Header of an outgoing non-recursive query with a single question.
    pub(crate) fn query(id: u16) -> Header {
        Header::new(
            id,
            false,
            Opcode::Query,
            false,
            false,
            false,
            false,
            ResponseCode::NoError,
            1,
            0,
            0,
            0,
        )
    }

    pub fn deserialize(input: &[u8]) -> VResult<&[u8], Header> {
        bits::<_, _, Error<(&[u8], usize)>, Error<&[u8]>, _>(parse_header)(input)
    }
}

impl Serialize for Header {
    fn serialize(&self) -> Result<Vec<u8>, anyhow::Error> {
        let flags_upper = (self.qr as u8) << 7
            | self.opcode.code() << 3
            | (self.aa as u8) << 2
            | (self.tc as u8) << 1
            | self.rd as u8;
        let flags_lower = (self.ra as u8) << 7 | self.z << 4 | self.r_code.code();

        let mut bytes = Vec::with_capacity(12);
        bytes.extend_from_slice(&self.id.to_be_bytes());
        bytes.push(flags_upper);
        bytes.push(flags_lower);
        for count in [self.qd_count, self.an_count, self.ns_count, self.ar_count] {
            bytes.extend_from_slice(&count.to_be_bytes());
        }
        Ok(bytes)
    }
}

type BitInput<'a> = (&'a [u8], usize);

fn parse_header(input: BitInput) -> IResult<BitInput, Header> {
    let (input, id) = parse_u16(input)?;
    let (input, qr) = parse_bool(input)?;
    let (input, opcode) = parse_opcode(input)?;
    let (input, aa) = parse_bool(input)?;
    let (input, tc) = parse_bool(input)?;
    let (input, rd) = parse_bool(input)?;
    let (input, ra) = parse_bool(input)?;
    let (input, _) = skip(input, 3)?;
    let (input, r_code) = parse_rcode(input)?;
    let (input, qd_count) = parse_u16(input)?;
    let (input, an_count) = parse_u16(input)?;
    let (input, ns_count) = parse_u16(input)?;
    let (input, ar_count) = parse_u16(input)?;

    Ok((
        input,
        Header::new(
            id, qr, opcode, aa, tc, rd, ra, r_code, qd_count, an_count, ns_count, ar_count,
        ),
    ))
}

fn parse_u16(i: BitInput) -> IResult<BitInput, u16> {
    take(16usize)(i)
}

fn parse_bool(i: BitInput) -> IResult<BitInput, bool> {
    map(take(1usize), |bits: u8| bits > 0)(i)
}

fn parse_opcode(i: BitInput) -> IResult<BitInput, Opcode> {
    map(take(4usize), Opcode::from_code)(i)
}

fn skip(i: BitInput, value: usize) -> IResult<BitInput, ()> {
    map(take(value), |_bits: u8| ())(i)
}

fn parse_rcode(i: BitInput) -> IResult<BitInput, ResponseCode> {
    map(take(4usize), ResponseCode::from_code)(i)
}

// OPCODE
//
// A four bit field that specifies kind of query in this message. This value is set by the
// originator of a query and copied into the response.  The values are:
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // a standard query (QUERY)
    Query,
    // an inverse query (IQUERY)
    IQuery,
    // a server status request (STATUS)
    Status,
    // reserved for future use (value 3-15)
    Reserved,
}

impl Opcode {
    pub fn code(&self) -> u8 {
        match self {
            Opcode::Query => 0,
            Opcode::IQuery => 1,
            Opcode::Status => 2,
            Opcode::Reserved => 3,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Opcode::Query,
            1 => Opcode::IQuery,
            2 => Opcode::Status,
            _ => Opcode::Reserved,
        }
    }
}

// RCODE Response code - this 4 bit field is set as part of responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    // No error condition
    NoError,

    // Format error: The name server was unable to interpret the query.
    FormatError,

    // Server failure: The name server was unable to process this query due to a problem with the name server.
    ServerFailure,

    // Name Error: This code signifies that the domain name referenced in the query does not exist.
    NameError,

    // Not Implemented: The name server does not support the requested kind of query.
    NotImplemented,

    // Refused: The name server refuses to perform the specified operation for policy reasons.
    Refused,

    // Anything above 5.
    Other(u8),
}

impl ResponseCode {
    pub fn code(&self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServerFailure => 2,
            ResponseCode::NameError => 3,
            ResponseCode::NotImplemented => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => code & 0x0F,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}
