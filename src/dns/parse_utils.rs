use nom::combinator::map;
use nom::error::{Error, ErrorKind};
use nom::number::complete::{be_u16, be_u32};
use nom::IResult;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str;

use super::{QClass, QType};

pub type VResult<I, O> = IResult<I, O, Error<I>>;

// A chain of compression pointers longer than this cannot occur in a 512 byte
// message; anything that deep is a loop.
const MAX_POINTER_JUMPS: usize = 128;

pub(crate) fn fail(input: &[u8], kind: ErrorKind) -> nom::Err<Error<&[u8]>> {
    nom::Err::Error(Error::new(input, kind))
}

// Deserializes a name made of ascii labels prefixed by a length byte and
// terminated by a null byte. Example:
//
// 0x06 0x67 0x6f 0x6f 0x67 0x6c 0x65 0x03 0x63 0x6f 0x6d 0x00
//
// 6google3com -> google.com
//
// A length byte with both high bits set is instead a pointer: together with
// the next byte it forms a 14-bit offset from the start of the message, and
// label reading continues there. The returned remainder resumes immediately
// after the end of the name in the original input, i.e. after the first
// pointer if one was followed, after the null byte otherwise.
//
// `input` must be a suffix of `source` (the whole message), since pointer
// offsets address the message from its first byte.
pub fn parse_name<'a>(input: &'a [u8], source: &'a [u8]) -> VResult<&'a [u8], String> {
    let start = source.len() - input.len();
    let mut pos = start;
    let mut resume = None;
    let mut jumps = 0;
    let mut labels: Vec<String> = Vec::new();

    loop {
        let flag = *source.get(pos).ok_or_else(|| fail(input, ErrorKind::Eof))?;
        if is_ptr(flag) {
            let low = *source.get(pos + 1).ok_or_else(|| fail(input, ErrorKind::Eof))?;
            jumps += 1;
            if jumps > MAX_POINTER_JUMPS {
                return Err(fail(input, ErrorKind::TooLarge));
            }
            if resume.is_none() {
                resume = Some(pos + 2);
            }
            pos = ptr_value(flag, low);
        } else if flag == 0x00 {
            if resume.is_none() {
                resume = Some(pos + 1);
            }
            break;
        } else {
            let length = flag as usize;
            let label = source
                .get(pos + 1..pos + 1 + length)
                .ok_or_else(|| fail(input, ErrorKind::Eof))?;
            let token = str::from_utf8(label).map_err(|_| fail(input, ErrorKind::Char))?;
            labels.push(token.to_owned());
            pos += 1 + length;
        }
    }

    let resume = resume.unwrap_or(start);
    Ok((&source[resume..], labels.join(".")))
}

pub fn is_ptr(byte: u8) -> bool {
    byte >> 6 == 3
}

pub fn ptr_value(high: u8, low: u8) -> usize {
    ((high & 0b0011_1111) as usize) << 8 | low as usize
}

pub fn parse_qtype(buffer: &[u8]) -> VResult<&[u8], QType> {
    map(be_u16, QType::from_code)(buffer)
}

pub fn parse_qclass(buffer: &[u8]) -> VResult<&[u8], QClass> {
    map(be_u16, QClass::from_code)(buffer)
}

pub fn parse_ttl(buffer: &[u8]) -> VResult<&[u8], u32> {
    be_u32(buffer)
}

pub fn parse_rdlength(buffer: &[u8]) -> VResult<&[u8], u16> {
    be_u16(buffer)
}

pub fn parse_ipv4(buffer: &[u8]) -> VResult<&[u8], Ipv4Addr> {
    map(be_u32, Ipv4Addr::from)(buffer)
}

pub fn parse_ipv6(buffer: &[u8]) -> VResult<&[u8], Ipv6Addr> {
    map(nom::number::complete::be_u128, Ipv6Addr::from)(buffer)
}
