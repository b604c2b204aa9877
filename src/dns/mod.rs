use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

pub mod header;
pub mod message;
pub mod parse_utils;
pub mod question;
pub mod record;

pub trait Serialize {
    fn serialize(&self) -> Result<Vec<u8>, anyhow::Error>;
}

// TYPE fields used in resource records. The variants carried here are the
// ones this resolver interprets; everything else keeps its numeric code.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QType {
    A,     // 1 a host address
    NS,    // 2 an authoritative name server
    CNAME, // 5 the canonical name for an alias
    SOA,   // 6 marks the start of a zone of authority
    MX,    // 15 mail exchange
    AAAA,  // 28 ipv6 address
    Other(u16),
}

impl QType {
    pub fn code(&self) -> u16 {
        match self {
            QType::A => 1,
            QType::NS => 2,
            QType::CNAME => 5,
            QType::SOA => 6,
            QType::MX => 15,
            QType::AAAA => 28,
            QType::Other(code) => *code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            1 => QType::A,
            2 => QType::NS,
            5 => QType::CNAME,
            6 => QType::SOA,
            15 => QType::MX,
            28 => QType::AAAA,
            other => QType::Other(other),
        }
    }
}

impl Display for QType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            QType::Other(code) => write!(f, "TYPE{}", code),
            known => write!(f, "{:?}", known),
        }
    }
}

impl FromStr for QType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(QType::A),
            "NS" => Ok(QType::NS),
            "CNAME" => Ok(QType::CNAME),
            "SOA" => Ok(QType::SOA),
            "MX" => Ok(QType::MX),
            "AAAA" => Ok(QType::AAAA),
            other => other
                .parse::<u16>()
                .map(QType::from_code)
                .map_err(|_| format!("unknown record type: {}", s)),
        }
    }
}

// CLASS fields appear in resource records. Only the Internet class is
// interpreted; anything else keeps its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QClass {
    IN, // 1 the Internet
    Other(u16),
}

impl QClass {
    pub fn code(&self) -> u16 {
        match self {
            QClass::IN => 1,
            QClass::Other(code) => *code,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            1 => QClass::IN,
            other => QClass::Other(other),
        }
    }
}

impl Display for QClass {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            QClass::IN => write!(f, "IN"),
            QClass::Other(code) => write!(f, "CLASS{}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{QClass, QType};

    #[test]
    fn qtype_codes_roundtrip() {
        for code in [1u16, 2, 5, 6, 15, 28, 16, 257] {
            assert_eq!(code, QType::from_code(code).code());
        }
    }

    #[test]
    fn qtype_from_str() {
        assert_eq!(Ok(QType::AAAA), "aaaa".parse());
        assert_eq!(Ok(QType::MX), "MX".parse());
        assert_eq!(Ok(QType::Other(16)), "16".parse());
        assert!("bogus".parse::<QType>().is_err());
    }

    #[test]
    fn qclass_display() {
        assert_eq!("IN", QClass::IN.to_string());
        assert_eq!("CLASS3", QClass::Other(3).to_string());
    }
}
