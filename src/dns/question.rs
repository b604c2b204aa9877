use std::fmt::{self, Display, Formatter};

use anyhow::bail;

use super::parse_utils::{parse_name, parse_qclass, parse_qtype, VResult};
use super::{QClass, QType, Serialize};

// A name must fit in 253 octets of text, and every label in 63.
const MAX_NAME_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// The tuple (name, type, class) that a query asks about and that keys the
/// cache. The name is held lowercase without a trailing dot; the root is `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub qname: String,
    pub qtype: QType,
    pub qclass: QClass,
}

impl Question {
    pub fn new(name: impl Into<String>, qtype: QType, qclass: QClass) -> Self {
        let mut qname = name.into().to_lowercase();
        while qname.len() > 1 && qname.ends_with('.') {
            qname.pop();
        }
        if qname.is_empty() {
            qname.push('.');
        }
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    pub fn deserialize<'a>(input: &'a [u8], source: &'a [u8]) -> VResult<&'a [u8], Question> {
        let (rest, qname) = parse_name(input, source)?;
        let (rest, qtype) = parse_qtype(rest)?;
        let (rest, qclass) = parse_qclass(rest)?;
        Ok((rest, Question::new(qname, qtype, qclass)))
    }
}

impl Serialize for Question {
    fn serialize(&self) -> Result<Vec<u8>, anyhow::Error> {
        let mut body = Vec::new();
        if self.qname != "." {
            if self.qname.len() > MAX_NAME_LENGTH {
                bail!("name exceeds {} octets: {}", MAX_NAME_LENGTH, self.qname);
            }
            for label in self.qname.split('.').filter(|label| !label.is_empty()) {
                if label.len() > MAX_LABEL_LENGTH {
                    bail!("label exceeds {} octets: {}", MAX_LABEL_LENGTH, label);
                }
                body.push(label.len() as u8);
                body.extend_from_slice(label.as_bytes());
            }
        }
        body.push(0);
        body.extend_from_slice(&self.qtype.code().to_be_bytes());
        body.extend_from_slice(&self.qclass.code().to_be_bytes());
        Ok(body)
    }
}

impl Display for Question {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.qname, self.qclass, self.qtype)
    }
}
