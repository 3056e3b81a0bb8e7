use crate::dns_query::Question;
use crate::dns_record::DnsRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    ServFail,
    NxDomain,
}

impl ResponseCode {
    pub fn code(self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
        }
    }
}

/// A response this server builds itself, always answering exactly the
/// question it echoes back.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,
    pub response_code: ResponseCode,
    pub question: Question,
    pub answers: Vec<DnsRecord>,
}

impl DnsResponse {
    pub fn answer(id: u16, question: Question, record: DnsRecord) -> Self {
        Self {
            id,
            response_code: ResponseCode::NoError,
            question,
            answers: vec![record],
        }
    }

    pub fn failure(id: u16, question: Question, response_code: ResponseCode) -> Self {
        Self {
            id,
            response_code,
            question,
            answers: Vec::new(),
        }
    }
}
