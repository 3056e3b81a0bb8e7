use crate::dns_record::RecordType;
use std::sync::Arc;

/// One entry from the question section of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: u16,
}

impl Question {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType, class: u16) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
        }
    }
}

/// A decoded DNS query. The wire format requires at least one question,
/// so the first one is held apart from any extras.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub id: u16,
    pub question: Question,
    pub additional_questions: Vec<Question>,
}

impl DnsQuery {
    pub fn new(id: u16, question: Question) -> Self {
        Self {
            id,
            question,
            additional_questions: Vec::new(),
        }
    }

    pub fn question_count(&self) -> usize {
        1 + self.additional_questions.len()
    }
}
