use super::{HEADER_LEN, MAX_DOMAIN_LEN};
use switchyard_dns_domain::{DnsQuery, DomainError, Question, RecordType};

/// Reads the transaction id out of a buffer that at least holds a header.
/// Used to answer SERVFAIL for datagrams that fail the full decode.
pub fn peek_id(buf: &[u8]) -> Option<u16> {
    if buf.len() < HEADER_LEN {
        return None;
    }
    Some(u16::from_be_bytes([buf[0], buf[1]]))
}

/// Decodes a raw datagram into a query.
///
/// Rejects anything that is not a plain standard query: QR bit set,
/// non-zero opcode, zero questions, compression pointers or extended label
/// types in a name, or a buffer that ends mid-structure. Bytes after the
/// question section (an EDNS OPT record, typically) are ignored.
pub fn decode_query(buf: &[u8]) -> Result<DnsQuery, DomainError> {
    if buf.len() < HEADER_LEN {
        return Err(DomainError::MalformedMessage(format!(
            "datagram too short ({} bytes)",
            buf.len()
        )));
    }

    let id = u16::from_be_bytes([buf[0], buf[1]]);
    let flags = u16::from_be_bytes([buf[2], buf[3]]);

    if flags & 0x8000 != 0 {
        return Err(DomainError::MalformedMessage(
            "QR bit set, not a query".to_string(),
        ));
    }
    if flags & 0x7800 != 0 {
        return Err(DomainError::MalformedMessage(format!(
            "unsupported opcode {}",
            (flags >> 11) & 0x0F
        )));
    }

    let qdcount = u16::from_be_bytes([buf[4], buf[5]]);
    if qdcount == 0 {
        return Err(DomainError::MalformedMessage(
            "query carries no questions".to_string(),
        ));
    }

    // Questions are parsed one at a time so a datagram claiming a huge
    // qdcount fails at its first truncated entry without reserving
    // anything up front.
    let (first, mut pos) = decode_question(buf, HEADER_LEN)?;
    let mut query = DnsQuery::new(id, first);
    for _ in 1..qdcount {
        let (question, next) = decode_question(buf, pos)?;
        query.additional_questions.push(question);
        pos = next;
    }
    Ok(query)
}

fn decode_question(buf: &[u8], start: usize) -> Result<(Question, usize), DomainError> {
    let (name, mut pos) = decode_name(buf, start)?;
    if pos + 4 > buf.len() {
        return Err(DomainError::MalformedMessage(
            "question truncated after name".to_string(),
        ));
    }
    let qtype = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
    let qclass = u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]);
    pos += 4;

    Ok((
        Question::new(name, RecordType::from_u16(qtype), qclass),
        pos,
    ))
}

/// Walks a label sequence, lowercasing as it goes. Compression pointers are
/// a decode error here: this codec never emits them, so a query carrying
/// one was not built for this server.
fn decode_name(buf: &[u8], start: usize) -> Result<(String, usize), DomainError> {
    let mut pos = start;
    let mut name = String::new();

    loop {
        if pos >= buf.len() {
            return Err(DomainError::MalformedMessage(
                "name runs past end of datagram".to_string(),
            ));
        }
        let label_len = buf[pos] as usize;
        if label_len == 0 {
            pos += 1;
            break;
        }
        if label_len & 0xC0 != 0 {
            return Err(DomainError::MalformedMessage(
                "compression pointers are not supported in queries".to_string(),
            ));
        }
        pos += 1;
        if pos + label_len > buf.len() {
            return Err(DomainError::MalformedMessage(
                "label runs past end of datagram".to_string(),
            ));
        }
        if !name.is_empty() {
            name.push('.');
        }
        if name.len() + label_len > MAX_DOMAIN_LEN {
            return Err(DomainError::MalformedMessage(format!(
                "name exceeds {} bytes",
                MAX_DOMAIN_LEN
            )));
        }
        for &b in &buf[pos..pos + label_len] {
            name.push(b.to_ascii_lowercase() as char);
        }
        pos += label_len;
    }

    Ok((name, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::wire::encode::encode_query;

    fn sample_query(id: u16, name: &str, qtype: u16) -> Vec<u8> {
        let question = Question::new(name, RecordType::from_u16(qtype), 1);
        encode_query(id, &question)
    }

    #[test]
    fn test_decodes_plain_a_query() {
        let buf = sample_query(0xBEEF, "www.example.com", 1);
        let query = decode_query(&buf).unwrap();
        assert_eq!(query.id, 0xBEEF);
        assert_eq!(&*query.question.name, "www.example.com");
        assert_eq!(query.question.record_type, RecordType::A);
        assert_eq!(query.question.class, 1);
        assert!(query.additional_questions.is_empty());
    }

    #[test]
    fn test_names_are_lowercased() {
        let buf = sample_query(1, "WWW.Example.COM", 1);
        let query = decode_query(&buf).unwrap();
        assert_eq!(&*query.question.name, "www.example.com");
    }

    #[test]
    fn test_rejects_short_datagram() {
        let err = decode_query(&[0u8; 5]).unwrap_err();
        assert!(matches!(err, DomainError::MalformedMessage(_)));
    }

    #[test]
    fn test_rejects_response_bit() {
        let mut buf = sample_query(1, "example.com", 1);
        buf[2] |= 0x80;
        assert!(decode_query(&buf).is_err());
    }

    #[test]
    fn test_rejects_nonzero_opcode() {
        let mut buf = sample_query(1, "example.com", 1);
        buf[2] |= 0x08; // opcode 1 (IQUERY)
        assert!(decode_query(&buf).is_err());
    }

    #[test]
    fn test_rejects_zero_questions() {
        let mut buf = sample_query(1, "example.com", 1);
        buf[4] = 0;
        buf[5] = 0;
        assert!(decode_query(&buf).is_err());
    }

    #[test]
    fn test_rejects_compression_pointer() {
        let mut buf = sample_query(1, "example.com", 1);
        buf[12] = 0xC0;
        assert!(decode_query(&buf).is_err());
    }

    #[test]
    fn test_rejects_truncated_question() {
        let buf = sample_query(1, "example.com", 1);
        assert!(decode_query(&buf[..buf.len() - 3]).is_err());
    }

    #[test]
    fn test_huge_question_count_claim_fails_at_first_truncation() {
        // qdcount says 65535 but the body holds one question; the parse
        // must stop at the truncation, not size anything to the claim
        let mut buf = sample_query(1, "example.com", 1);
        buf[4] = 0xFF;
        buf[5] = 0xFF;
        let err = decode_query(&buf).unwrap_err();
        assert!(matches!(err, DomainError::MalformedMessage(_)));
    }

    #[test]
    fn test_decodes_multi_question_query() {
        let mut buf = sample_query(7, "a.example.com", 1);
        let second = sample_query(7, "b.example.com", 1);
        buf[5] = 2;
        buf.extend_from_slice(&second[12..]);

        let query = decode_query(&buf).unwrap();
        assert_eq!(query.question_count(), 2);
        assert_eq!(&*query.additional_questions[0].name, "b.example.com");
    }

    #[test]
    fn test_ignores_trailing_additional_bytes() {
        let mut buf = sample_query(9, "example.com", 1);
        buf[11] = 1; // arcount
        buf.extend_from_slice(&[0x00, 0x00, 0x29, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        let query = decode_query(&buf).unwrap();
        assert_eq!(&*query.question.name, "example.com");
    }

    #[test]
    fn test_peek_id_needs_a_full_header() {
        assert_eq!(peek_id(&[0x12, 0x34]), None);
        let buf = sample_query(0x1234, "example.com", 1);
        assert_eq!(peek_id(&buf), Some(0x1234));
    }

    #[test]
    fn test_unknown_record_type_decodes_as_other() {
        let buf = sample_query(3, "example.com", 99);
        let query = decode_query(&buf).unwrap();
        assert_eq!(query.question.record_type, RecordType::Other(99));
    }
}
