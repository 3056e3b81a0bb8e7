use super::HEADER_LEN;
use switchyard_dns_domain::{DnsResponse, Question};

/// Serializes a locally built response.
///
/// Header echoes the query id, sets QR and RA, and carries the response
/// code in the low four bits. Answer names are re-emitted as full literal
/// label sequences rather than compression pointers back into the question
/// section. That wastes a handful of bytes per record and is kept on
/// purpose for wire compatibility.
pub fn encode_response(response: &DnsResponse) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    buf.extend_from_slice(&response.id.to_be_bytes());
    buf.push(0x80); // QR
    buf.push(0x80 | response.response_code.code()); // RA + RCODE
    buf.extend_from_slice(&1u16.to_be_bytes()); // qdcount
    buf.extend_from_slice(&(response.answers.len() as u16).to_be_bytes());
    buf.extend_from_slice(&[0, 0, 0, 0]); // nscount, arcount

    write_question(&mut buf, &response.question);

    for record in &response.answers {
        write_name(&mut buf, &record.name);
        buf.extend_from_slice(&record.record_type.to_u16().to_be_bytes());
        buf.extend_from_slice(&record.class.to_be_bytes());
        buf.extend_from_slice(&record.ttl.to_be_bytes());
        buf.extend_from_slice(&4u16.to_be_bytes());
        buf.extend_from_slice(&record.address.octets());
    }

    buf
}

/// Serializes a standard recursive query with a single question.
/// Used when this server asks an upstream something on its own behalf
/// (load-time nameserver resolution).
pub fn encode_query(id: u16, question: &Question) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);

    buf.extend_from_slice(&id.to_be_bytes());
    buf.push(0x01); // RD
    buf.push(0x00);
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

    write_question(&mut buf, question);
    buf
}

/// A bare SERVFAIL header for datagrams whose id was readable but whose
/// body failed to decode. No question section is echoed because none was
/// successfully parsed.
pub fn encode_servfail_header(id: u16) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.push(0x80);
    buf.push(0x82); // RA + SERVFAIL
    buf.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
    buf
}

fn write_question(buf: &mut Vec<u8>, question: &Question) {
    write_name(buf, &question.name);
    buf.extend_from_slice(&question.record_type.to_u16().to_be_bytes());
    buf.extend_from_slice(&question.class.to_be_bytes());
}

/// Emits a name as length-prefixed labels with a zero-length terminator.
/// Labels longer than 63 bytes cannot be produced by the decoder, so they
/// are truncated here rather than turned into an error path.
fn write_name(buf: &mut Vec<u8>, name: &str) {
    let name = name.strip_suffix('.').unwrap_or(name);
    for label in name.split('.').filter(|l| !l.is_empty()) {
        let bytes = label.as_bytes();
        let len = bytes.len().min(63);
        buf.push(len as u8);
        buf.extend_from_slice(&bytes[..len]);
    }
    buf.push(0);
}
