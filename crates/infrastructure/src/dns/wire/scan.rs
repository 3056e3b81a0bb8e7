use super::HEADER_LEN;
use std::net::Ipv4Addr;
use switchyard_dns_domain::DomainError;

/// Scans an upstream response for IPv4 answers without building a full
/// message model. Names are stepped over, not decoded, so compression
/// pointers (which upstreams do emit) cost two bytes and no work.
///
/// Returns the response code and every A/IN address found in the answer
/// section, in wire order.
pub fn extract_a_records(buf: &[u8]) -> Result<(u8, Vec<Ipv4Addr>), DomainError> {
    if buf.len() < HEADER_LEN {
        return Err(DomainError::InvalidDnsResponse(format!(
            "response too short ({} bytes)",
            buf.len()
        )));
    }

    let flags = u16::from_be_bytes([buf[2], buf[3]]);
    if flags & 0x8000 == 0 {
        return Err(DomainError::InvalidDnsResponse(
            "QR bit clear, not a response".to_string(),
        ));
    }
    let rcode = (flags & 0x000F) as u8;

    let qdcount = u16::from_be_bytes([buf[4], buf[5]]);
    let ancount = u16::from_be_bytes([buf[6], buf[7]]);

    let mut pos = HEADER_LEN;
    for _ in 0..qdcount {
        pos = skip_name(buf, pos)?;
        pos = advance(buf, pos, 4)?; // type + class
    }

    let mut addresses = Vec::new();
    for _ in 0..ancount {
        pos = skip_name(buf, pos)?;
        if pos + 10 > buf.len() {
            return Err(DomainError::InvalidDnsResponse(
                "answer record truncated".to_string(),
            ));
        }
        let rr_type = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
        let rr_class = u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]);
        let rdlen = u16::from_be_bytes([buf[pos + 8], buf[pos + 9]]) as usize;
        pos = advance(buf, pos, 10)?;

        if pos + rdlen > buf.len() {
            return Err(DomainError::InvalidDnsResponse(
                "record data truncated".to_string(),
            ));
        }
        if rr_type == 1 && rr_class == 1 && rdlen == 4 {
            addresses.push(Ipv4Addr::new(
                buf[pos],
                buf[pos + 1],
                buf[pos + 2],
                buf[pos + 3],
            ));
        }
        pos += rdlen;
    }

    Ok((rcode, addresses))
}

/// Steps over a name at `pos`. A compression pointer ends the name after
/// two bytes; a literal label sequence runs to its zero terminator.
fn skip_name(buf: &[u8], mut pos: usize) -> Result<usize, DomainError> {
    loop {
        if pos >= buf.len() {
            return Err(DomainError::InvalidDnsResponse(
                "name runs past end of response".to_string(),
            ));
        }
        let len = buf[pos] as usize;
        if len == 0 {
            return Ok(pos + 1);
        }
        if len & 0xC0 == 0xC0 {
            return advance(buf, pos, 2);
        }
        pos = advance(buf, pos, 1 + len)?;
    }
}

fn advance(buf: &[u8], pos: usize, by: usize) -> Result<usize, DomainError> {
    let next = pos + by;
    if next > buf.len() {
        return Err(DomainError::InvalidDnsResponse(
            "response truncated".to_string(),
        ));
    }
    Ok(next)
}
