use crate::ports::UpstreamForwarder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use switchyard_dns_domain::{
    DnsQuery, DnsRecord, DnsResponse, RecordType, ResponseCode, RuleTable,
};
use tracing::{debug, info, warn};

/// TTL for answers fabricated from a static rule. Kept short so rule edits
/// reach clients quickly.
pub const STATIC_ANSWER_TTL: u32 = 5;

/// Terminal outcome for one datagram.
#[derive(Debug)]
pub enum Resolution {
    /// A response this server built itself.
    Answered(DnsResponse),
    /// Raw response bytes relayed from an upstream server.
    Relayed(Vec<u8>),
}

pub struct ResolveQueryUseCase {
    forwarder: Arc<dyn UpstreamForwarder>,
    upstream_timeout: Duration,
}

impl ResolveQueryUseCase {
    pub fn new(forwarder: Arc<dyn UpstreamForwarder>, upstream_timeout: Duration) -> Self {
        Self {
            forwarder,
            upstream_timeout,
        }
    }

    /// Decides one query against the given rule table. `raw` carries the
    /// original datagram so forwarded queries reach upstreams byte for byte.
    pub async fn execute(&self, query: &DnsQuery, raw: &[u8], table: &RuleTable) -> Resolution {
        info!(
            id = query.id,
            domain = %query.question.name,
            record_type = %query.question.record_type,
            "Query received"
        );

        if !query.additional_questions.is_empty() {
            debug!(
                id = query.id,
                questions = query.question_count(),
                "Multi-question query, routing to default upstreams"
            );
            return self.forward(query, raw, &table.default_upstreams()).await;
        }

        let question = &query.question;

        if question.record_type != RecordType::A {
            return self.forward(query, raw, &table.default_upstreams()).await;
        }

        let decision = table.lookup(&question.name);
        if let Some(address) = decision.answer {
            info!(domain = %question.name, address = %address, "Answered from static rule");
            let record = DnsRecord::new(
                question.name.clone(),
                question.record_type,
                question.class,
                STATIC_ANSWER_TTL,
                address,
            );
            return Resolution::Answered(DnsResponse::answer(query.id, question.clone(), record));
        }

        self.forward(query, raw, &decision.upstreams).await
    }

    async fn forward(&self, query: &DnsQuery, raw: &[u8], upstreams: &[SocketAddr]) -> Resolution {
        info!(
            domain = %query.question.name,
            upstreams = upstreams.len(),
            "Forwarding query"
        );
        match self
            .forwarder
            .forward(raw, upstreams, self.upstream_timeout)
            .await
        {
            Ok(bytes) => Resolution::Relayed(bytes),
            Err(error) => {
                warn!(
                    domain = %query.question.name,
                    error = %error,
                    "All upstreams failed, answering SERVFAIL"
                );
                Resolution::Answered(DnsResponse::failure(
                    query.id,
                    query.question.clone(),
                    ResponseCode::ServFail,
                ))
            }
        }
    }
}
