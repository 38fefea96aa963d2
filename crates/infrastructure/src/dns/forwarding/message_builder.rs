//! DNS Message Builder
//!
//! Constructs DNS query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use dnsprobe_domain::{ProbeError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// A query ready to be sent, together with its wire encoding.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub id: u16,
    pub name: Name,
    pub record_type: RecordType,
    pub message: Message,
    pub bytes: Vec<u8>,
}

impl BuiltQuery {
    pub fn question_count(&self) -> usize {
        self.message.queries().len()
    }
}

/// Appends the root label separator unless already present.
pub fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a query after validating the record type mnemonic.
    ///
    /// Unknown mnemonics fail with `UnknownQueryType` before anything is
    /// encoded.
    pub fn build(domain: &str, record_type: &str) -> Result<BuiltQuery, ProbeError> {
        let record_type: RecordType = record_type.parse()?;
        Self::build_query(domain, record_type)
    }

    /// Build a DNS query message and serialize to wire format bytes
    ///
    /// Creates a standard recursive query with:
    /// - Random ID for request/response matching
    /// - RD (Recursion Desired) flag set
    /// - Single question section for the fully-qualified name, class IN
    pub fn build_query(domain: &str, record_type: RecordType) -> Result<BuiltQuery, ProbeError> {
        let name = Name::from_str(&fqdn(domain)).map_err(|e| {
            ProbeError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name.clone());
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;

        Ok(BuiltQuery {
            id,
            name,
            record_type,
            message,
            bytes,
        })
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, ProbeError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            ProbeError::InvalidDomainName(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
