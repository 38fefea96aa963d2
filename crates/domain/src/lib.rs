//! dnsprobe domain layer
pub mod config;
pub mod dns_protocol;
pub mod duration;
pub mod errors;
pub mod metric;
pub mod record_type;

pub use config::{Config, ResolverConfig};
pub use dns_protocol::DnsProtocol;
pub use duration::parse_duration;
pub use errors::ProbeError;
pub use metric::{MetricKind, MetricName, MetricUnit, Sample, Tags};
pub use record_type::RecordType;
