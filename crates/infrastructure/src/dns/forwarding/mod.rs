pub mod message_builder;
pub mod record_type_map;
pub mod response_render;

pub use message_builder::{fqdn, BuiltQuery, MessageBuilder};
pub use record_type_map::RecordTypeMapper;
pub use response_render::render_message;
