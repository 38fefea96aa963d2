//! Mapping between `dnsprobe_domain::RecordType` and `hickory_proto::rr::RecordType`
//!
//! The domain table carries the numeric code of every mnemonic, so the
//! conversion goes through the code instead of a per-variant match.

use dnsprobe_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert domain RecordType → hickory RecordType (for building queries)
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    /// Convert hickory RecordType → domain RecordType (for echoed questions)
    ///
    /// Returns `None` for codes outside the table.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> Option<RecordType> {
        RecordType::from_u16(u16::from(hickory_type))
    }
}
