pub mod blob;
pub mod credit;

pub use blob::{RawCreditBlob, SourceRecord, StructuredCredit};
pub use credit::{clamp_unit, CanonicalCredit, ParsedCredit, Resolution, MAX_NAME_LEN};
