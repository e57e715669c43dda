pub mod input_validator;
pub mod raw_record;

pub use input_validator::InputValidator;
pub use raw_record::{RawRecord, RawValue};
