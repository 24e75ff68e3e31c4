//! Vendor wire format types, one module per vendor family

pub mod anthropic;
pub mod google;
pub mod openai;
