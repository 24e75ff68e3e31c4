//! Conversions between the internal data model and provider wire formats.
//!
//! Each submodule owns one provider family: `From` impls for requests and
//! responses, a raw-payload tool-call extractor, and a stream event parser.

pub mod anthropic;
pub mod google;
pub mod openai;
