//! Encoding nodes

mod xor;

pub use xor::XorEncoderNode;
