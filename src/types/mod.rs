//! Supporting value types.

mod confidence;

pub use confidence::{Confidence, ConfidenceError};
