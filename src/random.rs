//! Random value generation for type descriptors
//!
//! Only integer, string and symbol kinds are generatable. Anything else
//! fails with `Error::UnsupportedGenerationType`.

use crate::error::{Error, Result};
use crate::value::{TypeDescriptor, Value};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of generated strings and symbols
pub const RANDOM_TEXT_LENGTH: usize = 10;

/// Produces one pseudo-random instance per type descriptor
pub struct RandomGenerator<'a, R: Rng> {
    rng: &'a mut R,
}

impl<'a, R: Rng> RandomGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, kind: &TypeDescriptor) -> Result<Value> {
        match kind {
            TypeDescriptor::Integer => Ok(Value::Int(self.integer())),
            TypeDescriptor::String => Ok(Value::String(self.alphanumeric())),
            TypeDescriptor::Symbol => Ok(Value::Symbol(self.alphanumeric())),
            other => Err(Error::UnsupportedGenerationType(other.clone())),
        }
    }

    /// Non-negative integer read from the fractional digits of a draw in [0, 1)
    pub fn integer(&mut self) -> i64 {
        let fraction: f64 = self.rng.gen();
        fractional_digits(fraction)
    }

    pub fn alphanumeric(&mut self) -> String {
        (0..RANDOM_TEXT_LENGTH)
            .map(|_| char::from(self.rng.sample(Alphanumeric)))
            .collect()
    }
}

fn fractional_digits(fraction: f64) -> i64 {
    // f64 Display never uses exponent notation
    let text = fraction.to_string();
    text.split_once('.')
        .and_then(|(_, digits)| digits.parse::<i64>().ok())
        .unwrap_or(0)
}
