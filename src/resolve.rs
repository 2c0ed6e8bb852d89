//! Return value resolution
//!
//! Decides, once per entry, the value a generated method will return:
//!
//! | `generate` | `returnValue`     | resolved value              |
//! |------------|-------------------|-----------------------------|
//! | true       | type descriptor   | random instance of the type |
//! | any        | literal           | the literal                 |
//! | false      | type descriptor   | the type identity itself    |
//! | any        | absent            | `nil`                       |

use crate::error::Result;
use crate::random::RandomGenerator;
use crate::value::Value;
use rand::Rng;

/// Resolve the value bound into a generated method
pub fn resolve_return_value<R: Rng>(
    return_value: Option<&Value>,
    generate: bool,
    rng: &mut R,
) -> Result<Value> {
    match return_value {
        Some(Value::Type(kind)) if generate => RandomGenerator::new(rng).generate(kind),
        Some(value) => Ok(value.clone()),
        None => Ok(Value::Nil),
    }
}
