// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # stubgen — declarative test doubles
//!
//! Describe the methods a collaborator should have; stubgen synthesizes them
//! on a `Double` with fixed or randomly generated return values.
//!
//! ## Core Concept
//!
//! A **generation request** names methods in four groups (public/private ×
//! instance/type). Each method returns a value decided once, at definition
//! time. Parameters only shape the signature and are never read.
//!
//! ## Quick Start
//!
//! ```rust
//! use stubgen::{CallArgs, Double, GenerationRequest, Generator, Value};
//!
//! let request = GenerationRequest::from_yaml(r#"
//! publicMethods:
//!   - save
//!   - [find, {parameters: [[req, id]], returnValue: {type: string}, generate: true}]
//! publicTypeMethods: 2
//! returnValue: ok
//! "#)?;
//!
//! let mut repo = Double::new("Repo");
//! Generator::new(request).generate(&mut repo)?;
//!
//! assert_eq!(repo.call("save", &CallArgs::new())?, Value::from("ok"));
//! let id = repo.call("find", &CallArgs::new().arg(7))?;
//! assert_eq!(id.as_text().map(str::len), Some(10));
//! assert!(repo.double_type().responds_to("method2"));
//! # Ok::<(), stubgen::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  GenerationRequest (YAML / JSON / builder)                   │
//! │       │                                                      │
//! │       ├──► normalize ──► MethodEntry*                        │
//! │       │                      │                               │
//! │       │                      ├──► signature ──► Signature    │
//! │       │                      └──► resolve ──► Value          │
//! │       │                             └──► random              │
//! │       │                                                      │
//! │       └──► synthesize ──► GeneratedMethod ──► Double / Type  │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

// Data model
pub mod error;
pub mod spec;
pub mod util;
pub mod value;

// Pipeline
pub mod double;
pub mod normalize;
pub mod random;
pub mod resolve;
pub mod signature;
pub mod synthesize;

// Re-exports
pub use double::{
    CallArgs, Double, DoubleType, GeneratedMethod, MethodTable, Scope, StubTarget, Visibility,
};
pub use error::{Error, Result};
pub use normalize::{normalize, MethodEntry, MethodGroup};
pub use random::{RandomGenerator, RANDOM_TEXT_LENGTH};
pub use resolve::resolve_return_value;
pub use signature::{ParameterCategory, ParameterListError, ParameterSignature, ParameterSpec};
pub use spec::{entry, EntryOptions, GenerationRequest, GroupKind};
pub use synthesize::{generate, Generator};
pub use value::{TypeDescriptor, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
