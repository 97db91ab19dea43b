//! # holdfast ⏳
//!
//! > Fluent polling assertions for eventually-consistent code
//!
//! **holdfast** asserts over values that change while you watch: evaluate a
//! matcher once, require it to *hold* for a whole duration, or wait for it to
//! *settle* before a deadline.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use holdfast::prelude::*;
//! use holdfast::{Actual, PanicContext};
//!
//! let t = PanicContext::new("example");
//!
//! // Immediate evaluation.
//! with(&t).verify(42).will(equal_to(42)).or_fail();
//!
//! // The counter must stay below 100 for a whole second.
//! with(&t)
//!     .ensure("the counter")
//!     .verify(Actual::thunk(|_cx| Ok(Some(read_counter().into()))))
//!     .will(be_less_than(100))
//!     .hold_for(Duration::from_secs(1), Duration::from_millis(100));
//!
//! fn read_counter() -> i64 { 7 }
//! ```
//!
//! ## Features
//!
//! - ⏱️ **Three modes** - `or_fail`, `hold_for`, and `within`
//! - 🔁 **Live operands** - channels and callables re-read on every tick
//! - 🔍 **Fluent matchers** - equality, ordering, emptiness, patterns
//! - 🧹 **Per-tick cleanup** - registered actions flush after every tick
//! - 📌 **Source citations** - failures point at the assertion that raised them

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assertion;
pub mod context;
pub mod extract;
pub mod interrupt;
pub mod location;
pub mod matcher;
pub mod matchers;
pub mod numeric;
pub mod timing;

mod check;

/// Prelude for convenient imports
///
/// ```rust
/// use holdfast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assertion::{ReportConfig, with};
    pub use crate::check::{Check, CheckResult, Failure};
    pub use crate::extract::Actual;
    pub use crate::fail;
    pub use crate::matcher::Matcher;
    pub use crate::matchers::*;
}

// Re-exports
pub use assertion::{Asserter, Assertion, ReportConfig, Verifier, with};
pub use check::{Check, CheckResult, Failure};
pub use context::{Helper, PanicContext, RecordingContext, TestContext, helper_of};
pub use extract::{Actual, extract, must_extract};
pub use location::Location;
pub use matcher::Matcher;
pub use numeric::Numeric;
