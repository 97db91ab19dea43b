//! The built-in matcher library.
//!
//! Each constructor returns a value implementing [`Matcher`](crate::Matcher);
//! all of them normalize their operands through
//! [`extract`](crate::extract::extract), so channels and callables can stand
//! in for plain values anywhere.

mod empty;
mod equal;
mod nil;
mod not;
mod ord;
mod outcome;
mod say;

pub use empty::be_empty;
pub use equal::{Comparator, EqualTo, equal_to, equal_to_all};
pub use nil::be_nil;
pub use not::not;
pub use ord::{be_between, be_greater_than, be_less_than};
pub use outcome::{fail, succeed};
pub use say::{say, say_regex};
