//! Testing harness for the Tally counter widget.
//!
//! ```
//! use tally_test::{Control, Harness};
//!
//! let mut h = Harness::new();
//! h.type_text("10").click(Control::Add);
//! h.assert_count(10).assert_history(&["+10 → 10"]);
//! ```

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

mod harness;

pub use harness::{Control, Harness};
