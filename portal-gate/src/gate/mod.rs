//! Gate module: role classification with fixed precedence
//!
//! Admin before staff, staff before denial; students go through their own
//! hint-driven path.

pub mod access;
pub mod actor;
pub mod strategy;
pub mod types;

pub use access::AccessGate;
pub use actor::{GateActor, GateHandle};
pub use strategy::{ActiveStaffMatch, AdminMatch, VerificationStrategy, Verdict};
pub use types::{GateResult, Role};
