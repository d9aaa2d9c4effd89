//! Blacklist filtering
//!
//! Domains are rejected when they end with any blacklist entry. The test is
//! a plain, case-sensitive string suffix check: `bad.com` rejects
//! `x.bad.com` and also `notbad.com`.

mod blacklist;

pub use blacklist::BlacklistMatcher;
