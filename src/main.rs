#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(target_os = "none", no_std)]

// The firmware only exists for the embedded target; host builds get an
// empty binary so the library tests run with a plain `cargo test`.
#[cfg(target_os = "none")]
include!("app.rs");

#[cfg(not(target_os = "none"))]
fn main() {}
