#![warn(
    clippy::pedantic,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::needless_pass_by_value,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::struct_field_names
)]

pub mod annotations;
pub mod appgw;
pub mod brownfield;
pub mod cli;
pub mod controllers;
pub mod environment;
pub mod events;
pub mod kubernetes;
pub mod options;

#[cfg(test)]
mod test_utils;
