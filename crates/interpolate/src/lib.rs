//! Shell-style `$NAME` / `${NAME}` interpolation over a character stream.
//!
//! The engine is a single-pass state machine: it never looks further ahead
//! than the current character and never fails on input content. Malformed
//! references (stray `$`, unterminated `${`, doubled braces) are reproduced
//! literally.

pub mod engine;
pub mod error;
pub mod io;
pub mod policy;
pub mod resolver;

pub use {
    engine::{Interpolator, RunStats, interpolate_str, is_name_char, run},
    error::{InterpolateError, ParsePolicyError},
    io::{CharSink, CharSource, Utf8Reader, Utf8Writer},
    policy::UndefinedPolicy,
    resolver::{EnvResolver, Or, Resolver},
};
