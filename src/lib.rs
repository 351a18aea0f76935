// src/lib.rs

//! _lgflib_ reads text format event-log journals: a header file `1Cv8.lgf`
//! holding reference dictionaries plus rotated data files `*.lgp` holding
//! multi-line bracketed records.
//!
//! Start with [`LgfReader`].
//!
//! [`LgfReader`]: crate::readers::lgfreader::LgfReader

#![allow(non_snake_case)]

pub mod common;
pub mod data;
pub mod debug;
pub mod readers;
#[cfg(test)]
pub mod tests;
