#![doc = "ldsync-core: core logic library for ldsync."]

//! This crate holds everything ldsync does apart from transport and argument parsing:
//! the LDC record codec, the string table model, the reconciler that carries translated
//! strings from one LocDirect project into another, the XML API messages and the
//! pipelines built on the [`contract::StringServer`] seam.
//!
//! # Usage
//! Add this as a dependency for all shared codec, reconciliation and pipeline code; plug in
//! a concrete `StringServer` (the CLI's HTTP client, or `MockStringServer` in tests).

pub mod archive;
pub mod config;
pub mod contract;
pub mod error;
pub mod formats;
pub mod ldc;
pub mod message;
pub mod reconcile;
pub mod synchronise;
pub mod table;
pub mod transfer;

pub use crate::{
    error::{Error, Result},
    ldc::{Ldc, RecordCodec},
    table::{FieldList, Record, Table},
};
