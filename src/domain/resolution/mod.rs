// src/domain/resolution/mod.rs
//
// Value objects for the batch resolution workflow

pub mod value_objects;

pub use value_objects::{
    BatchReport, FailureReason, ParsedFilename, ResolutionFailure, ResolvedMovie,
};
