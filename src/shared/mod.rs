// src/shared/mod.rs

// Declares the submodule with the response envelope used by every route
pub mod shared_structs;
// Declares the submodule with the error taxonomy and its response mapping
pub mod error;
