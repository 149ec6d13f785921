// src/sweets/mod.rs

// Declares the submodule with the catalog row and request DTOs
pub mod sweets_structs;
// Declares the submodule with the catalog CRUD and search routes
pub mod sweets_router;
