// src/users/mod.rs

// Declares the submodule with account, role and token claim types
pub mod user_structs;
// Declares the submodule with the registration and login routes
pub mod user_router;
// Declares the submodule with the bearer-token extractor
pub mod auth_middleware;
