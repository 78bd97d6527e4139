pub mod adaptors;
pub mod auth;
pub mod csv;
pub mod email;
pub mod pagination;
pub mod saved;
pub mod search;
