pub mod admin;
pub mod dto;

/// Order management
///
/// @author Carol
#[scope("/orders")]
pub mod orders;
