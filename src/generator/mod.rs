// Generation service boundary: trait plus the HTTP implementation.

pub mod http_generator;
pub mod traits;
