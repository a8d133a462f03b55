pub mod io;
pub mod passage;

// Re-export key types for easier usage
pub use io::*;
pub use passage::*;
