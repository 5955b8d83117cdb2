pub mod memory;
pub mod token_file;

pub use memory::MemoryTokenStore;
pub use token_file::FileTokenStore;
