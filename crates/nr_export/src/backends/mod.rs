pub mod json;
pub mod memory;
pub mod xlsx;

pub use json::JsonExporter;
pub use memory::MemoryExporter;
pub use xlsx::XlsxExporter;
