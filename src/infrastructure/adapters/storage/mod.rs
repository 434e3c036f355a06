//! Storage Adapter - 临时目录实现

mod scoped_temp_dir;

pub use scoped_temp_dir::ScopedTempDir;
