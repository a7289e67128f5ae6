pub mod render;
pub mod serve;
pub mod summary;

pub use render::render;
pub use serve::serve;
pub use summary::summary;
