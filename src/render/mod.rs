pub mod quad;

pub use quad::FullscreenQuad;
