pub mod gemini;
pub mod image;
pub mod method;
pub mod request;

pub use image::*;
pub use method::*;
pub use request::*;
