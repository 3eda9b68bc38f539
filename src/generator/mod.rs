pub mod gemini_client;
pub mod proxy_client;
pub mod traits;

pub use gemini_client::GeminiClient;
pub use proxy_client::ProxyClient;
pub use traits::ImageGenerator;
