pub mod settings;

pub use settings::{
    AdminConfig, AppConfig, CorsConfig, EmailConfig, IndexNowConfig, ServerConfig, StoreBackend,
    StoreConfig,
};
