pub mod types;
pub mod loader;
pub mod presets;
pub mod settings;
pub mod validator;

pub use types::*;
pub use loader::*;
pub use settings::*;
pub use validator::*;
