mod error;
mod io;
mod session;


pub use error::{ConfigError, Result};
pub use io::{load_config, save_config};
pub use session::SessionConfig;
