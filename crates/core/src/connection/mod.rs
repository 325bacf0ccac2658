mod info;
mod settings;

pub use info::{management_endpoint, ConnectionInfo};
pub use settings::{ClientSettings, TlsProtocol};
