pub mod memory_source;
pub mod remote_source;
pub mod transport;

pub use memory_source::MemorySource;
pub use remote_source::{load_design, RemoteViewSource};
pub use transport::Transport;
