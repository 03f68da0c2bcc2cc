mod id_types;
mod playlist;
mod thumbnail;
mod video;
pub use id_types::*;
pub use playlist::*;
pub use thumbnail::*;
pub use video::*;
