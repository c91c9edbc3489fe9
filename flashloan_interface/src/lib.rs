pub mod consts;
pub use consts::*;
pub mod errors;
pub use errors::*;
pub mod typedefs;
pub use typedefs::*;
