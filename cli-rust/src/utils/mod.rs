mod fee;

pub use fee::*;
