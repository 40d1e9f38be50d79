mod feed;
mod http;
mod id;
mod solidity_types;

pub use feed::*;
pub use http::*;
pub use id::*;
pub use solidity_types::*;
