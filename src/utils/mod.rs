pub mod client_ip;
pub mod code;
pub mod codec;
pub mod hash;
