//! PIR (Private Information Retrieval) building blocks, at worked-example scale.
pub mod example;
pub mod lwe;
pub mod regev;
