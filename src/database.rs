pub mod attribution;
pub mod connection;
pub mod dto;
pub mod repository;
pub mod service;
pub mod session;
pub mod validation;
pub mod views;

// 重新导出 service 中的所有内容方便使用
pub use service::*;
