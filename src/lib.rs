//! # stego 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：
//! 载体比特视图、长度前缀编解码协议、BMP/PNG 光栅解析与容量计算。

// 声明库包含的所有模块。

pub mod bits;
pub mod bmp;
pub mod capacity;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod format;
pub mod handler;
pub mod png;
