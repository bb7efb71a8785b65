//! # 错误类型模块
//!
//! 定义隐写核心逻辑的全部失败种类。
//! 上层命令处理逻辑通过 `anyhow` 附加文件路径等上下文信息。

use thiserror::Error;

/// 隐写核心操作可能产生的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image format: {0}")]
    InvalidFormat(String),

    #[error("Image needs at least 3 color channels, found {0}")]
    UnsupportedChannelCount(u8),

    #[error("Payload too large: needs {needed} bits, image provides {capacity}")]
    PayloadTooLarge { needed: usize, capacity: usize },

    #[error("Implausible hidden length {0}: the image does not appear to contain a message")]
    CorruptedLength(u32),

    #[error("Hidden message is truncated: needs {needed} bits, image provides {available}")]
    TruncatedPayload { needed: usize, available: usize },

    #[error("Failed to encode output image: {0}")]
    WriteFailure(String),

    #[error("Bit slot {index} is out of range for a view of {count} slots")]
    IndexOutOfRange { index: usize, count: usize },
}
