//! # 容量计算模块

use crate::constants::{LENGTH_PREFIX_BITS, USABLE_CHANNELS};

/// 给定尺寸下可嵌入的最大载荷字节数。
/// 无论图像实际有几个通道，始终按每像素 3 个可用通道计算
/// (Alpha 永不作为载体)，减去 32 位长度前缀后向下取整到整字节。
pub fn max_payload_bytes(width: u32, height: u32) -> u64 {
    let usable_bits = (width as u64)
        .saturating_mul(height as u64)
        .saturating_mul(USABLE_CHANNELS)
        .saturating_sub(LENGTH_PREFIX_BITS as u64);
    usable_bits / 8
}
