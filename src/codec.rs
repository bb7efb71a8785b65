//! # 载荷编解码模块
//!
//! 线协议: 前 32 个槽位按最低位优先存放载荷长度 (`u32`)，
//! 随后每个载荷字节同样按最低位优先占用 8 个槽位。
//! 嵌入与提取必须逐位复现同一顺序。

use crate::bits::BitChannelView;
use crate::constants::{LENGTH_PREFIX_BITS, MAX_PAYLOAD_BYTES};
use crate::error::StegoError;

/// 隐藏 `payload_len` 字节的载荷所需的槽位总数。
pub fn required_bits(payload_len: usize) -> usize {
    LENGTH_PREFIX_BITS + payload_len * 8
}

pub fn embed(payload: &[u8], view: &mut BitChannelView) -> Result<(), StegoError> {
    let needed = required_bits(payload.len());
    let capacity = view.bit_count();

    let length = u32::try_from(payload.len())
        .map_err(|_| StegoError::PayloadTooLarge { needed, capacity })?;
    if needed > capacity {
        return Err(StegoError::PayloadTooLarge { needed, capacity });
    }

    for k in 0..LENGTH_PREFIX_BITS {
        view.set_bit(k, ((length >> k) & 1) as u8)?;
    }

    for (i, &byte) in payload.iter().enumerate() {
        for k in 0..8 {
            view.set_bit(LENGTH_PREFIX_BITS + i * 8 + k, (byte >> k) & 1)?;
        }
    }

    Ok(())
}

pub fn extract(view: &BitChannelView) -> Result<Vec<u8>, StegoError> {
    if view.bit_count() < LENGTH_PREFIX_BITS {
        return Err(StegoError::TruncatedPayload {
            needed: LENGTH_PREFIX_BITS,
            available: view.bit_count(),
        });
    }

    let mut length: u32 = 0;
    for k in 0..LENGTH_PREFIX_BITS {
        length |= (view.get_bit(k)? as u32) << k;
    }

    // 长度为 0 表示嵌入的是空载荷
    if length == 0 {
        return Ok(Vec::new());
    }
    if length > MAX_PAYLOAD_BYTES {
        return Err(StegoError::CorruptedLength(length));
    }

    let needed = required_bits(length as usize);
    if needed > view.bit_count() {
        return Err(StegoError::TruncatedPayload {
            needed,
            available: view.bit_count(),
        });
    }

    let mut payload = vec![0u8; length as usize];
    for (i, byte) in payload.iter_mut().enumerate() {
        for k in 0..8 {
            *byte |= view.get_bit(LENGTH_PREFIX_BITS + i * 8 + k)? << k;
        }
    }

    Ok(payload)
}
