//! # 载体比特视图模块
//!
//! 将一幅图像的载体字节按固定扫描顺序暴露为单比特槽位序列。
//! 每个槽位双射到一个载体字节的最低有效位 (LSB)；
//! Alpha 字节与 BMP 行尾的对齐填充字节永远不是载体。

use crate::error::StegoError;

/// 槽位到字节的映射方式。
#[derive(Debug, Clone, Copy)]
enum SlotLayout {
    /// 三通道扁平缓冲区，每个字节都是载体。
    Rgb,
    /// 四通道扁平缓冲区，每第 4 个字节 (Alpha) 被跳过。
    Rgba,
    /// 按行步长组织的缓冲区，每行仅前 `row_payload` 个字节是载体。
    Strided {
        row_stride: usize,
        row_payload: usize,
    },
}

pub struct BitChannelView<'a> {
    bytes: &'a mut [u8],
    layout: SlotLayout,
    bit_count: usize,
}

impl<'a> BitChannelView<'a> {
    /// 在 PNG 风格的扁平通道缓冲区上建立视图。
    pub fn packed(bytes: &'a mut [u8], channels: u8) -> Result<Self, StegoError> {
        let (layout, bit_count) = match channels {
            3 => (SlotLayout::Rgb, bytes.len()),
            4 => (SlotLayout::Rgba, bytes.len() / 4 * 3),
            other => return Err(StegoError::UnsupportedChannelCount(other)),
        };

        Ok(Self {
            bytes,
            layout,
            bit_count,
        })
    }

    /// 在 BMP 风格的行步长缓冲区上建立视图。
    /// 每行占 `row_stride` 字节，其中仅前 `row_payload` 字节为像素数据，
    /// 其余为 4 字节对齐填充。
    pub fn strided(
        bytes: &'a mut [u8],
        rows: usize,
        row_stride: usize,
        row_payload: usize,
    ) -> Self {
        debug_assert!(row_payload <= row_stride);
        debug_assert!(rows * row_stride <= bytes.len());

        Self {
            bytes,
            layout: SlotLayout::Strided {
                row_stride,
                row_payload,
            },
            bit_count: rows * row_payload,
        }
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn get_bit(&self, index: usize) -> Result<u8, StegoError> {
        let byte = self.byte_index(index)?;
        Ok(self.bytes[byte] & 1)
    }

    pub fn set_bit(&mut self, index: usize, bit: u8) -> Result<(), StegoError> {
        let byte = self.byte_index(index)?;
        self.bytes[byte] = (self.bytes[byte] & 0xFE) | (bit & 1);
        Ok(())
    }

    fn byte_index(&self, index: usize) -> Result<usize, StegoError> {
        if index >= self.bit_count {
            return Err(StegoError::IndexOutOfRange {
                index,
                count: self.bit_count,
            });
        }

        let byte = match self.layout {
            SlotLayout::Rgb => index,
            SlotLayout::Rgba => index / 3 * 4 + index % 3,
            SlotLayout::Strided {
                row_stride,
                row_payload,
            } => index / row_payload * row_stride + index % row_payload,
        };

        Ok(byte)
    }
}
