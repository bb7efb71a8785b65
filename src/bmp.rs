//! # BMP 光栅模块
//!
//! 手工解析 24 位未压缩 BMP: 14 字节文件头 + 40 字节 BITMAPINFOHEADER，
//! 全部字段按小端序逐一读取。解析结果是一个自有值，
//! 头部字段与像素区域分开存放；重新序列化时从当前状态重算
//! 文件大小、像素偏移与图像大小字段，而不依赖原缓冲区中的旧字节。
//!
//! 行按 4 字节对齐，`row_stride = ceil(bpp * width / 32) * 4`；
//! 行尾填充字节不属于载体。高度的符号 (自下而上/自上而下存储)
//! 不参与扫描顺序，但在序列化时原样保留。

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::bits::BitChannelView;
use crate::constants::{BMP_FILE_HEADER_LEN, BMP_INFO_HEADER_LEN};
use crate::error::StegoError;

const BMP_TAG: [u8; 2] = *b"BM";
const HEADERS_LEN: usize = BMP_FILE_HEADER_LEN + BMP_INFO_HEADER_LEN;

/// BITMAPINFOHEADER 的逐字段表示。
/// 图像大小字段在序列化时重算，因此不在此保存。
#[derive(Debug, Clone)]
struct BmpInfoHeader {
    header_size: u32,
    width: i32,
    height: i32,
    planes: u16,
    bits_per_pixel: u16,
    compression: u32,
    x_pixels_per_meter: i32,
    y_pixels_per_meter: i32,
    colors_used: u32,
    colors_important: u32,
}

pub struct BmpRaster {
    info: BmpInfoHeader,
    /// 54 字节标准头与像素数据偏移之间的原始字节 (扩展头尾部等)，原样保留。
    header_tail: Vec<u8>,
    pixels: Vec<u8>,
    row_stride: usize,
}

impl BmpRaster {
    pub fn parse(bytes: &[u8]) -> Result<Self, StegoError> {
        validate_prelude(bytes)?;
        let info = parse_info(bytes)?;

        let pixel_offset = read_u32(bytes, 10) as usize;
        if pixel_offset < HEADERS_LEN || pixel_offset > bytes.len() {
            return Err(StegoError::InvalidFormat(format!(
                "pixel data offset {pixel_offset} is outside the file"
            )));
        }

        let row_stride = row_stride(info.bits_per_pixel, info.width);
        let rows = info.height.unsigned_abs() as u64;
        let pixels = bytes[pixel_offset..].to_vec();
        if (pixels.len() as u64) < rows * row_stride as u64 {
            return Err(StegoError::InvalidFormat(format!(
                "pixel data is truncated: {} rows of {row_stride} bytes expected, {} bytes present",
                rows,
                pixels.len()
            )));
        }

        Ok(Self {
            header_tail: bytes[HEADERS_LEN..pixel_offset].to_vec(),
            pixels,
            row_stride,
            info,
        })
    }

    pub fn width(&self) -> u32 {
        self.info.width as u32
    }

    pub fn height(&self) -> u32 {
        self.info.height.unsigned_abs()
    }

    /// 像素区域上的载体比特视图: 每行前 `width * 3` 个字节，跳过行尾填充。
    pub fn bit_view(&mut self) -> BitChannelView<'_> {
        let rows = self.info.height.unsigned_abs() as usize;
        let row_payload = self.info.width as usize * 3;
        BitChannelView::strided(&mut self.pixels, rows, self.row_stride, row_payload)
    }

    /// 从当前状态重新序列化整个文件。
    /// 文件大小、像素偏移与图像大小字段被重算，保留字段写为 0，
    /// 高度保持解析时的符号。
    pub fn to_bytes(&self) -> Vec<u8> {
        let pixel_offset = HEADERS_LEN + self.header_tail.len();
        let file_size = pixel_offset + self.pixels.len();

        let mut out = Vec::with_capacity(file_size);
        out.extend_from_slice(&BMP_TAG);
        out.extend_from_slice(&(file_size as u32).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

        out.extend_from_slice(&self.info.header_size.to_le_bytes());
        out.extend_from_slice(&self.info.width.to_le_bytes());
        out.extend_from_slice(&self.info.height.to_le_bytes());
        out.extend_from_slice(&self.info.planes.to_le_bytes());
        out.extend_from_slice(&self.info.bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&self.info.compression.to_le_bytes());
        out.extend_from_slice(&(self.pixels.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.info.x_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.info.y_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.info.colors_used.to_le_bytes());
        out.extend_from_slice(&self.info.colors_important.to_le_bytes());

        out.extend_from_slice(&self.header_tail);
        out.extend_from_slice(&self.pixels);
        out
    }

    /// 仅读取头部即可得到尺寸，容量查询不需要触碰像素数据。
    pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), StegoError> {
        let mut header = [0u8; HEADERS_LEN];
        let mut file = File::open(path)?;
        file.read_exact(&mut header).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                StegoError::InvalidFormat(format!(
                    "file is shorter than the {HEADERS_LEN}-byte BMP headers"
                ))
            } else {
                StegoError::Io(e)
            }
        })?;

        validate_prelude(&header)?;
        let info = parse_info(&header)?;
        Ok((info.width as u32, info.height.unsigned_abs()))
    }
}

fn validate_prelude(bytes: &[u8]) -> Result<(), StegoError> {
    if bytes.len() < HEADERS_LEN {
        return Err(StegoError::InvalidFormat(format!(
            "file is only {} bytes, the BMP headers alone take {HEADERS_LEN}",
            bytes.len()
        )));
    }
    if bytes[0..2] != BMP_TAG {
        return Err(StegoError::InvalidFormat(
            "missing 'BM' signature".to_string(),
        ));
    }
    Ok(())
}

fn parse_info(bytes: &[u8]) -> Result<BmpInfoHeader, StegoError> {
    let info = BmpInfoHeader {
        header_size: read_u32(bytes, 14),
        width: read_i32(bytes, 18),
        height: read_i32(bytes, 22),
        planes: read_u16(bytes, 26),
        bits_per_pixel: read_u16(bytes, 28),
        compression: read_u32(bytes, 30),
        x_pixels_per_meter: read_i32(bytes, 38),
        y_pixels_per_meter: read_i32(bytes, 42),
        colors_used: read_u32(bytes, 46),
        colors_important: read_u32(bytes, 50),
    };

    if info.header_size < BMP_INFO_HEADER_LEN as u32 {
        return Err(StegoError::InvalidFormat(format!(
            "info header of {} bytes is too small",
            info.header_size
        )));
    }
    if info.width <= 0 {
        return Err(StegoError::InvalidFormat(format!(
            "non-positive width {}",
            info.width
        )));
    }
    if info.height == 0 {
        return Err(StegoError::InvalidFormat("zero height".to_string()));
    }
    if info.bits_per_pixel != 24 {
        return Err(StegoError::InvalidFormat(format!(
            "unsupported bit depth {}, only 24-bit pixels are handled",
            info.bits_per_pixel
        )));
    }
    if info.compression != 0 {
        return Err(StegoError::InvalidFormat(format!(
            "compressed BMP (method {}) is not handled",
            info.compression
        )));
    }

    Ok(info)
}

/// 行按 32 位对齐: `ceil(bpp * width / 32) * 4`。
fn row_stride(bits_per_pixel: u16, width: i32) -> usize {
    (bits_per_pixel as usize * width as usize).div_ceil(32) * 4
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    read_u32(bytes, offset) as i32
}
