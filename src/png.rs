//! # PNG 光栅模块
//!
//! 像素解码与编码委托给外部的 `image` 库；
//! 本模块只负责把解码后的扁平通道缓冲区适配成载体比特视图，
//! 并在嵌入完成后重新编码为 PNG。
//! 仅接受 8 位 RGB / RGBA 像素；Alpha 通道不作为载体。

use std::path::Path;

use image::{
    DynamicImage, ExtendedColorType, GenericImageView, ImageError, ImageFormat, ImageReader,
};

use crate::bits::BitChannelView;
use crate::error::StegoError;

pub struct PngRaster {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

impl PngRaster {
    pub fn open(path: &Path) -> Result<Self, StegoError> {
        let img = image::open(path).map_err(decode_error)?;
        let (width, height) = img.dimensions();

        match img {
            DynamicImage::ImageRgb8(buf) => Ok(Self {
                width,
                height,
                channels: 3,
                pixels: buf.into_raw(),
            }),
            DynamicImage::ImageRgba8(buf) => Ok(Self {
                width,
                height,
                channels: 4,
                pixels: buf.into_raw(),
            }),
            other => {
                let channels = other.color().channel_count();
                if channels < 3 {
                    Err(StegoError::UnsupportedChannelCount(channels))
                } else {
                    Err(StegoError::InvalidFormat(
                        "only 8-bit RGB/RGBA pixels are handled".to_string(),
                    ))
                }
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 扁平通道缓冲区上的载体比特视图；4 通道时跳过每个 Alpha 字节。
    pub fn bit_view(&mut self) -> Result<BitChannelView<'_>, StegoError> {
        BitChannelView::packed(&mut self.pixels, self.channels)
    }

    /// 将 (可能已被改写的) 通道缓冲区重新编码为 PNG 并写入 `path`。
    pub fn save(&self, path: &Path) -> Result<(), StegoError> {
        let color = match self.channels {
            3 => ExtendedColorType::Rgb8,
            _ => ExtendedColorType::Rgba8,
        };

        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            color,
            ImageFormat::Png,
        )
        .map_err(|e| StegoError::WriteFailure(e.to_string()))
    }

    /// 只读取文件头即可得到尺寸，容量查询不必解码像素数据。
    pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), StegoError> {
        ImageReader::open(path)?.into_dimensions().map_err(decode_error)
    }
}

fn decode_error(err: ImageError) -> StegoError {
    match err {
        ImageError::IoError(e) => StegoError::Io(e),
        other => StegoError::InvalidFormat(other.to_string()),
    }
}
