//! # 图像格式模块
//!
//! 输入格式在进入命令处理逻辑前判定一次，之后显式传递，
//! 不在中途重新从文件名推导。

use std::ffi::OsStr;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Bmp,
    Png,
}

impl ImageKind {
    /// 依输入文件扩展名 (大小写不敏感) 判定格式:
    /// `png` 走 PNG 路径，其余一律按 BMP 处理。
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => ImageKind::Png,
            _ => ImageKind::Bmp,
        }
    }

    /// 该格式的默认输出文件名。
    pub fn default_output(self) -> &'static str {
        match self {
            ImageKind::Bmp => "out.bmp",
            ImageKind::Png => "out.png",
        }
    }
}
