//! # 命令处理逻辑模块
//!
//! 包含处理 `embed`、`extract` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。
//! 图像格式在入口处判定一次并显式传递，之后不再从文件名重新推导。

use crate::bmp::BmpRaster;
use crate::capacity;
use crate::cli::{CapacityArgs, EmbedArgs, ExtractArgs};
use crate::codec;
use crate::format::ImageKind;
use crate::png::PngRaster;
use anyhow::{Context, Result};
use colored::Colorize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 估算用的平均值：一个单词约 6 字节，一页 A4 约 3000 字符，
/// 整本圣经约 4,000,000 字符。
const BYTES_PER_WORD: u64 = 6;
const BYTES_PER_PAGE: u64 = 3000;
const BYTES_PER_BIBLE: u64 = 4_000_000;

/// 处理 'embed' 命令的执行逻辑。
///
/// 负责解析内容参数 (文件或字面文本)、按输入扩展名选定图像格式、
/// 调用核心编码器写入长度前缀与载荷比特，最后把结果图像原子地
/// 写入目标路径。
///
/// # Arguments
///
/// * `args` - 包含输入图像、内容与输出路径的 `EmbedArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解析输入图像。
/// * 图像容量不足以容纳载荷。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法写入目标图像文件。
pub fn handle_embed(args: EmbedArgs) -> Result<()> {
    let kind = ImageKind::from_path(&args.file);
    let payload = resolve_payload(&args.content);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(kind.default_output()));
    ensure_writable(&output, args.force)?;

    match kind {
        ImageKind::Bmp => {
            let bytes = fs::read(&args.file).with_context(|| {
                format!(
                    "Unable to read image file: {}",
                    args.file.display().to_string().red().bold()
                )
            })?;
            let mut raster = BmpRaster::parse(&bytes).with_context(|| {
                format!(
                    "Not a usable BMP carrier: {}",
                    args.file.display().to_string().red().bold()
                )
            })?;

            codec::embed(&payload, &mut raster.bit_view()).with_context(|| {
                format!(
                    "Unable to hide {} bytes in '{}'",
                    payload.len().to_string().red().bold(),
                    args.file.display()
                )
            })?;

            write_atomically(&output, &raster.to_bytes())?;
        }
        ImageKind::Png => {
            let mut raster = PngRaster::open(&args.file).with_context(|| {
                format!(
                    "Not a usable PNG carrier: {}",
                    args.file.display().to_string().red().bold()
                )
            })?;

            codec::embed(&payload, &mut raster.bit_view()?).with_context(|| {
                format!(
                    "Unable to hide {} bytes in '{}'",
                    payload.len().to_string().red().bold(),
                    args.file.display()
                )
            })?;

            let tmp = tmp_path(&output);
            raster.save(&tmp).with_context(|| {
                format!(
                    "Unable to write temporary image file: {}",
                    tmp.display().to_string().red().bold()
                )
            })?;
            fs::rename(&tmp, &output).with_context(|| {
                format!(
                    "Unable to move the result into place: {}",
                    output.display().to_string().red().bold()
                )
            })?;
        }
    }

    println!(
        "The content has been successfully hidden and saved: {}",
        output.display().to_string().green().bold()
    );

    Ok(())
}

/// 处理 'extract' 命令的执行逻辑。
///
/// 负责解析隐写图像、读取长度前缀并重建隐藏载荷，
/// 随后将其打印到标准输出或写入 `--output` 指定的文件。
///
/// # Arguments
///
/// * `args` - 包含输入图像与可选输出路径的 `ExtractArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解析输入图像。
/// * 图像不包含有效消息 (长度字段不可信或载荷被截断)。
/// * 无法写入目标输出文件。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    let kind = ImageKind::from_path(&args.file);

    let payload = match kind {
        ImageKind::Bmp => {
            let bytes = fs::read(&args.file).with_context(|| {
                format!(
                    "Unable to read image file: {}",
                    args.file.display().to_string().red().bold()
                )
            })?;
            let mut raster = BmpRaster::parse(&bytes).with_context(|| {
                format!(
                    "Not a usable BMP carrier: {}",
                    args.file.display().to_string().red().bold()
                )
            })?;
            let view = raster.bit_view();
            codec::extract(&view)
        }
        ImageKind::Png => {
            let mut raster = PngRaster::open(&args.file).with_context(|| {
                format!(
                    "Not a usable PNG carrier: {}",
                    args.file.display().to_string().red().bold()
                )
            })?;
            let view = raster.bit_view()?;
            codec::extract(&view)
        }
    }
    .with_context(|| {
        format!(
            "No recoverable message in '{}'. \nThe image may not contain hidden data or is corrupted.",
            args.file.display().to_string().red().bold()
        )
    })?;

    match args.output {
        Some(path) => {
            ensure_writable(&path, args.force)?;
            fs::write(&path, &payload).with_context(|| {
                format!(
                    "Unable to write to output file: {}",
                    path.display().to_string().red().bold()
                )
            })?;
            println!(
                "Successfully extracted content to '{}' ({} bytes).",
                path.display().to_string().green().bold(),
                payload.len()
            );
        }
        None => {
            println!("Extracted content:\n{}", String::from_utf8_lossy(&payload));
        }
    }

    Ok(())
}

/// 处理 'capacity' 命令的执行逻辑。
///
/// 仅检查图像头部即可得到尺寸 (不解码像素数据)，
/// 按固定的 3 通道协议计算最大可嵌入字节数并打印易读的估算报告。
///
/// # Errors
///
/// 当文件无法读取或不是受支持的图像格式时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let kind = ImageKind::from_path(&args.file);

    let (width, height) = match kind {
        ImageKind::Bmp => BmpRaster::probe_dimensions(&args.file),
        ImageKind::Png => PngRaster::probe_dimensions(&args.file),
    }
    .with_context(|| {
        format!(
            "Could not read image file or format invalid: {}",
            args.file.display().to_string().red().bold()
        )
    })?;

    let capacity = capacity::max_payload_bytes(width, height);
    if capacity == 0 {
        println!("Image is too small to hold any data.");
        return Ok(());
    }

    print_capacity_report(&args.file, capacity);
    Ok(())
}

/// 内容参数的解析规则：该路径存在可读文件则嵌入其字节，
/// 否则把参数本身当作字面文本。
fn resolve_payload(content: &str) -> Vec<u8> {
    match fs::read(content) {
        Ok(bytes) => {
            println!(
                "Reading content from file: '{}' ({} bytes)",
                content.cyan(),
                bytes.len()
            );
            bytes
        }
        Err(_) => {
            println!("Embedding raw text string.");
            content.as_bytes().to_vec()
        }
    }
}

/// 覆盖保护：输出文件已存在时要求显式的 `--force`。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.display().to_string().red().bold()
    );
    Ok(())
}

/// 先写入同目录下的临时文件，成功后原子地重命名到目标路径；
/// 失败的嵌入不会留下写了一半的输出文件。
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes).with_context(|| {
        format!(
            "Unable to write temporary image file: {}",
            tmp.display().to_string().red().bold()
        )
    })?;
    fs::rename(&tmp, path).with_context(|| {
        format!(
            "Unable to move the result into place: {}",
            path.display().to_string().red().bold()
        )
    })?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("out"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn print_capacity_report(path: &Path, capacity: u64) {
    println!("---------------------------------------------");
    println!(
        "CAPACITY ANALYSIS: {}",
        path.display().to_string().cyan().bold()
    );
    println!("---------------------------------------------");

    if capacity > 1024 * 1024 {
        println!(
            "Max. hidden data   : {:.2} MB ({} bytes)",
            capacity as f64 / (1024.0 * 1024.0),
            capacity
        );
    } else {
        println!(
            "Max. hidden data   : {:.2} KB ({} bytes)",
            capacity as f64 / 1024.0,
            capacity
        );
    }

    println!();
    println!("Estimated Text Content:");
    println!("  - {:<10} Characters (ASCII)", capacity);
    println!("  - {:<10} Words (approx.)", capacity / BYTES_PER_WORD);

    let pages = capacity / BYTES_PER_PAGE;
    if pages > 0 {
        println!("  - {:<10} A4 Pages (full text)", pages);
    } else {
        println!("  - < 1        A4 Page");
    }

    if capacity > BYTES_PER_BIBLE {
        println!();
        println!(
            "Wow! You could hide the entire Bible {:.1}x times in this image.",
            capacity as f64 / BYTES_PER_BIBLE as f64
        );
    }

    println!("---------------------------------------------");
}
