//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 PNG 或 BMP 图像中隐藏与提取任意数据。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 PNG 或 BMP 图像中隐藏与提取任意数据，并能估算一幅图像的最大隐藏容量。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：embed (嵌入)、extract (提取) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将文本或文件内容隐藏进图像 (支持 .png 与 .bmp)。
    Embed(EmbedArgs),

    /// 从经过隐写的图像中提取隐藏内容。
    Extract(ExtractArgs),

    /// 估算图像最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 'embed' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EmbedArgs {
    /// 用于隐写的输入图像文件路径 (.png 或 .bmp)。
    pub file: PathBuf,

    /// 要隐藏的内容：若该路径存在可读文件则嵌入其字节，否则视为字面文本。
    pub content: String,

    /// 保存结果图像的输出路径 (默认 out.png / out.bmp)。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 已隐藏数据的图像文件路径。
    pub file: PathBuf,

    /// 提取内容写入该文件；缺省时作为文本打印到标准输出。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 待估算容量的图像文件路径。
    pub file: PathBuf,
}
