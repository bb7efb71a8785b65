/// 隐藏载荷长度前缀所占用的比特数。
/// 长度以 `u32` 形式存储，按最低位优先的顺序写入前 32 个载体槽位。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 提取时可接受的载荷长度上限 (字节)。
/// 超过该值的长度字段视为图像中不存在有效消息。
/// 128 MiB 大于任何现实载体图像的容量 (约 19000x19000 的 RGB 图像)。
pub const MAX_PAYLOAD_BYTES: u32 = 1 << 27;

/// BMP 文件头的大小 (字节): 类型标记、文件大小、保留字段、像素数据偏移。
pub const BMP_FILE_HEADER_LEN: usize = 14;

/// BITMAPINFOHEADER 的大小 (字节)。
pub const BMP_INFO_HEADER_LEN: usize = 40;

/// 每个像素参与隐写的通道数。
/// 容量始终按 3 个通道计算，即使图像带有 Alpha 通道 (Alpha 永不作为载体)。
pub const USABLE_CHANNELS: u64 = 3;
