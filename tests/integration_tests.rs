use image::{ImageBuffer, Rgb, Rgba};
use rand::RngCore;
use std::fs;
use std::path::Path;
use stego::{
    cli::{CapacityArgs, EmbedArgs, ExtractArgs},
    handler::{handle_capacity, handle_embed, handle_extract},
};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 PNG 测试图像 (RGBA)
fn create_test_png(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 一个辅助函数，用于创建一个带有随机像素的 24 位 BMP 测试图像
fn create_test_bmp(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    let img_buf: ImageBuffer<Rgb<u8>, _> =
        ImageBuffer::from_raw(width, height, raw_pixels).expect("Buffer size must match.");
    img_buf.save(path).expect("Failed to create test image.");
}

/// 验证 PNG 载体从嵌入到提取的完整流程
#[test]
fn test_embed_and_extract_png_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");
    let recovered_path = dir.path().join("recovered.txt");

    create_test_png(&carrier_path, 100, 100);
    let original_text = "This is a hidden message! 这是一条隐藏的消息！";

    // 2. 嵌入字面文本
    handle_embed(EmbedArgs {
        file: carrier_path.clone(),
        content: original_text.to_string(),
        output: Some(hidden_path.clone()),
        force: false,
    })?;
    assert!(hidden_path.exists(), "Hidden image should be created.");

    // 3. 提取到文件
    handle_extract(ExtractArgs {
        file: hidden_path.clone(),
        output: Some(recovered_path.clone()),
        force: false,
    })?;

    // 4. 验证结果
    let recovered = fs::read_to_string(&recovered_path)?;
    assert_eq!(
        original_text, recovered,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证 BMP 载体从嵌入到提取的完整流程
/// 宽度选用 99，使每行带有非零的 4 字节对齐填充
#[test]
fn test_embed_and_extract_bmp_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.bmp");
    let hidden_path = dir.path().join("hidden.bmp");
    let recovered_path = dir.path().join("recovered.txt");

    create_test_bmp(&carrier_path, 99, 50);
    let original_text = "Row padding must be skipped. 行尾填充必须被跳过。";

    // 2. 嵌入并提取
    handle_embed(EmbedArgs {
        file: carrier_path.clone(),
        content: original_text.to_string(),
        output: Some(hidden_path.clone()),
        force: false,
    })?;
    handle_extract(ExtractArgs {
        file: hidden_path.clone(),
        output: Some(recovered_path.clone()),
        force: false,
    })?;

    // 3. 验证结果：内容一致，文件大小不变
    let recovered = fs::read_to_string(&recovered_path)?;
    assert_eq!(
        original_text, recovered,
        "Recovered text must match the original."
    );
    assert_eq!(
        fs::metadata(&carrier_path)?.len(),
        fs::metadata(&hidden_path)?.len(),
        "Embedding must not change the BMP file size."
    );

    Ok(())
}

/// 验证 content 参数指向已存在文件时，嵌入的是文件字节而非路径文本
#[test]
fn test_content_argument_resolves_files() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");
    let payload_path = dir.path().join("secret.bin");
    let recovered_path = dir.path().join("recovered.bin");

    create_test_png(&carrier_path, 64, 64);
    let payload: Vec<u8> = (0u16..512).map(|i| (i % 251) as u8).collect();
    fs::write(&payload_path, &payload)?;

    // 2. 把文件路径作为 content 传入
    handle_embed(EmbedArgs {
        file: carrier_path.clone(),
        content: payload_path.to_string_lossy().into_owned(),
        output: Some(hidden_path.clone()),
        force: false,
    })?;
    handle_extract(ExtractArgs {
        file: hidden_path.clone(),
        output: Some(recovered_path.clone()),
        force: false,
    })?;

    // 3. 验证提取出的是文件内容
    let recovered = fs::read(&recovered_path)?;
    assert_eq!(
        payload, recovered,
        "Recovered bytes must match the payload file."
    );

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let dest_path = dir.path().join("dest.png");

    create_test_png(&carrier_path, 50, 50);

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    let result = handle_embed(EmbedArgs {
        file: carrier_path.clone(),
        content: "some text".to_string(),
        output: Some(dest_path.clone()),
        force: false,
    });
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let result = handle_embed(EmbedArgs {
        file: carrier_path.clone(),
        content: "some text".to_string(),
        output: Some(dest_path.clone()),
        force: true,
    });
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    // 验证文件确实被覆盖
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理，以及失败的嵌入不会留下输出文件
#[test]
fn test_embed_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("small.png");
    let dest_path = dir.path().join("dest.png");

    // 一幅非常小的图片配一段非常大的文本
    create_test_png(&carrier_path, 10, 10);
    let large_text = "a".repeat(5000);

    // 2. 执行并断言错误
    let result = handle_embed(EmbedArgs {
        file: carrier_path,
        content: large_text,
        output: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unable to hide"));
    }
    assert!(
        !dest_path.exists(),
        "A failed embed must not leave an output file behind."
    );

    Ok(())
}

/// 验证空载荷可以嵌入，并且提取结果为空
#[test]
fn test_empty_payload_roundtrip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");
    let recovered_path = dir.path().join("recovered.txt");

    create_test_png(&carrier_path, 20, 20);

    handle_embed(EmbedArgs {
        file: carrier_path,
        content: String::new(),
        output: Some(hidden_path.clone()),
        force: false,
    })?;
    handle_extract(ExtractArgs {
        file: hidden_path,
        output: Some(recovered_path.clone()),
        force: false,
    })?;

    assert!(
        fs::read(&recovered_path)?.is_empty(),
        "An empty payload must extract to an empty result."
    );

    Ok(())
}

/// 验证同尺寸的 BMP 与 PNG 载体提取出完全相同的载荷字节
#[test]
fn test_format_equivalence() -> anyhow::Result<()> {
    // 1. 准备两种格式的同尺寸载体
    let dir = tempdir()?;
    let png_carrier = dir.path().join("carrier.png");
    let bmp_carrier = dir.path().join("carrier.bmp");
    create_test_png(&png_carrier, 80, 60);
    create_test_bmp(&bmp_carrier, 80, 60);

    let message = "Identical in both carriers";

    // 2. 分别嵌入并提取
    let mut recovered = Vec::new();
    for (carrier, hidden, out) in [
        (&png_carrier, "hidden.png", "from_png.bin"),
        (&bmp_carrier, "hidden.bmp", "from_bmp.bin"),
    ] {
        let hidden_path = dir.path().join(hidden);
        let out_path = dir.path().join(out);
        handle_embed(EmbedArgs {
            file: carrier.clone(),
            content: message.to_string(),
            output: Some(hidden_path.clone()),
            force: false,
        })?;
        handle_extract(ExtractArgs {
            file: hidden_path,
            output: Some(out_path.clone()),
            force: false,
        })?;
        recovered.push(fs::read(&out_path)?);
    }

    // 3. 两条提取结果必须完全一致
    assert_eq!(
        recovered[0], recovered[1],
        "Both carriers must yield identical payload bytes."
    );
    assert_eq!(recovered[0], message.as_bytes());

    Ok(())
}

/// 验证从未嵌入过数据的图像会被确定性地拒绝，而不是返回垃圾
#[test]
fn test_extract_from_pristine_image_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("white.png");

    // 全白图像的长度字段读出 u32::MAX，必然超出合理上限
    let img = ImageBuffer::from_pixel(60, 60, Rgba([255u8, 255, 255, 255]));
    img.save(&path)?;

    let result = handle_extract(ExtractArgs {
        file: path,
        output: None,
        force: false,
    });
    assert!(
        result.is_err(),
        "Extraction from a pristine image must fail."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("No recoverable message"));
    }

    Ok(())
}

/// 验证 capacity 命令对两种格式都能工作
#[test]
fn test_capacity_command() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let png_path = dir.path().join("carrier.png");
    let bmp_path = dir.path().join("carrier.bmp");
    let tiny_path = dir.path().join("tiny.png");

    create_test_png(&png_path, 100, 100);
    create_test_bmp(&bmp_path, 100, 100);
    create_test_png(&tiny_path, 2, 2);

    handle_capacity(CapacityArgs { file: png_path })?;
    handle_capacity(CapacityArgs { file: bmp_path })?;
    // 2x2 图像放不下长度前缀，但命令本身应当成功
    handle_capacity(CapacityArgs { file: tiny_path })?;

    // 不存在的文件必须报错
    let missing = handle_capacity(CapacityArgs {
        file: dir.path().join("missing.png"),
    });
    assert!(missing.is_err());

    Ok(())
}
