// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/bin/detect_oneshot.rs - 目标检测示例
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use anyhow::Result;
use tracing::info;

use cuiniao::{
  engine::EdgeTpuEngineBuilder,
  input::read_rgb,
  model::{DetectConfig, Detector},
};

/// 检测示例配置，运行前按需修改默认路径
#[derive(Debug, Clone)]
pub struct AppConfig {
  /// TFLite 模型文件路径
  pub model: String,
  /// 输入图像路径
  pub image: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      model: "./model/detect_quant_edgetpu.tflite".to_string(),
      image: "./data/test.jpg".to_string(),
    }
  }
}

fn run(config: AppConfig) -> Result<()> {
  info!("模型文件路径: {}", config.model);
  info!("输入图像: {}", config.image);

  let engine = EdgeTpuEngineBuilder::new(&config.model).build()?;
  let mut detector = Detector::new(engine, DetectConfig::default());

  let image = read_rgb(&config.image)?;
  let result = detector.detect(&image)?;

  for item in result.items.iter() {
    println!("Class ID: {}, Score: {}", item.class_id, item.score);
  }

  Ok(())
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  run(AppConfig::default())
}
