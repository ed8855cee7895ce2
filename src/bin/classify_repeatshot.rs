// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/bin/classify_repeatshot.rs - 图像分类示例
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cuiniao::{
  engine::EdgeTpuEngineBuilder,
  input::read_rgb,
  labels::LabelTable,
  model::{Classifier, ClassifyConfig},
};

/// Cuiniao 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入图像路径
  #[arg(short, long, value_name = "IMAGE")]
  pub input: String,

  /// TFLite 模型文件路径
  #[arg(
    long,
    value_name = "MODEL",
    default_value = "./model/mobilenet_v2_1.0_224_inat_bird_quant_edgetpu.tflite"
  )]
  pub model: String,

  /// 标签文件路径
  #[arg(long, value_name = "LABELS", default_value = "./model/inat_bird_labels.txt")]
  pub labels: String,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型文件路径: {}", args.model);
  info!("标签文件路径: {}", args.labels);
  info!("输入图像: {}", args.input);

  let labels = LabelTable::from_file(&args.labels)?;
  let engine = EdgeTpuEngineBuilder::new(&args.model).build()?;
  let mut classifier = Classifier::new(engine, labels, ClassifyConfig::default())?;

  let image = read_rgb(&args.input)?;
  let report = classifier.classify(&image)?;

  println!("---- 推理耗时 ----");
  println!("注意: Edge TPU 上的首次推理包含模型载入，耗时偏高。");
  for elapsed in &report.times {
    println!("{:.1}ms", elapsed.as_secs_f64() * 1000.0);
  }

  println!("---- 识别结果 ----");
  for item in &report.items {
    println!("{}: {:.5}", item.label, item.score);
  }

  Ok(())
}
