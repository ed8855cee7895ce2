// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/model/detect.rs - 检测流水线
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::engine::{Engine, EngineError, EngineOutput, TensorKind};
use crate::model::{PipelineError, preprocess};
use crate::task::RepeatShot;

/// 检测行中置信度所在列
const DETECT_SCORE_COLUMN: usize = 4;
/// 检测行中类别编号所在列
const DETECT_CLASS_COLUMN: usize = 5;

/// 检测流水线配置
#[derive(Debug, Clone)]
pub struct DetectConfig {
  /// 缩放采样滤波器，默认 Triangle
  pub filter: FilterType,
}

impl Default for DetectConfig {
  fn default() -> Self {
    Self {
      filter: FilterType::Triangle,
    }
  }
}

#[derive(Debug, Clone)]
pub struct DetectItem {
  pub class_id: u32,
  pub score: f32,
}

#[derive(Debug, Clone)]
pub struct DetectResult {
  pub items: Box<[DetectItem]>,
}

/// 检测流水线：按模型声明的尺寸缩放图像，单次推理后逐行读出结果。
/// 不校验模型输入尺寸，也不做置信度过滤。
pub struct Detector<E> {
  engine: E,
  config: DetectConfig,
}

impl<E: Engine> Detector<E> {
  pub fn new(engine: E, config: DetectConfig) -> Self {
    Self { engine, config }
  }

  pub fn detect(&mut self, image: &RgbImage) -> Result<DetectResult, PipelineError> {
    let tensor = preprocess(image, self.engine.describe_input(), self.config.filter);
    let (output, _times) = RepeatShot { repeats: 1 }.run(&mut self.engine, &tensor)?;
    Ok(postprocess(&output)?)
  }
}

/// 逐行读出 (类别编号, 置信度)，行序与输出一致，每行都报告。
fn postprocess(output: &EngineOutput) -> Result<DetectResult, EngineError> {
  let (data, shape) = match output {
    EngineOutput::Float32 { data, shape } => (data, shape),
    EngineOutput::UInt8 { .. } => {
      return Err(EngineError::TypeMismatch {
        expected: TensorKind::Float32,
        actual: TensorKind::UInt8,
      });
    }
  };

  // 允许带批次维度（[1, N, C]）或裸 [N, C]
  let dims: &[usize] = if shape.len() == 3 && shape[0] == 1 {
    &shape[1..]
  } else {
    shape
  };
  if dims.len() != 2 || dims[1] <= DETECT_CLASS_COLUMN || data.len() != dims[0] * dims[1] {
    return Err(EngineError::ShapeMismatch {
      expected: vec![1, dims.first().copied().unwrap_or(0), 6].into_boxed_slice(),
      actual: shape.clone(),
    });
  }

  let items: Vec<DetectItem> = data
    .chunks_exact(dims[1])
    .map(|row| DetectItem {
      class_id: row[DETECT_CLASS_COLUMN] as u32,
      score: row[DETECT_SCORE_COLUMN],
    })
    .collect();
  debug!("检测到 {} 行结果", items.len());

  Ok(DetectResult {
    items: items.into_boxed_slice(),
  })
}
