// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/model.rs - 推理流水线
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum PipelineError {
  #[error(
    "模型输入尺寸不受支持: 期望 {expected_height}x{expected_width}, 实际 {actual_height}x{actual_width}"
  )]
  Configuration {
    expected_height: usize,
    expected_width: usize,
    actual_height: usize,
    actual_width: usize,
  },
  #[error("推理错误: {0}")]
  Inference(#[from] EngineError),
}

mod preprocess;
pub use self::preprocess::preprocess;

mod classify;
pub use self::classify::{Classifier, ClassifyConfig, ClassifyReport, Ranked};

mod detect;
pub use self::detect::{DetectConfig, DetectItem, DetectResult, Detector};
