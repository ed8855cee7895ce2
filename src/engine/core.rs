// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/engine/core.rs - 推理引擎特征定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::time::Duration;

use thiserror::Error;

const RGB_CHANNELS: usize = 3;

/// 张量元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorKind {
  UInt8,
  Float32,
}

/// 引擎声明的输入张量规格，NHWC 排布
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorSpec {
  pub dims: [usize; 4],
  pub kind: TensorKind,
}

impl TensorSpec {
  pub fn nhwc(height: usize, width: usize, kind: TensorKind) -> Self {
    Self {
      dims: [1, height, width, RGB_CHANNELS],
      kind,
    }
  }

  pub fn batch(&self) -> usize {
    self.dims[0]
  }

  pub fn height(&self) -> usize {
    self.dims[1]
  }

  pub fn width(&self) -> usize {
    self.dims[2]
  }

  pub fn channels(&self) -> usize {
    self.dims[3]
  }

  pub fn element_count(&self) -> usize {
    self.dims.iter().product()
  }
}

/// 输入张量，带批次维度的 NHWC 数据
#[derive(Debug, Clone)]
pub enum InputTensor {
  UInt8 { data: Box<[u8]>, dims: [usize; 4] },
  Float32 { data: Box<[f32]>, dims: [usize; 4] },
}

impl InputTensor {
  pub fn dims(&self) -> &[usize; 4] {
    match self {
      InputTensor::UInt8 { dims, .. } => dims,
      InputTensor::Float32 { dims, .. } => dims,
    }
  }

  pub fn kind(&self) -> TensorKind {
    match self {
      InputTensor::UInt8 { .. } => TensorKind::UInt8,
      InputTensor::Float32 { .. } => TensorKind::Float32,
    }
  }

  pub fn element_count(&self) -> usize {
    match self {
      InputTensor::UInt8 { data, .. } => data.len(),
      InputTensor::Float32 { data, .. } => data.len(),
    }
  }
}

/// 输出张量
#[derive(Debug, Clone)]
pub enum EngineOutput {
  UInt8 { data: Box<[u8]>, shape: Box<[usize]> },
  Float32 { data: Box<[f32]>, shape: Box<[usize]> },
}

impl EngineOutput {
  pub fn shape(&self) -> &[usize] {
    match self {
      EngineOutput::UInt8 { shape, .. } => shape,
      EngineOutput::Float32 { shape, .. } => shape,
    }
  }

  pub fn kind(&self) -> TensorKind {
    match self {
      EngineOutput::UInt8 { .. } => TensorKind::UInt8,
      EngineOutput::Float32 { .. } => TensorKind::Float32,
    }
  }
}

#[derive(Error, Debug)]
pub enum EngineError {
  #[error("推理引擎未就绪")]
  NotReady,
  #[error("张量形状不匹配: 期望 {expected:?}, 实际 {actual:?}")]
  ShapeMismatch {
    expected: Box<[usize]>,
    actual: Box<[usize]>,
  },
  #[error("张量类型不匹配: 期望 {expected:?}, 实际 {actual:?}")]
  TypeMismatch {
    expected: TensorKind,
    actual: TensorKind,
  },
  #[error("推理后端错误: {0}")]
  Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// 推理引擎能力接口。
/// 引擎句柄进程独占，同一时刻只允许一次推理在途；
/// `invoke` 同步阻塞直至推理完成，并返回本次耗时。
pub trait Engine {
  /// 引擎声明的输入张量规格
  fn describe_input(&self) -> &TensorSpec;

  /// 设置输入张量
  fn set_input(&mut self, tensor: &InputTensor) -> Result<(), EngineError>;

  /// 同步执行一次推理，返回耗时
  fn invoke(&mut self) -> Result<Duration, EngineError>;

  /// 读取输出张量
  fn read_output(&self) -> Result<EngineOutput, EngineError>;
}
