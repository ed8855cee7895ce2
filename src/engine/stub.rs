// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/engine/stub.rs - 桩引擎
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

use std::time::Duration;

use crate::engine::{Engine, EngineError, EngineOutput, InputTensor, TensorSpec};

/// 无硬件环境下使用的桩引擎。
/// 声明固定的输入规格，按脚本返回固定输出，并记录推理次数；
/// `set_input` 执行与真实运行时一致的形状与类型校验。
pub struct StubEngine {
  spec: TensorSpec,
  output: EngineOutput,
  latency: Duration,
  pending: bool,
  completed: bool,
  invocations: usize,
}

impl StubEngine {
  pub fn new(spec: TensorSpec, output: EngineOutput) -> Self {
    Self {
      spec,
      output,
      latency: Duration::from_millis(1),
      pending: false,
      completed: false,
      invocations: 0,
    }
  }

  /// 每次 `invoke` 报告的固定耗时
  pub fn latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// 已执行的推理次数
  pub fn invocations(&self) -> usize {
    self.invocations
  }
}

impl Engine for StubEngine {
  fn describe_input(&self) -> &TensorSpec {
    &self.spec
  }

  fn set_input(&mut self, tensor: &InputTensor) -> Result<(), EngineError> {
    if tensor.kind() != self.spec.kind {
      return Err(EngineError::TypeMismatch {
        expected: self.spec.kind,
        actual: tensor.kind(),
      });
    }
    if tensor.dims() != &self.spec.dims {
      return Err(EngineError::ShapeMismatch {
        expected: self.spec.dims.into(),
        actual: (*tensor.dims()).into(),
      });
    }
    self.pending = true;
    Ok(())
  }

  fn invoke(&mut self) -> Result<Duration, EngineError> {
    if !self.pending {
      return Err(EngineError::NotReady);
    }
    self.invocations += 1;
    self.completed = true;
    Ok(self.latency)
  }

  fn read_output(&self) -> Result<EngineOutput, EngineError> {
    if !self.completed {
      return Err(EngineError::NotReady);
    }
    Ok(self.output.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::TensorKind;

  fn spec_4x4() -> TensorSpec {
    TensorSpec::nhwc(4, 4, TensorKind::UInt8)
  }

  fn output_3() -> EngineOutput {
    EngineOutput::UInt8 {
      data: vec![1, 2, 3].into_boxed_slice(),
      shape: vec![1, 3].into_boxed_slice(),
    }
  }

  fn tensor_4x4() -> InputTensor {
    InputTensor::UInt8 {
      data: vec![0; 4 * 4 * 3].into_boxed_slice(),
      dims: [1, 4, 4, 3],
    }
  }

  #[test]
  fn invoke_without_input_is_not_ready() {
    let mut engine = StubEngine::new(spec_4x4(), output_3());
    assert!(matches!(engine.invoke(), Err(EngineError::NotReady)));
    assert!(matches!(engine.read_output(), Err(EngineError::NotReady)));
  }

  #[test]
  fn mismatched_shape_is_rejected() {
    let mut engine = StubEngine::new(spec_4x4(), output_3());
    let tensor = InputTensor::UInt8 {
      data: vec![0; 8 * 8 * 3].into_boxed_slice(),
      dims: [1, 8, 8, 3],
    };
    assert!(matches!(
      engine.set_input(&tensor),
      Err(EngineError::ShapeMismatch { .. })
    ));
  }

  #[test]
  fn mismatched_kind_is_rejected() {
    let mut engine = StubEngine::new(spec_4x4(), output_3());
    let tensor = InputTensor::Float32 {
      data: vec![0.0; 4 * 4 * 3].into_boxed_slice(),
      dims: [1, 4, 4, 3],
    };
    assert!(matches!(
      engine.set_input(&tensor),
      Err(EngineError::TypeMismatch { .. })
    ));
  }

  #[test]
  fn scripted_output_is_returned_after_invoke() {
    let mut engine = StubEngine::new(spec_4x4(), output_3()).latency(Duration::from_millis(7));
    engine.set_input(&tensor_4x4()).unwrap();
    let elapsed = engine.invoke().unwrap();
    assert_eq!(elapsed, Duration::from_millis(7));
    assert_eq!(engine.invocations(), 1);
    match engine.read_output().unwrap() {
      EngineOutput::UInt8 { data, shape } => {
        assert_eq!(data.as_ref(), &[1, 2, 3]);
        assert_eq!(shape.as_ref(), &[1, 3]);
      }
      _ => panic!("桩引擎应返回脚本输出"),
    }
  }
}
