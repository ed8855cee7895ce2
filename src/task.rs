// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/task.rs - 推理任务
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

use tracing::debug;

use crate::engine::{Engine, EngineError, EngineOutput, InputTensor};

/// 重复推理任务。
/// 加速器的首次推理包含一次性的模型载入开销，重复执行用于摊薄该开销；
/// 各次严格顺序执行，耗时全部记录，输出只保留最后一次。
pub struct RepeatShot {
  pub repeats: usize,
}

impl RepeatShot {
  /// 至少执行一次；`repeats` 为 0 时按 1 处理。
  pub fn run<E: Engine>(
    &self,
    engine: &mut E,
    tensor: &InputTensor,
  ) -> Result<(EngineOutput, Box<[Duration]>), EngineError> {
    let rounds = self.repeats.max(1);
    let mut times = Vec::with_capacity(rounds);

    for i in 1..rounds {
      engine.set_input(tensor)?;
      let elapsed = engine.invoke()?;
      debug!("({}) 推理完成，耗时: {:.1}ms", i, elapsed.as_secs_f64() * 1000.0);
      times.push(elapsed);
      let _ = engine.read_output()?;
    }

    engine.set_input(tensor)?;
    let elapsed = engine.invoke()?;
    debug!(
      "({}) 推理完成，耗时: {:.1}ms",
      rounds,
      elapsed.as_secs_f64() * 1000.0
    );
    times.push(elapsed);
    let output = engine.read_output()?;

    Ok((output, times.into_boxed_slice()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::{StubEngine, TensorKind, TensorSpec};

  fn engine_with_output(data: &[u8]) -> StubEngine {
    StubEngine::new(
      TensorSpec::nhwc(4, 4, TensorKind::UInt8),
      EngineOutput::UInt8 {
        data: data.to_vec().into_boxed_slice(),
        shape: vec![1, data.len()].into_boxed_slice(),
      },
    )
  }

  fn tensor_4x4() -> InputTensor {
    InputTensor::UInt8 {
      data: vec![0; 4 * 4 * 3].into_boxed_slice(),
      dims: [1, 4, 4, 3],
    }
  }

  #[test]
  fn runs_exactly_requested_rounds() {
    let mut engine = engine_with_output(&[9, 8, 7]);
    let (output, times) = RepeatShot { repeats: 5 }
      .run(&mut engine, &tensor_4x4())
      .unwrap();

    assert_eq!(engine.invocations(), 5);
    assert_eq!(times.len(), 5);
    match output {
      EngineOutput::UInt8 { data, .. } => assert_eq!(data.as_ref(), &[9, 8, 7]),
      _ => panic!("输出类型应与脚本一致"),
    }
  }

  #[test]
  fn zero_repeats_still_runs_once() {
    let mut engine = engine_with_output(&[1]);
    let (_, times) = RepeatShot { repeats: 0 }
      .run(&mut engine, &tensor_4x4())
      .unwrap();

    assert_eq!(engine.invocations(), 1);
    assert_eq!(times.len(), 1);
  }

  #[test]
  fn mismatched_tensor_aborts_the_task() {
    let mut engine = engine_with_output(&[1]);
    let tensor = InputTensor::UInt8 {
      data: vec![0; 8 * 8 * 3].into_boxed_slice(),
      dims: [1, 8, 8, 3],
    };

    assert!(matches!(
      RepeatShot { repeats: 3 }.run(&mut engine, &tensor),
      Err(EngineError::ShapeMismatch { .. })
    ));
    assert_eq!(engine.invocations(), 0);
  }
}
