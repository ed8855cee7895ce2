// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/engine/tflite.rs - TFLite 推理引擎
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::time::{Duration, Instant};

use tflitec::interpreter::{Interpreter, Options};
use tflitec::tensor::DataType;
use tracing::{debug, info};

use crate::engine::{Engine, EngineError, EngineOutput, InputTensor, TensorKind, TensorSpec};

// TODO: tflitec 尚未暴露 TFLite 的 external delegate 接口，
// libedgetpu.so.1 的委托挂载需等上游支持后接入。

fn backend(err: tflitec::Error) -> EngineError {
  EngineError::Backend(Box::new(err))
}

pub struct EdgeTpuEngineBuilder {
  model_path: String,
  threads: i32,
}

impl EdgeTpuEngineBuilder {
  pub fn new(model_path: &str) -> Self {
    Self {
      model_path: model_path.to_string(),
      threads: 1,
    }
  }

  pub fn threads(mut self, threads: i32) -> Self {
    self.threads = threads;
    self
  }

  pub fn build(self) -> Result<EdgeTpuEngine, EngineError> {
    info!("加载模型文件: {}", self.model_path);
    let mut options = Options::default();
    options.thread_count = self.threads;

    let interpreter =
      Interpreter::with_model_path(&self.model_path, Some(options)).map_err(backend)?;
    interpreter.allocate_tensors().map_err(backend)?;
    info!("模型加载完成");

    let input = interpreter.input(0).map_err(backend)?;
    let shape = input.shape().dimensions().clone();
    if shape.len() != 4 {
      return Err(EngineError::Backend(
        format!("模型输入维度异常: {:?}", shape).into(),
      ));
    }

    let kind = match input.data_type() {
      DataType::Uint8 => TensorKind::UInt8,
      DataType::Float32 => TensorKind::Float32,
      other => {
        return Err(EngineError::Backend(
          format!("不支持的输入张量类型: {:?}", other).into(),
        ));
      }
    };

    let spec = TensorSpec {
      dims: [shape[0], shape[1], shape[2], shape[3]],
      kind,
    };
    debug!("模型输入规格: {:?}", spec);

    Ok(EdgeTpuEngine {
      interpreter,
      spec,
      invoked: false,
    })
  }
}

/// TFLite 运行时包装。
/// 模型加载时分配所有张量并读出输入规格，之后按能力接口逐次推理。
pub struct EdgeTpuEngine {
  interpreter: Interpreter,
  spec: TensorSpec,
  invoked: bool,
}

impl Engine for EdgeTpuEngine {
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

    match tensor {
      InputTensor::UInt8 { data, .. } => self.interpreter.copy(data, 0).map_err(backend)?,
      InputTensor::Float32 { data, .. } => self.interpreter.copy(data, 0).map_err(backend)?,
    }
    Ok(())
  }

  fn invoke(&mut self) -> Result<Duration, EngineError> {
    let now = Instant::now();
    self.interpreter.invoke().map_err(backend)?;
    self.invoked = true;
    Ok(now.elapsed())
  }

  fn read_output(&self) -> Result<EngineOutput, EngineError> {
    if !self.invoked {
      return Err(EngineError::NotReady);
    }

    let output = self.interpreter.output(0).map_err(backend)?;
    let shape = output.shape().dimensions().clone().into_boxed_slice();

    match output.data_type() {
      DataType::Uint8 => Ok(EngineOutput::UInt8 {
        data: output.data::<u8>().to_vec().into_boxed_slice(),
        shape,
      }),
      DataType::Float32 => Ok(EngineOutput::Float32 {
        data: output.data::<f32>().to_vec().into_boxed_slice(),
        shape,
      }),
      other => Err(EngineError::Backend(
        format!("不支持的输出张量类型: {:?}", other).into(),
      )),
    }
  }
}
