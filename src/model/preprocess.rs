// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/model/preprocess.rs - 图像预处理
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

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::engine::{InputTensor, TensorKind, TensorSpec};

/// 将 RGB 图像转换为引擎声明的输入张量。
/// 图像按声明的宽高缩放，按 NHWC 排布并补上大小为 1 的批次维度；
/// 浮点引擎把每个通道值从 [0,255] 映射到 [-1,1]，量化引擎原样透传字节。
/// 源图像不被修改。
pub fn preprocess(image: &RgbImage, spec: &TensorSpec, filter: FilterType) -> InputTensor {
  let resized = imageops::resize(image, spec.width() as u32, spec.height() as u32, filter);
  let dims = [1, spec.height(), spec.width(), 3];

  match spec.kind {
    TensorKind::UInt8 => InputTensor::UInt8 {
      data: resized.into_raw().into_boxed_slice(),
      dims,
    },
    TensorKind::Float32 => {
      let data: Box<[f32]> = resized
        .into_raw()
        .into_iter()
        .map(|v| (v as f32 - 127.5) / 127.5)
        .collect();
      InputTensor::Float32 { data, dims }
    }
  }
}
