// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/model/classify.rs - 分类流水线
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::time::Duration;

use image::RgbImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::engine::{Engine, EngineOutput};
use crate::labels::LabelTable;
use crate::model::{PipelineError, preprocess};
use crate::task::RepeatShot;

/// 分类模型要求的默认输入边长
pub const CLASSIFY_INPUT_SIDE: usize = 224;
/// 默认报告的候选数量
pub const CLASSIFY_TOP_K: usize = 5;
/// 默认重复推理次数
pub const CLASSIFY_REPEATS: usize = 5;

/// 分类流水线配置
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
  /// 要求模型声明的输入高度，默认 224
  pub expected_height: usize,
  /// 要求模型声明的输入宽度，默认 224
  pub expected_width: usize,
  /// 报告的候选数量，默认 5
  pub top_k: usize,
  /// 重复推理次数，默认 5
  pub repeats: usize,
  /// 缩放采样滤波器，默认 Lanczos3
  pub filter: FilterType,
}

impl Default for ClassifyConfig {
  fn default() -> Self {
    Self {
      expected_height: CLASSIFY_INPUT_SIDE,
      expected_width: CLASSIFY_INPUT_SIDE,
      top_k: CLASSIFY_TOP_K,
      repeats: CLASSIFY_REPEATS,
      filter: FilterType::Lanczos3,
    }
  }
}

/// 单个候选类别
#[derive(Debug, Clone)]
pub struct Ranked {
  pub label: String,
  pub score: f32,
}

/// 一次分类的完整结果
#[derive(Debug, Clone)]
pub struct ClassifyReport {
  pub items: Box<[Ranked]>,
  pub times: Box<[Duration]>,
}

/// 分类流水线：构建时校验输入规格，随后预处理、重复推理并归并 Top-K。
pub struct Classifier<E> {
  engine: E,
  labels: LabelTable,
  config: ClassifyConfig,
}

impl<E: Engine> Classifier<E> {
  /// 构建分类流水线。
  /// 模型声明的输入尺寸与配置不符时立即失败，不触碰任何图像文件。
  pub fn new(engine: E, labels: LabelTable, config: ClassifyConfig) -> Result<Self, PipelineError> {
    let spec = engine.describe_input();
    if spec.height() != config.expected_height || spec.width() != config.expected_width {
      return Err(PipelineError::Configuration {
        expected_height: config.expected_height,
        expected_width: config.expected_width,
        actual_height: spec.height(),
        actual_width: spec.width(),
      });
    }

    Ok(Self {
      engine,
      labels,
      config,
    })
  }

  pub fn classify(&mut self, image: &RgbImage) -> Result<ClassifyReport, PipelineError> {
    let tensor = preprocess(image, self.engine.describe_input(), self.config.filter);

    let task = RepeatShot {
      repeats: self.config.repeats,
    };
    let (output, times) = task.run(&mut self.engine, &tensor)?;

    let items = self.rank(&output);
    debug!("Top-{} 候选: {:?}", self.config.top_k, items);

    Ok(ClassifyReport { items, times })
  }

  /// Top-K 选择，得分降序，平分顺序不保证。
  /// 量化输出除以 255 归一到 [0,1]，浮点输出原样使用。
  fn rank(&self, output: &EngineOutput) -> Box<[Ranked]> {
    let scores: Vec<f32> = match output {
      EngineOutput::UInt8 { data, .. } => data.iter().map(|&v| v as f32 / 255.0).collect(),
      EngineOutput::Float32 { data, .. } => data.to_vec(),
    };

    let mut indexed: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    indexed
      .into_iter()
      .take(self.config.top_k)
      .map(|(id, score)| Ranked {
        label: self.labels.name(id),
        score,
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::{StubEngine, TensorKind, TensorSpec};

  fn quantized_engine(side: usize, scores: &[u8]) -> StubEngine {
    StubEngine::new(
      TensorSpec::nhwc(side, side, TensorKind::UInt8),
      EngineOutput::UInt8 {
        data: scores.to_vec().into_boxed_slice(),
        shape: vec![1, scores.len()].into_boxed_slice(),
      },
    )
  }

  fn test_image() -> RgbImage {
    RgbImage::new(10, 10)
  }

  #[test]
  fn ranks_quantized_scores_against_label_table() {
    let labels = LabelTable::from_lines(["sparrow", "robin", "eagle"]);
    let config = ClassifyConfig {
      top_k: 3,
      repeats: 1,
      ..ClassifyConfig::default()
    };
    let mut classifier =
      Classifier::new(quantized_engine(224, &[51, 255, 0]), labels, config).unwrap();

    let report = classifier.classify(&test_image()).unwrap();

    assert_eq!(report.items.len(), 3);
    assert_eq!(report.items[0].label, "robin");
    assert!((report.items[0].score - 1.0).abs() < 1e-6);
    assert_eq!(report.items[1].label, "sparrow");
    assert!((report.items[1].score - 0.2).abs() < 1e-6);
    assert_eq!(report.items[2].label, "eagle");
    assert!((report.items[2].score - 0.0).abs() < 1e-6);
  }

  #[test]
  fn top_five_is_sorted_descending_and_normalized() {
    let labels = LabelTable::from_lines(["a", "b", "c", "d", "e", "f", "g"]);
    let mut classifier = Classifier::new(
      quantized_engine(224, &[10, 200, 30, 90, 250, 5, 120]),
      labels,
      ClassifyConfig::default(),
    )
    .unwrap();

    let report = classifier.classify(&test_image()).unwrap();

    assert_eq!(report.items.len(), 5);
    assert!(
      report
        .items
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score)
    );
    assert!(
      report
        .items
        .iter()
        .all(|item| (0.0..=1.0).contains(&item.score))
    );
    assert_eq!(report.times.len(), 5);
  }

  #[test]
  fn float_scores_are_reported_unchanged() {
    let engine = StubEngine::new(
      TensorSpec::nhwc(224, 224, TensorKind::Float32),
      EngineOutput::Float32 {
        data: vec![0.1, 0.8, 0.3].into_boxed_slice(),
        shape: vec![1, 3].into_boxed_slice(),
      },
    );
    let labels = LabelTable::from_lines(["a", "b", "c"]);
    let config = ClassifyConfig {
      top_k: 1,
      repeats: 1,
      ..ClassifyConfig::default()
    };
    let mut classifier = Classifier::new(engine, labels, config).unwrap();

    let report = classifier.classify(&test_image()).unwrap();

    assert_eq!(report.items[0].label, "b");
    assert!((report.items[0].score - 0.8).abs() < 1e-6);
  }

  #[test]
  fn rejects_unexpected_declared_input_shape() {
    let engine = quantized_engine(299, &[0, 0, 0]);
    let result = Classifier::new(engine, LabelTable::from_lines(["a"]), ClassifyConfig::default());

    assert!(matches!(
      result,
      Err(PipelineError::Configuration {
        expected_height: 224,
        actual_height: 299,
        ..
      })
    ));
  }

  #[test]
  fn out_of_table_class_gets_placeholder_label() {
    let labels = LabelTable::from_lines(["only"]);
    let config = ClassifyConfig {
      top_k: 2,
      repeats: 1,
      ..ClassifyConfig::default()
    };
    let mut classifier =
      Classifier::new(quantized_engine(224, &[10, 90]), labels, config).unwrap();

    let report = classifier.classify(&test_image()).unwrap();

    assert_eq!(report.items[0].label, "未知(1)");
    assert_eq!(report.items[1].label, "only");
  }
}
