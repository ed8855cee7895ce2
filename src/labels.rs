// 该文件是 Cuiniao （翠鸟） 项目的一部分。
// src/labels.rs - 标签表
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
  #[error("标签文件读取失败: {0}")]
  Io(#[from] std::io::Error),
}

/// 标签表。
/// 标签文件为纯文本，每行一个标签，行号（从 0 开始）即类别编号；
/// 加载一次后在进程生命周期内不可变。
#[derive(Debug, Clone)]
pub struct LabelTable {
  names: Box<[String]>,
}

impl LabelTable {
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LabelError> {
    let text = std::fs::read_to_string(path)?;
    Ok(Self::from_lines(text.lines()))
  }

  pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
    let names: Box<[String]> = lines
      .into_iter()
      .map(|line| line.trim().to_string())
      .collect();
    Self { names }
  }

  pub fn get(&self, id: usize) -> Option<&str> {
    self.names.get(id).map(String::as_str)
  }

  /// 类别名称；超出标签表范围时返回占位名称
  pub fn name(&self, id: usize) -> String {
    self
      .get(id)
      .map(str::to_string)
      .unwrap_or_else(|| format!("未知({})", id))
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}
