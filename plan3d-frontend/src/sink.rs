//! 场景呈现接口：把装配结果按顺序交给渲染端。

use std::fs;
use std::path::Path;

use plan3d_core::mesh::{GeometryShape, MeshDescriptor};
use plan3d_engine::assembler::{BuildReport, SkipReason, SkippedPrimitive};
use tracing::debug;

use crate::errors::FrontendError;

/// 渲染端的“添加图元到场景”调用。
pub trait SceneSink {
    fn add_mesh(&mut self, mesh: &MeshDescriptor);

    /// 被跳过的图元诊断，默认忽略。
    fn skipped(&mut self, _skipped: &SkippedPrimitive) {}
}

/// 按源顺序把网格与诊断交给接收端，返回交付的网格数量。
pub fn present(report: &BuildReport, sink: &mut dyn SceneSink) -> usize {
    for mesh in &report.meshes {
        sink.add_mesh(mesh);
    }
    for skipped in &report.skipped {
        sink.skipped(skipped);
    }
    debug!(
        meshes = report.meshes.len(),
        skipped = report.skipped.len(),
        "场景已交付"
    );
    report.meshes.len()
}

/// 控制台概览：每个网格一行。
#[derive(Debug, Default)]
pub struct SummarySink {
    lines: Vec<String>,
    skipped: Vec<String>,
}

impl SummarySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn skipped_lines(&self) -> &[String] {
        &self.skipped
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines.iter().chain(&self.skipped) {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl SceneSink for SummarySink {
    fn add_mesh(&mut self, mesh: &MeshDescriptor) {
        let position = mesh.transform.position;
        let shape = match &mesh.geometry.shape {
            GeometryShape::Outline { points } => format!("轮廓 {} 点", points.len()),
            GeometryShape::Box {
                width,
                height,
                depth,
            } => format!("长方体 {width:.1}×{height:.1}×{depth:.1}"),
        };
        let outline = mesh
            .outline
            .as_ref()
            .map(|outline| format!(", 轮廓线 {} 段", outline.segments.len()))
            .unwrap_or_default();
        self.lines.push(format!(
            "  - #{} {:<6} [{}:{}] {}, 位置=({:.2}, {:.2}, {:.2}), 颜色={}{}",
            self.lines.len(),
            mesh.kind.label(),
            mesh.source.entry,
            mesh.source.object,
            shape,
            position.x,
            position.y,
            position.z,
            mesh.material.color.as_str(),
            outline
        ));
    }

    fn skipped(&mut self, skipped: &SkippedPrimitive) {
        let reason = match &skipped.reason {
            SkipReason::InvalidFields(message) => format!("字段无效: {message}"),
            SkipReason::MissingPoints => "缺少 points".to_string(),
            SkipReason::TooFewPoints(count) => format!("仅有 {count} 个点"),
        };
        self.skipped.push(format!(
            "  ! 跳过 [{}:{}]: {}",
            skipped.source.entry, skipped.source.object, reason
        ));
    }
}

/// 收集网格描述并导出为 JSON 数组。
#[derive(Debug, Default)]
pub struct JsonExportSink {
    meshes: Vec<MeshDescriptor>,
}

impl JsonExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn to_json(&self) -> Result<String, FrontendError> {
        Ok(serde_json::to_string_pretty(&self.meshes)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), FrontendError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| FrontendError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SceneSink for JsonExportSink {
    fn add_mesh(&mut self, mesh: &MeshDescriptor) {
        self.meshes.push(mesh.clone());
    }
}
