use std::fs;
use std::path::Path;

use plan3d_core::{
    color::Color,
    geometry::Point2,
    plan::{EntryKind, FloorPlan, ObjectKind, PlanEntry, PlanObject, Role, Style},
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod presets;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document structure: {0}")]
    InvalidDocument(String),
}

/// 平面图只读加载接口，不提供对应的写出器。
pub trait PlanLoader {
    fn load(&self, path: &Path) -> Result<FloorPlan, IoError>;
}

/// 解析画布导出格式的 JSON 平面图。
#[derive(Debug, Default)]
pub struct JsonPlanLoader;

impl JsonPlanLoader {
    pub fn new() -> Self {
        Self
    }
}

impl PlanLoader for JsonPlanLoader {
    fn load(&self, path: &Path) -> Result<FloorPlan, IoError> {
        let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let plan = parse_plan_str(&data)?;
        debug!(
            path = %path.display(),
            entries = plan.entries.len(),
            objects = plan.object_count(),
            "已读取平面图"
        );
        Ok(plan)
    }
}

/// 从 JSON 文本解析平面图。
///
/// 只有 JSON 语法错误或顶层结构不符时返回 [`IoError::InvalidDocument`]。
/// 单个多边形字段类型不符时保留诊断信息，由装配阶段跳过；
/// 未知的条目/对象类型会保留为 `Other`，由装配阶段忽略。
pub fn parse_plan_str(source: &str) -> Result<FloorPlan, IoError> {
    let raw: RawDocument = serde_json::from_str(source)
        .map_err(|err| IoError::InvalidDocument(format!("JSON 解析失败: {err}")))?;

    let mut plan = FloorPlan::new(raw.version.unwrap_or_default());
    for (entry_index, entry) in raw.objects.into_iter().enumerate() {
        plan.entries.push(convert_entry(entry_index, entry));
    }
    Ok(plan)
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    objects: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPolygon {
    #[serde(default)]
    points: Option<Vec<RawPoint>>,
    #[serde(default)]
    fill: Option<Value>,
    #[serde(default)]
    stroke: Option<Value>,
    #[serde(default = "default_one", alias = "outlineWidth")]
    stroke_width: f64,
    #[serde(default)]
    thickness: Option<f64>,
    #[serde(default = "default_one")]
    opacity: f64,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    shadow: Option<Value>,
    #[serde(default = "default_one")]
    scale_x: f64,
    #[serde(default = "default_one")]
    scale_y: f64,
    #[serde(default)]
    angle: f64,
    #[serde(default)]
    skew_x: f64,
    #[serde(default)]
    skew_y: f64,
    #[serde(default)]
    flip_x: bool,
    #[serde(default)]
    flip_y: bool,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    id: Option<Value>,
}

fn default_one() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn type_tag(value: &Value) -> &str {
    value.get("type").and_then(Value::as_str).unwrap_or_default()
}

fn convert_entry(entry_index: usize, value: Value) -> PlanEntry {
    let kind = EntryKind::from_tag(type_tag(&value));
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string);

    if kind != EntryKind::Group {
        return PlanEntry {
            kind,
            name,
            objects: Vec::new(),
        };
    }

    let children = match value.get("objects") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            debug!(entry_index, objects = %other, "group 的 objects 不是数组，按空 group 处理");
            Vec::new()
        }
    };

    let objects = children
        .into_iter()
        .enumerate()
        .map(|(object_index, child)| convert_object(entry_index, object_index, child))
        .collect();
    PlanEntry {
        kind,
        name,
        objects,
    }
}

fn convert_object(entry_index: usize, object_index: usize, value: Value) -> PlanObject {
    let kind = ObjectKind::from_tag(type_tag(&value));
    if kind != ObjectKind::Polygon {
        // 非多边形对象只保留类型与 ID，不解析其余字段。
        return bare_object(kind, &value, None);
    }

    let raw: RawPolygon = match RawPolygon::deserialize(&value) {
        Ok(raw) => raw,
        Err(err) => {
            debug!(entry_index, object_index, error = %err, "polygon 字段无效，装配时跳过");
            return bare_object(kind, &value, Some(err.to_string()));
        }
    };

    let role = raw.role.as_deref().and_then(|tag| {
        let role = Role::from_tag(tag);
        if role.is_none() {
            debug!(entry_index, object_index, role = tag, "忽略未知的 role 取值");
        }
        role
    });

    let style = Style {
        fill: raw
            .fill
            .as_ref()
            .and_then(color_value)
            .unwrap_or_else(|| Style::default().fill),
        stroke: raw.stroke.as_ref().and_then(color_value),
        outline_width: raw.stroke_width,
        opacity: raw.opacity,
        visible: raw.visible,
        shadow: raw.shadow.as_ref().is_some_and(shadow_flag),
        scale_x: raw.scale_x,
        scale_y: raw.scale_y,
        angle: raw.angle,
        skew_x: raw.skew_x,
        skew_y: raw.skew_y,
        flip_x: raw.flip_x,
        flip_y: raw.flip_y,
    };

    PlanObject {
        kind,
        points: raw
            .points
            .map(|points| points.into_iter().map(|p| Point2::new(p.x, p.y)).collect()),
        thickness: raw.thickness.unwrap_or(raw.stroke_width),
        style,
        role,
        id: raw.id.as_ref().and_then(id_text),
        invalid: None,
    }
}

fn bare_object(kind: ObjectKind, value: &Value, invalid: Option<String>) -> PlanObject {
    let style = Style::default();
    PlanObject {
        kind,
        points: None,
        thickness: style.outline_width,
        style,
        role: None,
        id: value.get("id").and_then(id_text),
        invalid,
    }
}

/// 仅非空字符串形式的颜色有效；渐变、图案等对象回退为缺省。
fn color_value(value: &Value) -> Option<Color> {
    value.as_str().filter(|text| !text.is_empty()).map(Color::new)
}

/// 阴影可能是布尔值，也可能是完整的阴影对象（视为开启）。
fn shadow_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Object(_) => true,
        _ => false,
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
