//! 内置平面图样例，供 CLI 演示与切换数据集使用。

use plan3d_core::plan::FloorPlan;

use crate::{IoError, parse_plan_str};

pub const STUDIO: &str = "studio";
pub const STUDIO_OPENINGS: &str = "studio-openings";

const STUDIO_JSON: &str = include_str!("../assets/studio.json");
const STUDIO_OPENINGS_JSON: &str = include_str!("../assets/studio_openings.json");

/// 内置样例的名称，按注册顺序排列。
pub fn builtin_names() -> [&'static str; 2] {
    [STUDIO, STUDIO_OPENINGS]
}

/// 解析指定名称的内置样例。
pub fn load_builtin(name: &str) -> Result<FloorPlan, IoError> {
    let source = match name {
        STUDIO => STUDIO_JSON,
        STUDIO_OPENINGS => STUDIO_OPENINGS_JSON,
        other => {
            return Err(IoError::InvalidDocument(format!("未知的内置样例: {other}")));
        }
    };
    parse_plan_str(source)
}

/// 解析全部内置样例。
pub fn builtin_presets() -> Result<Vec<(&'static str, FloorPlan)>, IoError> {
    builtin_names()
        .into_iter()
        .map(|name| load_builtin(name).map(|plan| (name, plan)))
        .collect()
}
