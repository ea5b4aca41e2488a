use std::path::PathBuf;

use plan3d_engine::errors::EngineError;
use plan3d_io::IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("加载平面图失败: {0}")]
    Io(#[from] IoError),
    #[error("构建场景失败: {0}")]
    Engine(#[from] EngineError),
    #[error("未在搜索目录中找到平面图 {0:?}")]
    PlanNotFound(PathBuf),
    #[error("序列化场景失败: {0}")]
    Export(#[from] serde_json::Error),
    #[error("写入 {path:?} 失败: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
