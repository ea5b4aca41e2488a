pub mod cli;
pub mod errors;
pub mod loader;
pub mod resource_locator;
pub mod sink;

use std::path::Path;

use errors::FrontendError;
use loader::{LoadRequest, load_scene};
use plan3d_config::AppConfig;
use sink::{JsonExportSink, present};
use tracing::info;

/// 启动控制台概览前端。
pub fn run_summary(request: &LoadRequest, config: &AppConfig) -> Result<(), FrontendError> {
    info!("启动 CLI 概览前端");
    let loaded = load_scene(request, config)?;
    cli::run_summary(loaded)
}

/// 构建场景并导出 JSON；未指定输出路径时写到标准输出。
pub fn run_json_export(
    request: &LoadRequest,
    config: &AppConfig,
    output: Option<&Path>,
) -> Result<(), FrontendError> {
    let mut loaded = load_scene(request, config)?;
    let report = loaded.session.meshes()?;
    let mut sink = JsonExportSink::new();
    present(report, &mut sink);

    match output {
        Some(path) => {
            sink.write_to(path)?;
            info!(path = %path.display(), meshes = sink.len(), "已导出场景 JSON");
        }
        None => println!("{}", sink.to_json()?),
    }
    Ok(())
}
