use plan3d_engine::command::{CommandBus, CommandContext, CommandRequest};
use tracing::{info, warn};

use crate::errors::FrontendError;
use crate::loader::{LoadedScene, PlanSource};
use crate::sink::{SummarySink, present};

/// 控制台概览：打印平面图来源、可用命令与每个网格的摘要。
pub fn run_summary(loaded: LoadedScene) -> Result<(), FrontendError> {
    let LoadedScene {
        mut session,
        source,
    } = loaded;
    let command_bus = CommandBus::new();
    let mut context = CommandContext {
        session: &mut session,
    };

    let presets = command_bus.dispatch(&CommandRequest::new("list_presets"), &mut context);
    if !presets.success {
        warn!(message = ?presets.message, "CLI 命令执行失败");
    }

    let report = context.session.meshes()?;
    let mut sink = SummarySink::new();
    let delivered = present(report, &mut sink);
    info!(meshes = delivered, skipped = report.skipped.len(), "CLI 场景统计");

    println!("plan3d 场景概览");
    match &source {
        PlanSource::File(path) => println!("已从 JSON 加载平面图：{}", path.display()),
        PlanSource::Preset(name) => println!("使用内置预设：{name}"),
    }
    if let Some(names) = &presets.message {
        println!("内置预设: {names}");
    }
    println!(
        "支持的命令: {}",
        command_bus.available_commands().join(", ")
    );
    if let Some(bounds) = context
        .session
        .active()
        .and_then(|active| active.plan.bounds())
    {
        let size = bounds.size();
        println!(
            "平面范围：({:.1}, {:.1}) - ({:.1}, {:.1})，尺寸 {:.1}×{:.1}",
            bounds.min().x(),
            bounds.min().y(),
            bounds.max().x(),
            bounds.max().y(),
            size.x(),
            size.y()
        );
    }
    println!(
        "构建参数：{:?} 方案，墙高 {}",
        context.session.settings().profile,
        context.session.settings().wall_height
    );
    println!("网格列表：");
    print!("{}", sink.render());
    Ok(())
}
