use std::collections::HashMap;

use crate::session::PlanSession;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

pub struct CommandContext<'a> {
    pub session: &'a mut PlanSession,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(SelectPresetCommand);
        bus.register(RebuildCommand);
        bus.register(ListPresetsCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    /// 已注册命令名，按字母序排列。
    pub fn available_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

struct SelectPresetCommand;

impl CommandHandler for SelectPresetCommand {
    fn name(&self) -> &'static str {
        "select_preset"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let Some(name) = request.args.first() else {
            return CommandResponse::err("select_preset 需要提供预设名称");
        };
        match context.session.select_preset(name) {
            Ok(()) => CommandResponse::ok(format!("已切换到预设 {name}")),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct RebuildCommand;

impl CommandHandler for RebuildCommand {
    fn name(&self) -> &'static str {
        "rebuild"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.session.invalidate();
        match context.session.meshes() {
            Ok(report) => CommandResponse::ok(format!(
                "重新构建完成：{} 个网格，跳过 {} 个图元",
                report.len(),
                report.skipped.len()
            )),
            Err(err) => CommandResponse::err(err.to_string()),
        }
    }
}

struct ListPresetsCommand;

impl CommandHandler for ListPresetsCommand {
    fn name(&self) -> &'static str {
        "list_presets"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let names: Vec<&str> = context.session.preset_names().collect();
        if names.is_empty() {
            CommandResponse::ok("尚未注册任何预设")
        } else {
            CommandResponse::ok(names.join(", "))
        }
    }
}
