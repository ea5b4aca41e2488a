use std::path::PathBuf;

use plan3d_config::{AppConfig, ConfigError, FrontendMode};
use plan3d_frontend::loader::LoadRequest;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut override_mode: Option<FrontendMode> = None;
    let mut config_override: Option<PathBuf> = None;
    let mut request = LoadRequest::default();
    let mut plain = false;
    let mut output: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--summary" => override_mode = Some(FrontendMode::Summary),
            "--json" => override_mode = Some(FrontendMode::Json),
            "--plain" => plain = true,
            "--config" => config_override = Some(PathBuf::from(require_value(&mut args, "--config"))),
            "--plan" => request.plan = Some(PathBuf::from(require_value(&mut args, "--plan"))),
            "--preset" => request.preset = Some(require_value(&mut args, "--preset")),
            "--output" => output = Some(PathBuf::from(require_value(&mut args, "--output"))),
            other => {
                eprintln!("未知参数：{other}");
                std::process::exit(1);
            }
        }
    }

    let mut config = load_configuration(config_override);
    init_logging(&config);
    info!("启动 plan3d");

    if plain {
        config.build = config.build.with_plain_profile();
    }

    let mode = override_mode.unwrap_or(config.frontend.default_mode);
    let result = match mode {
        FrontendMode::Summary => {
            info!("以概览模式启动");
            plan3d_frontend::run_summary(&request, &config)
        }
        FrontendMode::Json => {
            info!("以 JSON 导出模式启动");
            plan3d_frontend::run_json_export(&request, &config, output.as_deref())
        }
    };
    if let Err(err) = result {
        error!(error = %err, "执行失败");
        std::process::exit(1);
    }
}

fn require_value(args: &mut impl Iterator<Item = String>, flag: &str) -> String {
    match args.next() {
        Some(value) => value,
        None => {
            eprintln!("`{flag}` 需要提供参数值");
            std::process::exit(1);
        }
    }
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
                    }
                    ConfigError::Context { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
