use std::env;
use std::path::{Path, PathBuf};

use plan3d_config::AppConfig;
use plan3d_engine::session::PlanSession;
use plan3d_io::{JsonPlanLoader, PlanLoader, presets};
use tracing::{info, warn};

use crate::errors::FrontendError;
use crate::resource_locator::PlanLocator;

pub const PLAN_ENV: &str = "PLAN3D_PLAN";

/// 平面图来源，便于前端呈现加载信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    File(PathBuf),
    Preset(String),
}

/// 命令行给出的加载意图。
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    pub plan: Option<PathBuf>,
    pub preset: Option<String>,
}

/// 统一封装加载后的会话与来源信息。
#[derive(Debug)]
pub struct LoadedScene {
    pub session: PlanSession,
    pub source: PlanSource,
}

/// 按 `--plan`、`--preset`、环境变量 `PLAN3D_PLAN`、配置中的默认预设依次尝试。
///
/// 显式给出的路径或预设失败时直接报错；环境变量指定的文件失败时回退到默认预设。
pub fn load_scene(request: &LoadRequest, config: &AppConfig) -> Result<LoadedScene, FrontendError> {
    let mut session = PlanSession::new(config.build.clone());
    for (name, plan) in presets::builtin_presets()? {
        session.register_preset(name, plan);
    }
    let locator = PlanLocator::from_config(config);

    if let Some(path) = &request.plan {
        let resolved = load_into(&mut session, &locator, path)?;
        return Ok(LoadedScene {
            session,
            source: PlanSource::File(resolved),
        });
    }

    if let Some(name) = &request.preset {
        session.select_preset(name)?;
        return Ok(LoadedScene {
            session,
            source: PlanSource::Preset(name.clone()),
        });
    }

    if let Some(path) = env::var_os(PLAN_ENV) {
        let path = PathBuf::from(path);
        match load_into(&mut session, &locator, &path) {
            Ok(resolved) => {
                return Ok(LoadedScene {
                    session,
                    source: PlanSource::File(resolved),
                });
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载平面图失败，回退到内置预设");
            }
        }
    }

    let name = config.frontend.default_preset.clone();
    session.select_preset(&name)?;
    Ok(LoadedScene {
        session,
        source: PlanSource::Preset(name),
    })
}

fn load_into(
    session: &mut PlanSession,
    locator: &PlanLocator,
    path: &Path,
) -> Result<PathBuf, FrontendError> {
    let resolved = locator
        .resolve(path)
        .ok_or_else(|| FrontendError::PlanNotFound(path.to_path_buf()))?;
    let plan = JsonPlanLoader::new().load(&resolved)?;
    info!(path = %resolved.display(), objects = plan.object_count(), "从 JSON 加载平面图成功");
    session.load_plan(plan);
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use plan3d_core::mesh::MeshKind;
    use plan3d_core::settings::{BuildProfile, BuildSettings};
    use plan3d_engine::errors::EngineError;

    use super::*;

    const TWO_SHAPES: &str = r#"{
        "version": "5.3.0",
        "objects": [{ "type": "group", "objects": [
            { "type": "polygon", "points": [{"x":0,"y":0},{"x":100,"y":0},{"x":0,"y":100}] },
            { "type": "polygon", "points": [{"x":0,"y":0},{"x":100,"y":0}], "strokeWidth": 8 }
        ]}]
    }"#;

    #[test]
    fn explicit_preset_is_selected() {
        let request = LoadRequest {
            plan: None,
            preset: Some("studio".to_string()),
        };
        let mut loaded = load_scene(&request, &AppConfig::default()).expect("load");
        assert_eq!(loaded.source, PlanSource::Preset("studio".to_string()));
        assert_eq!(loaded.session.meshes().expect("build").len(), 5);
    }

    #[test]
    fn explicit_plan_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("two.json");
        fs::write(&file, TWO_SHAPES).unwrap();

        let request = LoadRequest {
            plan: Some(file),
            preset: Some("studio".to_string()),
        };
        let mut loaded = load_scene(&request, &AppConfig::default()).expect("load");
        assert!(matches!(loaded.source, PlanSource::File(ref path) if path.ends_with("two.json")));
        let report = loaded.session.meshes().expect("build");
        assert_eq!(report.count(MeshKind::Floor), 1);
        assert_eq!(report.count(MeshKind::Wall), 1);
    }

    #[test]
    fn configured_build_settings_reach_the_session() {
        let mut config = AppConfig::default();
        config.build = BuildSettings::default().with_plain_profile();
        let request = LoadRequest {
            plan: None,
            preset: Some("studio-openings".to_string()),
        };
        let mut loaded = load_scene(&request, &config).expect("load");
        assert_eq!(loaded.session.settings().profile, BuildProfile::Plain);
        let report = loaded.session.meshes().expect("build");
        assert_eq!(report.count(MeshKind::Door), 0);
        assert_eq!(report.count(MeshKind::Window), 0);
    }

    #[test]
    fn explicit_failures_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let request = LoadRequest {
            plan: Some(dir.path().join("absent.json")),
            preset: None,
        };
        let err = load_scene(&request, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, FrontendError::PlanNotFound(_)));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ \"objects\": [").unwrap();
        let request = LoadRequest {
            plan: Some(broken),
            preset: None,
        };
        let err = load_scene(&request, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, FrontendError::Io(_)));

        let request = LoadRequest {
            plan: None,
            preset: Some("attic".to_string()),
        };
        let err = load_scene(&request, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FrontendError::Engine(EngineError::PresetNotFound(_))
        ));
    }
}
