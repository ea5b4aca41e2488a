pub mod assembler;
pub mod builders;
pub mod command;
pub mod style;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("no floor plan is loaded")]
        NoActivePlan,
        #[error("preset {0:?} not found")]
        PresetNotFound(String),
        #[error("{count} primitive(s) were skipped as malformed")]
        MalformedPrimitives { count: usize },
    }
}

pub mod session {
    use plan3d_core::plan::FloorPlan;
    use plan3d_core::settings::BuildSettings;
    use tracing::{debug, info};

    use crate::assembler::{BuildReport, PlanRevision, SceneCache};
    use crate::errors::EngineError;

    /// 当前激活的平面图及其来源。
    #[derive(Debug, Clone)]
    pub struct ActivePlan {
        pub preset: Option<String>,
        pub plan: FloorPlan,
    }

    /// 会话负责维护预设数据集、当前平面图、版本号与装配缓存。
    ///
    /// 每次替换平面图都会递增版本号，缓存随之整体失效；
    /// 同一版本的重复访问直接返回上一次的结果。
    #[derive(Debug)]
    pub struct PlanSession {
        presets: Vec<(String, FloorPlan)>,
        active: Option<ActivePlan>,
        revision: PlanRevision,
        settings: BuildSettings,
        cache: SceneCache,
    }

    impl PlanSession {
        pub fn new(settings: BuildSettings) -> Self {
            Self {
                presets: Vec::new(),
                active: None,
                revision: PlanRevision::default(),
                settings,
                cache: SceneCache::new(),
            }
        }

        /// 注册命名数据集。同名预设会被替换。
        pub fn register_preset(&mut self, name: impl Into<String>, plan: FloorPlan) {
            let name = name.into();
            if let Some(slot) = self.presets.iter_mut().find(|(existing, _)| *existing == name) {
                slot.1 = plan;
            } else {
                self.presets.push((name, plan));
            }
        }

        pub fn preset_names(&self) -> impl Iterator<Item = &str> + '_ {
            self.presets.iter().map(|(name, _)| name.as_str())
        }

        /// 切换到指定预设，并递增版本号。
        pub fn select_preset(&mut self, name: &str) -> Result<(), EngineError> {
            let plan = self
                .presets
                .iter()
                .find(|(existing, _)| existing == name)
                .map(|(_, plan)| plan.clone())
                .ok_or_else(|| EngineError::PresetNotFound(name.to_string()))?;
            self.replace_active(ActivePlan {
                preset: Some(name.to_string()),
                plan,
            });
            info!(preset = name, revision = self.revision.get(), "已切换预设数据集");
            Ok(())
        }

        /// 载入外部平面图，替换当前数据集。
        pub fn load_plan(&mut self, plan: FloorPlan) {
            self.replace_active(ActivePlan { preset: None, plan });
            debug!(revision = self.revision.get(), "已载入平面图");
        }

        fn replace_active(&mut self, active: ActivePlan) {
            self.active = Some(active);
            self.revision = self.revision.next();
        }

        #[inline]
        pub fn active(&self) -> Option<&ActivePlan> {
            self.active.as_ref()
        }

        #[inline]
        pub fn revision(&self) -> PlanRevision {
            self.revision
        }

        #[inline]
        pub fn settings(&self) -> &BuildSettings {
            &self.settings
        }

        pub fn set_settings(&mut self, settings: BuildSettings) {
            self.settings = settings;
        }

        /// 返回当前平面图的装配结果，必要时重新构建。
        pub fn meshes(&mut self) -> Result<&BuildReport, EngineError> {
            let active = self.active.as_ref().ok_or(EngineError::NoActivePlan)?;
            Ok(self
                .cache
                .get_or_build(self.revision, &active.plan, &self.settings))
        }

        /// 丢弃缓存，下一次访问强制重建。
        pub fn invalidate(&mut self) {
            self.cache.invalidate();
        }

        #[inline]
        pub fn build_count(&self) -> u64 {
            self.cache.build_count()
        }
    }

    impl Default for PlanSession {
        fn default() -> Self {
            Self::new(BuildSettings::default())
        }
    }

    #[cfg(test)]
    mod tests {
        use plan3d_core::mesh::MeshKind;
        use plan3d_core::settings::BuildProfile;

        use super::*;

        fn session_with_presets() -> PlanSession {
            let mut session = PlanSession::default();
            for (name, plan) in plan3d_io::presets::builtin_presets().expect("presets") {
                session.register_preset(name, plan);
            }
            session
        }

        #[test]
        fn meshes_require_an_active_plan() {
            let mut session = PlanSession::default();
            assert!(matches!(session.meshes(), Err(EngineError::NoActivePlan)));
        }

        #[test]
        fn selecting_presets_bumps_revision_and_rebuilds() {
            let mut session = session_with_presets();
            let names: Vec<&str> = session.preset_names().collect();
            assert_eq!(names, vec!["studio", "studio-openings"]);

            session.select_preset("studio").expect("select studio");
            assert_eq!(session.revision().get(), 1);
            let report = session.meshes().expect("build studio");
            assert_eq!(report.count(MeshKind::Floor), 1);
            assert_eq!(report.count(MeshKind::Wall), 4);
            session.meshes().expect("cached");
            assert_eq!(session.build_count(), 1);

            session
                .select_preset("studio-openings")
                .expect("select openings");
            assert_eq!(session.revision().get(), 2);
            let report = session.meshes().expect("build openings");
            assert_eq!(report.count(MeshKind::Wall), 6);
            assert_eq!(report.count(MeshKind::Door), 1);
            assert_eq!(report.count(MeshKind::Window), 1);
            assert_eq!(session.build_count(), 2);
            assert_eq!(
                session.active().and_then(|a| a.preset.as_deref()),
                Some("studio-openings")
            );
        }

        #[test]
        fn unknown_preset_keeps_current_plan() {
            let mut session = session_with_presets();
            session.select_preset("studio").expect("select studio");
            let err = session.select_preset("loft").unwrap_err();
            assert!(matches!(err, EngineError::PresetNotFound(name) if name == "loft"));
            assert_eq!(session.revision().get(), 1);
            assert_eq!(
                session.active().and_then(|a| a.preset.as_deref()),
                Some("studio")
            );
        }

        #[test]
        fn settings_change_and_invalidate_trigger_rebuild() {
            let mut session = session_with_presets();
            session.load_plan(
                plan3d_io::presets::load_builtin("studio-openings").expect("preset"),
            );
            assert!(session.active().expect("active").preset.is_none());
            assert_eq!(session.meshes().expect("styled").len(), 9);

            session.set_settings(BuildSettings::plain());
            assert_eq!(session.settings().profile, BuildProfile::Plain);
            assert_eq!(session.meshes().expect("plain").len(), 7);
            assert_eq!(session.build_count(), 2);

            session.invalidate();
            session.meshes().expect("rebuild");
            assert_eq!(session.build_count(), 3);
        }

        #[test]
        fn register_preset_replaces_same_name() {
            let mut session = PlanSession::default();
            session.register_preset("a", FloorPlan::new("1"));
            session.register_preset("a", FloorPlan::new("2"));
            assert_eq!(session.preset_names().count(), 1);
            session.select_preset("a").expect("select");
            assert_eq!(session.active().expect("active").plan.version, "2");
        }
    }
}
