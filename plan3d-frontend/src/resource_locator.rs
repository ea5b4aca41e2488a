use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use plan3d_config::AppConfig;
use tracing::{debug, trace};

pub const PLAN_ROOTS_ENV: &str = "PLAN3D_PLAN_ROOTS";

/// 在若干搜索目录中定位平面图文件。
#[derive(Debug, Clone, Default)]
pub struct PlanLocator {
    search_roots: Vec<PathBuf>,
}

impl PlanLocator {
    /// 搜索顺序：当前目录、配置中的 `plan_roots`、环境变量 `PLAN3D_PLAN_ROOTS`。
    pub fn from_config(config: &AppConfig) -> Self {
        let base_dir = env::current_dir().ok();
        let env_paths = env::var_os(PLAN_ROOTS_ENV);
        Self::from_parts(
            base_dir.as_deref(),
            &config.resources.plan_roots,
            env_paths.as_deref(),
        )
    }

    pub fn from_parts(
        base_dir: Option<&Path>,
        configured: &[PathBuf],
        env_paths: Option<&OsStr>,
    ) -> Self {
        let mut roots: Vec<PathBuf> = Vec::new();

        if let Some(dir) = base_dir {
            roots.push(dir.to_path_buf());
        }

        roots.extend(configured.iter().cloned().filter(|path| path.is_dir()));

        if let Some(env_paths) = env_paths {
            roots.extend(env::split_paths(env_paths).filter(|path| path.is_dir()));
        }

        // 去重，保持靠前优先级。
        let mut deduped: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !deduped.iter().any(|existing| existing == &root) {
                deduped.push(root);
            }
        }

        PlanLocator {
            search_roots: deduped,
        }
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    pub fn resolve(&self, path: &Path) -> Option<PathBuf> {
        if path.is_absolute() {
            if path.is_file() {
                return Some(Self::canonicalize_or_clone(path));
            }
            debug!(path = %path.display(), "平面图路径为绝对路径但未找到对应文件");
            return None;
        }

        for root in &self.search_roots {
            let candidate = root.join(path);
            trace!(candidate = %candidate.display(), "plan locator candidate");
            if candidate.is_file() {
                return Some(Self::canonicalize_or_clone(&candidate));
            }
        }
        None
    }

    fn canonicalize_or_clone(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn resolves_relative_paths_in_priority_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("flat.json"), "{}").unwrap();
        fs::write(first.path().join("shared.json"), "{}").unwrap();
        fs::write(second.path().join("shared.json"), "{}").unwrap();

        let joined = env::join_paths([second.path()]).unwrap();
        let locator = PlanLocator::from_parts(
            Some(first.path()),
            &[second.path().to_path_buf(), first.path().to_path_buf()],
            Some(joined.as_os_str()),
        );
        assert_eq!(locator.search_roots().len(), 2);

        let flat = locator.resolve(Path::new("flat.json")).expect("flat");
        assert!(flat.ends_with("flat.json"));
        assert!(flat.starts_with(second.path().canonicalize().unwrap()));

        let shared = locator.resolve(Path::new("shared.json")).expect("shared");
        assert!(shared.starts_with(first.path().canonicalize().unwrap()));

        assert!(locator.resolve(Path::new("missing.json")).is_none());
    }

    #[test]
    fn absolute_paths_bypass_roots() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plan.json");
        fs::write(&file, "{}").unwrap();

        let locator = PlanLocator::default();
        assert!(locator.resolve(&file).is_some());
        assert!(locator.resolve(&dir.path().join("absent.json")).is_none());
    }

    #[test]
    fn missing_configured_roots_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let locator =
            PlanLocator::from_parts(None, &[dir.path().join("does-not-exist")], None);
        assert!(locator.search_roots().is_empty());
    }
}
