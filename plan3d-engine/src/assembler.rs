//! 平面图解析与场景装配：单遍遍历 group/对象层级，输出有序网格列表。

use plan3d_core::geometry::Point2;
use plan3d_core::mesh::{Material, MeshDescriptor, MeshKind, Side, SourceRef};
use plan3d_core::plan::{FloorPlan, ObjectKind, PlanObject, Role, Style};
use plan3d_core::settings::{BuildProfile, BuildSettings};
use tracing::{debug, trace};

use crate::builders::{WallSegment, marker_mesh, shape_geometry, wall_geometry};
use crate::errors::EngineError;
use crate::style::{
    bake_shear, floor_shadows, floor_transform, outline_for, wall_shadows, wall_transform,
};

/// 按点数对多边形分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Floor,
    Wall,
    Drop,
}

impl Classification {
    #[inline]
    pub fn from_point_count(count: usize) -> Self {
        match count {
            0 | 1 => Classification::Drop,
            2 => Classification::Wall,
            _ => Classification::Floor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 字段类型不符，载入时已记录诊断。
    InvalidFields(String),
    MissingPoints,
    TooFewPoints(usize),
}

/// 被跳过的图元诊断信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPrimitive {
    pub source: SourceRef,
    pub reason: SkipReason,
}

/// 一次装配的结果：成功构建的网格与被跳过的图元。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub meshes: Vec<MeshDescriptor>,
    pub skipped: Vec<SkippedPrimitive>,
}

impl BuildReport {
    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn count(&self, kind: MeshKind) -> usize {
        self.meshes.iter().filter(|mesh| mesh.kind == kind).count()
    }

    /// 严格模式：存在被跳过的图元时返回错误。
    pub fn into_strict(self) -> Result<Vec<MeshDescriptor>, EngineError> {
        if self.skipped.is_empty() {
            Ok(self.meshes)
        } else {
            Err(EngineError::MalformedPrimitives {
                count: self.skipped.len(),
            })
        }
    }
}

/// 遍历平面图并生成网格描述。
///
/// 只处理 group 条目中的 polygon；点数不足的图元被跳过并记入诊断，
/// 其余类型直接忽略。门窗标记总在其所属墙体/地面之后追加。
pub fn assemble(plan: &FloorPlan, settings: &BuildSettings) -> BuildReport {
    let mut report = BuildReport::default();
    let plain_style = plain_style(settings);

    for (entry_index, entry) in plan.groups() {
        for (object_index, object) in entry.objects.iter().enumerate() {
            if object.kind != ObjectKind::Polygon {
                trace!(entry_index, object_index, kind = ?object.kind, "忽略非多边形对象");
                continue;
            }

            let source = SourceRef {
                entry: entry_index,
                object: object_index,
                id: object.id.clone(),
            };

            if let Some(message) = &object.invalid {
                debug!(entry_index, object_index, error = %message, "多边形字段无效，跳过");
                report.skipped.push(SkippedPrimitive {
                    source,
                    reason: SkipReason::InvalidFields(message.clone()),
                });
                continue;
            }

            let Some(points) = object.points.as_deref() else {
                debug!(entry_index, object_index, "多边形缺少 points，跳过");
                report.skipped.push(SkippedPrimitive {
                    source,
                    reason: SkipReason::MissingPoints,
                });
                continue;
            };

            let (style, thickness) = match settings.profile {
                BuildProfile::Styled => (&object.style, object.thickness),
                BuildProfile::Plain => (&plain_style, settings.plain_wall_thickness),
            };

            let mesh = match Classification::from_point_count(points.len()) {
                Classification::Drop => {
                    debug!(entry_index, object_index, points = points.len(), "点数不足，跳过");
                    report.skipped.push(SkippedPrimitive {
                        source,
                        reason: SkipReason::TooFewPoints(points.len()),
                    });
                    continue;
                }
                Classification::Floor => floor_mesh(points, style, settings, source.clone()),
                Classification::Wall => {
                    let segment = WallSegment::new(points[0], points[1]);
                    wall_mesh(&segment, style, thickness, settings, source.clone())
                }
            };
            report.meshes.push(mesh);

            if settings.profile == BuildProfile::Styled {
                if let Some(marker) = marker_for(object, points, settings, source) {
                    report.meshes.push(marker);
                }
            }
        }
    }

    debug!(
        meshes = report.meshes.len(),
        skipped = report.skipped.len(),
        "平面图装配完成"
    );
    report
}

/// 显式 `role` 优先，否则按旧数据集 ID 推断。
pub fn resolve_role(object: &PlanObject, settings: &BuildSettings) -> Option<Role> {
    object.role.or_else(|| {
        object
            .id
            .as_deref()
            .and_then(|id| settings.legacy_role(id))
    })
}

fn marker_for(
    object: &PlanObject,
    points: &[Point2],
    settings: &BuildSettings,
    source: SourceRef,
) -> Option<MeshDescriptor> {
    let role = resolve_role(object, settings)?;
    let kind = match role {
        Role::Door => MeshKind::Door,
        Role::Window => MeshKind::Window,
        Role::Wall => return None,
    };
    let template = settings.marker(role)?;
    let segment = WallSegment::from_points(points)?;
    Some(marker_mesh(kind, template, &segment, source))
}

fn floor_mesh(
    points: &[Point2],
    style: &Style,
    settings: &BuildSettings,
    source: SourceRef,
) -> MeshDescriptor {
    let mut geometry = shape_geometry(points);
    let outline = outline_for(&geometry, style, settings.edge_threshold_deg);
    bake_shear(&mut geometry, style);
    let shadows = floor_shadows(style);
    let color = match settings.profile {
        BuildProfile::Styled => style.fill.clone(),
        BuildProfile::Plain => settings.plain_floor_color.clone(),
    };

    MeshDescriptor {
        kind: MeshKind::Floor,
        source,
        geometry,
        material: Material {
            color,
            opacity: style.opacity,
            transparent: false,
            side: Side::Double,
        },
        transform: floor_transform(style, settings.floor_lift, settings.floor_anchor_z),
        outline,
        visible: style.visible,
        cast_shadow: shadows.cast,
        receive_shadow: shadows.receive,
    }
}

fn wall_mesh(
    segment: &WallSegment,
    style: &Style,
    thickness: f64,
    settings: &BuildSettings,
    source: SourceRef,
) -> MeshDescriptor {
    let mut geometry = wall_geometry(segment, settings.wall_height, thickness);
    let outline = outline_for(&geometry, style, settings.edge_threshold_deg);
    bake_shear(&mut geometry, style);
    let shadows = wall_shadows(style);
    let color = match settings.profile {
        BuildProfile::Styled => settings.wall_color.clone(),
        BuildProfile::Plain => settings.plain_wall_color.clone(),
    };

    MeshDescriptor {
        kind: MeshKind::Wall,
        source,
        geometry,
        material: Material {
            color,
            opacity: style.opacity,
            transparent: false,
            side: Side::Front,
        },
        transform: wall_transform(segment, style, settings.wall_height),
        outline,
        visible: style.visible,
        cast_shadow: shadows.cast,
        receive_shadow: shadows.receive,
    }
}

fn plain_style(settings: &BuildSettings) -> Style {
    Style {
        fill: settings.plain_floor_color.clone(),
        stroke: None,
        outline_width: 0.0,
        ..Style::default()
    }
}

/// 构建结果的版本号，由会话在替换平面图时递增。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlanRevision(u64);

impl PlanRevision {
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// 以 `(版本号, 构建参数)` 为键的装配缓存；键变化时整体重建。
#[derive(Debug, Default)]
pub struct SceneCache {
    key: Option<(PlanRevision, BuildSettings)>,
    report: BuildReport,
    builds: u64,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        revision: PlanRevision,
        plan: &FloorPlan,
        settings: &BuildSettings,
    ) -> &BuildReport {
        let fresh = matches!(&self.key, Some((cached, cached_settings))
            if *cached == revision && cached_settings == settings);
        if !fresh {
            trace!(revision = revision.get(), "缓存失效，重新装配");
            self.report = assemble(plan, settings);
            self.key = Some((revision, settings.clone()));
            self.builds += 1;
        }
        &self.report
    }

    /// 清除缓存，下一次访问强制重建。
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// 累计装配次数。
    #[inline]
    pub fn build_count(&self) -> u64 {
        self.builds
    }
}
