//! 基础几何构建：平面轮廓、墙体长方体与门窗标记。
//!
//! 所有函数都是纯函数，不依赖全局状态；错切与样式在 [`crate::style`] 中统一处理。

use std::collections::HashMap;

use glam::DVec3;
use plan3d_core::geometry::{Point2, Transform3, Vector2};
use plan3d_core::mesh::{
    GeometryShape, Material, MeshDescriptor, MeshGeometry, MeshKind, Side, SourceRef,
};
use plan3d_core::settings::{MarkerRotation, MarkerTemplate};

/// 由两个端点定义的墙段。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub start: Point2,
    pub end: Point2,
}

impl WallSegment {
    #[inline]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 取点列的前两个点；不足两个点时返回 `None`。
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        match points {
            [start, end, ..] => Some(Self::new(*start, *end)),
            _ => None,
        }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    #[inline]
    pub fn midpoint(&self) -> Point2 {
        self.start.midpoint(self.end)
    }

    /// 墙段方向角 `atan2(dy, dx)`，单位弧度。
    #[inline]
    pub fn direction_angle(&self) -> f64 {
        Vector2::from_points(self.start, self.end).angle()
    }
}

/// 将点列首尾相连构成闭合轮廓，并在 XY 平面三角化。
///
/// 不检查多边形是否自交，异常输入只会得到错乱但合法的网格。
pub fn shape_geometry(points: &[Point2]) -> MeshGeometry {
    let positions: Vec<DVec3> = points
        .iter()
        .map(|p| DVec3::new(p.x(), p.y(), 0.0))
        .collect();

    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x(), p.y()]).collect();
    let triangulated = earcutr::earcut(&flat, &[], 2).unwrap_or_default();
    let indices: Vec<u32> = if triangulated.is_empty() {
        fan_indices(points.len())
    } else {
        triangulated.into_iter().map(|i| i as u32).collect()
    };

    MeshGeometry {
        shape: GeometryShape::Outline {
            points: points.to_vec(),
        },
        positions,
        indices,
    }
}

fn fan_indices(count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(count.saturating_sub(2) * 3);
    for i in 1..count.saturating_sub(1) {
        indices.extend([0, i as u32, i as u32 + 1]);
    }
    indices
}

// 8 个角点，面按外法线逆时针排列。
const BOX_INDICES: [u32; 36] = [
    4, 5, 6, 4, 6, 7, // +Z
    1, 0, 3, 1, 3, 2, // -Z
    5, 1, 2, 5, 2, 6, // +X
    0, 4, 7, 0, 7, 3, // -X
    7, 6, 2, 7, 2, 3, // +Y
    0, 1, 5, 0, 5, 4, // -Y
];

/// 以原点为中心的长方体。
pub fn box_geometry(width: f64, height: f64, depth: f64) -> MeshGeometry {
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
    let positions = vec![
        DVec3::new(-hx, -hy, -hz),
        DVec3::new(hx, -hy, -hz),
        DVec3::new(hx, hy, -hz),
        DVec3::new(-hx, hy, -hz),
        DVec3::new(-hx, -hy, hz),
        DVec3::new(hx, -hy, hz),
        DVec3::new(hx, hy, hz),
        DVec3::new(-hx, hy, hz),
    ];
    MeshGeometry {
        shape: GeometryShape::Box {
            width,
            height,
            depth,
        },
        positions,
        indices: BOX_INDICES.to_vec(),
    }
}

/// 墙体：宽为墙段长度，高为墙高，深为厚度。零长度墙段退化为零宽长方体。
pub fn wall_geometry(segment: &WallSegment, height: f64, thickness: f64) -> MeshGeometry {
    box_geometry(segment.length(), height, thickness)
}

/// 提取轮廓边：边界边，以及相邻面法线夹角超过阈值的边。退化三角形不参与。
pub fn feature_edges(geometry: &MeshGeometry, threshold_deg: f64) -> Vec<[DVec3; 2]> {
    let threshold_dot = threshold_deg.to_radians().cos();
    let mut order: Vec<(u32, u32)> = Vec::new();
    let mut normals: HashMap<(u32, u32), Vec<DVec3>> = HashMap::new();

    for [a, b, c] in geometry.triangles() {
        let (Some(pa), Some(pb), Some(pc)) = (
            geometry.positions.get(a as usize),
            geometry.positions.get(b as usize),
            geometry.positions.get(c as usize),
        ) else {
            continue;
        };
        let Some(normal) = (*pb - *pa).cross(*pc - *pa).try_normalize() else {
            continue;
        };
        for (from, to) in [(a, b), (b, c), (c, a)] {
            let key = (from.min(to), from.max(to));
            let entry = normals.entry(key).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            entry.push(normal);
        }
    }

    order
        .into_iter()
        .filter(|key| match normals[key].as_slice() {
            [_] => true,
            [n0, n1] => n0.dot(*n1) <= threshold_dot,
            _ => true,
        })
        .map(|(a, b)| [geometry.positions[a as usize], geometry.positions[b as usize]])
        .collect()
}

/// 门窗标记：固定尺寸的薄长方体，锚定在墙段中点、标记专属高度处。
pub fn marker_mesh(
    kind: MeshKind,
    template: &MarkerTemplate,
    segment: &WallSegment,
    source: SourceRef,
) -> MeshDescriptor {
    let mid = segment.midpoint();
    let yaw = match template.rotation {
        MarkerRotation::Fixed { degrees } => degrees.to_radians(),
        MarkerRotation::AlignToSegment => -segment.direction_angle(),
    };

    MeshDescriptor {
        kind,
        source,
        geometry: box_geometry(template.width, template.height, template.depth),
        material: Material {
            color: template.color.clone(),
            opacity: template.opacity,
            transparent: true,
            side: Side::Double,
        },
        transform: Transform3 {
            position: DVec3::new(mid.x(), template.elevation, mid.y()),
            rotation: DVec3::new(0.0, yaw, 0.0),
            scale: DVec3::ONE,
        },
        outline: None,
        visible: true,
        cast_shadow: false,
        receive_shadow: false,
    }
}
