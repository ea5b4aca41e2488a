//! 样式与位姿：缩放、旋转组合、错切、轮廓线与阴影标志。

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use plan3d_core::geometry::{Transform3, shear_matrix};
use plan3d_core::mesh::{MeshGeometry, Outline};
use plan3d_core::plan::Style;

use crate::builders::{WallSegment, feature_edges};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowFlags {
    pub cast: bool,
    pub receive: bool,
}

/// 地面只接收阴影，墙体同时投射与接收。
pub fn floor_shadows(style: &Style) -> ShadowFlags {
    ShadowFlags {
        cast: false,
        receive: style.shadow,
    }
}

pub fn wall_shadows(style: &Style) -> ShadowFlags {
    ShadowFlags {
        cast: style.shadow,
        receive: style.shadow,
    }
}

/// 带翻转符号的缩放，Z 轴固定为 1。
#[inline]
pub fn signed_scale(style: &Style) -> DVec3 {
    let (x, y) = style.signed_scale();
    DVec3::new(x, y, 1.0)
}

/// 地面：先绕 X 轴 -90° 平放，再叠加 `angle`；位置为固定抬升与深度锚点。
pub fn floor_transform(style: &Style, lift: f64, anchor_z: f64) -> Transform3 {
    Transform3 {
        position: DVec3::new(0.0, lift, anchor_z),
        rotation: DVec3::new(-FRAC_PI_2, 0.0, style.angle.to_radians()),
        scale: signed_scale(style),
    }
}

/// 墙体：中心位于墙段中点、半墙高处，绕竖直轴旋转 `-atan2 + angle`。
pub fn wall_transform(segment: &WallSegment, style: &Style, wall_height: f64) -> Transform3 {
    let mid = segment.midpoint();
    Transform3 {
        position: DVec3::new(mid.x(), wall_height * 0.5, mid.y()),
        rotation: DVec3::new(
            0.0,
            -segment.direction_angle() + style.angle.to_radians(),
            0.0,
        ),
        scale: signed_scale(style),
    }
}

/// 将错切一次性烘焙进顶点位置。零错切时保持原样。
pub fn bake_shear(geometry: &mut MeshGeometry, style: &Style) {
    if style.skew_x == 0.0 && style.skew_y == 0.0 {
        return;
    }
    let matrix = shear_matrix(style.skew_x, style.skew_y);
    for position in &mut geometry.positions {
        *position = matrix.transform_point3(*position);
    }
}

/// 有描边颜色且线宽为正时，从基础几何生成轮廓子图元。
pub fn outline_for(geometry: &MeshGeometry, style: &Style, threshold_deg: f64) -> Option<Outline> {
    if !style.has_outline() {
        return None;
    }
    let color = style.stroke.clone()?;
    Some(Outline {
        color,
        width: style.outline_width,
        segments: feature_edges(geometry, threshold_deg),
    })
}

#[cfg(test)]
mod tests {
    use plan3d_core::color::Color;
    use plan3d_core::geometry::Point2;

    use super::*;
    use crate::builders::{box_geometry, shape_geometry};

    #[test]
    fn shadows_default_to_off() {
        let style = Style::default();
        assert_eq!(floor_shadows(&style), ShadowFlags::default());
        assert_eq!(wall_shadows(&style), ShadowFlags::default());

        let shadowed = Style {
            shadow: true,
            ..Style::default()
        };
        assert_eq!(
            floor_shadows(&shadowed),
            ShadowFlags {
                cast: false,
                receive: true
            }
        );
        assert_eq!(
            wall_shadows(&shadowed),
            ShadowFlags {
                cast: true,
                receive: true
            }
        );
    }

    #[test]
    fn floor_transform_lays_shape_flat() {
        let style = Style {
            angle: 90.0,
            flip_y: true,
            scale_y: 2.0,
            ..Style::default()
        };
        let transform = floor_transform(&style, 0.1, 970.0);
        assert_eq!(transform.position, DVec3::new(0.0, 0.1, 970.0));
        assert!((transform.rotation.x + FRAC_PI_2).abs() < 1e-12);
        assert!((transform.rotation.z - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(transform.scale, DVec3::new(1.0, -2.0, 1.0));
    }

    #[test]
    fn wall_transform_composes_base_angle_and_style_angle() {
        let segment = WallSegment::new(Point2::new(0.0, 0.0), Point2::new(0.0, 100.0));
        let transform = wall_transform(&segment, &Style::default(), 100.0);
        assert_eq!(transform.position, DVec3::new(0.0, 50.0, 50.0));
        assert!((transform.rotation.y + FRAC_PI_2).abs() < 1e-12);

        let turned = Style {
            angle: 90.0,
            ..Style::default()
        };
        let transform = wall_transform(&segment, &turned, 100.0);
        assert!(transform.rotation.y.abs() < 1e-12);
    }

    #[test]
    fn shear_is_baked_into_positions() {
        let mut geometry = shape_geometry(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ]);
        let style = Style {
            skew_x: 45.0,
            ..Style::default()
        };
        bake_shear(&mut geometry, &style);
        assert!((geometry.positions[2].x - 20.0).abs() < 1e-9);
        assert!((geometry.positions[2].y - 10.0).abs() < 1e-9);
        assert!((geometry.positions[1].x - 10.0).abs() < 1e-9);

        let mut untouched = box_geometry(1.0, 1.0, 1.0);
        let before = untouched.positions.clone();
        bake_shear(&mut untouched, &Style::default());
        assert_eq!(untouched.positions, before);
    }

    #[test]
    fn outline_needs_stroke_and_width() {
        let geometry = box_geometry(2.0, 2.0, 2.0);
        let mut style = Style {
            stroke: Some(Color::new("#000")),
            outline_width: 2.0,
            ..Style::default()
        };
        let outline = outline_for(&geometry, &style, 1.0).expect("outline");
        assert_eq!(outline.color.as_str(), "#000");
        assert_eq!(outline.width, 2.0);
        assert_eq!(outline.segments.len(), 12);

        style.outline_width = 0.0;
        assert!(outline_for(&geometry, &style, 1.0).is_none());

        style.outline_width = 2.0;
        style.stroke = None;
        assert!(outline_for(&geometry, &style, 1.0).is_none());
    }
}
