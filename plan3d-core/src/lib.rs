pub mod geometry {
    use glam::{DMat4, DQuat, DVec2, DVec3, DVec4, EulerRot};
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示，对应平面图画布坐标。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn vector_to(self, other: Point2) -> Vector2 {
            Vector2(other.0 - self.0)
        }

        #[inline]
        pub fn midpoint(self, other: Point2) -> Point2 {
            Self((self.0 + other.0) * 0.5)
        }

        #[inline]
        pub fn distance(self, other: Point2) -> f64 {
            self.0.distance(other.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维向量。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_points(start: Point2, end: Point2) -> Self {
            Self(end.0 - start.0)
        }

        #[inline]
        pub fn length(self) -> f64 {
            self.0.length()
        }

        /// 相对 +X 轴的方向角（弧度），即 `atan2(y, x)`。
        #[inline]
        pub fn angle(self) -> f64 {
            self.0.y.atan2(self.0.x)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 三维点。场景约定 Y 轴朝上，平面图的 y 坐标映射到 Z 轴。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point3(pub DVec3);

    impl Point3 {
        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn z(self) -> f64 {
            self.0.z
        }

        #[inline]
        pub fn as_vec3(self) -> DVec3 {
            self.0
        }
    }

    impl From<DVec3> for Point3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }

    /// 三维向量，主要用于面法线计算。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector3(pub DVec3);

    impl Vector3 {
        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn as_vec3(self) -> DVec3 {
            self.0
        }

        #[inline]
        pub fn normalize(self) -> Option<Self> {
            let len = self.0.length();
            if len <= f64::EPSILON {
                None
            } else {
                Some(Self(self.0 / len))
            }
        }

        #[inline]
        pub fn dot(self, other: Vector3) -> f64 {
            self.0.dot(other.0)
        }

        #[inline]
        pub fn cross(self, other: Vector3) -> Vector3 {
            Self(self.0.cross(other.0))
        }
    }

    impl From<DVec3> for Vector3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }

    /// 轴对齐边界框，用于估算平面图范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            self.min = Point2::from_vec(self.min.as_vec2().min(point.as_vec2()));
            self.max = Point2::from_vec(self.max.as_vec2().max(point.as_vec2()));
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            Point2::from_vec((self.min.as_vec2() + self.max.as_vec2()) * 0.5)
        }

        #[inline]
        pub fn size(&self) -> Vector2 {
            if self.is_empty() {
                Vector2::new(0.0, 0.0)
            } else {
                Vector2::from_points(self.min, self.max)
            }
        }
    }

    /// 构造错切矩阵：`x' = x + tan(skew_x)·y`，`y' = tan(skew_y)·x + y`，Z 保持不变。
    /// 角度单位为度。
    pub fn shear_matrix(skew_x_deg: f64, skew_y_deg: f64) -> DMat4 {
        let tx = skew_x_deg.to_radians().tan();
        let ty = skew_y_deg.to_radians().tan();
        DMat4::from_cols(
            DVec4::new(1.0, ty, 0.0, 0.0),
            DVec4::new(tx, 1.0, 0.0, 0.0),
            DVec4::new(0.0, 0.0, 1.0, 0.0),
            DVec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// 物体的世界变换：位置、XYZ 顺序欧拉角（弧度）与非均匀缩放。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Transform3 {
        pub position: DVec3,
        pub rotation: DVec3,
        pub scale: DVec3,
    }

    impl Transform3 {
        pub const IDENTITY: Self = Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        };

        #[inline]
        pub fn rotation_quat(&self) -> DQuat {
            DQuat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
        }

        /// 先缩放、再旋转、最后平移。
        pub fn to_matrix(&self) -> DMat4 {
            DMat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
        }
    }

    impl Default for Transform3 {
        fn default() -> Self {
            Self::IDENTITY
        }
    }
}

pub mod color {
    use serde::{Deserialize, Serialize};

    /// 颜色描述，保留原始文本，渲染端可按需解析。
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Color(String);

    const NAMED_COLORS: &[(&str, u32)] = &[
        ("black", 0x000000),
        ("white", 0xffffff),
        ("grey", 0x808080),
        ("gray", 0x808080),
        ("lightgrey", 0xd3d3d3),
        ("lightgray", 0xd3d3d3),
        ("darkgrey", 0xa9a9a9),
        ("darkgray", 0xa9a9a9),
        ("brown", 0xa52a2a),
        ("red", 0xff0000),
        ("green", 0x008000),
        ("blue", 0x0000ff),
        ("lightblue", 0xadd8e6),
        ("yellow", 0xffff00),
        ("orange", 0xffa500),
        ("beige", 0xf5f5dc),
        ("tan", 0xd2b48c),
    ];

    impl Color {
        #[inline]
        pub fn new(raw: impl Into<String>) -> Self {
            Self(raw.into())
        }

        #[inline]
        pub fn as_str(&self) -> &str {
            &self.0
        }

        /// 解析为 sRGB 浮点分量。支持 `#rgb`、`#rrggbb`、`0xrrggbb`、
        /// `rgb(r,g,b)` 以及常见 CSS 颜色名，无法识别时返回 `None`。
        pub fn to_rgb(&self) -> Option<[f32; 3]> {
            let raw = self.0.trim();
            if let Some(hex) = raw.strip_prefix('#') {
                return parse_hex(hex);
            }
            if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
                return parse_hex(hex);
            }
            if let Some(body) = raw
                .strip_prefix("rgb(")
                .and_then(|rest| rest.strip_suffix(')'))
            {
                let mut channels = [0.0f32; 3];
                let mut parts = body.split(',');
                for channel in &mut channels {
                    let value: f32 = parts.next()?.trim().parse().ok()?;
                    *channel = (value / 255.0).clamp(0.0, 1.0);
                }
                return parts.next().is_none().then_some(channels);
            }
            let lower = raw.to_ascii_lowercase();
            NAMED_COLORS
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, value)| unpack(*value))
        }
    }

    impl From<&str> for Color {
        fn from(value: &str) -> Self {
            Self::new(value)
        }
    }

    fn parse_hex(hex: &str) -> Option<[f32; 3]> {
        match hex.len() {
            3 => {
                let value = u32::from_str_radix(hex, 16).ok()?;
                let r = (value >> 8) & 0xf;
                let g = (value >> 4) & 0xf;
                let b = value & 0xf;
                Some(unpack((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            6 => u32::from_str_radix(hex, 16).ok().map(unpack),
            _ => None,
        }
    }

    fn unpack(value: u32) -> [f32; 3] {
        [
            ((value >> 16) & 0xff) as f32 / 255.0,
            ((value >> 8) & 0xff) as f32 / 255.0,
            (value & 0xff) as f32 / 255.0,
        ]
    }
}

pub mod plan {
    use serde::Serialize;

    use crate::color::Color;
    use crate::geometry::{Bounds2D, Point2};

    /// 平面图文档根节点。加载后视为只读。
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FloorPlan {
        pub version: String,
        pub entries: Vec<PlanEntry>,
    }

    impl FloorPlan {
        pub fn new(version: impl Into<String>) -> Self {
            Self {
                version: version.into(),
                entries: Vec::new(),
            }
        }

        pub fn with_entry(mut self, entry: PlanEntry) -> Self {
            self.entries.push(entry);
            self
        }

        /// 仅返回类型为 group 的顶层条目。
        pub fn groups(&self) -> impl Iterator<Item = (usize, &PlanEntry)> + '_ {
            self.entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.kind == EntryKind::Group)
        }

        pub fn object_count(&self) -> usize {
            self.entries.iter().map(|entry| entry.objects.len()).sum()
        }

        /// 计算所有对象顶点的 2D 范围。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            for entry in &self.entries {
                for object in &entry.objects {
                    for point in object.points.iter().flatten() {
                        bounds.include_point(*point);
                    }
                }
            }
            if bounds.is_empty() {
                None
            } else {
                Some(bounds)
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub enum EntryKind {
        Group,
        Other(String),
    }

    impl EntryKind {
        pub fn from_tag(tag: &str) -> Self {
            if tag == "group" {
                Self::Group
            } else {
                Self::Other(tag.to_string())
            }
        }
    }

    /// 顶层条目，仅支持一层嵌套。
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct PlanEntry {
        pub kind: EntryKind,
        pub name: Option<String>,
        pub objects: Vec<PlanObject>,
    }

    impl PlanEntry {
        pub fn group(objects: Vec<PlanObject>) -> Self {
            Self {
                kind: EntryKind::Group,
                name: None,
                objects,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub enum ObjectKind {
        Polygon,
        Other(String),
    }

    impl ObjectKind {
        pub fn from_tag(tag: &str) -> Self {
            if tag == "polygon" {
                Self::Polygon
            } else {
                Self::Other(tag.to_string())
            }
        }
    }

    /// 对象在场景中的语义角色。门窗作为附着在墙段上的标记。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum Role {
        Wall,
        Door,
        Window,
    }

    impl Role {
        pub fn from_tag(tag: &str) -> Option<Self> {
            match tag.to_ascii_lowercase().as_str() {
                "wall" => Some(Self::Wall),
                "door" => Some(Self::Door),
                "window" => Some(Self::Window),
                _ => None,
            }
        }
    }

    /// 通用样式属性，所有构建器统一应用。
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Style {
        pub fill: Color,
        pub stroke: Option<Color>,
        /// 轮廓线宽，`0` 表示不生成轮廓。
        pub outline_width: f64,
        /// 不做裁剪，越界值原样交给渲染器。
        pub opacity: f64,
        pub visible: bool,
        pub shadow: bool,
        pub scale_x: f64,
        pub scale_y: f64,
        /// 额外旋转角，单位为度。
        pub angle: f64,
        pub skew_x: f64,
        pub skew_y: f64,
        pub flip_x: bool,
        pub flip_y: bool,
    }

    impl Style {
        /// 翻转以负缩放表示；结果只取决于当前标志，不累积。
        #[inline]
        pub fn signed_scale(&self) -> (f64, f64) {
            let x = if self.flip_x {
                -self.scale_x
            } else {
                self.scale_x
            };
            let y = if self.flip_y {
                -self.scale_y
            } else {
                self.scale_y
            };
            (x, y)
        }

        #[inline]
        pub fn has_outline(&self) -> bool {
            self.stroke.is_some() && self.outline_width > 0.0
        }
    }

    impl Default for Style {
        fn default() -> Self {
            Self {
                fill: Color::new("rgb(0,0,0)"),
                stroke: None,
                outline_width: 1.0,
                opacity: 1.0,
                visible: true,
                shadow: false,
                scale_x: 1.0,
                scale_y: 1.0,
                angle: 0.0,
                skew_x: 0.0,
                skew_y: 0.0,
                flip_x: false,
                flip_y: false,
            }
        }
    }

    /// 平面图中的原子图形。
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct PlanObject {
        pub kind: ObjectKind,
        pub points: Option<Vec<Point2>>,
        pub style: Style,
        /// 墙体挤出厚度，缺省时取自 `strokeWidth`。
        pub thickness: f64,
        pub role: Option<Role>,
        pub id: Option<String>,
        /// 字段类型不符时的解析诊断，装配阶段据此跳过该图元。
        #[serde(skip_serializing_if = "Option::is_none")]
        pub invalid: Option<String>,
    }

    impl PlanObject {
        pub fn polygon(points: impl IntoIterator<Item = Point2>) -> Self {
            let style = Style::default();
            Self {
                kind: ObjectKind::Polygon,
                points: Some(points.into_iter().collect()),
                thickness: style.outline_width,
                style,
                role: None,
                id: None,
                invalid: None,
            }
        }

        pub fn with_style(mut self, style: Style) -> Self {
            self.style = style;
            self
        }

        pub fn with_thickness(mut self, thickness: f64) -> Self {
            self.thickness = thickness;
            self
        }

        pub fn with_role(mut self, role: Role) -> Self {
            self.role = Some(role);
            self
        }

        pub fn with_id(mut self, id: impl Into<String>) -> Self {
            self.id = Some(id.into());
            self
        }

        #[inline]
        pub fn point_count(&self) -> usize {
            self.points.as_ref().map_or(0, Vec::len)
        }
    }
}

pub mod mesh {
    use glam::DVec3;
    use serde::Serialize;

    use crate::color::Color;
    use crate::geometry::{Point2, Transform3};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MeshKind {
        Floor,
        Wall,
        Door,
        Window,
    }

    impl MeshKind {
        pub fn label(self) -> &'static str {
            match self {
                MeshKind::Floor => "floor",
                MeshKind::Wall => "wall",
                MeshKind::Door => "door",
                MeshKind::Window => "window",
            }
        }

        #[inline]
        pub fn is_marker(self) -> bool {
            matches!(self, MeshKind::Door | MeshKind::Window)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum GeometryShape {
        /// 闭合平面轮廓，首点即路径起点。
        Outline { points: Vec<Point2> },
        /// 以原点为中心的长方体，宽沿 X、高沿 Y、深沿 Z。
        Box { width: f64, height: f64, depth: f64 },
    }

    /// 三角网格几何，顶点位置已烘焙错切。
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct MeshGeometry {
        pub shape: GeometryShape,
        pub positions: Vec<DVec3>,
        pub indices: Vec<u32>,
    }

    impl MeshGeometry {
        #[inline]
        pub fn triangle_count(&self) -> usize {
            self.indices.len() / 3
        }

        pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
            self.indices
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Side {
        Front,
        Double,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Material {
        pub color: Color,
        pub opacity: f64,
        pub transparent: bool,
        pub side: Side,
    }

    /// 附着在网格上的边线子图元，使用父网格的局部坐标。
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Outline {
        pub color: Color,
        pub width: f64,
        pub segments: Vec<[DVec3; 2]>,
    }

    /// 网格来源：顶层条目序号、条目内对象序号与对象 ID。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct SourceRef {
        pub entry: usize,
        pub object: usize,
        pub id: Option<String>,
    }

    /// 与渲染器无关的输出单元。一次构建内创建后不再修改。
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct MeshDescriptor {
        pub kind: MeshKind,
        pub source: SourceRef,
        pub geometry: MeshGeometry,
        pub material: Material,
        pub transform: Transform3,
        pub outline: Option<Outline>,
        pub visible: bool,
        pub cast_shadow: bool,
        pub receive_shadow: bool,
    }

    impl MeshDescriptor {
        #[inline]
        pub fn child_count(&self) -> usize {
            usize::from(self.outline.is_some())
        }
    }
}

pub mod settings {
    use serde::{Deserialize, Serialize};

    use crate::color::Color;
    use crate::plan::Role;

    pub const LEGACY_DOOR_ID: &str = "c9c56b44-5247-4ac8-9d6e-fd46994c9ec2";
    pub const LEGACY_WINDOW_ID: &str = "0727c87d-1b0f-4159-a18a-7f4d8d187292";

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum BuildProfile {
        /// 应用每个对象的样式、变换与门窗标记。
        #[default]
        Styled,
        /// 统一的中性样式，忽略对象样式与标记。
        Plain,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "mode", rename_all = "snake_case")]
    pub enum MarkerRotation {
        /// 绕竖直轴的固定角度（度）。
        Fixed { degrees: f64 },
        /// 与墙段方向对齐（取负的 `atan2`）。
        AlignToSegment,
    }

    /// 门窗标记的尺寸、高度与材质。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MarkerTemplate {
        pub width: f64,
        pub height: f64,
        pub depth: f64,
        pub elevation: f64,
        pub color: Color,
        pub opacity: f64,
        pub rotation: MarkerRotation,
    }

    impl MarkerTemplate {
        pub fn door() -> Self {
            Self {
                width: 30.0,
                height: 80.0,
                depth: 10.0,
                elevation: 40.0,
                color: Color::new("brown"),
                opacity: 1.0,
                rotation: MarkerRotation::Fixed { degrees: 180.0 },
            }
        }

        pub fn window() -> Self {
            Self {
                width: 50.0,
                height: 50.0,
                depth: 10.0,
                elevation: 50.0,
                color: Color::new("white"),
                opacity: 0.5,
                rotation: MarkerRotation::AlignToSegment,
            }
        }
    }

    /// 几何构建参数。可嵌入 TOML 配置的 `[build]` 段。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct BuildSettings {
        pub profile: BuildProfile,
        pub wall_height: f64,
        pub floor_lift: f64,
        pub floor_anchor_z: f64,
        pub wall_color: Color,
        pub plain_floor_color: Color,
        pub plain_wall_color: Color,
        pub plain_wall_thickness: f64,
        /// 相邻面法线夹角超过该阈值（度）的边才进入轮廓。
        pub edge_threshold_deg: f64,
        pub door: MarkerTemplate,
        pub window: MarkerTemplate,
        pub legacy_door_ids: Vec<String>,
        pub legacy_window_ids: Vec<String>,
    }

    impl BuildSettings {
        /// 不带样式的简化方案。
        pub fn plain() -> Self {
            Self::default().with_plain_profile()
        }

        /// 切换为简化方案，其余参数保持不变。
        pub fn with_plain_profile(self) -> Self {
            Self {
                profile: BuildProfile::Plain,
                floor_anchor_z: 1115.0,
                ..self
            }
        }

        pub fn marker(&self, role: Role) -> Option<&MarkerTemplate> {
            match role {
                Role::Door => Some(&self.door),
                Role::Window => Some(&self.window),
                Role::Wall => None,
            }
        }

        /// 通过旧数据集中的 ID 推断角色。
        pub fn legacy_role(&self, id: &str) -> Option<Role> {
            if self.legacy_door_ids.iter().any(|candidate| candidate == id) {
                Some(Role::Door)
            } else if self.legacy_window_ids.iter().any(|candidate| candidate == id) {
                Some(Role::Window)
            } else {
                None
            }
        }
    }

    impl Default for BuildSettings {
        fn default() -> Self {
            Self {
                profile: BuildProfile::Styled,
                wall_height: 100.0,
                floor_lift: 0.1,
                floor_anchor_z: 970.0,
                wall_color: Color::new("grey"),
                plain_floor_color: Color::new("white"),
                plain_wall_color: Color::new("#cccccc"),
                plain_wall_thickness: 10.0,
                edge_threshold_deg: 1.0,
                door: MarkerTemplate::door(),
                window: MarkerTemplate::window(),
                legacy_door_ids: vec![LEGACY_DOOR_ID.to_string()],
                legacy_window_ids: vec![LEGACY_WINDOW_ID.to_string()],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use glam::DVec3;

    use crate::color::Color;
    use crate::geometry::{Bounds2D, Point2, Transform3, Vector2, shear_matrix};
    use crate::plan::{EntryKind, FloorPlan, ObjectKind, PlanEntry, PlanObject, Role, Style};
    use crate::settings::{BuildProfile, BuildSettings, LEGACY_DOOR_ID, LEGACY_WINDOW_ID};

    #[test]
    fn bounds_include_points_and_report_center() {
        let mut bounds = Bounds2D::empty();
        assert!(bounds.is_empty());
        bounds.include_point(Point2::new(-10.0, 5.0));
        bounds.include_point(Point2::new(30.0, -15.0));
        assert!(!bounds.is_empty());
        assert_eq!(bounds.min(), Point2::new(-10.0, -15.0));
        assert_eq!(bounds.max(), Point2::new(30.0, 5.0));
        assert_eq!(bounds.center(), Point2::new(10.0, -5.0));
        assert_eq!(bounds.size(), Vector2::new(40.0, 20.0));

        let mut merged = Bounds2D::empty();
        merged.include_bounds(&Bounds2D::empty());
        assert!(merged.is_empty());
        merged.include_bounds(&bounds);
        assert_eq!(merged, bounds);
    }

    #[test]
    fn segment_helpers_follow_euclidean_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert_eq!(a.midpoint(b), Point2::new(1.5, 2.0));
        let dir = a.vector_to(Point2::new(0.0, 100.0));
        assert!((dir.angle() - FRAC_PI_2).abs() < 1e-12);
        assert!((dir.length() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn shear_matrix_maps_axes() {
        let m = shear_matrix(45.0, 0.0);
        let p = m.transform_point3(DVec3::new(0.0, 2.0, 3.0));
        assert!((p.x - 2.0).abs() < 1e-9);
        assert!((p.y - 2.0).abs() < 1e-9);
        assert!((p.z - 3.0).abs() < 1e-9);

        let m = shear_matrix(0.0, 45.0);
        let p = m.transform_point3(DVec3::new(1.0, 0.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);

        let identity = shear_matrix(0.0, 0.0);
        let q = identity.transform_point3(DVec3::new(4.0, -2.0, 7.0));
        assert_eq!(q, DVec3::new(4.0, -2.0, 7.0));
    }

    #[test]
    fn transform_matrix_applies_scale_rotation_translation() {
        let transform = Transform3 {
            position: DVec3::new(10.0, 0.0, 0.0),
            rotation: DVec3::new(0.0, FRAC_PI_2, 0.0),
            scale: DVec3::new(2.0, 1.0, 1.0),
        };
        let p = transform.to_matrix().transform_point3(DVec3::new(1.0, 0.0, 0.0));
        // (1,0,0) -> 缩放 (2,0,0) -> 绕 Y 旋转 90° -> (0,0,-2) -> 平移
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
        assert!((p.z + 2.0).abs() < 1e-9);
        assert_eq!(Transform3::default(), Transform3::IDENTITY);
    }

    #[test]
    fn colors_resolve_common_notations() {
        assert_eq!(Color::new("#fff").to_rgb(), Some([1.0, 1.0, 1.0]));
        assert_eq!(Color::new("#ff0000").to_rgb(), Some([1.0, 0.0, 0.0]));
        assert_eq!(Color::new("0x000000").to_rgb(), Some([0.0, 0.0, 0.0]));
        assert_eq!(Color::new("rgb(255, 0, 0)").to_rgb(), Some([1.0, 0.0, 0.0]));
        assert_eq!(Color::new("White").to_rgb(), Some([1.0, 1.0, 1.0]));
        assert!(Color::new("brown").to_rgb().is_some());
        assert!(Color::new("#12").to_rgb().is_none());
        assert!(Color::new("not-a-colour").to_rgb().is_none());
        assert!(Color::new("rgb(1,2)").to_rgb().is_none());
    }

    #[test]
    fn signed_scale_depends_only_on_flags() {
        let mut style = Style {
            scale_x: 2.0,
            scale_y: 3.0,
            flip_x: true,
            ..Style::default()
        };
        assert_eq!(style.signed_scale(), (-2.0, 3.0));
        // 重复设置同一标志不会累积符号
        style.flip_x = true;
        assert_eq!(style.signed_scale(), (-2.0, 3.0));
        style.flip_x = false;
        style.flip_y = true;
        assert_eq!(style.signed_scale(), (2.0, -3.0));
    }

    #[test]
    fn outline_requires_stroke_and_positive_width() {
        let mut style = Style::default();
        assert!(!style.has_outline());
        style.stroke = Some(Color::new("#000"));
        assert!(style.has_outline());
        style.outline_width = 0.0;
        assert!(!style.has_outline());
    }

    #[test]
    fn plan_groups_and_bounds() {
        let plan = FloorPlan::new("5.3.0")
            .with_entry(PlanEntry::group(vec![PlanObject::polygon([
                Point2::new(0.0, 0.0),
                Point2::new(100.0, 50.0),
            ])]))
            .with_entry(PlanEntry {
                kind: EntryKind::from_tag("rect"),
                name: None,
                objects: vec![PlanObject::polygon([Point2::new(-20.0, 10.0)])],
            });

        let groups: Vec<usize> = plan.groups().map(|(index, _)| index).collect();
        assert_eq!(groups, vec![0]);
        assert_eq!(plan.object_count(), 2);
        let bounds = plan.bounds().expect("plan has points");
        assert_eq!(bounds.min(), Point2::new(-20.0, 0.0));
        assert_eq!(bounds.max(), Point2::new(100.0, 50.0));
        assert!(FloorPlan::new("empty").bounds().is_none());
    }

    #[test]
    fn tags_classify_kinds_and_roles() {
        assert_eq!(ObjectKind::from_tag("polygon"), ObjectKind::Polygon);
        assert_eq!(
            ObjectKind::from_tag("i-text"),
            ObjectKind::Other("i-text".to_string())
        );
        assert_eq!(Role::from_tag("Door"), Some(Role::Door));
        assert_eq!(Role::from_tag("window"), Some(Role::Window));
        assert_eq!(Role::from_tag("roof"), None);
    }

    #[test]
    fn settings_resolve_legacy_ids() {
        let settings = BuildSettings::default();
        assert_eq!(settings.legacy_role(LEGACY_DOOR_ID), Some(Role::Door));
        assert_eq!(settings.legacy_role(LEGACY_WINDOW_ID), Some(Role::Window));
        assert_eq!(settings.legacy_role("something-else"), None);
        assert!(settings.marker(Role::Wall).is_none());
        assert_eq!(settings.marker(Role::Door), Some(&settings.door));

        let plain = BuildSettings::plain();
        assert_eq!(plain.profile, BuildProfile::Plain);
        assert_eq!(plain.floor_anchor_z, 1115.0);
    }

    #[test]
    fn settings_deserialize_with_partial_fields() {
        let settings: BuildSettings = serde_json::from_str(
            r#"{ "wall_height": 50.0, "window": {
                "width": 40.0, "height": 30.0, "depth": 5.0, "elevation": 60.0,
                "color": "lightblue", "opacity": 0.3,
                "rotation": { "mode": "fixed", "degrees": 90.0 } } }"#,
        )
        .expect("parse settings");
        assert_eq!(settings.wall_height, 50.0);
        assert_eq!(settings.window.width, 40.0);
        assert_eq!(settings.door, BuildSettings::default().door);
        assert_eq!(settings.floor_anchor_z, 970.0);
    }
}
