use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a scene element for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
    /// On/off lengths, empty for a solid line.
    #[serde(default)]
    pub dash: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color32,
    pub blur: f32,
    pub offset: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub fill: Color32,
    pub stroke: Option<StrokeStyle>,
    pub shadow: Option<Shadow>,
    pub blur: Option<f32>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color32::from_rgb(0x3b, 0x82, 0xf6),
            stroke: None,
            shadow: None,
            blur: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Text laid out along a circular arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextCurve {
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub clockwise: bool,
    pub upside_down: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub uppercase: bool,
    pub letter_spacing: f32,
    pub line_height: f32,
    pub align: TextAlign,
    pub curve: Option<TextCurve>,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "Text".to_owned(),
            font_size: 24.0,
            font_family: "sans-serif".to_owned(),
            bold: false,
            italic: false,
            uppercase: false,
            letter_spacing: 0.0,
            line_height: 1.2,
            align: TextAlign::Left,
            curve: None,
        }
    }
}

impl TextContent {
    /// The string as it is drawn.
    pub fn display_text(&self) -> String {
        if self.uppercase {
            self.text.to_uppercase()
        } else {
            self.text.clone()
        }
    }

    /// Layout-free estimate of the text block size.
    pub fn estimated_size(&self) -> Vec2 {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f32;
        let width = longest * (self.font_size * 0.6 + self.letter_spacing);
        let height = lines.len() as f32 * self.font_size * self.line_height;
        Vec2::new(width.max(1.0), height.max(1.0))
    }
}

/// Shared attributes of the mock-up widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Widget {
    pub size: Vec2,
    pub label: String,
    pub text_color: Color32,
    pub font_size: f32,
    pub corner_radius: f32,
}

impl Default for Widget {
    fn default() -> Self {
        Self {
            size: Vec2::new(120.0, 40.0),
            label: String::new(),
            text_color: Color32::WHITE,
            font_size: 14.0,
            corner_radius: 6.0,
        }
    }
}

impl Widget {
    pub fn new(label: impl Into<String>, size: Vec2) -> Self {
        Self {
            label: label.into(),
            size,
            ..Self::default()
        }
    }
}

/// Per-kind geometry. Each variant carries exactly the fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Circle {
        diameter: f32,
    },
    Rect {
        size: Vec2,
        #[serde(default)]
        corner_radius: f32,
    },
    Triangle {
        size: Vec2,
    },
    Star {
        size: f32,
        points: u32,
        inner_ratio: f32,
    },
    Polygon {
        size: f32,
        sides: u32,
    },
    Text(TextContent),
    /// Points are relative to the element position.
    Line {
        points: Vec<Pos2>,
    },
    /// SVG path data, with its extent in local units.
    Path {
        data: String,
        extent: Vec2,
    },
    /// Children are positioned relative to the group.
    Group {
        children: Vec<SceneElement>,
    },
    Button(Widget),
    Card(Widget),
    ProgressBar {
        widget: Widget,
        value: f32,
    },
    Menu {
        widget: Widget,
        items: Vec<String>,
    },
    Input {
        widget: Widget,
        placeholder: String,
    },
    Checkbox {
        widget: Widget,
        checked: bool,
    },
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Circle { .. } => "circle",
            ElementKind::Rect { .. } => "rect",
            ElementKind::Triangle { .. } => "triangle",
            ElementKind::Star { .. } => "star",
            ElementKind::Polygon { .. } => "polygon",
            ElementKind::Text(_) => "text",
            ElementKind::Line { .. } => "line",
            ElementKind::Path { .. } => "path",
            ElementKind::Group { .. } => "group",
            ElementKind::Button(_) => "button",
            ElementKind::Card(_) => "card",
            ElementKind::ProgressBar { .. } => "progress_bar",
            ElementKind::Menu { .. } => "menu",
            ElementKind::Input { .. } => "input",
            ElementKind::Checkbox { .. } => "checkbox",
        }
    }

    pub fn widget(&self) -> Option<&Widget> {
        match self {
            ElementKind::Button(w) | ElementKind::Card(w) => Some(w),
            ElementKind::ProgressBar { widget, .. }
            | ElementKind::Menu { widget, .. }
            | ElementKind::Input { widget, .. }
            | ElementKind::Checkbox { widget, .. } => Some(widget),
            _ => None,
        }
    }

    /// Unscaled, unrotated local size.
    pub fn size(&self) -> Vec2 {
        match self {
            ElementKind::Circle { diameter } => Vec2::splat(*diameter),
            ElementKind::Rect { size, .. } | ElementKind::Triangle { size } => *size,
            ElementKind::Star { size, .. } | ElementKind::Polygon { size, .. } => Vec2::splat(*size),
            ElementKind::Text(text) => text.estimated_size(),
            ElementKind::Line { points } => points
                .iter()
                .fold(Vec2::ZERO, |acc, p| Vec2::new(acc.x.max(p.x), acc.y.max(p.y))),
            ElementKind::Path { extent, .. } => *extent,
            ElementKind::Group { children } => children
                .iter()
                .map(|c| c.world_bounds())
                .reduce(|a, b| a.union(b))
                .map(|r| r.max.to_vec2().max(Vec2::ZERO))
                .unwrap_or(Vec2::ZERO),
            ElementKind::Button(widget) | ElementKind::Card(widget) => widget.size,
            ElementKind::ProgressBar { widget, .. }
            | ElementKind::Menu { widget, .. }
            | ElementKind::Input { widget, .. }
            | ElementKind::Checkbox { widget, .. } => widget.size,
        }
    }
}

/// One drawable item of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    pub id: ElementId,
    #[serde(default)]
    pub name: String,
    /// Top-left of the unrotated bounds.
    pub position: Pos2,
    /// Degrees, clockwise, about the bounds center.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    #[serde(default = "one")]
    pub opacity: f32,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Paint order; higher paints later.
    #[serde(default)]
    pub layer: i64,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub kind: ElementKind,
}

fn unit_scale() -> Vec2 {
    Vec2::splat(1.0)
}

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

impl SceneElement {
    pub fn new(kind: ElementKind, position: Pos2) -> Self {
        Self {
            id: ElementId::new(),
            name: kind.name().to_owned(),
            position,
            rotation: 0.0,
            scale: unit_scale(),
            opacity: 1.0,
            visible: true,
            locked: false,
            layer: 0,
            style: Style::default(),
            kind,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Scaled, unrotated size.
    pub fn size(&self) -> Vec2 {
        self.kind.size() * self.scale
    }

    /// Unrotated bounds in content space.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position, self.size())
    }

    pub fn center(&self) -> Pos2 {
        self.bounds().center()
    }

    /// The four corners after rotation about the center.
    pub fn corners(&self) -> [Pos2; 4] {
        let b = self.bounds();
        let c = b.center();
        let rot = egui::emath::Rot2::from_angle(self.rotation.to_radians());
        [b.left_top(), b.right_top(), b.right_bottom(), b.left_bottom()].map(|p| c + rot * (p - c))
    }

    /// Axis-aligned box around the rotated element.
    pub fn world_bounds(&self) -> Rect {
        if self.rotation == 0.0 {
            return self.bounds();
        }
        Rect::from_points(&self.corners())
    }

    /// Deep copy under fresh ids (children included), moved by `offset`.
    pub fn fresh_copy(&self, offset: Vec2) -> SceneElement {
        let mut copy = self.clone();
        copy.refresh_ids();
        copy.position += offset;
        copy
    }

    fn refresh_ids(&mut self) {
        self.id = ElementId::new();
        if let ElementKind::Group { children } = &mut self.kind {
            for child in children {
                child.refresh_ids();
            }
        }
    }
}
