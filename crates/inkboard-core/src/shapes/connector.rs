//! Connectors and the anchors they attach to.

use super::{ShapeId, ShapeKind, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Edge of a shape an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Top,
    Bottom,
    Left,
    Right,
    /// No particular side: the anchor resolves to the shape center.
    #[default]
    None,
}

impl AnchorSide {
    /// Unit exit direction away from the shape.
    pub fn direction(self) -> Vec2 {
        match self {
            AnchorSide::Top => Vec2::new(0.0, -1.0),
            AnchorSide::Bottom => Vec2::new(0.0, 1.0),
            AnchorSide::Left => Vec2::new(-1.0, 0.0),
            AnchorSide::Right => Vec2::new(1.0, 0.0),
            AnchorSide::None => Vec2::ZERO,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, AnchorSide::Left | AnchorSide::Right)
    }
}

/// One end of a connector.
///
/// Shape anchors are resolved against the live store every time they are
/// needed; they never cache coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnchorRepr", into = "AnchorRepr")]
pub enum Anchor {
    /// Attached to `side` of a shape, `percent` of the way along that edge.
    Shape {
        kind: ShapeKind,
        shape_id: ShapeId,
        side: AnchorSide,
        percent: Option<f64>,
    },
    /// Floating world-space point.
    Point { point: Point },
}

impl Anchor {
    pub const DEFAULT_PERCENT: f64 = 0.5;

    pub fn shape(kind: ShapeKind, shape_id: ShapeId, side: AnchorSide) -> Self {
        Anchor::Shape {
            kind,
            shape_id,
            side,
            percent: None,
        }
    }

    pub fn point(point: Point) -> Self {
        Anchor::Point { point }
    }

    /// Id of the referenced shape, if attached.
    pub fn shape_id(&self) -> Option<&ShapeId> {
        match self {
            Anchor::Shape { shape_id, .. } => Some(shape_id),
            Anchor::Point { .. } => None,
        }
    }

    pub fn side(&self) -> AnchorSide {
        match self {
            Anchor::Shape { side, .. } => *side,
            Anchor::Point { .. } => AnchorSide::None,
        }
    }

    /// Whether this anchor is attached to the given shape.
    pub fn references(&self, id: &ShapeId) -> bool {
        self.shape_id() == Some(id)
    }
}

/// Wire form of an anchor: `{kind, shapeId, anchor, percent}` or
/// `{kind: "point", point}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorRepr {
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shape_id: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<AnchorSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point: Option<Point>,
}

impl TryFrom<AnchorRepr> for Anchor {
    type Error = String;

    fn try_from(repr: AnchorRepr) -> Result<Self, Self::Error> {
        if repr.kind == "point" {
            let point = repr.point.ok_or("point anchor without a point")?;
            return Ok(Anchor::Point { point });
        }
        let kind = repr.kind.parse::<ShapeKind>()?;
        let shape_id = repr
            .shape_id
            .ok_or_else(|| format!("{kind} anchor without a shapeId"))?;
        Ok(Anchor::Shape {
            kind,
            shape_id,
            side: repr.anchor.unwrap_or_default(),
            percent: repr.percent,
        })
    }
}

impl From<Anchor> for AnchorRepr {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::Shape {
                kind,
                shape_id,
                side,
                percent,
            } => AnchorRepr {
                kind: kind.name().to_string(),
                shape_id: Some(shape_id),
                anchor: Some(side),
                percent,
                point: None,
            },
            Anchor::Point { point } => AnchorRepr {
                kind: "point".to_string(),
                shape_id: None,
                anchor: None,
                percent: None,
                point: Some(point),
            },
        }
    }
}

/// An elbow connector between two anchors.
///
/// Its geometry depends on the shapes it attaches to, so bounds and
/// hit-testing go through the router (see `geometry::connector_route`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub(crate) id: ShapeId,
    pub from: Anchor,
    pub to: Anchor,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Connector {
    pub fn new(from: Anchor, to: Anchor) -> Self {
        Self {
            id: ShapeId::new(),
            from,
            to,
            style: ShapeStyle::default(),
        }
    }

    /// Whether either end is attached to the given shape.
    pub fn references(&self, id: &ShapeId) -> bool {
        self.from.references(id) || self.to.references(id)
    }

    /// Mutable access to one end (0 = from, anything else = to).
    pub fn end_mut(&mut self, index: usize) -> &mut Anchor {
        if index == 0 { &mut self.from } else { &mut self.to }
    }
}

impl ShapeTrait for Connector {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        None
    }

    fn hit_test(&self, _point: Point, _tolerance: f64) -> bool {
        false
    }

    fn to_path(&self) -> BezPath {
        BezPath::new()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    /// Only floating ends move; attached ends follow their shapes.
    fn translate(&mut self, delta: Vec2) {
        for anchor in [&mut self.from, &mut self.to] {
            if let Anchor::Point { point } = anchor {
                *point += delta;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anchor_wire_format() {
        let anchor = Anchor::Shape {
            kind: ShapeKind::Rect,
            shape_id: ShapeId::from("r1"),
            side: AnchorSide::Right,
            percent: Some(0.25),
        };
        let value = serde_json::to_value(&anchor).unwrap();
        assert_eq!(
            value,
            json!({"kind": "rect", "shapeId": "r1", "anchor": "right", "percent": 0.25})
        );
        let back: Anchor = serde_json::from_value(value).unwrap();
        assert_eq!(back, anchor);
    }

    #[test]
    fn test_point_anchor_wire_format() {
        let value = json!({"kind": "point", "point": {"x": 3.0, "y": 4.0}});
        let anchor: Anchor = serde_json::from_value(value).unwrap();
        assert_eq!(anchor, Anchor::point(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_missing_side_defaults_to_none() {
        let anchor: Anchor =
            serde_json::from_value(json!({"kind": "circle", "shapeId": "c"})).unwrap();
        assert_eq!(anchor.side(), AnchorSide::None);
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let result: Result<Anchor, _> =
            serde_json::from_value(json!({"kind": "blob", "shapeId": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_translate_moves_floating_ends_only() {
        let mut connector = Connector::new(
            Anchor::shape(ShapeKind::Rect, ShapeId::from("a"), AnchorSide::Left),
            Anchor::point(Point::new(10.0, 10.0)),
        );
        connector.translate(Vec2::new(5.0, 0.0));
        assert_eq!(connector.to, Anchor::point(Point::new(15.0, 10.0)));
        assert!(connector.references(&ShapeId::from("a")));
    }
}
