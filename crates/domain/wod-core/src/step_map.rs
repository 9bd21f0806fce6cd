use serde::Serialize;

use crate::icons::{icon_for_key, Icon};
use crate::{Step, StepKind};

/// Where a node sits in the plan; drives connector drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPosition {
    Only,
    First,
    Middle,
    Last,
}

impl StepPosition {
    fn at(index: usize, len: usize) -> Self {
        match (index, len) {
            (_, 1) => StepPosition::Only,
            (0, _) => StepPosition::First,
            (i, n) if i + 1 == n => StepPosition::Last,
            _ => StepPosition::Middle,
        }
    }

    /// Whether a connector follows this node.
    pub fn has_connector(self) -> bool {
        matches!(self, StepPosition::First | StepPosition::Middle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapNode {
    pub kind: StepKind,
    pub label: String,
    pub sub: Option<String>,
    pub icon: Icon,
    pub position: StepPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "nodes", rename_all = "lowercase")]
pub enum RenderableMap {
    /// Nothing to draw.
    Empty,
    Steps(Vec<MapNode>),
}

impl RenderableMap {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderableMap::Empty)
    }

    pub fn nodes(&self) -> &[MapNode] {
        match self {
            RenderableMap::Empty => &[],
            RenderableMap::Steps(nodes) => nodes,
        }
    }
}

pub fn build(steps: Option<&[Step]>) -> RenderableMap {
    let steps = match steps {
        Some(steps) if !steps.is_empty() => steps,
        _ => return RenderableMap::Empty,
    };

    let len = steps.len();
    let nodes = steps
        .iter()
        .enumerate()
        .map(|(ix, step)| MapNode {
            kind: step.kind,
            label: step.label.clone(),
            sub: step.sub.clone(),
            icon: icon_for_key(step.icon.as_deref()),
            position: StepPosition::at(ix, len),
        })
        .collect();

    RenderableMap::Steps(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_cover_short_plans() {
        assert_eq!(StepPosition::at(0, 1), StepPosition::Only);
        assert_eq!(StepPosition::at(0, 2), StepPosition::First);
        assert_eq!(StepPosition::at(1, 2), StepPosition::Last);
        assert_eq!(StepPosition::at(1, 3), StepPosition::Middle);
        assert!(!StepPosition::Only.has_connector());
        assert!(!StepPosition::Last.has_connector());
    }
}
