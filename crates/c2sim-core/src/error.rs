use thiserror::Error;

/// Shape mismatch between caller-supplied data and the declared environment contract.
///
/// These are integration bugs: the core refuses to evaluate anything built
/// from a violating observation or context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionViolation {
    #[error("observation has {actual} features, layout declares {expected}")]
    ObservationLength { expected: usize, actual: usize },

    #[error("layout declares {rows} other-agent rows, teams of {allies} allies and {enemies} enemies imply {expected}")]
    TeamSizes {
        rows: usize,
        allies: usize,
        enemies: usize,
        expected: usize,
    },

    #[error("feature index {index} of `{field}` is outside a segment of {width} features")]
    FeatureIndex {
        field: &'static str,
        index: usize,
        width: usize,
    },

    #[error("terrain raster is {actual_w}x{actual_h}, map is {expected_w}x{expected_h}")]
    TerrainShape {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    #[error("`{field}` must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("observation splits its rows into {view_friends} friends and {view_foes} foes, context expects {friends} and {foes}")]
    ViewMismatch {
        view_friends: usize,
        view_foes: usize,
        friends: usize,
        foes: usize,
    },

    #[error("batch member {member} selects tree {index}, bank holds {len}")]
    TreeIndex {
        member: usize,
        index: usize,
        len: usize,
    },
}
