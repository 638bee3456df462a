/// Queue items are keyed by a random UUID assigned when they are added.
pub type SceneId = uuid::Uuid;

/// Node identifiers in the external workflow graph. `0` doubles as the
/// "unset" sentinel and is never a valid node.
pub type NodeId = i64;
