use crate::JointId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed point token '{token}'")]
    MalformedPoint { token: String },

    #[error("malformed transform '{value}': {message}")]
    MalformedTransform { value: String, message: String },

    #[error("invalid color '{value}' for {context}")]
    InvalidColor { context: String, value: String },

    #[error("document has no <svg> root element")]
    MissingRoot,

    #[error("document has no skeleton path")]
    MissingSkeletonPath,

    #[error("failed to parse document: {message}")]
    Document { message: String },

    #[error("duplicate joint id {joint}")]
    DuplicateJoint { joint: JointId },

    #[error("unknown parent joint {parent} for joint {joint}")]
    UnknownParentJoint { joint: JointId, parent: JointId },

    #[error("joint {joint} is part of a parent cycle")]
    JointCycle { joint: JointId },

    #[error("skeleton must have exactly one root joint, found {count}")]
    RootCount { count: usize },

    #[error("joint {joint} has no skeleton point (only {points} points)")]
    JointIndexOutOfRange { joint: JointId, points: usize },

    #[error("joint {joint} has no position; assign skeleton points first")]
    UnpositionedJoint { joint: JointId },

    #[error("cannot attach node {node} under node {parent}: it would become its own ancestor")]
    NodeCycle { node: usize, parent: usize },

    #[error("unknown joint {joint}")]
    UnknownJoint { joint: JointId },

    #[cfg(feature = "json")]
    #[error("failed to parse rig JSON: {message}")]
    JsonParse { message: String },
}

/// Recoverable conditions collected while building or rigging a document.
///
/// None of these stop processing; they travel with the result so callers can
/// surface document/skeleton mismatches.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Warning {
    #[error("malformed point token '{token}' skipped")]
    MalformedPoint { token: String },

    #[error("unsupported path command '{token}' ignored")]
    UnknownCommand { token: String },

    #[error("coordinate '{token}' before any path command ignored")]
    OrphanCoordinate { token: String },

    #[error("incomplete cubic segment dropped ({pairs} of 3 coordinate pairs)")]
    IncompleteCurve { pairs: usize },

    #[error("transform ignored: {message}")]
    MalformedTransform { message: String },

    #[error("unsupported style key '{key}' ignored")]
    UnsupportedStyleKey { key: String },

    #[error("style value for '{key}' ignored: '{value}'")]
    MalformedStyle { key: String, value: String },

    #[error("transform on skeleton path '{id}' ignored")]
    SkeletonPathTransformIgnored { id: String },

    #[error("<{element}> outside of the <svg> root ignored")]
    OutsideRoot { element: String },

    #[error("unbalanced </{element}> ignored")]
    UnbalancedEnd { element: String },

    #[error("node {name:?} with key {key} matches no joint and was left unattached")]
    UnmatchedNode { key: u32, name: Option<String> },
}
