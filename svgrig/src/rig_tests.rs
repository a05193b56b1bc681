use crate::{
    Affine, Attributes, DocumentHandler, Error, JointDef, JointId, NodeId, ParsedDocument,
    Point2D, Rig, SceneBuilder, SkeletonTree, Warning, build_rig, reparent,
};
use std::f64::consts::FRAC_PI_2;

fn assert_approx(actual: f64, expected: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-9,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn assert_point(actual: Point2D, expected: Point2D) {
    assert_approx(actual.x, expected.x);
    assert_approx(actual.y, expected.y);
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs.iter().copied().collect()
}

struct Doc {
    builder: SceneBuilder,
}

impl Doc {
    fn new(skeleton: &str) -> Self {
        let mut builder = SceneBuilder::default();
        builder.element_start("svg", &attrs(&[("id", "character")]));
        if !skeleton.is_empty() {
            builder.element_start("path", &attrs(&[("id", "skeletonPath"), ("d", skeleton)]));
            builder.element_end("path");
        }
        Self { builder }
    }

    fn open(mut self, id: &str, transform: Option<&str>) -> Self {
        let mut a = attrs(&[("id", id)]);
        if let Some(t) = transform {
            a.push("transform", t);
        }
        self.builder.element_start("g", &a);
        self
    }

    fn path(mut self, id: &str, d: &str) -> Self {
        self.builder
            .element_start("path", &attrs(&[("id", id), ("d", d)]));
        self.builder.element_end("path");
        self
    }

    fn close(mut self) -> Self {
        self.builder.element_end("g");
        self
    }

    fn group(self, id: &str, transform: Option<&str>, path_id: &str, d: &str) -> Self {
        self.open(id, transform).path(path_id, d).close()
    }

    fn finish(mut self) -> ParsedDocument {
        self.builder.element_end("svg");
        self.builder.finish().unwrap()
    }
}

fn chain(ids: &[u32]) -> SkeletonTree {
    SkeletonTree::new(JointDef::chain(ids).unwrap()).unwrap()
}

/// World position of every path's first point, by path name.
fn drawn(rig: &Rig) -> Vec<(String, Point2D)> {
    rig.draw_list()
        .into_iter()
        .map(|item| {
            let node = rig.scene().node(item.node);
            let (path, _) = node.path().unwrap();
            (
                node.name.clone().unwrap_or_default(),
                item.world.apply(path.points()[0]),
            )
        })
        .collect()
}

fn world_of(document: &ParsedDocument, name: &str) -> Affine {
    document
        .scene
        .world_transform(document.node_by_name(name).unwrap())
}

#[test]
fn draw_order_follows_document_not_depth() {
    // g3 sits on the deepest joint, g1 on the root.
    let doc = Doc::new("M 10,10 L 20,10 30,10")
        .group("g1-0", None, "p1", "M 0,0")
        .group("g2-1", None, "p2", "M 0,0")
        .group("g3-2", None, "p3", "M 0,0")
        .finish();
    let rig = build_rig(doc, chain(&[0, 1, 2])).unwrap();
    let names: Vec<_> = drawn(&rig).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["p1", "p2", "p3"]);
    let z: Vec<_> = rig.draw_list().iter().map(|i| i.z_index).collect();
    assert_eq!(z, vec![0, 1, 2]);

    // Reversed: the first group now hangs deepest.
    let doc = Doc::new("M 10,10 L 20,10 30,10")
        .group("g1-2", None, "p1", "M 0,0")
        .group("g2-1", None, "p2", "M 0,0")
        .group("g3-0", None, "p3", "M 0,0")
        .finish();
    let rig = build_rig(doc, chain(&[0, 1, 2])).unwrap();
    let names: Vec<_> = drawn(&rig).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["p1", "p2", "p3"]);
}

#[test]
fn reparenting_preserves_world_positions() {
    let doc = Doc::new("M 5,5 L 15,5 25,10")
        .group("torso-0", Some("translate(1,1)"), "shirt", "M 2,2 L 3,3")
        .group("arm-1", Some("translate(3,4)"), "sleeve", "M 0,0 L 1,0")
        .group(
            "hand-2",
            Some("matrix(0,1,-1,0,7,8)"),
            "glove",
            "M 1,0 L 2,0",
        )
        .finish();
    let before: Vec<_> = ["shirt", "sleeve", "glove"]
        .iter()
        .map(|&name| {
            let world = world_of(&doc, name);
            let node = doc.scene.node(doc.node_by_name(name).unwrap());
            world.apply(node.path().unwrap().0.points()[0])
        })
        .collect();

    let rig = build_rig(doc, chain(&[0, 1, 2])).unwrap();
    let after: Vec<_> = drawn(&rig).into_iter().map(|(_, p)| p).collect();
    assert_eq!(after.len(), 3);
    for (a, b) in after.into_iter().zip(before) {
        assert_point(a, b);
    }
    assert!(rig.warnings().is_empty());
}

#[test]
fn uncomposing_parent_offset_recovers_original_transform() {
    let doc = Doc::new("M 5,5 L 15,5")
        .group("arm-1", Some("translate(3,4)"), "sleeve", "M 0,0")
        .finish();
    let arm = doc.node_by_name("arm-1").unwrap();
    let original = world_of(&doc, "arm-1");

    let rig = build_rig(doc, chain(&[0, 1])).unwrap();
    let rebased = rig.scene().node(arm).transform;
    let parent = rig.skeleton().position(JointId(0)).unwrap();

    let recovered = Affine::translate_by(parent).then_inner(&rebased);
    assert_point(recovered.translation(), original.translation());
    assert_point(
        rig.scene().world_transform(arm).apply(Point2D::ORIGIN),
        Point2D::new(3.0, 4.0),
    );
}

#[test]
fn anchors_sit_at_parent_joint_positions() {
    let doc = Doc::new("M 5,5 L 15,5 15,20").finish();
    let rig = build_rig(doc, chain(&[0, 1, 2])).unwrap();

    let anchor_world = |id: u32| {
        let anchor = rig.anchor(JointId(id)).unwrap();
        rig.scene().world_transform(anchor).translation()
    };
    assert_point(anchor_world(0), Point2D::ORIGIN);
    assert_point(anchor_world(1), Point2D::new(5.0, 5.0));
    assert_point(anchor_world(2), Point2D::new(15.0, 5.0));

    let a1 = rig.anchor(JointId(1)).unwrap();
    assert_eq!(rig.scene().node(a1).transform, Affine::translate(5.0, 5.0));
    let a2 = rig.anchor(JointId(2)).unwrap();
    assert_eq!(rig.scene().node(a2).transform, Affine::translate(10.0, 0.0));
    assert_eq!(rig.scene().node(a2).parent(), Some(a1));
    assert_eq!(rig.scene().node(a2).anchor_joint(), Some(JointId(2)));
    // No content keyed to joint 2: a bare anchor.
    assert!(rig.scene().node(a2).children().is_empty());
}

#[test]
fn nested_keyed_groups_move_independently() {
    let doc = Doc::new("M 0,0 L 10,0 20,0")
        .open("body-0", Some("translate(2,0)"))
        .path("belly", "M 1,1")
        .open("arm-1", Some("translate(0,3)"))
        .path("sleeve", "M 1,1")
        .close()
        .close()
        .finish();
    let body = doc.node_by_name("body-0").unwrap();
    let arm = doc.node_by_name("arm-1").unwrap();

    let rig = build_rig(doc, chain(&[0, 1, 2])).unwrap();
    assert_eq!(rig.scene().node(arm).parent(), rig.anchor(JointId(1)));
    assert_eq!(rig.scene().node(body).parent(), rig.anchor(JointId(0)));
    assert!(!rig.scene().node(body).children().contains(&arm));

    let drawn = drawn(&rig);
    assert_eq!(drawn[0].0, "belly");
    assert_point(drawn[0].1, Point2D::new(3.0, 1.0));
    assert_eq!(drawn[1].0, "sleeve");
    assert_point(drawn[1].1, Point2D::new(3.0, 4.0));
}

#[test]
fn unmatched_keys_are_dropped_and_reported() {
    let doc = Doc::new("M 0,0 L 10,0")
        .group("arm-1", None, "sleeve", "M 0,0")
        .group("tail-9", None, "tail", "M 0,0")
        .finish();
    let tail = doc.node_by_name("tail-9").unwrap();

    let rig = build_rig(doc, chain(&[0, 1])).unwrap();
    assert_eq!(
        rig.warnings(),
        &[Warning::UnmatchedNode {
            key: 9,
            name: Some("tail-9".to_string())
        }]
    );
    assert!(!rig.scene().is_attached(tail));
    let names: Vec<_> = drawn(&rig).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["sleeve"]);
}

#[test]
fn unkeyed_content_stays_under_new_root() {
    let doc = Doc::new("M 0,0 L 10,0")
        .group("background", Some("translate(-1,-1)"), "sky", "M 0,0")
        .group("arm-1", None, "sleeve", "M 0,0")
        .path("shadow", "M 4,4")
        .finish();
    let rig = build_rig(doc, chain(&[0, 1])).unwrap();

    let root = rig.scene().node(rig.scene().root());
    assert_eq!(root.name.as_deref(), Some("character"));
    let drawn = drawn(&rig);
    let names: Vec<_> = drawn.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["sky", "sleeve", "shadow"]);
    assert_point(drawn[0].1, Point2D::new(-1.0, -1.0));
    assert_point(drawn[2].1, Point2D::new(4.0, 4.0));
    assert!(rig.scene().find_by_name("background").is_some());
}

#[test]
fn rotating_a_joint_swings_its_descendants() {
    let doc = Doc::new("M 0,0 L 10,0 20,0")
        .group("upper-1", None, "upper", "M 10,0")
        .group("lower-2", None, "lower", "M 20,0")
        .finish();
    let mut rig = build_rig(doc, chain(&[0, 1, 2])).unwrap();

    rig.rotate_joint(JointId(1), FRAC_PI_2).unwrap();
    assert_point(
        rig.joint_world_position(JointId(1)).unwrap(),
        Point2D::new(0.0, 10.0),
    );
    assert_point(
        rig.joint_world_position(JointId(2)).unwrap(),
        Point2D::new(0.0, 20.0),
    );
    let drawn_now = drawn(&rig);
    assert_point(drawn_now[0].1, Point2D::new(0.0, 10.0));
    assert_point(drawn_now[1].1, Point2D::new(0.0, 20.0));

    // Bending the lower bone pivots about joint 1.
    rig.rotate_joint(JointId(2), -FRAC_PI_2).unwrap();
    assert_point(
        rig.joint_world_position(JointId(2)).unwrap(),
        Point2D::new(10.0, 10.0),
    );

    rig.reset_pose();
    assert_point(
        rig.joint_world_position(JointId(2)).unwrap(),
        Point2D::new(20.0, 0.0),
    );
    assert!(matches!(
        rig.rotate_joint(JointId(42), 1.0),
        Err(Error::UnknownJoint { joint: JointId(42) })
    ));
}

#[test]
fn humanoid_rig_from_twenty_points() {
    let skeleton: String = std::iter::once("M".to_string())
        .chain((0..20).map(|i| format!("{},{}", i * 3, 100 - i)))
        .collect::<Vec<_>>()
        .join(" ");
    let doc = Doc::new(&skeleton)
        .group("head-0", None, "face", "M 0,100")
        .group("leftFoot-18", None, "shoe", "M 54,82")
        .finish();
    let rig = build_rig(doc, SkeletonTree::humanoid()).unwrap();

    assert_eq!(
        rig.joint_world_position(JointId(18)),
        rig.skeleton().position(JointId(18))
    );
    for id in 0..20 {
        assert!(rig.anchor(JointId(id)).is_some());
    }
    let drawn = drawn(&rig);
    assert_point(drawn[0].1, Point2D::new(0.0, 100.0));
    assert_point(drawn[1].1, Point2D::new(54.0, 82.0));
}

#[test]
fn structural_failures_are_errors() {
    let doc = Doc::new("").group("arm-1", None, "sleeve", "M 0,0").finish();
    assert!(matches!(
        build_rig(doc, chain(&[0, 1])),
        Err(Error::MissingSkeletonPath)
    ));

    let doc = Doc::new("M 0,0 L 1,1").finish();
    assert!(matches!(
        build_rig(doc, chain(&[0, 1, 25])),
        Err(Error::JointIndexOutOfRange {
            joint: JointId(25),
            points: 2
        })
    ));

    let doc = Doc::new("M 0,0 L 1,1").finish();
    assert!(matches!(
        reparent(doc, chain(&[0, 1])),
        Err(Error::UnpositionedJoint { joint: JointId(0) })
    ));
}

#[test]
fn draw_items_carry_node_handles() {
    let doc = Doc::new("M 0,0")
        .group("dot-0", None, "dot", "M 1,1")
        .finish();
    let dot: NodeId = doc.node_by_name("dot").unwrap();
    let rig = build_rig(doc, chain(&[0])).unwrap();
    let items = rig.draw_list();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].node, dot);
    assert!(items[0].world.is_identity());
}
