use crate::{Error, JointDef, JointId, Point2D, SkeletonTree};

fn points(n: usize) -> Vec<Point2D> {
    (0..n).map(|i| Point2D::new(i as f64, -(i as f64))).collect()
}

fn ids<'a>(joints: impl Iterator<Item = &'a crate::Joint>) -> Vec<u32> {
    joints.map(|j| j.id().0).collect()
}

#[test]
fn humanoid_topology() {
    let tree = SkeletonTree::humanoid();
    assert_eq!(tree.len(), 20);
    assert_eq!(tree.root().id(), JointId(11));
    assert_eq!(tree.max_id(), JointId(19));
    for id in 0..20 {
        assert!(tree.contains(JointId(id)), "missing joint {id}");
    }

    assert_eq!(ids(tree.children_of(JointId(11))), vec![10, 12, 13]);
    assert_eq!(ids(tree.children_of(JointId(1))), vec![0, 2, 3]);
    assert_eq!(tree.parent_of(JointId(0)).map(|j| j.id()), Some(JointId(1)));
    assert_eq!(tree.parent_of(JointId(18)).map(|j| j.id()), Some(JointId(16)));
    assert!(tree.parent_of(JointId(11)).is_none());

    let pelvis = tree.root();
    let kids: Vec<u32> = pelvis
        .child_indices()
        .iter()
        .map(|&i| tree.get(i).unwrap().id().0)
        .collect();
    assert_eq!(kids, vec![10, 12, 13]);
    for &i in pelvis.child_indices() {
        assert_eq!(tree.get(i).unwrap().parent_index(), Some(0));
    }
}

#[test]
fn pre_order_visits_parents_first() {
    let tree = SkeletonTree::humanoid();
    let order = ids(tree.pre_order());
    assert_eq!(order[..4], [11, 10, 1, 0]);
    for joint in tree.pre_order() {
        if let Some(parent) = joint.parent_index() {
            let pos = |id: JointId| order.iter().position(|&o| o == id.0).unwrap();
            assert!(pos(tree.get(parent).unwrap().id()) < pos(joint.id()));
        }
    }
}

#[test]
fn nested_definition_rejects_duplicates() {
    let def = JointDef::new(0, vec![JointDef::leaf(1), JointDef::leaf(1)]);
    assert!(matches!(
        SkeletonTree::new(def),
        Err(Error::DuplicateJoint { joint: JointId(1) })
    ));
}

#[test]
fn chain_definition() {
    let tree = SkeletonTree::new(JointDef::chain(&[3, 1, 2]).unwrap()).unwrap();
    assert_eq!(ids(tree.pre_order()), vec![3, 1, 2]);
    assert_eq!(tree.parent_of(JointId(2)).map(|j| j.id()), Some(JointId(1)));
    assert!(JointDef::chain(&[]).is_none());
}

#[test]
fn from_parents_accepts_any_order() {
    let tree =
        SkeletonTree::from_parents(&[(2, Some(0)), (1, Some(0)), (0, None), (3, Some(1))])
            .unwrap();
    assert_eq!(ids(tree.pre_order()), vec![0, 2, 1, 3]);
    assert_eq!(ids(tree.children_of(JointId(0))), vec![2, 1]);
}

#[test]
fn from_parents_validation() {
    assert!(matches!(
        SkeletonTree::from_parents(&[(0, None), (0, Some(0))]),
        Err(Error::DuplicateJoint { joint: JointId(0) })
    ));
    assert!(matches!(
        SkeletonTree::from_parents(&[(0, None), (1, Some(9))]),
        Err(Error::UnknownParentJoint {
            joint: JointId(1),
            parent: JointId(9)
        })
    ));
    assert!(matches!(
        SkeletonTree::from_parents(&[(0, None), (1, None)]),
        Err(Error::RootCount { count: 2 })
    ));
    assert!(matches!(
        SkeletonTree::from_parents(&[]),
        Err(Error::RootCount { count: 0 })
    ));
    assert!(matches!(
        SkeletonTree::from_parents(&[(0, Some(1)), (1, Some(0))]),
        Err(Error::JointCycle { .. })
    ));
    // A cycle hanging beside a valid root.
    assert!(matches!(
        SkeletonTree::from_parents(&[(0, None), (1, Some(2)), (2, Some(1))]),
        Err(Error::JointCycle { joint: JointId(1) })
    ));
}

#[test]
fn assigns_positions_by_id() {
    let mut tree = SkeletonTree::humanoid();
    tree.assign_positions(&points(20)).unwrap();
    assert_eq!(tree.position(JointId(11)), Some(Point2D::new(11.0, -11.0)));
    assert_eq!(tree.position(JointId(0)), Some(Point2D::ORIGIN));
    assert!(tree.pre_order().all(|j| j.position.is_some()));
}

#[test]
fn joint_beyond_point_list_is_an_error() {
    let def = JointDef::new(0, vec![JointDef::leaf(1), JointDef::leaf(25)]);
    let mut tree = SkeletonTree::new(def).unwrap();

    let err = tree.assign_positions(&points(20)).unwrap_err();
    assert!(matches!(
        err,
        Error::JointIndexOutOfRange {
            joint: JointId(25),
            points: 20
        }
    ));
    // Nothing was written, not even the joints that were in range.
    assert!(tree.pre_order().all(|j| j.position.is_none()));
}
