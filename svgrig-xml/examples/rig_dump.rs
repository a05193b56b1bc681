use serde_json::json;
use svgrig::json::RigConfig;
use svgrig::{JointId, SceneConfig, SkeletonTree};
use std::path::PathBuf;

fn load_rig_config(path: Option<&PathBuf>) -> RigConfig {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).expect("read rig json");
            RigConfig::from_json_str(&json).expect("parse rig json")
        }
        None => RigConfig {
            scene: SceneConfig::default(),
            skeleton: SkeletonTree::humanoid(),
        },
    }
}

fn parse_rotation(arg: &str) -> (JointId, f64) {
    let (joint, degrees) = arg
        .split_once(':')
        .expect("--rotate expects <joint>:<degrees>");
    let joint: u32 = joint.parse().expect("joint id");
    let degrees: f64 = degrees.parse().expect("degrees");
    (JointId(joint), degrees.to_radians())
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut rotations = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--rotate" => {
                if let Some(arg) = args.get(i + 1) {
                    rotations.push(parse_rotation(arg));
                }
                i += 2;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let svg_path = positional
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./svgrig-xml/demos/ginger.svg"));
    let rig_path = positional.get(1).map(PathBuf::from);

    let config = load_rig_config(rig_path.as_ref());
    let svg = std::fs::read_to_string(&svg_path).expect("read svg");
    let mut rig = svgrig_xml::rig_from_svg(&svg, config.scene, config.skeleton).expect("build rig");

    for &(joint, radians) in &rotations {
        rig.rotate_joint(joint, radians).expect("rotate joint");
    }

    let joints: Vec<_> = rig
        .skeleton()
        .pre_order()
        .map(|joint| {
            let rest = joint.position.unwrap_or_default();
            let posed = rig.joint_world_position(joint.id()).unwrap_or(rest);
            let parent = joint
                .parent_index()
                .and_then(|i| rig.skeleton().get(i))
                .map(|p| p.id().0);
            json!({
                "id": joint.id().0,
                "parent": parent,
                "rest": [rest.x, rest.y],
                "world": [posed.x, posed.y],
            })
        })
        .collect();

    let draw_list: Vec<_> = rig
        .draw_list()
        .into_iter()
        .map(|item| {
            let node = rig.scene().node(item.node);
            let (path, style) = node.path().expect("draw items are paths");
            let points: Vec<_> = path
                .transformed(&item.world)
                .points()
                .into_iter()
                .map(|p| [p.x, p.y])
                .collect();
            let w = item.world;
            json!({
                "node": item.node.index(),
                "name": node.name,
                "z": item.z_index,
                "world": {"a": w.a, "b": w.b, "c": w.c, "d": w.d, "x": w.tx, "y": w.ty},
                "fill": style.fill.map(|c| c.to_array()),
                "stroke": style.stroke.map(|c| c.to_array()),
                "strokeWidth": style.stroke_width,
                "points": points,
            })
        })
        .collect();

    let warnings: Vec<_> = rig.warnings().iter().map(ToString::to_string).collect();

    let out = json!({
        "svg": svg_path.display().to_string(),
        "joints": joints,
        "drawList": draw_list,
        "warnings": warnings,
    });

    println!("{}", serde_json::to_string_pretty(&out).expect("json"));
}
