//! Factory functions for asset descriptions used in tests and demos.

use shared::*;

// ── Mesh factories ──────────────────────────────────────────────

/// A mesh description with the default material
pub fn mesh(name: &str, primitive: Primitive) -> NodeDescription {
    NodeDescription {
        name: name.to_string(),
        transform: Transform::new(),
        kind: NodeKind::Mesh {
            primitive,
            material: MaterialDesc::default(),
        },
    }
}

/// A mesh description at a position, with a colour
pub fn mesh_at(name: &str, primitive: Primitive, pos: [f64; 3], color: [u8; 3]) -> NodeDescription {
    NodeDescription {
        name: name.to_string(),
        transform: Transform::at(pos),
        kind: NodeKind::Mesh {
            primitive,
            material: MaterialDesc {
                color,
                double_sided: true,
            },
        },
    }
}

/// Box mesh at a position
pub fn box_at(name: &str, w: f64, h: f64, d: f64, pos: [f64; 3]) -> NodeDescription {
    mesh_at(
        name,
        Primitive::Box {
            width: w,
            height: h,
            depth: d,
        },
        pos,
        [200, 200, 200],
    )
}

// ── Group factories ─────────────────────────────────────────────

/// A group description holding `children`
pub fn group(name: &str, pos: [f64; 3], children: Vec<NodeDescription>) -> NodeDescription {
    NodeDescription {
        name: name.to_string(),
        transform: Transform::at(pos),
        kind: NodeKind::Group { children },
    }
}

/// Inverter cabinet: a body box with a front panel, as a single group
pub fn inverter(pos: [f64; 3]) -> NodeDescription {
    group(
        "inverter",
        pos,
        vec![
            box_at("inverter_body", 120.0, 160.0, 60.0, [0.0, 80.0, 0.0]),
            mesh_at(
                "inverter_panel",
                Primitive::Plane {
                    width: 100.0,
                    height: 140.0,
                },
                [0.0, 80.0, 31.0],
                [40, 40, 48],
            ),
        ],
    )
}

/// Battery rack of `count` modules stacked upwards
pub fn battery_rack(pos: [f64; 3], count: usize) -> NodeDescription {
    let modules = (0..count)
        .map(|i| {
            box_at(
                &format!("battery_{i}"),
                80.0,
                40.0,
                80.0,
                [0.0, 20.0 + 45.0 * i as f64, 0.0],
            )
        })
        .collect();
    group("battery_rack", pos, modules)
}

/// Serialize a description to JSON, as the asset loader reads it
pub fn to_json(desc: &NodeDescription) -> String {
    serde_json::to_string_pretty(desc).unwrap_or_default()
}
