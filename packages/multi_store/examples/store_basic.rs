//! Basic usage example for a composed multi-type store.
//!
//! Composes a store over two object types, round-trips typed handles through
//! the type-erased handle enum, and traverses one type at a time.
#![allow(
    dead_code,
    reason = "the composed store exposes more surface than this demo touches"
)]

use multi_store::{BucketError, multi_store};

#[derive(Debug)]
struct Mesh {
    triangles: u32,
}

#[derive(Debug)]
struct Light {
    lumens: u32,
}

multi_store! {
    /// All objects owned by one scene.
    struct Scene;
    /// A handle to any object in a [`Scene`].
    enum SceneHandle;
    types {
        Mesh(Mesh),
        Light(Light),
    }
}

fn main() -> Result<(), BucketError> {
    let mut scene = Scene::new();

    let cube = scene.insert(Mesh { triangles: 12 });
    let lamp = scene.insert(Light { lumens: 800 });
    let sun = scene.insert(Light { lumens: 120_000 });

    println!(
        "Scene holds {} objects across {} declared types",
        scene.len(),
        Scene::TYPE_COUNT
    );

    // Storage-agnostic code sees only the erased handles.
    let selection: Vec<SceneHandle> = vec![cube.into(), lamp.into(), sun.into()];

    for handle in &selection {
        // Probe for the type we care about; mismatches are ordinary errors.
        match handle.narrow::<Light>() {
            Ok(light) => println!("light with {} lumens", scene.get(light)?.lumens),
            Err(mismatch) => println!("skipping: {mismatch}"),
        }
    }

    // Traverse a single type with plain `for` syntax.
    let mut triangles = 0;
    for mesh in scene.view::<Mesh>() {
        triangles += mesh.triangles;
    }
    println!("{triangles} triangles total");

    // Erase through the erased handle; no type knowledge needed.
    scene.erase_any(selection[1])?;
    println!("After erasing the lamp: {} objects", scene.len());

    assert_eq!(scene.len_of::<Light>(), 1);
    assert!(scene.is_valid(cube));
    assert!(!scene.is_valid_any(selection[1]));

    Ok(())
}
