//! File-backed tests: companion discovery, texture loading, persistence.

use std::fs;
use std::path::Path;

use lmk_io::*;
use tempfile::TempDir;

const TRIANGLE_OBJ: &str = "\
mtllib other_name.mtl
v -1 -1 0
v 1 -1 0
v 0 1 0
vt 0 0
vt 1 0
vt 0.5 1
usemtl skin
f 1/1 2/2 3/3
";

fn write_texture(path: &Path) {
    // 2x1: left red, right blue
    write_png_rgb(path, 2, 1, &[255, 0, 0, 0, 0, 255]).unwrap();
}

#[test]
fn test_companion_mtl_and_texture() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("face.obj");
    fs::write(&obj, TRIANGLE_OBJ).unwrap();
    fs::write(dir.path().join("face.mtl"), "newmtl skin\nKd 1 1 1\nmap_Kd skin.png\n").unwrap();
    write_texture(&dir.path().join("skin.png"));

    let asset = ObjAsset::load(&obj).unwrap();
    assert_eq!(asset.mesh.triangle_count(), 1);
    assert_eq!(asset.group_material(0).unwrap().name, "skin");

    let tex = asset.group_texture(0).unwrap();
    assert_eq!((tex.width(), tex.height()), (2, 1));
    assert_eq!(tex.sample(0.1, 0.5), [255, 0, 0]);
    assert_eq!(tex.sample(0.9, 0.5), [0, 0, 255]);
}

#[test]
fn test_mtllib_fallback() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("face.obj");
    fs::write(&obj, TRIANGLE_OBJ).unwrap();
    fs::write(dir.path().join("other_name.mtl"), "newmtl skin\nKd 0.5 0.5 0.5\n").unwrap();

    let asset = ObjAsset::load(&obj).unwrap();
    assert_eq!(asset.group_material(0).unwrap().diffuse, [0.5, 0.5, 0.5]);
    assert!(asset.group_texture(0).is_none());
}

#[test]
fn test_missing_texture_is_skipped() {
    let dir = TempDir::new().unwrap();
    let obj = dir.path().join("face.obj");
    fs::write(&obj, TRIANGLE_OBJ).unwrap();
    fs::write(dir.path().join("face.mtl"), "newmtl skin\nmap_Kd nowhere.png\n").unwrap();

    let asset = ObjAsset::load(&obj).unwrap();
    assert!(asset.group_material(0).is_some());
    assert!(asset.group_texture(0).is_none());
}

#[test]
fn test_missing_obj_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ObjAsset::load(dir.path().join("absent.obj")).unwrap_err();
    assert!(matches!(err, LmkIoError::Io(_)));
}

#[test]
fn test_png_roundtrip_keeps_top_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gray.png");
    // 1x2, top row black, bottom row white
    write_png_gray(&path, 1, 2, &[0, 255]).unwrap();

    let img = image::open(&path).unwrap().to_luma8();
    assert_eq!(img.get_pixel(0, 0).0, [0]);
    assert_eq!(img.get_pixel(0, 1).0, [255]);
}

#[test]
fn test_png_size_mismatch() {
    let dir = TempDir::new().unwrap();
    let err = write_png_rgb(dir.path().join("bad.png"), 2, 2, &[0; 5]).unwrap_err();
    assert_eq!(err, LmkIoError::ImageSize { expected: 12, got: 5 });
}

#[test]
fn test_transform_record_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transform0.txt");
    let view = ViewTransform::new(-3.0, 71.0, 12.0, 1.5625, -20.0, 19.0);

    write_transform_record(&path, &view).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "-3.0 71.0 12.0 1.5625 -20.0 19.0"
    );
    assert_eq!(read_transform_record(&path).unwrap(), view);
}

#[test]
fn test_write_into_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_such_dir").join("transform0.txt");
    let err = write_transform_record(&path, &ViewTransform::identity()).unwrap_err();
    assert!(matches!(err, LmkIoError::Io(_)));
}
