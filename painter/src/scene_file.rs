use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use base::defs::{Error, Result};
use base::util::fs;

use crate::import_obj::import_obj_file;
use crate::misc::{Frame, Point3, Vector3};
use crate::request::CameraShot;
use crate::software::{CameraKey, CameraTrack, SoftwareScene, Viewport};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub viewport: Viewport,
    pub meshes: Vec<MeshEntry>,
    #[serde(default)]
    pub cameras: Vec<CameraEntry>,
    #[serde(default)]
    pub shots: Vec<ShotEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraEntry {
    pub name: String,
    pub fov_y: f64,
    pub keys: Vec<KeyEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyEntry {
    pub frame: Frame,
    pub eye: [f64; 3],
    pub target: [f64; 3],
    pub up: Option<[f64; 3]>,
}

// Frames are inclusive on both ends.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShotEntry {
    pub camera: String,
    pub start: Frame,
    pub end: Frame,
}

impl KeyEntry {
    fn to_key(&self) -> CameraKey {
        let [x, y, z] = self.eye;
        let eye = Point3::new(x, y, z);
        let [x, y, z] = self.target;
        let target = Point3::new(x, y, z);
        let key = CameraKey::new(self.frame, eye, target);
        match self.up {
            Some([x, y, z]) => key.with_up(Vector3::new(x, y, z)),
            None => key,
        }
    }
}

// Builds the scene, loading meshes relative to `base_dir`, and returns it
// together with the shot sequence.
pub fn build_scene(
    file: &SceneFile,
    base_dir: &Path,
) -> Result<(SoftwareScene, Vec<CameraShot>)> {
    let mut scene = SoftwareScene::new(file.viewport)?;

    for entry in &file.meshes {
        let path = base_dir.join(&entry.path);
        let mesh = import_obj_file(&path)?;
        info!(
            "  loaded mesh '{}' ({} vertices, {} faces)",
            entry.name,
            mesh.vertices.len(),
            mesh.faces.len()
        );
        scene.add_mesh(&entry.name, mesh)?;
    }

    for entry in &file.cameras {
        let keys = entry.keys.iter().map(KeyEntry::to_key).collect();
        let track = CameraTrack::new(entry.fov_y, keys).map_err(|e| {
            let desc = format!("bad camera '{}': {}", entry.name, e);
            Error::new(e.kind, desc)
        })?;
        scene.add_camera(&entry.name, track)?;
    }

    let shots = file
        .shots
        .iter()
        .map(|s| CameraShot::from_inclusive(&s.camera, s.start, s.end))
        .collect::<Result<Vec<_>>>()?;

    Ok((scene, shots))
}

pub fn load_scene<P: AsRef<Path>>(
    path: P,
) -> Result<(SoftwareScene, Vec<CameraShot>)> {
    let path = path.as_ref();
    info!("loading scene '{}'...", path.display());
    let file: SceneFile = fs::read_json_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    build_scene(&file, base_dir)
}

#[cfg(test)]
mod test {
    use super::*;

    use std::io::Write;

    use base::defs::ErrorKind::*;

    use crate::host::{Scene, ViewportContext};

    fn parse_scene_file(json: &str) -> SceneFile {
        serde_json::from_str(json).unwrap()
    }

    const SCENE: &str = r#"{
        "viewport": {"width": 640, "height": 480},
        "meshes": [{"name": "body", "path": "body.obj"}],
        "cameras": [{
            "name": "cam1",
            "fov_y": 0.8,
            "keys": [
                {"frame": 1, "eye": [0, 0, 10], "target": [0, 0, 0]},
                {"frame": 11, "eye": [10, 0, 10], "target": [0, 0, 0],
                 "up": [0, 1, 0]}
            ]
        }],
        "shots": [{"camera": "cam1", "start": 1, "end": 24}]
    }"#;

    const OBJ: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    #[test]
    fn test_parse_scene_file() {
        let file = parse_scene_file(SCENE);
        assert_eq!(file.viewport, Viewport { width: 640, height: 480 });
        assert_eq!(file.meshes[0].path, PathBuf::from("body.obj"));
        assert_eq!(file.cameras[0].keys.len(), 2);
        assert_eq!(file.cameras[0].keys[0].up, None);
        assert_eq!(file.shots[0].end, 24);

        let res = serde_json::from_str::<SceneFile>(
            r#"{"meshes": [], "lights": []}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_load_scene() {
        let dir = std::env::temp_dir()
            .join(format!("painter-scene-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::File::create(dir.join("body.obj"))
            .unwrap()
            .write_all(OBJ.as_bytes())
            .unwrap();
        std::fs::write(dir.join("scene.json"), SCENE).unwrap();

        let (mut scene, shots) = load_scene(dir.join("scene.json")).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(shots, vec![CameraShot::new("cam1", 1, 25).unwrap()]);
        assert_eq!(scene.resolve_meshes("body"), vec![0]);
        assert_eq!(scene.mesh(0).unwrap().faces.len(), 2);

        scene.set_active_camera("cam1").unwrap();
        scene.set_current_frame(6);
        let eye = scene.camera_position().unwrap();
        assert_eq!(eye, Point3::new(5.0, 0.0, 10.0));
    }

    #[test]
    fn test_load_scene_missing_mesh() {
        let file = parse_scene_file(SCENE);
        let err = build_scene(&file, Path::new("/nonexistent")).err().unwrap();
        assert_eq!(err.kind, IoError);
    }

    #[test]
    fn test_build_scene_bad_camera() {
        let file = parse_scene_file(
            r#"{"meshes": [],
                "cameras": [{"name": "c", "fov_y": 0.8, "keys": []}]}"#,
        );
        let err = build_scene(&file, Path::new(".")).err().unwrap();
        assert_eq!(err.kind, MalformedData);
        assert!(err.description.contains("'c'"));
    }
}
