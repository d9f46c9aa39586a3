use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use base::defs::{Error, ErrorKind::*, IntoResult, Result};
use base::util::fs;

use crate::mesh::Mesh;
use crate::misc::{Color, Point3};

pub fn import_obj_file<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    import_obj(fs::open_file(path)?).map_err(|err| {
        let desc = format!("{} in '{}'", err.description, path.display());
        Error::new(err.kind, desc)
    })
}

pub fn import_obj<R: Read>(obj_reader: R) -> Result<Mesh> {
    let mut state = ImportState::default();

    for line_res in BufReader::new(obj_reader).lines() {
        let line = line_res.res(|| "failed to read OBJ data".to_string())?;
        state.line += 1;

        let parts: Vec<&str> = line.split_whitespace().collect();
        if !parts.is_empty() {
            match parts[0] {
                "f" => import_f(&mut state, &parts)?,
                "v" => import_v(&mut state, &parts)?,
                _ => (),
            }
        }
    }

    if state.num_colored > 0 && state.num_colored != state.mesh.vertices.len()
    {
        let desc = format!(
            "only {} of {} vertices have colors",
            state.num_colored,
            state.mesh.vertices.len()
        );
        return Err(Error::new(UnsupportedFeature, desc));
    }
    if state.num_colored == 0 {
        state.mesh.colors = None;
    }

    Ok(state.mesh)
}

#[derive(Default)]
struct ImportState {
    line: usize,
    mesh: Mesh,
    num_colored: usize,
}

fn import_v(state: &mut ImportState, parts: &[&str]) -> Result<()> {
    // Either "v x y z", "v x y z w" or "v x y z r g b".
    if parts.len() != 4 && parts.len() != 5 && parts.len() != 7 {
        return Err(Error::new(
            MalformedData,
            format!("malformed v-statement at line {}", state.line),
        ));
    }

    let x = parse_coord("x-coordinate of v-statement", state.line, parts[1])?;
    let y = parse_coord("y-coordinate of v-statement", state.line, parts[2])?;
    let z = parse_coord("z-coordinate of v-statement", state.line, parts[3])?;
    state.mesh.vertices.push(Point3::new(x, y, z));

    let colors = state.mesh.colors.get_or_insert_with(Vec::new);
    if parts.len() == 7 {
        let what = "color component of v-statement";
        let r = parse_coord(what, state.line, parts[4])?;
        let g = parse_coord(what, state.line, parts[5])?;
        let b = parse_coord(what, state.line, parts[6])?;
        colors.push(Color::new(r, g, b));
        state.num_colored += 1;
    } else {
        colors.push(Color::from(Mesh::UNSET_COLOR));
    }

    Ok(())
}

fn import_f(state: &mut ImportState, parts: &[&str]) -> Result<()> {
    if parts.len() < 4 {
        let desc = format!(
            "bad number of vertices in f-statement at line {}",
            state.line
        );
        return Err(Error::new(MalformedData, desc));
    }

    let mut face_vertices = Vec::with_capacity(parts.len() - 1);
    for (i, part) in parts[1..].iter().enumerate() {
        // Texture and normal references are irrelevant for painting.
        let component = part.split('/').next().unwrap_or_default();
        let num = component.parse::<usize>().unwrap_or_default();
        if num == 0 {
            let desc = format!(
                "malformed vertex {} in f-statement at line {}",
                i + 1,
                state.line
            );
            return Err(Error::new(MalformedData, desc));
        }
        if num > state.mesh.vertices.len() {
            let desc = format!(
                "reference to unknown vertex {} in f-statement at line {}",
                num, state.line
            );
            return Err(Error::new(InconsistentState, desc));
        }
        face_vertices.push(num - 1);
    }

    // Polygons are triangulated as fans around their first vertex.
    for i in 1..face_vertices.len() - 1 {
        state.mesh.faces.push([
            face_vertices[0],
            face_vertices[i],
            face_vertices[i + 1],
        ]);
    }

    Ok(())
}

fn parse_coord(what: &str, line: usize, str: &str) -> Result<f64> {
    match str.parse::<f64>() {
        Ok(val) if val.is_finite() => Ok(val),
        _ => Err(Error::new(
            MalformedData,
            format!("failed to parse {} at line {}", what, line),
        )),
    }
}
