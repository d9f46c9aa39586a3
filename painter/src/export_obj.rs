use std::io;

use base::define_raw_output;
use base::defs::{IntoResult, Result};

use crate::mesh::Mesh;

define_raw_output!(ObjOutput, "obj");

pub fn export_obj(mesh: &Mesh, writer: &mut dyn io::Write) -> Result<()> {
    let write_err = || "failed to write OBJ-file".to_string();

    match &mesh.colors {
        Some(colors) => {
            for (v, c) in mesh.vertices.iter().zip(colors.iter()) {
                writeln!(
                    writer,
                    "v {:.6} {:.6} {:.6} {:.4} {:.4} {:.4}",
                    v[0], v[1], v[2], c[0], c[1], c[2]
                )
                .into_result(write_err)?;
            }
        }
        None => {
            for v in &mesh.vertices {
                writeln!(writer, "v {:.6} {:.6} {:.6}", v[0], v[1], v[2])
                    .into_result(write_err)?;
            }
        }
    }

    for f in &mesh.faces {
        // Note: Indexing starts at 1.
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)
            .into_result(write_err)?;
    }

    writer.flush().into_result(write_err)
}
