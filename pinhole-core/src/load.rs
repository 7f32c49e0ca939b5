/// Loading model files into a scene
use std::io::Read;

use tracing::debug;

use crate::error::Result;
use crate::obj::parse_obj;
use crate::scene::Pinhole;
use crate::stl::parse_stl;

impl Pinhole {
    /// Reads OBJ text and draws each face as a closed loop of lines.
    ///
    /// Nothing is drawn when the input fails to parse.
    pub fn load_obj<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let mesh = parse_obj(&text)?;
        debug!(faces = mesh.faces.len(), edges = mesh.edge_count(), "loaded obj");
        self.draw_mesh(&mesh);
        Ok(())
    }

    /// Parses binary or ASCII STL data and outlines every triangle
    pub fn load_stl(&mut self, data: &[u8]) -> Result<()> {
        let mesh = parse_stl(data)?;
        debug!(faces = mesh.faces.len(), "loaded stl");
        self.draw_mesh(&mesh);
        Ok(())
    }
}
