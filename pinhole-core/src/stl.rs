/// STL loader for binary and ASCII formats, yielding triangle outlines
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take, take_till},
    character::complete::{multispace0, multispace1},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Face, Mesh};

const HEADER_LEN: usize = 80;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::Stl("file too small to be a valid STL".to_string()));
    }
    match binary_stl(data) {
        Ok((_, mesh)) => Ok(mesh),
        Err(_) => Err(Error::Stl("unexpected end of file".to_string())),
    }
}

fn binary_stl(input: &[u8]) -> IResult<&[u8], Mesh> {
    let (input, _) = take(HEADER_LEN)(input)?;
    let (input, triangle_count) = le_u32(input)?;
    let (input, faces) = count(binary_facet, triangle_count as usize)(input)?;
    Ok((input, Mesh { faces }))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Face> {
    // normal is unused for line rendering
    let (input, _) = take(12usize)(input)?;
    let (input, vertices) = count(binary_vertex, 3)(input)?;
    // attribute byte count
    let (input, _) = take(2usize)(input)?;
    Ok((input, Face::new(vertices)))
}

fn binary_vertex(input: &[u8]) -> IResult<&[u8], Point3<f64>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point3::new(x as f64, y as f64, z as f64)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    match ascii_stl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(Error::Stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn ascii_stl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = take_till(|c| c == '\n')(input)?; // Optional name
    let (input, faces) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, Mesh { faces }))
}

fn facet(input: &str) -> IResult<&str, Face> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, vertices) = count(vertex, 3)(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, Face::new(vertices)))
}

fn vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    vector3(input)
}

fn vector3(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, x) = preceded(multispace0, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    if data.starts_with(b"solid") {
        // Binary files may also start with "solid" in their header
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }
    parse_binary_stl(data)
}
