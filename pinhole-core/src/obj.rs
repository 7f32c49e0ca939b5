/// Wavefront OBJ loader for vertex and face records
use nalgebra::Point3;
use nom::{
    bytes::complete::is_not,
    character::complete::{space0, space1},
    combinator::all_consuming,
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::error::{ParseError, ParseErrorKind};
use crate::geometry::{Face, Mesh};

/// Splits a record into its keyword and arguments, tolerating any run of
/// blanks between them
fn record(line: &str) -> IResult<&str, (&str, Vec<&str>)> {
    let (input, keyword) = preceded(space0, is_not(" \t"))(line)?;
    let (input, args) = many0(preceded(space1, is_not(" \t")))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, (keyword, args)))
}

fn coordinate(line: usize, token: &str) -> Result<f64, ParseError> {
    all_consuming(double::<&str, nom::error::Error<&str>>)(token)
        .map(|(_, v)| v)
        .map_err(|_| invalid_number(line, token))
}

/// Resolves a 1-based face reference such as `7`, `7/2` or `7//3`
fn vertex_ref(
    line: usize,
    token: &str,
    vertices: &[Point3<f64>],
) -> Result<Point3<f64>, ParseError> {
    let index = token.split('/').next().unwrap_or(token);
    let index: usize = index.parse().map_err(|_| invalid_number(line, index))?;
    if index == 0 || index > vertices.len() {
        return Err(ParseError::new(
            line,
            ParseErrorKind::VertexIndexOutOfRange {
                index,
                count: vertices.len(),
            },
        ));
    }
    Ok(vertices[index - 1])
}

fn invalid_number(line: usize, token: &str) -> ParseError {
    ParseError::new(
        line,
        ParseErrorKind::InvalidNumber {
            token: token.to_string(),
        },
    )
}

/// Parse OBJ text into faces.
///
/// Only `v` and `f` records are read. Vertex records with fewer than three
/// coordinates and faces with fewer than three references are skipped.
pub fn parse_obj(input: &str) -> Result<Mesh, ParseError> {
    let mut vertices = Vec::new();
    let mut mesh = Mesh::new();

    for (n, raw) in input.lines().enumerate() {
        let line = n + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let (_, (keyword, args)) = record(text).map_err(|e| {
            ParseError::new(line, ParseErrorKind::Syntax(format!("{:?}", e)))
        })?;

        match keyword {
            "v" if args.len() >= 3 => {
                let x = coordinate(line, args[0])?;
                let y = coordinate(line, args[1])?;
                let z = coordinate(line, args[2])?;
                vertices.push(Point3::new(x, y, z));
            }
            "f" if args.len() >= 3 => {
                let corners = args
                    .iter()
                    .map(|token| vertex_ref(line, token, &vertices))
                    .collect::<Result<Vec<_>, _>>()?;
                mesh.add_face(Face::new(corners));
            }
            _ => {}
        }
    }

    Ok(mesh)
}
