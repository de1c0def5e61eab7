use crate::coord::{Coord, Point};
use crate::tree::CellTree;
use std::io::{Result as IoResult, Write};
use std::num::ParseIntError;
use thiserror::Error;

impl CellTree {
    /// Serialize every tracked cell in Life 1.06 form: a header line, then
    /// one `x y` line per cell, walking quadrants NW, NE, SW, SE. Between
    /// updates every tracked cell is alive, so this is the live set.
    pub fn write<W: Write>(&self, sink: &mut W) -> IoResult<()> {
        writeln!(sink, "#Life 1.06")?;
        let mut result = Ok(());
        self.for_each(|cell| {
            if result.is_ok() {
                result = writeln!(sink, "{} {}", cell.pos.x, cell.pos.y);
            }
        });
        result
    }
}

#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum ParsePointsError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] ParseIntError),
    #[error("dangling coordinate at end of input: {0:?}")]
    Dangling(String),
}

/// Parse a seed stream of parenthesized pairs, e.g. `(0,0), (-3,7)`.
///
/// Digits, `-`, `,` and `)` drive the parse; everything else (including the
/// opening parenthesis and whitespace) is a separator and is skipped. A `,`
/// closes the x coordinate and a `)` closes the pair.
pub fn parse_points(input: &str) -> Result<Vec<Point>, ParsePointsError> {
    let mut points = Vec::new();
    let mut number = String::new();
    let mut x: Coord = 0;

    for c in input.chars() {
        match c {
            '0'..='9' | '-' => number.push(c),
            // A comma between pairs carries no coordinate and is skipped.
            ',' => {
                if !number.is_empty() {
                    x = number.parse()?;
                    number.clear();
                }
            }
            ')' => {
                let y = number.parse()?;
                number.clear();
                points.push(Point::new(x, y));
            }
            _ => {}
        }
    }

    if !number.is_empty() {
        return Err(ParsePointsError::Dangling(number));
    }
    Ok(points)
}
